//! Error type shared by every dashboard operation.
//!
//! Every variant is a local, recoverable condition. A failed operation leaves
//! the model exactly as it was before the call.

use thiserror::Error;

use crate::value::ValueKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A property identity or group name is already present.
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    /// The addressed property, group or member does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The property already belongs to a group.
    #[error("property '{property}' is already a member of group '{group}'")]
    AlreadyGrouped { property: String, group: String },

    /// The value write was rejected by the underlying accessor.
    #[error("cannot assign {found} to '{property}' (expected {expected})")]
    InvalidAssignment {
        property: String,
        expected: String,
        found: String,
    },

    /// The item is read-only in its current state.
    #[error("'{0}' is read-only")]
    ReadOnly(String),

    /// The property's value kind differs from the kind of the group members.
    #[error("cannot add {found} property '{property}' to group '{group}' of {expected} properties")]
    IncompatibleMember {
        property: String,
        group: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// Group names must contain at least one non-whitespace character.
    #[error("invalid group name: {0:?}")]
    InvalidName(String),

    /// A textual item identifier could not be parsed.
    #[error("invalid item id: {0:?}")]
    InvalidId(String),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
