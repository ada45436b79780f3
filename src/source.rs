//! Source properties: real, owner-bound properties a proxy reads and writes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DashboardError, Result};
use crate::group::GroupId;
use crate::owner::{OwnerId, OwnerKind, OwnerRef};
use crate::value::{PropertyValue, ValueKind};

/// Identity of a source property: owner identity plus property name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyKey {
    pub owner: OwnerId,
    pub name: String,
}

impl PropertyKey {
    pub fn new(owner: OwnerId, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A property of some owner object, with an optional group back-reference.
///
/// The back-reference is a [`GroupId`] handle, not a pointer. It is only
/// changed by [`crate::dashboard::DashboardModel`], which keeps it symmetric
/// with the group's member list.
#[derive(Clone)]
pub struct SourceProperty {
    key: PropertyKey,
    owner: OwnerRef,
    group: Option<GroupId>,
}

impl SourceProperty {
    /// Bind to `property` on `owner`. Fails with `NotFound` if the owner
    /// exposes no such property.
    pub fn new(owner: OwnerRef, property: &str) -> Result<Self> {
        let key = {
            let o = owner.borrow();
            if !o.has_property(property) {
                return Err(DashboardError::NotFound(format!("{}.{}", o.name(), property)));
            }
            PropertyKey::new(o.id(), property)
        };
        Ok(Self {
            key,
            owner,
            group: None,
        })
    }

    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    pub fn owner_name(&self) -> String {
        self.owner.borrow().name().to_string()
    }

    pub fn owner_kind(&self) -> OwnerKind {
        self.owner.borrow().kind()
    }

    /// `<owner name>.<property name>`, as shown in member lists.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.owner.borrow().name(), self.key.name)
    }

    pub fn value(&self) -> Option<PropertyValue> {
        self.owner.borrow().get(&self.key.name)
    }

    pub fn kind(&self) -> Option<ValueKind> {
        self.value().map(|v| v.kind())
    }

    /// Read-only as declared by the owner.
    pub fn is_read_only(&self) -> bool {
        self.owner.borrow().is_read_only(&self.key.name)
    }

    pub fn check_assign(&self, value: &PropertyValue) -> Result<()> {
        self.owner.borrow().check_assign(&self.key.name, value)
    }

    pub fn set_value(&self, value: PropertyValue) -> Result<()> {
        self.owner.borrow_mut().set(&self.key.name, value)
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }
}

impl fmt::Debug for SourceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceProperty")
            .field("key", &self.key)
            .field("group", &self.group)
            .finish()
    }
}
