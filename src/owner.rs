//! Owner objects: the things whose real properties a dashboard exposes.
//!
//! Simulation nodes are the common owner, but anything implementing
//! [`PropertyOwner`] can back a source property. Owners are shared between the
//! simulation and the dashboard through [`OwnerRef`]; the dashboard only ever
//! reads and writes values through the trait, it never owns the objects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::error::{DashboardError, Result};
use crate::value::PropertyValue;

/// Shared, single-threaded handle to an owner object.
pub type OwnerRef = Rc<RefCell<dyn PropertyOwner>>;

/// Identity of an owner object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What sort of object owns a property.
///
/// Only node-owned properties are subject to the editor's edit lock by default
/// (see [`crate::config::LockPolicy`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    #[default]
    Node,
    Other,
}

/// Value accessor interface of an owner object.
pub trait PropertyOwner {
    fn id(&self) -> OwnerId;
    fn name(&self) -> &str;
    fn kind(&self) -> OwnerKind;

    /// Current value of the named property, `None` if the owner has no such property.
    fn get(&self, property: &str) -> Option<PropertyValue>;

    fn has_property(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Whether the owner itself forbids writes to the property.
    fn is_read_only(&self, _property: &str) -> bool {
        false
    }

    /// Validate a write without performing it.
    ///
    /// The default accepts a value of the same kind as the current one on a
    /// writable property.
    fn check_assign(&self, property: &str, value: &PropertyValue) -> Result<()> {
        let current = self
            .get(property)
            .ok_or_else(|| DashboardError::NotFound(format!("{}.{}", self.name(), property)))?;
        if self.is_read_only(property) {
            return Err(DashboardError::ReadOnly(format!("{}.{}", self.name(), property)));
        }
        if current.kind() != value.kind() {
            return Err(DashboardError::InvalidAssignment {
                property: format!("{}.{}", self.name(), property),
                expected: current.kind().to_string(),
                found: value.kind().to_string(),
            });
        }
        Ok(())
    }

    fn set(&mut self, property: &str, value: PropertyValue) -> Result<()>;
}

/// A simulation node with a flat, ordered set of named properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimNode {
    pub id: OwnerId,
    pub name: String,
    #[serde(default)]
    pub kind: OwnerKind,
    pub properties: IndexMap<String, PropertyValue>,
    /// Names of properties the node does not allow to be written.
    #[serde(default)]
    pub read_only: BTreeSet<String>,
}

impl SimNode {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: OwnerId(id),
            name: name.into(),
            kind: OwnerKind::Node,
            properties: IndexMap::new(),
            read_only: BTreeSet::new(),
        }
    }

    pub fn with_kind(mut self, kind: OwnerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn with_read_only_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.read_only.insert(name.to_string());
        self.with_property(name, value)
    }

    /// Wrap the node into a shared handle, keeping a typed handle for the caller.
    pub fn shared(self) -> Rc<RefCell<SimNode>> {
        Rc::new(RefCell::new(self))
    }
}

impl PropertyOwner for SimNode {
    fn id(&self) -> OwnerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> OwnerKind {
        self.kind
    }

    fn get(&self, property: &str) -> Option<PropertyValue> {
        self.properties.get(property).cloned()
    }

    fn is_read_only(&self, property: &str) -> bool {
        self.read_only.contains(property)
    }

    fn set(&mut self, property: &str, value: PropertyValue) -> Result<()> {
        self.check_assign(property, &value)?;
        if let Some(slot) = self.properties.get_mut(property) {
            *slot = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rejects_kind_mismatch_and_read_only() {
        let mut node = SimNode::new(1, "Gain")
            .with_property("K", 2.0)
            .with_read_only_property("Inputs", 1i64);
        assert!(matches!(
            node.set("K", PropertyValue::Text("x".into())),
            Err(DashboardError::InvalidAssignment { .. })
        ));
        assert!(matches!(
            node.set("Inputs", PropertyValue::Int(2)),
            Err(DashboardError::ReadOnly(_))
        ));
        node.set("K", PropertyValue::Float(4.0)).unwrap();
        assert_eq!(node.get("K"), Some(PropertyValue::Float(4.0)));
    }
}
