//! Adapters exposing the model to a generic property-editing surface.
//!
//! A host grid enumerates [`ItemDescriptor`]s, writes values back by
//! [`ProxyId`], and re-enumerates wholesale whenever the adapter reports that
//! a drained batch of [`ModelEvent`]s changed it. The adapters borrow the
//! model and keep no state of their own.

use serde::Serialize;

use crate::dashboard::DashboardModel;
use crate::error::{DashboardError, Result};
use crate::events::ModelEvent;
use crate::group::GroupId;
use crate::proxy::{Proxy, ProxyId, ProxyProperty};
use crate::value::{PropertyValue, ValueKind};

/// What the host needs to render one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDescriptor {
    pub id: ProxyId,
    pub name: String,
    pub value: Option<PropertyValue>,
    pub display: String,
    pub kind: Option<ValueKind>,
    pub read_only: bool,
    pub category: String,
    /// Name of the group the property belongs to, for single items.
    pub group: Option<String>,
}

/// A flat, describable set of named, typed, gettable/settable entries.
pub trait PropertySurface {
    fn items(&self) -> Vec<ItemDescriptor>;

    fn item(&self, id: &ProxyId) -> Option<ItemDescriptor>;

    /// Forward a value write to the proxy's setter.
    fn set_value(&mut self, id: &ProxyId, value: PropertyValue) -> Result<()>;

    /// Whether `event` requires this surface to re-enumerate.
    fn is_changed_by(&self, event: &ModelEvent) -> bool;

    /// Collapse a batch of events into a single "changed" signal.
    fn changed(&self, events: &[ModelEvent]) -> bool {
        events.iter().any(|e| self.is_changed_by(e))
    }
}

fn describe(model: &DashboardModel, proxy: ProxyProperty<'_>) -> ItemDescriptor {
    let (category, group) = match proxy {
        ProxyProperty::Single(p) => (
            p.source().owner_name(),
            model.group_of(p.key()).map(str::to_string),
        ),
        ProxyProperty::Group(_) => (model.config().group_category.clone(), None),
    };
    ItemDescriptor {
        id: proxy.id(),
        name: proxy.display_name(),
        value: proxy.value(),
        display: proxy.display_value(),
        kind: proxy.kind(),
        read_only: proxy.is_read_only(),
        category,
        group,
    }
}

/// Surface over the flat dashboard: one item per exposed property.
pub struct DashboardViewModel<'a> {
    model: &'a mut DashboardModel,
}

impl<'a> DashboardViewModel<'a> {
    pub fn new(model: &'a mut DashboardModel) -> Self {
        Self { model }
    }

    pub fn remove_property(&mut self, id: &ProxyId) -> Result<()> {
        match id {
            ProxyId::Single(key) => self.model.remove_property(key),
            ProxyId::Group(_) => Err(not_on_surface(id)),
        }
    }

    pub fn set_editable(&mut self, enabled: bool) -> usize {
        self.model.set_editable(enabled)
    }
}

impl PropertySurface for DashboardViewModel<'_> {
    fn items(&self) -> Vec<ItemDescriptor> {
        self.model
            .dashboard()
            .iter()
            .map(|p| describe(self.model, ProxyProperty::Single(p)))
            .collect()
    }

    fn item(&self, id: &ProxyId) -> Option<ItemDescriptor> {
        match id {
            ProxyId::Single(_) => self.model.proxy(id).map(|p| describe(self.model, p)),
            ProxyId::Group(_) => None,
        }
    }

    fn set_value(&mut self, id: &ProxyId, value: PropertyValue) -> Result<()> {
        match id {
            ProxyId::Single(_) => self.model.set_value(id, value),
            ProxyId::Group(_) => Err(not_on_surface(id)),
        }
    }

    /// Membership decides a property's read-only state and group column, so
    /// every structural event except a new, still empty group counts here.
    fn is_changed_by(&self, event: &ModelEvent) -> bool {
        event.is_structural() && !matches!(event, ModelEvent::GroupAdded(_))
    }
}

/// Surface over the group dashboard: one item per group.
pub struct GroupedDashboardViewModel<'a> {
    model: &'a mut DashboardModel,
}

impl<'a> GroupedDashboardViewModel<'a> {
    pub fn new(model: &'a mut DashboardModel) -> Self {
        Self { model }
    }

    /// Add a group with an auto-generated name.
    pub fn add_grouped_property(&mut self) -> Result<GroupId> {
        self.model.add_group(None)
    }

    pub fn remove_property(&mut self, id: &ProxyId) -> Result<()> {
        match id {
            ProxyId::Group(gid) => self.model.remove_group(*gid).map(|_| ()),
            ProxyId::Single(_) => Err(not_on_surface(id)),
        }
    }

    pub fn rename(&mut self, id: &ProxyId, name: &str) -> Result<()> {
        match id {
            ProxyId::Group(gid) => self.model.rename_group(*gid, name),
            ProxyId::Single(_) => Err(not_on_surface(id)),
        }
    }
}

impl PropertySurface for GroupedDashboardViewModel<'_> {
    fn items(&self) -> Vec<ItemDescriptor> {
        let dashboard = self.model.dashboard();
        self.model
            .groups()
            .iter()
            .map(|g| describe(self.model, ProxyProperty::Group(g.bind(dashboard))))
            .collect()
    }

    fn item(&self, id: &ProxyId) -> Option<ItemDescriptor> {
        match id {
            ProxyId::Group(_) => self.model.proxy(id).map(|p| describe(self.model, p)),
            ProxyId::Single(_) => None,
        }
    }

    fn set_value(&mut self, id: &ProxyId, value: PropertyValue) -> Result<()> {
        match id {
            ProxyId::Group(_) => self.model.set_value(id, value),
            ProxyId::Single(_) => Err(not_on_surface(id)),
        }
    }

    fn is_changed_by(&self, event: &ModelEvent) -> bool {
        event.is_structural() && !matches!(event, ModelEvent::PropertyAdded(_))
    }
}

fn not_on_surface(id: &ProxyId) -> DashboardError {
    DashboardError::NotFound(format!("{} is not on this surface", id))
}
