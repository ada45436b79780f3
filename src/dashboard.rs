//! The flat dashboard and the editing session that ties it to the groups.
//!
//! [`Dashboard`] holds one [`SingleProxyProperty`] per exposed property.
//! [`DashboardModel`] owns a dashboard and a [`GroupDashboard`] and is the
//! only place where membership changes happen, so that after every call:
//!
//! - a property's group back-reference and the group's member list agree;
//! - a property is a member of at most one group;
//! - removing a property removes it from its group;
//! - removing a group clears the back-reference of each former member.
//!
//! Every operation either fully succeeds and announces itself on the change
//! channel, or fails and leaves the model untouched.

use indexmap::IndexMap;
use log::debug;
use std::sync::mpsc::Receiver;

use crate::config::{DashboardConfig, LockPolicy};
use crate::error::{DashboardError, Result};
use crate::events::{ChangeNotifier, ModelEvent};
use crate::group::{GroupDashboard, GroupId};
use crate::owner::{OwnerKind, OwnerRef};
use crate::proxy::{Proxy, ProxyId, ProxyProperty, SingleProxyProperty};
use crate::source::{PropertyKey, SourceProperty};
use crate::value::PropertyValue;

/// Ordered collection of single proxies, keyed by source identity.
#[derive(Debug, Default)]
pub struct Dashboard {
    properties: IndexMap<PropertyKey, SingleProxyProperty>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.properties.contains_key(key)
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&SingleProxyProperty> {
        self.properties.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &PropertyKey) -> Option<&mut SingleProxyProperty> {
        self.properties.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SingleProxyProperty> {
        self.properties.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.properties.keys()
    }

    fn insert(&mut self, proxy: SingleProxyProperty) -> Result<()> {
        let key = proxy.key().clone();
        if self.properties.contains_key(&key) {
            return Err(DashboardError::DuplicateEntry(key.to_string()));
        }
        self.properties.insert(key, proxy);
        Ok(())
    }

    fn remove(&mut self, key: &PropertyKey) -> Option<SingleProxyProperty> {
        self.properties.shift_remove(key)
    }
}

/// A member list entry of a group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MemberEntry {
    pub key: PropertyKey,
    /// `<owner name>.<property name>`
    pub full_name: String,
}

/// One editing session: the dashboard, its groups, and the change channel.
#[derive(Debug, Default)]
pub struct DashboardModel {
    config: DashboardConfig,
    dashboard: Dashboard,
    groups: GroupDashboard,
    notifier: ChangeNotifier,
}

impl DashboardModel {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn groups(&self) -> &GroupDashboard {
        &self.groups
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self) -> Receiver<ModelEvent> {
        self.notifier.subscribe()
    }

    /// Resolve a proxy address.
    pub fn proxy(&self, id: &ProxyId) -> Option<ProxyProperty<'_>> {
        match id {
            ProxyId::Single(key) => self.dashboard.get(key).map(ProxyProperty::Single),
            ProxyId::Group(gid) => self
                .groups
                .get(*gid)
                .map(|g| ProxyProperty::Group(g.bind(&self.dashboard))),
        }
    }

    /// Name of the group `key` belongs to, if any.
    pub fn group_of(&self, key: &PropertyKey) -> Option<&str> {
        let gid = self.dashboard.get(key)?.source().group()?;
        self.groups.get(gid).map(|g| g.name())
    }

    // ── Dashboard ──────────────────────────────────────────────────────────

    pub fn add_property(&mut self, mut source: SourceProperty) -> Result<ProxyId> {
        source.set_group(None);
        let key = source.key().clone();
        self.dashboard.insert(SingleProxyProperty::new(source))?;
        debug!("dashboard: added property {}", key);
        self.notifier.emit(ModelEvent::PropertyAdded(key.clone()));
        Ok(ProxyId::Single(key))
    }

    /// Bind `property` on `owner` and add it in one step.
    pub fn add_node_property(&mut self, owner: OwnerRef, property: &str) -> Result<ProxyId> {
        let source = SourceProperty::new(owner, property)?;
        self.add_property(source)
    }

    /// Remove a property, taking it out of its group first.
    pub fn remove_property(&mut self, key: &PropertyKey) -> Result<()> {
        let proxy = self
            .dashboard
            .remove(key)
            .ok_or_else(|| DashboardError::NotFound(key.to_string()))?;
        if let Some(gid) = proxy.source().group() {
            if let Some(group) = self.groups.get_mut(gid) {
                group.group_mut().remove(key);
            }
            self.notifier.emit(ModelEvent::MemberRemoved {
                group: gid,
                property: key.clone(),
            });
        }
        debug!("dashboard: removed property {}", key);
        self.notifier.emit(ModelEvent::PropertyRemoved(key.clone()));
        Ok(())
    }

    /// Lock (`false`) or unlock (`true`) proxies for editing, as selected by
    /// the configured [`LockPolicy`]. Returns the number of proxies touched.
    pub fn set_editable(&mut self, enabled: bool) -> usize {
        let policy = self.config.lock_policy;
        let mut touched = 0;
        for proxy in self.dashboard.properties.values_mut() {
            let lockable = match policy {
                LockPolicy::NodesOnly => proxy.source().owner_kind() == OwnerKind::Node,
                LockPolicy::All => true,
            };
            if lockable {
                if enabled {
                    proxy.clear_read_only_override();
                } else {
                    proxy.set_read_only(true);
                }
                touched += 1;
            }
        }
        debug!("dashboard: editable={} on {} proxies", enabled, touched);
        self.notifier.emit(ModelEvent::EditabilityChanged { enabled });
        touched
    }

    // ── Groups ─────────────────────────────────────────────────────────────

    /// Create an empty group; `None` auto-generates the name.
    pub fn add_group(&mut self, name: Option<&str>) -> Result<GroupId> {
        let id = self.groups.add_group(name, &self.config.group_name_prefix)?;
        debug!("groups: added group {}", id);
        self.notifier.emit(ModelEvent::GroupAdded(id));
        Ok(id)
    }

    /// Delete a group, ungrouping its members. Returns the former members.
    pub fn remove_group(&mut self, id: GroupId) -> Result<Vec<PropertyKey>> {
        let mut proxy = self.groups.remove_group(id)?;
        let members = proxy.group_mut().take_members();
        for key in &members {
            if let Some(single) = self.dashboard.get_mut(key) {
                single.source_mut().set_group(None);
            }
        }
        debug!("groups: removed group {} ({} members ungrouped)", id, members.len());
        self.notifier.emit(ModelEvent::GroupRemoved(id));
        Ok(members)
    }

    pub fn rename_group(&mut self, id: GroupId, name: &str) -> Result<()> {
        self.groups.rename_group(id, name)?;
        self.notifier.emit(ModelEvent::GroupRenamed(id));
        Ok(())
    }

    pub fn add_member(&mut self, id: GroupId, key: &PropertyKey) -> Result<()> {
        let group = self
            .groups
            .get(id)
            .ok_or_else(|| DashboardError::NotFound(format!("group {}", id)))?;
        let single = self
            .dashboard
            .get(key)
            .ok_or_else(|| DashboardError::NotFound(key.to_string()))?;

        if let Some(current) = single.source().group() {
            let group_name = self
                .groups
                .get(current)
                .map(|g| g.name().to_string())
                .unwrap_or_else(|| current.to_string());
            return Err(DashboardError::AlreadyGrouped {
                property: single.source().full_name(),
                group: group_name,
            });
        }

        let group_kind = group.bind(&self.dashboard).kind();
        if let (Some(expected), Some(found)) = (group_kind, single.kind()) {
            if expected != found {
                return Err(DashboardError::IncompatibleMember {
                    property: single.source().full_name(),
                    group: group.name().to_string(),
                    expected,
                    found,
                });
            }
        }

        if let Some(group) = self.groups.get_mut(id) {
            group.group_mut().push(key.clone());
        }
        if let Some(single) = self.dashboard.get_mut(key) {
            single.source_mut().set_group(Some(id));
        }
        debug!("groups: added {} to group {}", key, id);
        self.notifier.emit(ModelEvent::MemberAdded {
            group: id,
            property: key.clone(),
        });
        Ok(())
    }

    pub fn remove_member(&mut self, id: GroupId, key: &PropertyKey) -> Result<()> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| DashboardError::NotFound(format!("group {}", id)))?;
        if !group.group_mut().remove(key) {
            return Err(DashboardError::NotFound(format!(
                "{} in group '{}'",
                key,
                group.name()
            )));
        }
        if let Some(single) = self.dashboard.get_mut(key) {
            single.source_mut().set_group(None);
        }
        debug!("groups: removed {} from group {}", key, id);
        self.notifier.emit(ModelEvent::MemberRemoved {
            group: id,
            property: key.clone(),
        });
        Ok(())
    }

    /// Snapshot of the group's members in insertion order.
    pub fn get_members(&self, id: GroupId) -> Result<Vec<MemberEntry>> {
        let group = self
            .groups
            .get(id)
            .ok_or_else(|| DashboardError::NotFound(format!("group {}", id)))?;
        Ok(group
            .bind(&self.dashboard)
            .members()
            .map(|m| MemberEntry {
                key: m.key().clone(),
                full_name: m.source().full_name(),
            })
            .collect())
    }

    // ── Values ─────────────────────────────────────────────────────────────

    /// Write through the addressed proxy's setter.
    pub fn set_value(&mut self, id: &ProxyId, value: PropertyValue) -> Result<()> {
        let proxy = self
            .proxy(id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))?;
        proxy.set_value(value)?;
        self.notifier.emit(ModelEvent::ValueChanged(id.clone()));
        Ok(())
    }

    /// Verify back-reference symmetry and exclusive membership.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut seen: IndexMap<&PropertyKey, GroupId> = IndexMap::new();
        for group in self.groups.iter() {
            for key in group.group().members() {
                if let Some(other) = seen.insert(key, group.id()) {
                    return Err(format!("{} listed in groups {} and {}", key, other, group.id()));
                }
                match self.dashboard.get(key) {
                    None => return Err(format!("group {} lists missing property {}", group.id(), key)),
                    Some(p) if p.source().group() != Some(group.id()) => {
                        return Err(format!(
                            "{} is in group {} but points at {:?}",
                            key,
                            group.id(),
                            p.source().group()
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
        for proxy in self.dashboard.iter() {
            if let Some(gid) = proxy.source().group() {
                if seen.get(proxy.key()) != Some(&gid) {
                    return Err(format!("{} points at group {} which does not list it", proxy.key(), gid));
                }
            }
        }
        Ok(())
    }
}
