//! Property groups and the group dashboard.
//!
//! A [`PropertyGroup`] is a named, ordered list of source property keys. The
//! [`GroupDashboard`] keeps the groups in creation order and guarantees unique
//! names. Membership back-references live on the source properties inside the
//! [`crate::dashboard::Dashboard`]; keeping both sides symmetric is the job of
//! [`crate::dashboard::DashboardModel`], which is the only caller of the
//! crate-private mutators here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DashboardError, Result};
use crate::proxy::GroupProxyProperty;
use crate::source::PropertyKey;

/// Stable handle of a group. Never reused within one group dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct PropertyGroup {
    id: GroupId,
    name: String,
    members: Vec<PropertyKey>,
}

impl PropertyGroup {
    fn new(id: GroupId, name: String) -> Self {
        Self {
            id,
            name,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in insertion order, which is also display order.
    pub fn members(&self) -> &[PropertyKey] {
        &self.members
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn push(&mut self, key: PropertyKey) {
        self.members.push(key);
    }

    pub(crate) fn remove(&mut self, key: &PropertyKey) -> bool {
        match self.members.iter().position(|k| k == key) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_members(&mut self) -> Vec<PropertyKey> {
        std::mem::take(&mut self.members)
    }
}

/// Ordered collection of group proxies, keyed by group id, with unique names.
#[derive(Debug, Default)]
pub struct GroupDashboard {
    groups: IndexMap<GroupId, GroupProxyProperty>,
    next_id: u32,
}

impl GroupDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: GroupId) -> Option<&GroupProxyProperty> {
        self.groups.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: GroupId) -> Option<&mut GroupProxyProperty> {
        self.groups.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupProxyProperty> {
        self.groups.values()
    }

    pub fn find_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups
            .values()
            .find(|g| g.group().name() == name)
            .map(|g| g.id())
    }

    /// First `"<prefix> <n>"` (n counting from 1) not used by any group.
    pub fn next_free_name(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{} {}", prefix, n))
            .find(|candidate| self.find_by_name(candidate).is_none())
            .unwrap_or_else(|| prefix.to_string())
    }

    /// Create an empty group. `None` picks the next free auto-generated name.
    pub fn add_group(&mut self, name: Option<&str>, prefix: &str) -> Result<GroupId> {
        let name = match name {
            Some(n) => normalize_name(n)?,
            None => self.next_free_name(prefix),
        };
        if self.find_by_name(&name).is_some() {
            return Err(DashboardError::DuplicateEntry(name));
        }
        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.groups
            .insert(id, GroupProxyProperty::new(PropertyGroup::new(id, name)));
        Ok(id)
    }

    pub fn rename_group(&mut self, id: GroupId, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        if let Some(other) = self.find_by_name(&name) {
            if other != id {
                return Err(DashboardError::DuplicateEntry(name));
            }
        }
        let proxy = self
            .groups
            .get_mut(&id)
            .ok_or_else(|| DashboardError::NotFound(format!("group {}", id)))?;
        proxy.group_mut().name = name;
        Ok(())
    }

    /// Detach the group from the dashboard. Member back-references are the
    /// caller's responsibility.
    pub(crate) fn remove_group(&mut self, id: GroupId) -> Result<GroupProxyProperty> {
        self.groups
            .shift_remove(&id)
            .ok_or_else(|| DashboardError::NotFound(format!("group {}", id)))
    }
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_names_skip_taken_names() {
        let mut groups = GroupDashboard::new();
        groups.add_group(Some("Group 1"), "Group").unwrap();
        let id = groups.add_group(None, "Group").unwrap();
        assert_eq!(groups.get(id).unwrap().group().name(), "Group 2");
    }

    #[test]
    fn rename_to_own_name_is_allowed() {
        let mut groups = GroupDashboard::new();
        let a = groups.add_group(Some("A"), "Group").unwrap();
        groups.add_group(Some("B"), "Group").unwrap();
        groups.rename_group(a, " A ").unwrap();
        assert_eq!(
            groups.rename_group(a, "B"),
            Err(DashboardError::DuplicateEntry("B".into()))
        );
        assert_eq!(
            groups.rename_group(a, "   "),
            Err(DashboardError::InvalidName("   ".into()))
        );
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut groups = GroupDashboard::new();
        let a = groups.add_group(None, "Group").unwrap();
        groups.remove_group(a).unwrap();
        let b = groups.add_group(None, "Group").unwrap();
        assert_ne!(a, b);
    }
}
