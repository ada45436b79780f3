//! Widget-free controller for the dashboard property panel.
//!
//! The panel shows two surfaces (flat properties and groups) plus a member
//! list for the selected group. This module keeps the selection, the member
//! list and the enabled state of the panel's actions, and turns model events
//! into refresh flags for the host to act on.

use log::warn;
use std::sync::mpsc::Receiver;

use crate::dashboard::{DashboardModel, MemberEntry};
use crate::error::{DashboardError, Result};
use crate::events::ModelEvent;
use crate::group::GroupId;
use crate::proxy::ProxyId;
use crate::source::PropertyKey;
use crate::view_model::{DashboardViewModel, GroupedDashboardViewModel, PropertySurface};

/// Enabled state of the panel's buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelActions {
    pub remove_property: bool,
    pub remove_group: bool,
    pub rename_group: bool,
    pub add_to_group: bool,
    pub remove_from_group: bool,
}

impl PanelActions {
    fn set_group_actions(&mut self, enabled: bool) {
        self.remove_group = enabled;
        self.rename_group = enabled;
        self.add_to_group = enabled;
        self.remove_from_group = enabled;
    }
}

/// Which parts of the panel the host must redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refresh {
    pub properties: bool,
    pub groups: bool,
    pub members: bool,
}

pub struct DashboardPanel {
    model: DashboardModel,
    events: Receiver<ModelEvent>,
    selected_property: Option<PropertyKey>,
    selected_group: Option<GroupId>,
    members: Vec<MemberEntry>,
    actions: PanelActions,
    refresh: Refresh,
}

impl DashboardPanel {
    pub fn new(mut model: DashboardModel) -> Self {
        let events = model.subscribe();
        Self {
            model,
            events,
            selected_property: None,
            selected_group: None,
            members: Vec::new(),
            actions: PanelActions::default(),
            refresh: Refresh::default(),
        }
    }

    pub fn model(&self) -> &DashboardModel {
        &self.model
    }

    /// Direct access for operations the panel has no button for.
    /// Call [`DashboardPanel::pump_events`] afterwards.
    pub fn model_mut(&mut self) -> &mut DashboardModel {
        &mut self.model
    }

    pub fn dashboard_view(&mut self) -> DashboardViewModel<'_> {
        DashboardViewModel::new(&mut self.model)
    }

    pub fn groups_view(&mut self) -> GroupedDashboardViewModel<'_> {
        GroupedDashboardViewModel::new(&mut self.model)
    }

    pub fn actions(&self) -> PanelActions {
        self.actions
    }

    pub fn members(&self) -> &[MemberEntry] {
        &self.members
    }

    pub fn selected_property(&self) -> Option<&PropertyKey> {
        self.selected_property.as_ref()
    }

    pub fn selected_group(&self) -> Option<GroupId> {
        self.selected_group
    }

    /// Take and reset the pending refresh flags.
    pub fn take_refresh(&mut self) -> Refresh {
        std::mem::take(&mut self.refresh)
    }

    // ── Selection ──────────────────────────────────────────────────────────

    pub fn select_property(&mut self, key: Option<PropertyKey>) {
        if key.is_some() {
            self.actions.remove_property = true;
        }
        self.selected_property = key;
    }

    /// Select a group and repopulate the member list from it.
    /// A group that is no longer in the model selects nothing.
    pub fn select_group(&mut self, id: Option<GroupId>) {
        self.members.clear();
        self.selected_group = id.filter(|id| self.model.groups().get(*id).is_some());
        if let Some(id) = self.selected_group {
            self.actions.set_group_actions(true);
            self.reload_members(id);
        }
        self.refresh.properties = true;
        self.refresh.members = true;
    }

    fn reload_members(&mut self, id: GroupId) {
        self.members = self.model.get_members(id).unwrap_or_default();
    }

    // ── Actions ────────────────────────────────────────────────────────────

    pub fn remove_selected_property(&mut self) -> Result<()> {
        let key = self
            .selected_property
            .take()
            .ok_or_else(|| DashboardError::NotFound("no property selected".to_string()))?;
        let result = self.dashboard_view().remove_property(&ProxyId::Single(key));
        self.finish("remove property", result)
    }

    pub fn add_group(&mut self) -> Result<GroupId> {
        let result = self.groups_view().add_grouped_property();
        self.pump_events();
        result.inspect_err(|e| warn!("add group rejected: {}", e))
    }

    pub fn remove_selected_group(&mut self) -> Result<()> {
        let id = self.require_group()?;
        let result = self.groups_view().remove_property(&ProxyId::Group(id));
        self.refresh.properties = true;
        self.finish("remove group", result)
    }

    pub fn rename_selected_group(&mut self, name: &str) -> Result<()> {
        let id = self.require_group()?;
        let result = self.groups_view().rename(&ProxyId::Group(id), name);
        self.finish("rename group", result)
    }

    /// Add the selected property to the selected group. Both surfaces and the
    /// member list are refreshed whether or not the model accepted it.
    pub fn add_selected_to_group(&mut self) -> Result<()> {
        let Some(key) = self.selected_property.clone() else {
            return Ok(());
        };
        let id = self.require_group()?;
        let result = self.model.add_member(id, &key);
        self.refresh = Refresh {
            properties: true,
            groups: true,
            members: true,
        };
        self.finish("add to group", result)
    }

    /// Remove the given member-list entries from whatever group holds them.
    pub fn remove_from_group(&mut self, keys: &[PropertyKey]) -> Result<()> {
        let mut result = Ok(());
        for key in keys {
            let group = self
                .model
                .dashboard()
                .get(key)
                .and_then(|p| p.source().group());
            let step = match group {
                Some(gid) => self.model.remove_member(gid, key),
                None => Err(DashboardError::NotFound(format!("{} is not grouped", key))),
            };
            if result.is_ok() {
                result = step;
            }
        }
        self.refresh = Refresh {
            properties: true,
            groups: true,
            members: true,
        };
        self.finish("remove from group", result)
    }

    pub fn set_can_edit_node_properties(&mut self, enabled: bool) {
        self.dashboard_view().set_editable(enabled);
        self.pump_events();
    }

    fn require_group(&self) -> Result<GroupId> {
        self.selected_group
            .ok_or_else(|| DashboardError::NotFound("no group selected".to_string()))
    }

    fn finish(&mut self, action: &str, result: Result<()>) -> Result<()> {
        self.pump_events();
        if let Err(e) = &result {
            warn!("{} rejected: {}", action, e);
        }
        result
    }

    // ── Notifications ──────────────────────────────────────────────────────

    /// Drain pending model events and update actions, member list and
    /// refresh flags. Returns the number of events processed.
    pub fn pump_events(&mut self) -> usize {
        let batch: Vec<ModelEvent> = self.events.try_iter().collect();
        if batch.is_empty() {
            return 0;
        }

        let properties_changed = self.dashboard_view().changed(&batch);
        let groups_changed = self.groups_view().changed(&batch);
        if properties_changed {
            self.actions.remove_property = false;
            self.refresh.properties = true;
        }
        if groups_changed {
            self.actions.set_group_actions(false);
            self.refresh.groups = true;
        }
        if batch.iter().any(|e| !e.is_structural()) {
            self.refresh.properties = true;
            self.refresh.groups = true;
        }

        if let Some(selected) = self.selected_property.as_ref() {
            if !self.model.dashboard().contains(selected) {
                self.selected_property = None;
            }
        }
        if let Some(id) = self.selected_group {
            if batch.iter().any(|e| e.touches_members_of(id)) {
                if self.model.groups().get(id).is_some() {
                    self.reload_members(id);
                } else {
                    self.selected_group = None;
                    self.members.clear();
                }
                self.refresh.members = true;
            }
        }
        batch.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::SimNode;

    #[test]
    fn structural_changes_disable_actions_until_reselected() {
        let node = SimNode::new(1, "Node").with_property("A", 1i64).shared();
        let mut panel = DashboardPanel::new(DashboardModel::default());
        let ProxyId::Single(key) = panel.model_mut().add_node_property(node, "A").unwrap() else {
            unreachable!()
        };
        panel.pump_events();

        panel.select_property(Some(key.clone()));
        assert!(panel.actions().remove_property);
        let id = panel.add_group().unwrap();
        assert!(!panel.actions().remove_group);
        panel.select_group(Some(id));
        assert!(panel.actions().add_to_group);
        panel.add_selected_to_group().unwrap();
        assert!(!panel.actions().add_to_group);
        assert_eq!(panel.members().len(), 1);
        assert_eq!(panel.members()[0].full_name, "Node.A");
    }
}
