//! Scripted editing sessions.
//!
//! A scenario is a JSON document listing simulation nodes, optional
//! [`DashboardConfig`] overrides, and a sequence of editor operations. Running
//! it applies the operations in order to a fresh [`DashboardModel`] and reports
//! the resulting surfaces together with every rejected operation. Rejections
//! are part of the report, not fatal errors.

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::DashboardConfig;
use crate::dashboard::{DashboardModel, MemberEntry};
use crate::error::DashboardError;
use crate::group::GroupId;
use crate::owner::{OwnerId, OwnerRef, SimNode};
use crate::proxy::ProxyId;
use crate::source::PropertyKey;
use crate::value::PropertyValue;
use crate::view_model::{
    DashboardViewModel, GroupedDashboardViewModel, ItemDescriptor, PropertySurface,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: DashboardConfig,
    pub nodes: Vec<SimNode>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// One editor action. Groups are addressed by name, properties by node id
/// and property name.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddProperty { node: OwnerId, property: String },
    RemoveProperty { node: OwnerId, property: String },
    AddGroup {
        #[serde(default)]
        name: Option<String>,
    },
    RemoveGroup { group: String },
    RenameGroup { group: String, name: String },
    AddMember { group: String, node: OwnerId, property: String },
    RemoveMember { group: String, node: OwnerId, property: String },
    SetValue { node: OwnerId, property: String, value: PropertyValue },
    SetGroupValue { group: String, value: PropertyValue },
    SetEditable { enabled: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    #[serde(flatten)]
    pub item: ItemDescriptor,
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    /// Zero-based index into the operation list.
    pub step: usize,
    pub operation: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub properties: Vec<ItemDescriptor>,
    pub groups: Vec<GroupReport>,
    pub failures: Vec<Failure>,
}

impl Scenario {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse {}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn run(&self) -> Result<ScenarioReport> {
        let mut owners: HashMap<OwnerId, OwnerRef> = HashMap::new();
        for node in &self.nodes {
            let owner: OwnerRef = node.clone().shared();
            if owners.insert(node.id, owner).is_some() {
                bail!("Duplicate node id {} in scenario", node.id);
            }
        }

        let mut model = DashboardModel::new(self.config.clone());
        let mut failures = Vec::new();
        for (step, op) in self.operations.iter().enumerate() {
            if let Err(e) = apply(&mut model, &owners, op) {
                warn!("step {} ({:?}) rejected: {}", step, op, e);
                failures.push(Failure {
                    step,
                    operation: format!("{:?}", op),
                    error: e.to_string(),
                });
            }
        }
        info!(
            "scenario: {} operations, {} rejected",
            self.operations.len(),
            failures.len()
        );

        let properties = DashboardViewModel::new(&mut model).items();
        let group_items = GroupedDashboardViewModel::new(&mut model).items();
        let mut groups = Vec::with_capacity(group_items.len());
        for item in group_items {
            let members = match &item.id {
                ProxyId::Group(id) => model.get_members(*id)?,
                ProxyId::Single(_) => Vec::new(),
            };
            groups.push(GroupReport { item, members });
        }

        Ok(ScenarioReport {
            properties,
            groups,
            failures,
        })
    }
}

fn apply(
    model: &mut DashboardModel,
    owners: &HashMap<OwnerId, OwnerRef>,
    op: &Operation,
) -> Result<(), DashboardError> {
    match op {
        Operation::AddProperty { node, property } => {
            let owner = owners
                .get(node)
                .ok_or_else(|| DashboardError::NotFound(format!("node {}", node)))?;
            model.add_node_property(owner.clone(), property).map(|_| ())
        }
        Operation::RemoveProperty { node, property } => {
            model.remove_property(&PropertyKey::new(*node, property.as_str()))
        }
        Operation::AddGroup { name } => model.add_group(name.as_deref()).map(|_| ()),
        Operation::RemoveGroup { group } => {
            let id = group_by_name(model, group)?;
            model.remove_group(id).map(|_| ())
        }
        Operation::RenameGroup { group, name } => {
            let id = group_by_name(model, group)?;
            model.rename_group(id, name)
        }
        Operation::AddMember {
            group,
            node,
            property,
        } => {
            let id = group_by_name(model, group)?;
            model.add_member(id, &PropertyKey::new(*node, property.as_str()))
        }
        Operation::RemoveMember {
            group,
            node,
            property,
        } => {
            let id = group_by_name(model, group)?;
            model.remove_member(id, &PropertyKey::new(*node, property.as_str()))
        }
        Operation::SetValue {
            node,
            property,
            value,
        } => {
            let id = ProxyId::Single(PropertyKey::new(*node, property.as_str()));
            DashboardViewModel::new(model).set_value(&id, value.clone())
        }
        Operation::SetGroupValue { group, value } => {
            let id = ProxyId::Group(group_by_name(model, group)?);
            GroupedDashboardViewModel::new(model).set_value(&id, value.clone())
        }
        Operation::SetEditable { enabled } => {
            model.set_editable(*enabled);
            Ok(())
        }
    }
}

fn group_by_name(model: &DashboardModel, name: &str) -> Result<GroupId, DashboardError> {
    model
        .groups()
        .find_by_name(name)
        .ok_or_else(|| DashboardError::NotFound(format!("group '{}'", name)))
}
