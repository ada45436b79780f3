//! Dashboard behaviour settings.

use serde::{Deserialize, Serialize};

/// Which proxies the editor's "can edit node properties" switch locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPolicy {
    /// Only proxies of node-owned properties; all others are left untouched.
    #[default]
    NodesOnly,
    /// Every proxy, whatever owns the property.
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Prefix of auto-generated group names (`"Group 1"`, `"Group 2"`, ...).
    pub group_name_prefix: String,
    /// Category under which groups are listed on the grouped surface.
    pub group_category: String,
    pub lock_policy: LockPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            group_name_prefix: "Group".to_string(),
            group_category: "Groups".to_string(),
            lock_policy: LockPolicy::NodesOnly,
        }
    }
}
