//! Proxy properties: the addressable units a property editor works with.
//!
//! A proxy stands in either for one source property ([`SingleProxyProperty`])
//! or for a whole group ([`GroupProxyProperty`]). Editors address proxies by
//! [`ProxyId`] and resolve them into a [`ProxyProperty`], matching on the
//! variant instead of downcasting.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::dashboard::Dashboard;
use crate::error::{DashboardError, Result};
use crate::group::{GroupId, PropertyGroup};
use crate::owner::OwnerId;
use crate::source::{PropertyKey, SourceProperty};
use crate::value::{PropertyValue, ValueKind};

/// Address of a proxy.
///
/// Textual form: `"<owner id>/<property name>"` for single proxies and
/// `"group:<id>"` for group proxies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProxyId {
    Single(PropertyKey),
    Group(GroupId),
}

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyId::Single(key) => write!(f, "{}", key),
            ProxyId::Group(id) => write!(f, "group:{}", id),
        }
    }
}

impl FromStr for ProxyId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DashboardError::InvalidId(s.to_string());
        if let Some(rest) = s.strip_prefix("group:") {
            let id = rest.parse::<u32>().map_err(|_| invalid())?;
            return Ok(ProxyId::Group(GroupId(id)));
        }
        let (owner, name) = s.split_once('/').ok_or_else(invalid)?;
        let owner = owner.parse::<u64>().map_err(|_| invalid())?;
        if name.is_empty() {
            return Err(invalid());
        }
        Ok(ProxyId::Single(PropertyKey::new(OwnerId(owner), name)))
    }
}

impl Serialize for ProxyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProxyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<PropertyKey> for ProxyId {
    fn from(key: PropertyKey) -> Self {
        ProxyId::Single(key)
    }
}

impl From<GroupId> for ProxyId {
    fn from(id: GroupId) -> Self {
        ProxyId::Group(id)
    }
}

/// Capabilities every proxy offers to an editor.
pub trait Proxy {
    fn id(&self) -> ProxyId;
    fn display_name(&self) -> String;
    /// The value, if the proxy resolves to a single one.
    fn value(&self) -> Option<PropertyValue>;
    fn display_value(&self) -> String;
    fn kind(&self) -> Option<ValueKind>;
    fn is_read_only(&self) -> bool;
    fn set_value(&self, value: PropertyValue) -> Result<()>;
}

/// Proxy for exactly one source property.
#[derive(Debug, Clone)]
pub struct SingleProxyProperty {
    source: SourceProperty,
    read_only_override: Option<bool>,
}

impl SingleProxyProperty {
    pub fn new(source: SourceProperty) -> Self {
        Self {
            source,
            read_only_override: None,
        }
    }

    pub fn source(&self) -> &SourceProperty {
        &self.source
    }

    pub(crate) fn source_mut(&mut self) -> &mut SourceProperty {
        &mut self.source
    }

    pub fn key(&self) -> &PropertyKey {
        self.source.key()
    }

    pub fn read_only_override(&self) -> Option<bool> {
        self.read_only_override
    }

    /// Explicitly lock or unlock the proxy. An unlocked proxy still honours
    /// the owner's own read-only flag.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only_override = Some(read_only);
    }

    /// Go back to mirroring the owner's read-only flag.
    pub fn clear_read_only_override(&mut self) {
        self.read_only_override = None;
    }

    /// Read-only state ignoring group membership.
    pub fn base_read_only(&self) -> bool {
        self.read_only_override.unwrap_or(false) || self.source.is_read_only()
    }
}

impl Proxy for SingleProxyProperty {
    fn id(&self) -> ProxyId {
        ProxyId::Single(self.source.key().clone())
    }

    fn display_name(&self) -> String {
        self.source.name().to_string()
    }

    fn value(&self) -> Option<PropertyValue> {
        self.source.value()
    }

    fn display_value(&self) -> String {
        self.value().map(|v| v.to_string()).unwrap_or_default()
    }

    fn kind(&self) -> Option<ValueKind> {
        self.source.kind()
    }

    /// Grouped properties are edited through their group.
    fn is_read_only(&self) -> bool {
        self.base_read_only() || self.source.group().is_some()
    }

    fn set_value(&self, value: PropertyValue) -> Result<()> {
        if self.is_read_only() {
            return Err(DashboardError::ReadOnly(self.source.full_name()));
        }
        self.source.set_value(value)
    }
}

/// Proxy for one property group.
#[derive(Debug, Clone)]
pub struct GroupProxyProperty {
    group: PropertyGroup,
}

impl GroupProxyProperty {
    pub(crate) fn new(group: PropertyGroup) -> Self {
        Self { group }
    }

    pub fn id(&self) -> GroupId {
        self.group.id()
    }

    pub fn name(&self) -> &str {
        self.group.name()
    }

    pub fn group(&self) -> &PropertyGroup {
        &self.group
    }

    pub(crate) fn group_mut(&mut self) -> &mut PropertyGroup {
        &mut self.group
    }

    /// Bind the group to the dashboard holding its members.
    pub fn bind<'a>(&'a self, dashboard: &'a Dashboard) -> GroupProxy<'a> {
        GroupProxy {
            proxy: self,
            dashboard,
        }
    }
}

/// A group proxy together with the dashboard its members live in.
///
/// The value of a group is the common value of its members. When the members
/// disagree, or the group is empty, it only has a summary display value.
#[derive(Clone, Copy)]
pub struct GroupProxy<'a> {
    proxy: &'a GroupProxyProperty,
    dashboard: &'a Dashboard,
}

impl<'a> GroupProxy<'a> {
    pub fn group(self) -> &'a PropertyGroup {
        self.proxy.group()
    }

    /// Member proxies in group order.
    pub fn members(self) -> impl Iterator<Item = &'a SingleProxyProperty> {
        let GroupProxy { proxy, dashboard } = self;
        proxy
            .group()
            .members()
            .iter()
            .filter_map(move |key| dashboard.get(key))
    }
}

impl Proxy for GroupProxy<'_> {
    fn id(&self) -> ProxyId {
        ProxyId::Group(self.proxy.id())
    }

    fn display_name(&self) -> String {
        self.proxy.name().to_string()
    }

    fn value(&self) -> Option<PropertyValue> {
        let mut values = self.members().map(|m| m.source().value());
        let first = values.next()??;
        values
            .all(|v| v.as_ref() == Some(&first))
            .then_some(first)
    }

    fn display_value(&self) -> String {
        match self.value() {
            Some(v) => v.to_string(),
            None => format!("{} properties", self.group().len()),
        }
    }

    fn kind(&self) -> Option<ValueKind> {
        self.members().find_map(|m| m.source().kind())
    }

    fn is_read_only(&self) -> bool {
        self.group().is_empty() || self.members().any(|m| m.base_read_only())
    }

    /// Validate against every member first, then write to all of them.
    fn set_value(&self, value: PropertyValue) -> Result<()> {
        if self.group().is_empty() {
            return Err(DashboardError::InvalidAssignment {
                property: self.proxy.name().to_string(),
                expected: "a group with members".to_string(),
                found: value.kind().to_string(),
            });
        }
        if self.is_read_only() {
            return Err(DashboardError::ReadOnly(self.proxy.name().to_string()));
        }
        for member in self.members() {
            member.source().check_assign(&value)?;
        }
        for member in self.members() {
            member.source().set_value(value.clone())?;
        }
        Ok(())
    }
}

/// A resolved proxy of either variant.
#[derive(Clone, Copy)]
pub enum ProxyProperty<'a> {
    Single(&'a SingleProxyProperty),
    Group(GroupProxy<'a>),
}

impl Proxy for ProxyProperty<'_> {
    fn id(&self) -> ProxyId {
        match self {
            ProxyProperty::Single(p) => p.id(),
            ProxyProperty::Group(g) => g.id(),
        }
    }

    fn display_name(&self) -> String {
        match self {
            ProxyProperty::Single(p) => p.display_name(),
            ProxyProperty::Group(g) => g.display_name(),
        }
    }

    fn value(&self) -> Option<PropertyValue> {
        match self {
            ProxyProperty::Single(p) => p.value(),
            ProxyProperty::Group(g) => g.value(),
        }
    }

    fn display_value(&self) -> String {
        match self {
            ProxyProperty::Single(p) => p.display_value(),
            ProxyProperty::Group(g) => g.display_value(),
        }
    }

    fn kind(&self) -> Option<ValueKind> {
        match self {
            ProxyProperty::Single(p) => p.kind(),
            ProxyProperty::Group(g) => g.kind(),
        }
    }

    fn is_read_only(&self) -> bool {
        match self {
            ProxyProperty::Single(p) => p.is_read_only(),
            ProxyProperty::Group(g) => g.is_read_only(),
        }
    }

    fn set_value(&self, value: PropertyValue) -> Result<()> {
        match self {
            ProxyProperty::Single(p) => p.set_value(value),
            ProxyProperty::Group(g) => g.set_value(value),
        }
    }
}
