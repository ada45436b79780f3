//! Proxy-and-group property model for simulation dashboards.
//!
//! Node properties are exposed on a [`dashboard::Dashboard`] as independently
//! addressable proxies and can be clustered into named groups that are edited
//! as one logical property. [`dashboard::DashboardModel`] enforces the
//! membership rules, [`view_model`] adapts the model to a generic property
//! grid, and [`panel`] reproduces the editor panel's selection behaviour.
//!
//! The binary `dashprop` runs a JSON scenario against the model and prints the
//! resulting surfaces.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod group;
pub mod owner;
pub mod panel;
pub mod proxy;
pub mod scenario;
pub mod source;
pub mod value;
pub mod view_model;

pub use config::{DashboardConfig, LockPolicy};
pub use dashboard::{Dashboard, DashboardModel, MemberEntry};
pub use error::DashboardError;
pub use events::ModelEvent;
pub use group::{GroupDashboard, GroupId, PropertyGroup};
pub use owner::{OwnerId, OwnerKind, OwnerRef, PropertyOwner, SimNode};
pub use panel::DashboardPanel;
pub use proxy::{GroupProxyProperty, Proxy, ProxyId, ProxyProperty, SingleProxyProperty};
pub use source::{PropertyKey, SourceProperty};
pub use value::{PropertyValue, ValueKind};
pub use view_model::{DashboardViewModel, GroupedDashboardViewModel, ItemDescriptor, PropertySurface};
