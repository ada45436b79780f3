//! Model change notifications.
//!
//! Every successful mutation of a [`crate::dashboard::DashboardModel`] is
//! announced on each subscribed channel, after the mutation has been applied
//! and in the order the mutations happened. Rejected operations announce
//! nothing.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::group::GroupId;
use crate::proxy::ProxyId;
use crate::source::PropertyKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    PropertyAdded(PropertyKey),
    PropertyRemoved(PropertyKey),
    EditabilityChanged { enabled: bool },
    GroupAdded(GroupId),
    GroupRemoved(GroupId),
    GroupRenamed(GroupId),
    MemberAdded { group: GroupId, property: PropertyKey },
    MemberRemoved { group: GroupId, property: PropertyKey },
    ValueChanged(ProxyId),
}

impl ModelEvent {
    /// Whether the event adds, removes or reshapes an entry. Value writes and
    /// edit-lock toggles only need a redraw.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            ModelEvent::ValueChanged(_) | ModelEvent::EditabilityChanged { .. }
        )
    }

    /// Whether the event changes the membership shown for `group`.
    pub fn touches_members_of(&self, group: GroupId) -> bool {
        match self {
            ModelEvent::MemberAdded { group: g, .. } | ModelEvent::MemberRemoved { group: g, .. } => {
                *g == group
            }
            ModelEvent::GroupRemoved(g) => *g == group,
            _ => false,
        }
    }
}

/// Fan-out of model events to any number of channel subscribers.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Vec<Sender<ModelEvent>>,
}

impl ChangeNotifier {
    pub fn subscribe(&mut self) -> Receiver<ModelEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber; dropped receivers are pruned.
    pub fn emit(&mut self, event: ModelEvent) {
        log::trace!("model event: {:?}", event);
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
