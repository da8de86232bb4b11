//! Change records delivered to store subscribers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Create => write!(f, "+"),
            ChangeKind::Update => write!(f, "~"),
            ChangeKind::Delete => write!(f, "-"),
        }
    }
}

/// One mutation of the event store.
///
/// `event` is the event as it is after the change, or as it was before a
/// delete. Updates also carry the replaced version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChange {
    kind: ChangeKind,
    event: Event,
    previous: Option<Event>,
}

impl fmt::Display for EventChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.event.name, self.event.id)
    }
}

impl EventChange {
    pub fn created(event: Event) -> Self {
        EventChange {
            kind: ChangeKind::Create,
            event,
            previous: None,
        }
    }

    pub fn updated(old: Event, new: Event) -> Self {
        EventChange {
            kind: ChangeKind::Update,
            event: new,
            previous: Some(old),
        }
    }

    pub fn deleted(event: Event) -> Self {
        EventChange {
            kind: ChangeKind::Delete,
            event,
            previous: None,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// The event this change is about (the new version for updates).
    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    /// Version before the change; `None` for creates.
    pub fn before(&self) -> Option<&Event> {
        match self.kind {
            ChangeKind::Create => None,
            ChangeKind::Update => self.previous.as_ref(),
            ChangeKind::Delete => Some(&self.event),
        }
    }

    /// Version after the change; `None` for deletes.
    pub fn after(&self) -> Option<&Event> {
        match self.kind {
            ChangeKind::Delete => None,
            ChangeKind::Create | ChangeKind::Update => Some(&self.event),
        }
    }
}
