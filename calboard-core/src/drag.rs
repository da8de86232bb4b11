//! Drag-and-drop rescheduling.
//!
//! Dragging captures the event as a [`DragPayload`]. Dropping it on a cell
//! moves the stored event with the same id to the cell's date according to
//! the controller's [`DropPolicy`].

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{CalboardError, CalboardResult};
use crate::event::{Event, day_start};
use crate::store::EventStore;

/// Data carried from drag start to drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub event: Event,
}

impl DragPayload {
    pub fn new(event: &Event) -> Self {
        DragPayload {
            event: event.clone(),
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }

    /// Encode for drag channels that only carry text.
    pub fn to_json(&self) -> CalboardResult<String> {
        serde_json::to_string(self).map_err(|e| CalboardError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> CalboardResult<Self> {
        serde_json::from_str(json).map_err(|e| CalboardError::Payload(e.to_string()))
    }
}

/// How a dropped event's timestamps are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPolicy {
    /// Both start and end become midnight of the target date.
    #[default]
    ResetToDate,
    /// Start keeps its time of day on the target date; the duration is kept.
    PreserveTimeOfDay,
}

impl DropPolicy {
    pub fn relocate(self, event: &mut Event, target: NaiveDate) {
        match self {
            DropPolicy::ResetToDate => {
                event.start_time = day_start(target);
                event.end_time = day_start(target);
            }
            DropPolicy::PreserveTimeOfDay => {
                let duration = event.duration();
                let start = target.and_time(event.start_time.time());
                event.start_time = start;
                event.end_time = start.checked_add_signed(duration).unwrap_or(start);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<DragPayload>,
    policy: DropPolicy,
}

impl DragController {
    pub fn new(policy: DropPolicy) -> Self {
        DragController {
            active: None,
            policy,
        }
    }

    pub fn policy(&self) -> DropPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: DropPolicy) {
        self.policy = policy;
    }

    pub fn active(&self) -> Option<&DragPayload> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Begin dragging `event`, replacing any drag already in progress.
    pub fn start(&mut self, event: &Event) -> DragPayload {
        debug!("Drag started for '{}' ({})", event.name, event.id);
        let payload = DragPayload::new(event);
        self.active = Some(payload.clone());
        payload
    }

    /// End the drag without dropping.
    pub fn cancel(&mut self) -> Option<DragPayload> {
        self.active.take()
    }

    /// Drop the active payload on the cell dated `target`.
    pub fn drop_on(&mut self, target: NaiveDate, store: &mut EventStore) -> CalboardResult<Event> {
        let payload = self
            .active
            .take()
            .ok_or_else(|| CalboardError::Payload("No drag in progress".into()))?;
        self.drop_payload(&payload, target, store)
    }

    /// Drop a payload received from the host on the cell dated `target`.
    ///
    /// The stored event matching the payload's id is moved; the payload's
    /// own copy of the event is only used for its id.
    pub fn drop_payload(
        &self,
        payload: &DragPayload,
        target: NaiveDate,
        store: &mut EventStore,
    ) -> CalboardResult<Event> {
        let id = payload.event_id();
        let policy = self.policy;
        store.modify(id, |event| policy.relocate(event, target))?;
        info!("Moved event {} to {}", id, target);
        store
            .get(id)
            .cloned()
            .ok_or_else(|| CalboardError::EventNotFound(id.to_string()))
    }

    /// Drop a JSON-encoded payload on the cell dated `target`.
    pub fn drop_json(
        &self,
        json: &str,
        target: NaiveDate,
        store: &mut EventStore,
    ) -> CalboardResult<Event> {
        let payload = DragPayload::from_json(json)?;
        self.drop_payload(&payload, target, store)
    }
}
