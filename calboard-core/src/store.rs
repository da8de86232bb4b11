//! In-memory event store.
//!
//! The store is the single owner of every event. Views borrow from it for
//! rendering; mutations go through `add`, `update` and `remove`, each of
//! which notifies subscribers with an [`EventChange`] so the host can
//! re-render.

use std::fmt;

use chrono::NaiveDate;
use log::{debug, info};

use crate::change::EventChange;
use crate::date_range::DateRange;
use crate::error::{CalboardError, CalboardResult};
use crate::event::Event;

/// Callback invoked after every store mutation.
pub type Subscriber = Box<dyn FnMut(&EventChange)>;

/// Handle returned by [`EventStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiver of events emitted by the event form.
pub trait EventSink {
    fn create_event(&mut self, event: Event) -> CalboardResult<()>;
    fn update_event(&mut self, event: Event) -> CalboardResult<()>;
}

#[derive(Default)]
pub struct EventStore {
    events: Vec<Event>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for EventStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStore")
            .field("events", &self.events)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing events, keeping their order.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> CalboardResult<Self> {
        let mut store = Self::new();
        for event in events {
            store.insert(event)?;
        }
        Ok(store)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events starting on `date`, in store order.
    pub fn events_on(&self, date: NaiveDate) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.starts_on(date))
    }

    /// Events whose start date falls inside `range`, in store order.
    pub fn events_in_range(&self, range: DateRange) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| range.contains(e.start_date()))
            .collect()
    }

    // MUTATIONS:

    /// Append a new event. Its id must not already be in the store.
    pub fn add(&mut self, event: Event) -> CalboardResult<()> {
        self.insert(event.clone())?;
        info!("Added event '{}' ({})", event.name, event.id);
        self.notify(&EventChange::created(event));
        Ok(())
    }

    /// Replace the event with the same id, keeping its position.
    pub fn update(&mut self, event: Event) -> CalboardResult<()> {
        event.validate()?;
        let slot = self.slot_mut(&event.id)?;
        let old = std::mem::replace(slot, event.clone());
        info!("Updated event '{}' ({})", event.name, event.id);
        self.notify(&EventChange::updated(old, event));
        Ok(())
    }

    /// Edit the event with `id` in place through `edit`.
    ///
    /// The id is pinned; the edit is discarded if it breaks the time-range
    /// invariant.
    pub fn modify(&mut self, id: &str, edit: impl FnOnce(&mut Event)) -> CalboardResult<()> {
        let mut event = self
            .get(id)
            .cloned()
            .ok_or_else(|| CalboardError::EventNotFound(id.to_string()))?;
        edit(&mut event);
        event.id = id.to_string();
        self.update(event)
    }

    /// Remove the event with `id`, returning it.
    pub fn remove(&mut self, id: &str) -> CalboardResult<Event> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CalboardError::EventNotFound(id.to_string()))?;
        let removed = self.events.remove(index);
        info!("Removed event '{}' ({})", removed.name, removed.id);
        self.notify(&EventChange::deleted(removed.clone()));
        Ok(removed)
    }

    // SUBSCRIPTIONS:

    pub fn subscribe(&mut self, callback: impl FnMut(&EventChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Drop a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn insert(&mut self, event: Event) -> CalboardResult<()> {
        event.validate()?;
        if self.get(&event.id).is_some() {
            return Err(CalboardError::DuplicateEvent(event.id));
        }
        self.events.push(event);
        Ok(())
    }

    fn slot_mut(&mut self, id: &str) -> CalboardResult<&mut Event> {
        self.events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CalboardError::EventNotFound(id.to_string()))
    }

    fn notify(&mut self, change: &EventChange) {
        debug!("Notifying {} subscriber(s): {}", self.subscribers.len(), change);
        for (_, callback) in self.subscribers.iter_mut() {
            callback(change);
        }
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl EventSink for EventStore {
    fn create_event(&mut self, event: Event) -> CalboardResult<()> {
        self.add(event)
    }

    fn update_event(&mut self, event: Event) -> CalboardResult<()> {
        self.update(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_store() -> EventStore {
        EventStore::with_events([
            Event::full_day("Alpha", date(2025, 3, 10)),
            Event::full_day("Beta", date(2025, 3, 10)),
            Event::full_day("Gamma", date(2025, 3, 11)),
        ])
        .unwrap()
    }

    #[test]
    fn remove_deletes_exactly_one_event() {
        let mut store = sample_store();
        let before: Vec<Event> = store.events().to_vec();
        let target = before[1].id.clone();

        let removed = store.remove(&target).unwrap();

        assert_eq!(removed.name, "Beta");
        assert_eq!(store.len(), 2);
        assert_eq!(store.events()[0], before[0]);
        assert_eq!(store.events()[1], before[2]);
    }

    #[test]
    fn remove_unknown_id_leaves_store_untouched() {
        let mut store = sample_store();
        let result = store.remove("missing");
        assert!(matches!(result, Err(CalboardError::EventNotFound(_))));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn update_preserves_position_and_id() {
        let mut store = sample_store();
        let mut edited = store.events()[0].clone();
        edited.name = "Alpha (moved)".to_string();

        store.update(edited.clone()).unwrap();

        assert_eq!(store.events()[0], edited);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn update_rejects_invalid_range() {
        let mut store = sample_store();
        let original = store.events()[0].clone();
        let mut broken = original.clone();
        std::mem::swap(&mut broken.start_time, &mut broken.end_time);

        assert!(matches!(store.update(broken), Err(CalboardError::InvalidTimeRange)));
        assert_eq!(store.events()[0], original);
    }

    #[test]
    fn modify_cannot_change_id() {
        let mut store = sample_store();
        let id = store.events()[0].id.clone();

        store
            .modify(&id, |e| {
                e.id = "other".to_string();
                e.name = "Renamed".to_string();
            })
            .unwrap();

        assert_eq!(store.get(&id).unwrap().name, "Renamed");
        assert!(store.get("other").is_none());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store = sample_store();
        let duplicate = store.events()[0].clone();
        assert!(matches!(store.add(duplicate), Err(CalboardError::DuplicateEvent(_))));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn events_on_matches_start_date() {
        let store = sample_store();
        let names: Vec<_> = store.events_on(date(2025, 3, 10)).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn events_in_range_is_inclusive() {
        let store = sample_store();
        let range = DateRange::new(date(2025, 3, 11), date(2025, 3, 17));
        let found = store.events_in_range(range);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Gamma");
    }

    #[test]
    fn subscribers_see_every_mutation() {
        let mut store = EventStore::new();
        let seen: Rc<RefCell<Vec<ChangeKind>>> = Rc::default();
        let sink = Rc::clone(&seen);
        store.subscribe(move |change| sink.borrow_mut().push(change.kind()));

        let event = Event::full_day("Alpha", date(2025, 3, 10));
        let id = event.id.clone();
        store.add(event).unwrap();
        store.modify(&id, |e| e.name = "Renamed".to_string()).unwrap();
        store.remove(&id).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![ChangeKind::Create, ChangeKind::Update, ChangeKind::Delete]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = EventStore::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let subscription = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.add(Event::full_day("A", date(2025, 3, 10))).unwrap();
        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.add(Event::full_day("B", date(2025, 3, 10))).unwrap();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn failed_mutation_does_not_notify() {
        let mut store = sample_store();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let _ = store.remove("missing");
        let _ = store.update(Event::full_day("Ghost", date(2025, 1, 1)));

        assert_eq!(*count.borrow(), 0);
    }
}
