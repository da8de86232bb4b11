//! Calendar state and date logic for calboard.
//!
//! This crate provides everything a calendar UI needs below the rendering layer:
//! - `EventStore`, the in-memory owner of all events, with change subscriptions
//! - `Grid`, the 42-cell month and 7-cell week layouts with events assigned to days
//! - `EventForm`, the create/edit form state machine
//! - `DragController`, drag-and-drop rescheduling
//! - `Calboard`, which ties them together with configuration and view state

pub mod calboard;
pub mod change;
pub mod config;
pub mod date_range;
pub mod drag;
pub mod error;
pub mod event;
pub mod form;
pub mod grid;
pub mod logging;
pub mod store;

pub use calboard::Calboard;
pub use change::{ChangeKind, EventChange};
pub use config::CalboardConfig;
pub use date_range::DateRange;
pub use drag::{DragController, DragPayload, DropPolicy};
pub use error::{CalboardError, CalboardResult};
pub use event::{Event, Palette};
pub use form::{EventForm, FormMode, Submitted, ValidationError};
pub use grid::{Cell, Grid, GridView, build_grid};
pub use store::{EventSink, EventStore, SubscriptionId};
