//! Event form state machine.
//!
//! The form is closed until opened for a day (create) or for an existing
//! event (edit). Submitting a complete form hands exactly one event to an
//! [`EventSink`] and closes the form; submitting an incomplete one does
//! nothing. Hosts that want to explain why can call [`EventForm::validate`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::debug;
use thiserror::Error;

use crate::change::ChangeKind;
use crate::error::{CalboardError, CalboardResult};
use crate::event::{Event, Palette, day_end, day_start};
use crate::store::EventSink;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Event name is empty")]
    EmptyName,

    #[error("Start time is not set")]
    MissingStartTime,

    #[error("End time is not set")]
    MissingEndTime,

    #[error("End time is before start time")]
    EndBeforeStart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Create { day: NaiveDate },
    Edit { id: String, day: NaiveDate },
}

/// Outcome of a submit that reached the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub kind: ChangeKind,
    pub event_id: String,
}

#[derive(Debug, Clone)]
pub struct EventForm {
    mode: FormMode,
    name: String,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    color: Option<String>,
    full_day: bool,
    full_day_default: bool,
    palette: Palette,
}

impl Default for EventForm {
    fn default() -> Self {
        EventForm::new(Palette::default(), true)
    }
}

impl EventForm {
    pub fn new(palette: Palette, full_day_default: bool) -> Self {
        EventForm {
            mode: FormMode::Closed,
            name: String::new(),
            start_time: None,
            end_time: None,
            color: None,
            full_day: full_day_default,
            full_day_default,
            palette,
        }
    }

    // ACCESSORS:

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        match &self.mode {
            FormMode::Closed => None,
            FormMode::Create { day } | FormMode::Edit { day, .. } => Some(*day),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn is_full_day(&self) -> bool {
        self.full_day
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    // TRANSITIONS:

    /// Open the form to create an event on `day`.
    pub fn open_create(&mut self, day: NaiveDate) {
        self.reset();
        self.mode = FormMode::Create { day };
        if self.full_day {
            self.fill_day_bounds(day);
        }
    }

    /// Open the form prefilled from `event`.
    pub fn open_edit(&mut self, event: &Event) {
        self.reset();
        let day = event.start_date();
        self.mode = FormMode::Edit {
            id: event.id.clone(),
            day,
        };
        self.name = event.name.clone();
        self.color = event.color.clone();
        self.full_day = event.is_full_day();
        self.start_time = Some(event.start_time);
        self.end_time = Some(event.end_time);
    }

    /// Close without emitting anything.
    pub fn cancel(&mut self) {
        self.reset();
    }

    // FIELDS:

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Switch full-day mode. Turning it on snaps both times to the selected
    /// day's bounds; turning it off clears them.
    pub fn set_full_day(&mut self, full_day: bool) {
        self.full_day = full_day;
        match self.selected_day() {
            Some(day) if full_day => self.fill_day_bounds(day),
            _ => {
                self.start_time = None;
                self.end_time = None;
            }
        }
    }

    /// Set the start to `time` on the selected day.
    pub fn set_start_time(&mut self, time: NaiveTime) -> CalboardResult<()> {
        let day = self.selected_day().ok_or(CalboardError::FormClosed)?;
        self.start_time = Some(merge_time(day, time));
        Ok(())
    }

    /// Set the end to `time` on the selected day.
    pub fn set_end_time(&mut self, time: NaiveTime) -> CalboardResult<()> {
        let day = self.selected_day().ok_or(CalboardError::FormClosed)?;
        self.end_time = Some(merge_time(day, time));
        Ok(())
    }

    /// Set the start from an `HH:MM` string as produced by time inputs.
    pub fn set_start_time_str(&mut self, value: &str) -> CalboardResult<()> {
        self.set_start_time(parse_time_input(value)?)
    }

    /// Set the end from an `HH:MM` string as produced by time inputs.
    pub fn set_end_time_str(&mut self, value: &str) -> CalboardResult<()> {
        self.set_end_time(parse_time_input(value)?)
    }

    /// Pick a palette color, or clear it with `None`.
    pub fn set_color(&mut self, color: Option<&str>) -> CalboardResult<()> {
        self.color = match color {
            Some(c) => Some(self.palette.resolve(c)?.to_string()),
            None => None,
        };
        Ok(())
    }

    // SUBMIT:

    /// Check whether a submit would emit an event.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.full_day {
            return Ok(());
        }
        let start = self.start_time.ok_or(ValidationError::MissingStartTime)?;
        let end = self.end_time.ok_or(ValidationError::MissingEndTime)?;
        if end < start {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(())
    }

    /// Emit the form's event to `sink`, then reset and close.
    ///
    /// Returns `Ok(None)` without touching the sink when the form is
    /// incomplete. If the sink fails, the form keeps its fields.
    pub fn submit<S: EventSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> CalboardResult<Option<Submitted>> {
        let day = self.selected_day().ok_or(CalboardError::FormClosed)?;

        if let Err(reason) = self.validate() {
            debug!("Ignoring incomplete event form: {}", reason);
            return Ok(None);
        }

        let (start_time, end_time) = if self.full_day {
            (day_start(day), day_end(day))
        } else {
            // validate() guarantees both are set in partial-day mode
            match (self.start_time, self.end_time) {
                (Some(start), Some(end)) => (start, end),
                _ => return Ok(None),
            }
        };

        let (kind, id) = match &self.mode {
            FormMode::Edit { id, .. } => (ChangeKind::Update, id.clone()),
            _ => (ChangeKind::Create, Event::generate_id()),
        };

        let event = Event {
            id: id.clone(),
            name: self.name.clone(),
            start_time,
            end_time,
            color: self.color.clone(),
        };

        match kind {
            ChangeKind::Update => sink.update_event(event)?,
            _ => sink.create_event(event)?,
        }

        self.reset();
        Ok(Some(Submitted { kind, event_id: id }))
    }

    fn fill_day_bounds(&mut self, day: NaiveDate) {
        self.start_time = Some(day_start(day));
        self.end_time = Some(day_end(day));
    }

    fn reset(&mut self) {
        self.mode = FormMode::Closed;
        self.name.clear();
        self.start_time = None;
        self.end_time = None;
        self.color = None;
        self.full_day = self.full_day_default;
    }
}

/// Put the hour and minute of `time` on `day`, dropping seconds.
fn merge_time(day: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    let hm = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
    day.and_time(hm)
}

/// Parse an `HH:MM` time input value.
pub fn parse_time_input(value: &str) -> CalboardResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| CalboardError::InvalidTime(value.to_string()))
}
