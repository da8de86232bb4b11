//! Calendar event record and the color palette events are painted with.
//!
//! Timestamps are local wall-clock values. A cell matches an event by the
//! calendar date of its start, so no time zone is attached to the record.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CalboardError, CalboardResult};

/// Last representable millisecond of a day.
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_milli_opt(23, 59, 59, 999) {
    Some(t) => t,
    None => panic!("invalid end-of-day constant"),
};

/// Colors offered by the event form when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 7] = [
    "#FFB067", "#FFED86", "#A2DCE7", "#F8CCDC", "#D3D3CB", "#F34C50", "#DAD870",
];

/// A calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Event {
    /// Create a timed event with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> CalboardResult<Self> {
        let event = Event {
            id: Self::generate_id(),
            name: name.into(),
            start_time,
            end_time,
            color: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create an event spanning the whole of `day`.
    pub fn full_day(name: impl Into<String>, day: NaiveDate) -> Self {
        Event {
            id: Self::generate_id(),
            name: name.into(),
            start_time: day_start(day),
            end_time: day_end(day),
            color: None,
        }
    }

    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// Check the `start_time <= end_time` invariant.
    pub fn validate(&self) -> CalboardResult<()> {
        if self.start_time > self.end_time {
            return Err(CalboardError::InvalidTimeRange);
        }
        Ok(())
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_time.date()
    }

    /// Whether the event starts on `date`. End time is not considered.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_date() == date
    }

    /// True when the event covers exactly one day, midnight to 23:59:59.999.
    pub fn is_full_day(&self) -> bool {
        self.start_time == day_start(self.start_date()) && self.end_time == day_end(self.start_date())
    }

    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

/// 00:00:00.000 on `date`.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `date`.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_time(END_OF_DAY)
}

/// The set of colors an event may be given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<String>);

impl Default for Palette {
    fn default() -> Self {
        Palette(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

impl Palette {
    /// Build a palette, rejecting entries that are not `#RRGGBB`.
    pub fn new(colors: Vec<String>) -> CalboardResult<Self> {
        if let Some(bad) = colors.iter().find(|c| !is_hex_color(c)) {
            return Err(CalboardError::InvalidColor(bad.clone()));
        }
        Ok(Palette(colors))
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    /// Look up `color` case-insensitively, returning the palette's spelling.
    pub fn resolve(&self, color: &str) -> CalboardResult<&str> {
        self.0
            .iter()
            .find(|c| c.eq_ignore_ascii_case(color))
            .map(String::as_str)
            .ok_or_else(|| CalboardError::InvalidColor(color.to_string()))
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
