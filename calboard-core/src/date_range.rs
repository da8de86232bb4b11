//! Inclusive span of calendar dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date range covered by a grid, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range; the endpoints are ordered if given backwards.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            DateRange { from, to }
        } else {
            DateRange { from: to, to: from }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of days in the range, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Every date in the range, in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}
