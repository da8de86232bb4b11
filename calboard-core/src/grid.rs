//! Month and week grids.
//!
//! A month grid is 6 rows of 7 days starting on the Monday on or before the
//! first of the month, so the leading and trailing weeks are always whole.
//! A week grid is the 7 days starting on the Monday of the reference date's
//! week. Each cell holds the events whose start falls on the cell's date;
//! events spanning several days only appear in their first cell.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::CalboardError;
use crate::event::Event;

pub const DAYS_PER_WEEK: usize = 7;
pub const MONTH_CELLS: usize = 6 * DAYS_PER_WEEK;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridView {
    #[default]
    Month,
    Week,
}

impl GridView {
    pub fn cell_count(self) -> usize {
        match self {
            GridView::Month => MONTH_CELLS,
            GridView::Week => DAYS_PER_WEEK,
        }
    }

    /// First date shown for `reference` in this view.
    pub fn start_date(self, reference: NaiveDate) -> NaiveDate {
        match self {
            GridView::Month => month_grid_start(reference),
            GridView::Week => week_start(reference),
        }
    }

    /// Move `reference` one page forward (or back).
    ///
    /// Month steps keep the day of month where possible and clamp to the
    /// last day otherwise (Jan 31 -> Feb 28). Returns `reference` unchanged
    /// at the edge of the supported date range.
    pub fn step(self, reference: NaiveDate, forward: bool) -> NaiveDate {
        let stepped = match (self, forward) {
            (GridView::Month, true) => reference.checked_add_months(Months::new(1)),
            (GridView::Month, false) => reference.checked_sub_months(Months::new(1)),
            (GridView::Week, true) => reference.checked_add_days(Days::new(7)),
            (GridView::Week, false) => reference.checked_sub_days(Days::new(7)),
        };
        stepped.unwrap_or(reference)
    }
}

impl fmt::Display for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridView::Month => write!(f, "month"),
            GridView::Week => write!(f, "week"),
        }
    }
}

impl FromStr for GridView {
    type Err = CalboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "month" => Ok(GridView::Month),
            "week" => Ok(GridView::Week),
            other => Err(CalboardError::Config(format!(
                "Unknown view '{}'. Expected 'month' or 'week'",
                other
            ))),
        }
    }
}

/// Monday of the week containing `date` (Sunday counts as day 7).
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(offset.into())).unwrap_or(date)
}

/// Monday on or before the first day of `date`'s month.
pub fn month_grid_start(date: NaiveDate) -> NaiveDate {
    week_start(first_of_month(date))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// One day slot of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
    /// Whether the date belongs to the reference month. Always true in week view.
    pub in_month: bool,
    pub is_today: bool,
}

impl Cell<'_> {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A computed month or week grid borrowing its events from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<'a> {
    pub view: GridView,
    pub reference: NaiveDate,
    pub cells: Vec<Cell<'a>>,
}

impl<'a> Grid<'a> {
    /// Lay out the grid for `reference` and assign `events` to their start day.
    ///
    /// Events keep their relative order inside a cell.
    pub fn build(
        view: GridView,
        reference: NaiveDate,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Self {
        let start = view.start_date(reference);
        let month = (reference.year(), reference.month());

        let mut cells: Vec<Cell<'a>> = start
            .iter_days()
            .take(view.cell_count())
            .map(|date| Cell {
                date,
                events: Vec::new(),
                in_month: view == GridView::Week || (date.year(), date.month()) == month,
                is_today: false,
            })
            .collect();

        for event in events {
            let offset = (event.start_date() - start).num_days();
            if let Some(cell) = usize::try_from(offset).ok().and_then(|i| cells.get_mut(i)) {
                cell.events.push(event);
            }
        }

        Grid {
            view,
            reference,
            cells,
        }
    }

    /// Flag the cell dated `today`, if the grid shows it.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        for cell in self.cells.iter_mut() {
            cell.is_today = cell.date == today;
        }
        self
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.cells.first().map(|c| c.date)
    }

    pub fn range(&self) -> Option<DateRange> {
        let first = self.cells.first()?;
        let last = self.cells.last()?;
        Some(DateRange::new(first.date, last.date))
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&Cell<'a>> {
        self.cells.iter().find(|c| c.date == date)
    }

    /// Rows of seven cells, Monday first.
    pub fn weeks(&self) -> std::slice::Chunks<'_, Cell<'a>> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Build the grid for `reference` from a slice of events.
pub fn build_grid(events: &[Event], reference: NaiveDate, view: GridView) -> Grid<'_> {
    Grid::build(view, reference, events)
}
