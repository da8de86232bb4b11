use std::cell::RefCell;
use std::rc::Rc;

use calboard_core::{
    Calboard, CalboardConfig, ChangeKind, DragPayload, Event, GridView, ValidationError,
};
use chrono::{Datelike, NaiveDate, Weekday};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn board() -> Calboard {
    Calboard::starting_at(CalboardConfig::default(), date(2025, 3, 5)).unwrap()
}

fn names_on(board: &Calboard, day: NaiveDate) -> Vec<String> {
    board
        .grid()
        .cell(day)
        .map(|cell| cell.events.iter().map(|e| e.name.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn create_render_drag_edit_delete() {
    let mut board = board();
    let changes: Rc<RefCell<Vec<ChangeKind>>> = Rc::default();
    let log = Rc::clone(&changes);
    board.subscribe(move |change| log.borrow_mut().push(change.kind()));

    // Create a full-day event on March 4th
    board.open_create_form(date(2025, 3, 4));
    board.form_mut().set_name("Dentist");
    board.form_mut().set_color(Some("#F8CCDC")).unwrap();
    let created = board.submit_form().unwrap().unwrap();
    assert_eq!(created.kind, ChangeKind::Create);

    // Create a timed event on the same day
    board.open_create_form(date(2025, 3, 4));
    board.form_mut().set_name("Lunch");
    board.form_mut().set_full_day(false);
    board.form_mut().set_start_time_str("12:00").unwrap();
    board.form_mut().set_end_time_str("13:00").unwrap();
    let lunch = board.submit_form().unwrap().unwrap();

    let grid = board.grid();
    assert_eq!(grid.len(), 42);
    assert_eq!(grid.cells[0].date.weekday(), Weekday::Mon);
    assert_eq!(names_on(&board, date(2025, 3, 4)), vec!["Dentist", "Lunch"]);

    // Drag lunch to the 10th
    let payload: DragPayload = board.start_drag(&lunch.event_id).unwrap();
    assert_eq!(payload.event.name, "Lunch");
    let moved = board.drop_on(date(2025, 3, 10)).unwrap();
    assert_eq!(moved.start_time.date(), date(2025, 3, 10));
    assert_eq!(moved.end_time.date(), date(2025, 3, 10));
    assert_eq!(names_on(&board, date(2025, 3, 4)), vec!["Dentist"]);
    assert_eq!(names_on(&board, date(2025, 3, 10)), vec!["Lunch"]);

    // Rename it through the edit form
    board.open_edit_form(&lunch.event_id).unwrap();
    board.form_mut().set_name("Team lunch");
    let edited = board.submit_form().unwrap().unwrap();
    assert_eq!(edited.event_id, lunch.event_id);
    assert_eq!(names_on(&board, date(2025, 3, 10)), vec!["Team lunch"]);

    // Delete the dentist
    let removed = board.delete_event(&created.event_id).unwrap();
    assert_eq!(removed.name, "Dentist");
    assert_eq!(board.store().len(), 1);
    assert!(names_on(&board, date(2025, 3, 4)).is_empty());

    assert_eq!(
        *changes.borrow(),
        vec![
            ChangeKind::Create,
            ChangeKind::Create,
            ChangeKind::Update,
            ChangeKind::Update,
            ChangeKind::Delete,
        ]
    );
}

#[test]
fn incomplete_form_never_touches_store() {
    let mut board = board();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    board.subscribe(move |_| *counter.borrow_mut() += 1);

    board.open_create_form(date(2025, 3, 6));
    assert_eq!(board.form().validate(), Err(ValidationError::EmptyName));
    assert_eq!(board.submit_form().unwrap(), None);

    board.form_mut().set_name("Call");
    board.form_mut().set_full_day(false);
    assert_eq!(board.submit_form().unwrap(), None);

    assert!(board.store().is_empty());
    assert_eq!(*calls.borrow(), 0);
    assert!(board.form().is_open());
}

#[test]
fn json_payload_round_trips_through_host() {
    let mut board = board();
    let event = Event::full_day("Review", date(2025, 3, 7));
    let id = event.id.clone();
    board.add_event(event).unwrap();

    let json = board.start_drag(&id).unwrap().to_json().unwrap();
    let moved = board.drop_json(&json, date(2025, 3, 14)).unwrap();

    assert_eq!(moved.id, id);
    assert_eq!(moved.start_time, date(2025, 3, 14).and_hms_opt(0, 0, 0).unwrap());
    assert!(!board.drag().is_dragging());
}

#[test]
fn week_view_shows_only_its_week() {
    let mut board = board();
    board.add_event(Event::full_day("Sunday brunch", date(2025, 3, 9))).unwrap();
    board.add_event(Event::full_day("Next Monday", date(2025, 3, 10))).unwrap();
    board.set_view(GridView::Week);

    let grid = board.grid();
    assert_eq!(grid.len(), 7);
    assert_eq!(grid.start(), Some(date(2025, 3, 3)));
    let shown: Vec<_> = grid
        .cells
        .iter()
        .flat_map(|c| c.events.iter().map(|e| e.name.as_str()))
        .collect();
    assert_eq!(shown, vec!["Sunday brunch"]);

    board.next();
    assert_eq!(board.grid().start(), Some(date(2025, 3, 10)));
}

#[test]
fn multi_day_event_only_in_first_cell() {
    let mut board = board();
    let event = Event::new(
        "Offsite",
        date(2025, 3, 18).and_hms_opt(9, 0, 0).unwrap(),
        date(2025, 3, 20).and_hms_opt(17, 0, 0).unwrap(),
    )
    .unwrap();
    board.add_event(event).unwrap();

    assert_eq!(names_on(&board, date(2025, 3, 18)), vec!["Offsite"]);
    assert!(names_on(&board, date(2025, 3, 19)).is_empty());
    assert!(names_on(&board, date(2025, 3, 20)).is_empty());
}
