use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use easyschedule::calendar::generate_daily_slots;
use easyschedule::controller::QueryTicket;
use easyschedule::placement::resolve_day;
use easyschedule::query::CancelToken;
use easyschedule::{
    Appointment, AppointmentQueryService, AppointmentType, CalendarConfig, MockStore,
    QueryWindow, ScheduleController, ScheduleLayout, Selection, ViewMode,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).unwrap()
}

fn booking(id: &str, doctor_id: &str, start: NaiveDateTime, minutes: i64) -> Appointment {
    Appointment {
        id: id.to_string(),
        patient_id: "pat-1".to_string(),
        doctor_id: doctor_id.to_string(),
        kind: AppointmentType::Consultation,
        start_time: start,
        end_time: start + Duration::minutes(minutes),
    }
}

#[test]
fn two_hour_morning_grid() {
    let monday = date(2024, 1, 1);
    assert_eq!(monday.weekday(), Weekday::Mon);

    let config = CalendarConfig::new(8, 10, 30).unwrap();
    let slots = generate_daily_slots(&config, monday);
    let labels: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
    assert_eq!(
        labels,
        vec!["08:00-08:30", "08:30-09:00", "09:00-09:30", "09:30-10:00"]
    );

    let grid = resolve_day(monday, &slots, &[booking("a", "doc-1", at(monday, 9, 15), 30)]);
    let hits: Vec<usize> = grid
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.appointments.is_empty())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(hits, vec![2, 3]);
}

#[test]
fn wednesday_anchor_queries_whole_week() {
    let mut controller = ScheduleController::new(CalendarConfig::default());
    let ticket = controller
        .select(Selection::new("doc-1", date(2024, 1, 3), ViewMode::Week))
        .unwrap();

    assert_eq!(
        ticket.window(),
        QueryWindow::Range {
            start: date(2024, 1, 1),
            end: date(2024, 1, 7),
        }
    );
}

#[test]
fn pending_query_for_old_selection_does_not_overwrite_new_one() {
    let day1 = date(2024, 1, 1);
    let day2 = date(2024, 1, 2);

    let mut store = MockStore::new();
    store.add_doctor(easyschedule::Doctor::new("doc-a", "Dr. A", "Oncology"));
    store.add_doctor(easyschedule::Doctor::new("doc-b", "Dr. B", "Neurology"));
    store.add_appointment(booking("a-1", "doc-a", at(day1, 9, 0), 30));
    store.add_appointment(booking("b-1", "doc-b", at(day2, 11, 0), 60));
    let service = AppointmentQueryService::new(store);

    let mut controller = ScheduleController::new(CalendarConfig::default());
    let pending: QueryTicket = controller
        .select(Selection::new("doc-a", day1, ViewMode::Day))
        .unwrap();
    let latest = controller
        .select(Selection::new("doc-b", day2, ViewMode::Day))
        .unwrap();

    assert!(controller.run(&service, latest));

    // The old query finishes late, ignoring its cancellation.
    let late = service.fetch(pending.doctor_id(), pending.window(), &CancelToken::new());
    assert!(late.is_ok());
    assert!(!controller.apply(&pending, late));

    let state = controller.state();
    assert_eq!(state.doctor.as_ref().unwrap().id, "doc-b");
    let ids: Vec<&str> = state.appointments.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["b-1"]);
    assert!(!state.loading);
}

#[test]
fn superseded_query_observes_cancellation() {
    let service = AppointmentQueryService::new(MockStore::seeded(date(2024, 1, 1)));
    let mut controller = ScheduleController::new(CalendarConfig::default());

    let first = controller
        .select(Selection::new("doc-1", date(2024, 1, 1), ViewMode::Day))
        .unwrap();
    controller.set_doctor("doc-2");

    assert!(!controller.run(&service, first));
    assert!(controller.state().loading);
}

#[test]
fn unknown_doctor_yields_no_data() {
    let service = AppointmentQueryService::new(MockStore::seeded(date(2024, 1, 1)));
    assert!(service
        .by_doctor_and_date("doc-unknown", date(2024, 1, 1))
        .unwrap()
        .is_empty());
    assert!(service.doctor_by_id("doc-unknown").unwrap().is_none());
}

#[test]
fn week_layout_repeats_spanning_booking_per_slot() {
    let monday = date(2024, 1, 1);
    let service = AppointmentQueryService::new(MockStore::seeded(monday));
    let mut controller = ScheduleController::new(CalendarConfig::default());

    controller.update(&service, Selection::new("doc-3", date(2024, 1, 4), ViewMode::Week));

    let Some(ScheduleLayout::Week(grid)) = controller.layout() else {
        panic!("expected week layout");
    };

    // Tuesday 09:00-11:00 procedure covers four half-hour rows.
    let tuesday_rows = grid
        .rows
        .iter()
        .filter(|row| !row.days[1].appointments.is_empty())
        .count();
    assert_eq!(tuesday_rows, 4);
    assert_eq!(grid.excluded, 0);
}

#[test]
fn malformed_store_record_is_skipped_in_layout() {
    let monday = date(2024, 1, 1);
    let mut store = MockStore::seeded(monday);
    store.add_appointment(booking("broken", "doc-2", at(monday, 12, 0), -30));
    let service = AppointmentQueryService::new(store);

    let mut controller = ScheduleController::new(CalendarConfig::default());
    controller.update(&service, Selection::new("doc-2", monday, ViewMode::Day));

    let Some(ScheduleLayout::Day(grid)) = controller.layout() else {
        panic!("expected day layout");
    };
    assert_eq!(grid.excluded, 1);
    assert!(grid
        .rows
        .iter()
        .all(|row| row.appointments.iter().all(|a| a.id != "broken")));
}
