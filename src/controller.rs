/// Schedule state controller.
///
/// The caller owns the selection (doctor, anchor date, view). Every change
/// issues a `QueryTicket` carrying a generation number; a result is applied
/// only if its ticket is still the latest one, so a slow query for an old
/// selection can never overwrite a newer one.
///
/// Query runs may happen synchronously through `run`, or elsewhere with
/// the result handed back through `apply`.

use crate::calendar::{generate_daily_slots, week_dates, week_start};
use crate::config::CalendarConfig;
use crate::error::{Result, ScheduleError};
use crate::models::{Appointment, Doctor, TimeSlot, ViewMode};
use crate::placement::{resolve_day, resolve_week, DayGrid, WeekGrid};
use crate::query::{AppointmentQueryService, CancelToken, QueryOutcome, QueryWindow};
use crate::store::AppointmentStore;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub doctor_id: String,
    pub anchor_date: NaiveDate,
    pub view: ViewMode,
}

impl Selection {
    pub fn new(doctor_id: &str, anchor_date: NaiveDate, view: ViewMode) -> Self {
        Selection {
            doctor_id: doctor_id.to_string(),
            anchor_date,
            view,
        }
    }

    pub fn window(&self) -> QueryWindow {
        QueryWindow::for_view(self.view, self.anchor_date)
    }
}

/// State exposed to the rendering layer.
///
/// A new selection clears `appointments` and `doctor` until its query lands,
/// so a grid never shows one doctor's bookings under another's header.
/// A failed query leaves them empty and records the error.
#[derive(Debug, Default)]
pub struct ScheduleState {
    pub appointments: Vec<Appointment>,
    pub doctor: Option<Doctor>,
    pub loading: bool,
    pub error: Option<ScheduleError>,
}

/// Handle for one issued query.
#[derive(Debug, Clone)]
pub struct QueryTicket {
    generation: u64,
    doctor_id: String,
    window: QueryWindow,
    cancel: CancelToken,
}

impl QueryTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn window(&self) -> QueryWindow {
        self.window
    }

    /// Set once a newer selection supersedes this ticket.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

/// Grid for the current view.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleLayout {
    Day(DayGrid),
    Week(WeekGrid),
}

pub struct ScheduleController {
    config: CalendarConfig,
    selection: Option<Selection>,
    generation: u64,
    in_flight: Option<CancelToken>,
    state: ScheduleState,
    slot_cache: HashMap<NaiveDate, Vec<TimeSlot>>,
}

impl ScheduleController {
    pub fn new(config: CalendarConfig) -> Self {
        ScheduleController {
            config,
            selection: None,
            generation: 0,
            in_flight: None,
            state: ScheduleState::default(),
            slot_cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Whether results for `ticket` would still be applied.
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Adopt a new selection. Returns a ticket for the query it needs, or
    /// `None` when nothing changed.
    pub fn select(&mut self, selection: Selection) -> Option<QueryTicket> {
        if self.selection.as_ref() == Some(&selection) {
            return None;
        }
        Some(self.issue(selection))
    }

    /// Query the current selection again, e.g. to retry after a failure.
    pub fn refresh(&mut self) -> Option<QueryTicket> {
        let selection = self.selection.clone()?;
        Some(self.issue(selection))
    }

    fn issue(&mut self, selection: Selection) -> QueryTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.generation += 1;
        let cancel = CancelToken::new();
        let ticket = QueryTicket {
            generation: self.generation,
            doctor_id: selection.doctor_id.clone(),
            window: selection.window(),
            cancel: cancel.clone(),
        };

        debug!(
            generation = ticket.generation,
            doctor_id = %ticket.doctor_id,
            window = ?ticket.window,
            "selection changed"
        );

        self.in_flight = Some(cancel);
        self.selection = Some(selection);
        self.state.loading = true;
        self.state.error = None;
        self.state.appointments.clear();
        self.state.doctor = None;

        ticket
    }

    pub fn set_doctor(&mut self, doctor_id: &str) -> Option<QueryTicket> {
        let mut next = self.selection.clone()?;
        next.doctor_id = doctor_id.to_string();
        self.select(next)
    }

    pub fn set_anchor_date(&mut self, anchor_date: NaiveDate) -> Option<QueryTicket> {
        let mut next = self.selection.clone()?;
        next.anchor_date = anchor_date;
        self.select(next)
    }

    pub fn set_view_mode(&mut self, view: ViewMode) -> Option<QueryTicket> {
        let mut next = self.selection.clone()?;
        next.view = view;
        self.select(next)
    }

    /// Apply a query result. Returns `false` if the ticket was superseded
    /// and the result discarded.
    pub fn apply(&mut self, ticket: &QueryTicket, result: Result<QueryOutcome>) -> bool {
        if !self.is_current(ticket) {
            info!(
                generation = ticket.generation,
                current = self.generation,
                "discarding superseded query result"
            );
            return false;
        }

        self.in_flight = None;
        self.state.loading = false;

        match result {
            Ok(outcome) => {
                self.state.appointments = outcome.appointments;
                self.state.doctor = outcome.doctor;
                self.state.error = None;
            }
            Err(e) => {
                warn!(error = %e, doctor_id = %ticket.doctor_id, "schedule query failed");
                self.state.appointments.clear();
                self.state.doctor = None;
                self.state.error = Some(e);
            }
        }

        true
    }

    /// Run the query for `ticket` against `service` and apply the result.
    pub fn run<S: AppointmentStore>(
        &mut self,
        service: &AppointmentQueryService<S>,
        ticket: QueryTicket,
    ) -> bool {
        let result = service.fetch(&ticket.doctor_id, ticket.window, &ticket.cancel);
        self.apply(&ticket, result)
    }

    /// Select and query in one step. Returns `true` if state was updated.
    pub fn update<S: AppointmentStore>(
        &mut self,
        service: &AppointmentQueryService<S>,
        selection: Selection,
    ) -> bool {
        match self.select(selection) {
            Some(ticket) => self.run(service, ticket),
            None => false,
        }
    }

    /// Place the current appointments into the grid for the current view.
    pub fn layout(&mut self) -> Option<ScheduleLayout> {
        let selection = self.selection.clone()?;
        let dates = match selection.view {
            ViewMode::Day => vec![selection.anchor_date],
            ViewMode::Week => week_dates(week_start(selection.anchor_date)),
        };

        // Only the dates on screen stay memoized.
        self.slot_cache.retain(|date, _| dates.contains(date));
        let days: Vec<(NaiveDate, Vec<TimeSlot>)> = dates
            .into_iter()
            .map(|date| (date, self.slots_for(date)))
            .collect();

        let layout = match selection.view {
            ViewMode::Day => {
                let (date, slots) = days.first()?;
                ScheduleLayout::Day(resolve_day(*date, slots, &self.state.appointments))
            }
            ViewMode::Week => ScheduleLayout::Week(resolve_week(&days, &self.state.appointments)),
        };

        Some(layout)
    }

    fn slots_for(&mut self, date: NaiveDate) -> Vec<TimeSlot> {
        let config = self.config;
        self.slot_cache
            .entry(date)
            .or_insert_with(|| generate_daily_slots(&config, date))
            .clone()
    }
}
