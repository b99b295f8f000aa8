/// Placement of appointments into the slot grid.
///
/// Every (day, slot) cell receives the appointments whose interval overlaps
/// the slot, using half-open semantics: `[a, b)` and `[c, d)` overlap iff
/// `a < d && c < b`. An appointment spanning several slots is listed once in
/// each of them; merging adjacent cells is left to the renderer.

use crate::models::{Appointment, TimeSlot};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One row of the day grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRow {
    pub slot: TimeSlot,
    pub appointments: Vec<Appointment>,
}

/// One day column inside a week row.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub appointments: Vec<Appointment>,
}

/// One row of the week grid, keyed by the first column's slot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekRow {
    pub slot: TimeSlot,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayGrid {
    pub date: NaiveDate,
    pub rows: Vec<SlotRow>,
    /// Malformed appointments left out of every cell.
    pub excluded: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekGrid {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<WeekRow>,
    pub excluded: usize,
}

impl DayGrid {
    /// Appointments overlapping the slot at `index`, or an empty slice.
    pub fn cell(&self, index: usize) -> &[Appointment] {
        self.rows
            .get(index)
            .map(|row| row.appointments.as_slice())
            .unwrap_or(&[])
    }
}

impl WeekGrid {
    pub fn cell(&self, slot_index: usize, day_index: usize) -> &[Appointment] {
        self.rows
            .get(slot_index)
            .and_then(|row| row.days.get(day_index))
            .map(|cell| cell.appointments.as_slice())
            .unwrap_or(&[])
    }
}

/// Place appointments into the slots of a single day.
pub fn resolve_day(date: NaiveDate, slots: &[TimeSlot], appointments: &[Appointment]) -> DayGrid {
    let (valid, excluded) = well_formed(appointments);

    let rows = slots
        .iter()
        .map(|slot| SlotRow {
            slot: slot.clone(),
            appointments: overlapping(slot, &valid),
        })
        .collect();

    debug!(%date, slots = slots.len(), appointments = valid.len(), "resolved day grid");

    DayGrid {
        date,
        rows,
        excluded,
    }
}

/// Place appointments into a week of slot columns.
///
/// An appointment lands in a column only when its start falls on that
/// column's date. Both sides must already be in the same wall-clock zone.
pub fn resolve_week(days: &[(NaiveDate, Vec<TimeSlot>)], appointments: &[Appointment]) -> WeekGrid {
    let (valid, excluded) = well_formed(appointments);

    let mut by_day: HashMap<NaiveDate, Vec<&Appointment>> = HashMap::new();
    for appointment in valid {
        by_day
            .entry(appointment.start_time.date())
            .or_default()
            .push(appointment);
    }

    let row_count = days.first().map(|(_, slots)| slots.len()).unwrap_or(0);
    let mut rows = Vec::with_capacity(row_count);

    for index in 0..row_count {
        let cells = days
            .iter()
            .filter_map(|(date, slots)| {
                let slot = slots.get(index)?;
                let appointments = by_day
                    .get(date)
                    .map(|bucket| overlapping(slot, bucket))
                    .unwrap_or_default();
                Some(DayCell {
                    date: *date,
                    appointments,
                })
            })
            .collect();

        rows.push(WeekRow {
            slot: days[0].1[index].clone(),
            days: cells,
        });
    }

    debug!(days = days.len(), rows = rows.len(), "resolved week grid");

    WeekGrid {
        dates: days.iter().map(|(date, _)| *date).collect(),
        rows,
        excluded,
    }
}

fn overlapping(slot: &TimeSlot, appointments: &[&Appointment]) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|apt| slot.overlaps(apt.start_time, apt.end_time))
        .map(|&apt| apt.clone())
        .collect()
}

fn well_formed(appointments: &[Appointment]) -> (Vec<&Appointment>, usize) {
    let mut valid = Vec::with_capacity(appointments.len());
    let mut excluded = 0;

    for appointment in appointments {
        match appointment.validate() {
            Ok(()) => valid.push(appointment),
            Err(e) => {
                warn!(error = %e, "excluding appointment from grid");
                excluded += 1;
            }
        }
    }

    (valid, excluded)
}
