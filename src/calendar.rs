/// Slot grid generation for the schedule views.
///
/// Slots are produced fresh for each render from the calendar config and
/// an anchor date. Generation is pure: the same inputs always give the
/// same slots.

use crate::config::CalendarConfig;
use crate::models::TimeSlot;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Generate the slots covering `[start_hour:00, end_hour:00)` on `date`.
///
/// A trailing partial slot is dropped, so no slot ever ends after
/// `end_hour:00`.
pub fn generate_daily_slots(config: &CalendarConfig, date: NaiveDate) -> Vec<TimeSlot> {
    let mut slots = Vec::with_capacity(config.slots_per_day());
    // A step too large to represent cannot fit in the window either.
    let Some(duration) = Duration::try_minutes(config.slot_duration()) else {
        return slots;
    };
    let midnight = date.and_time(NaiveTime::MIN);
    let end = hour_on(midnight, config.end_hour());
    let mut current = hour_on(midnight, config.start_hour());

    while let Some(slot_end) = current.checked_add_signed(duration) {
        if slot_end > end {
            break;
        }
        slots.push(TimeSlot::new(current, config.slot_duration()));
        current = slot_end;
    }

    slots
}

/// Generate one slot column per day for the seven days from `week_start`.
///
/// `week_start` is used as given; aligning it to a Monday is the caller's job.
pub fn generate_weekly_slots(
    config: &CalendarConfig,
    week_start: NaiveDate,
) -> Vec<(NaiveDate, Vec<TimeSlot>)> {
    week_dates(week_start)
        .into_iter()
        .map(|date| (date, generate_daily_slots(config, date)))
        .collect()
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The seven consecutive dates starting at `start`.
pub fn week_dates(start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|offset| start + Duration::days(offset)).collect()
}

fn hour_on(midnight: NaiveDateTime, hour: u32) -> NaiveDateTime {
    midnight + Duration::hours(i64::from(hour))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn two_hour_window_in_half_hours() {
        let config = CalendarConfig::new(8, 10, 30).unwrap();
        let slots = generate_daily_slots(&config, date(2024, 1, 1));

        let labels: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            vec!["08:00-08:30", "08:30-09:00", "09:00-09:30", "09:30-10:00"]
        );
    }

    #[test]
    fn slots_are_contiguous() {
        let slots = generate_daily_slots(&CalendarConfig::default(), date(2024, 3, 5));
        assert_eq!(slots.len(), 20);
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn truncates_partial_last_slot() {
        let config = CalendarConfig::new(8, 9, 25).unwrap();
        let slots = generate_daily_slots(&config, date(2024, 1, 1));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end.format("%H:%M").to_string(), "08:50");
    }

    #[test]
    fn slot_longer_than_window_yields_empty_grid() {
        for duration in [121, 1_000_000_000_000, i64::MAX] {
            let config = CalendarConfig::new(8, 10, duration).unwrap();
            assert_eq!(config.slots_per_day(), 0);
            assert!(generate_daily_slots(&config, date(2024, 1, 1)).is_empty());
            assert!(generate_weekly_slots(&config, date(2024, 1, 1))
                .iter()
                .all(|(_, slots)| slots.is_empty()));
        }
    }

    #[test]
    fn slot_equal_to_window_fits_once() {
        let config = CalendarConfig::new(8, 10, 120).unwrap();
        assert_eq!(generate_daily_slots(&config, date(2024, 1, 1)).len(), 1);
    }

    #[test]
    fn window_may_end_at_midnight() {
        let config = CalendarConfig::new(22, 24, 60).unwrap();
        let slots = generate_daily_slots(&config, date(2024, 1, 1));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end, date(2024, 1, 2).and_time(NaiveTime::MIN));
    }

    #[test]
    fn week_start_is_monday() {
        assert_eq!(week_start(date(2024, 1, 3)), date(2024, 1, 1));
        assert_eq!(week_start(date(2024, 1, 1)), date(2024, 1, 1));
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 1));
        assert_eq!(week_start(date(2024, 1, 8)).weekday(), Weekday::Mon);
    }

    #[test]
    fn weekly_slots_cover_seven_days() {
        let config = CalendarConfig::new(9, 10, 30).unwrap();
        let week = generate_weekly_slots(&config, date(2023, 12, 28));

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].0, date(2023, 12, 28));
        assert_eq!(week[6].0, date(2024, 1, 3));
        for (day, slots) in &week {
            assert_eq!(slots.len(), 2);
            assert_eq!(slots[0].start.date(), *day);
        }
    }
}
