/// Read-only data store backing the schedule.
///
/// The store is an external collaborator: the grid only reads from it.
/// `MockStore` keeps everything in memory and is what the demo and the
/// tests run against.

use crate::error::Result;
use crate::models::{Appointment, AppointmentType, Doctor, Patient};
use chrono::{Duration, NaiveDate, NaiveTime};

/// Lookups the query service needs from a data source.
///
/// Reads may fail when the source is remote; the in-memory store never does.
pub trait AppointmentStore {
    fn doctor(&self, doctor_id: &str) -> Result<Option<Doctor>>;

    fn patient(&self, patient_id: &str) -> Result<Option<Patient>>;

    /// Appointments for `doctor_id` starting on any date in `[from, to]`.
    fn appointments_between(
        &self,
        doctor_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Appointment>>;
}

#[derive(Debug, Clone, Default)]
pub struct MockStore {
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample clinic with three doctors and a week of bookings starting at
    /// `week_start`. Ids are stable so output is reproducible.
    pub fn seeded(week_start: NaiveDate) -> Self {
        let mut store = MockStore::new();

        store.add_doctor(Doctor::new("doc-1", "Dr. Sarah Chen", "Cardiology"));
        store.add_doctor(Doctor::new("doc-2", "Dr. Michael Rodriguez", "Pediatrics"));
        store.add_doctor(Doctor::new("doc-3", "Dr. Emily Watson", "Dermatology"));

        for (id, name) in [
            ("pat-1", "John Smith"),
            ("pat-2", "Jane Doe"),
            ("pat-3", "Bob Wilson"),
            ("pat-4", "Alice Brown"),
            ("pat-5", "Carlos Diaz"),
        ] {
            store.add_patient(Patient::new(id, name));
        }

        // (doctor, patient, type, day offset, start hh:mm, minutes)
        let bookings = [
            ("doc-1", "pat-1", AppointmentType::Checkup, 0, (9, 0), 30),
            ("doc-1", "pat-2", AppointmentType::Consultation, 0, (10, 0), 60),
            ("doc-1", "pat-3", AppointmentType::FollowUp, 0, (10, 30), 30),
            ("doc-1", "pat-4", AppointmentType::Procedure, 1, (13, 0), 90),
            ("doc-1", "pat-5", AppointmentType::Emergency, 2, (8, 15), 45),
            ("doc-1", "pat-1", AppointmentType::FollowUp, 3, (15, 30), 30),
            ("doc-1", "pat-2", AppointmentType::Checkup, 4, (11, 0), 30),
            ("doc-2", "pat-3", AppointmentType::Checkup, 0, (9, 30), 30),
            ("doc-2", "pat-4", AppointmentType::Consultation, 2, (14, 0), 45),
            ("doc-2", "pat-5", AppointmentType::FollowUp, 4, (16, 0), 30),
            ("doc-3", "pat-1", AppointmentType::Procedure, 1, (9, 0), 120),
            ("doc-3", "pat-2", AppointmentType::Consultation, 3, (12, 0), 30),
        ];

        for (n, (doctor_id, patient_id, kind, day, (hour, minute), minutes)) in
            bookings.into_iter().enumerate()
        {
            let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
                continue;
            };
            let start_time = (week_start + Duration::days(day)).and_time(time);
            store.add_appointment(Appointment {
                id: format!("apt-{:03}", n + 1),
                patient_id: patient_id.to_string(),
                doctor_id: doctor_id.to_string(),
                kind,
                start_time,
                end_time: start_time + Duration::minutes(minutes),
            });
        }

        store
    }

    pub fn add_doctor(&mut self, doctor: Doctor) {
        self.doctors.push(doctor);
    }

    pub fn add_patient(&mut self, patient: Patient) {
        self.patients.push(patient);
    }

    pub fn add_appointment(&mut self, appointment: Appointment) {
        self.appointments.push(appointment);
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

impl AppointmentStore for MockStore {
    fn doctor(&self, doctor_id: &str) -> Result<Option<Doctor>> {
        Ok(self.doctors.iter().find(|d| d.id == doctor_id).cloned())
    }

    fn patient(&self, patient_id: &str) -> Result<Option<Patient>> {
        Ok(self.patients.iter().find(|p| p.id == patient_id).cloned())
    }

    fn appointments_between(
        &self,
        doctor_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id)
            .filter(|apt| {
                let day = apt.start_time.date();
                from <= day && day <= to
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn seeded_store_has_reference_data() {
        let store = MockStore::seeded(monday());
        assert_eq!(store.doctors().len(), 3);
        assert_eq!(store.len(), 12);
        assert_eq!(
            store.doctor("doc-2").unwrap().unwrap().specialty,
            "Pediatrics"
        );
        assert_eq!(store.patient("pat-4").unwrap().unwrap().name, "Alice Brown");
        assert!(store.doctor("doc-99").unwrap().is_none());
    }

    #[test]
    fn range_is_inclusive_and_filtered_by_doctor() {
        let store = MockStore::seeded(monday());
        let tuesday = monday() + Duration::days(1);

        let monday_only = store.appointments_between("doc-1", monday(), monday()).unwrap();
        assert_eq!(monday_only.len(), 3);

        let two_days = store.appointments_between("doc-1", monday(), tuesday).unwrap();
        assert_eq!(two_days.len(), 4);
        assert!(two_days.iter().all(|a| a.doctor_id == "doc-1"));
    }

    #[test]
    fn empty_store() {
        let store = MockStore::new();
        assert!(store.is_empty());
        assert!(store
            .appointments_between("doc-1", monday(), monday())
            .unwrap()
            .is_empty());
    }
}
