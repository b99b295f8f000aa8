/// Command-line interface for browsing a doctor's schedule.
///
/// Seeds the in-memory store around the chosen date and lets the user switch
/// doctor, date and view while printing the slot grid.

use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use easyschedule::calendar::week_start;
use easyschedule::controller::QueryTicket;
use easyschedule::placement::{DayGrid, WeekGrid};
use easyschedule::{
    Appointment, AppointmentQueryService, AppointmentStore, CalendarConfig, MockStore,
    ScheduleController, ScheduleLayout, Selection, ViewMode,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "easyschedule", about = "Day and week view of a doctor's appointments")]
struct Args {
    /// JSON calendar config ({"startHour", "endHour", "slotDuration"})
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "doc-1")]
    doctor: String,

    /// Anchor date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = ViewMode::Day)]
    view: ViewMode,
}

struct ScheduleCLI {
    service: AppointmentQueryService<MockStore>,
    controller: ScheduleController,
    running: bool,
}

impl ScheduleCLI {
    fn new(config: CalendarConfig, selection: Selection) -> Self {
        let store = MockStore::seeded(week_start(selection.anchor_date));
        let mut cli = ScheduleCLI {
            service: AppointmentQueryService::new(store),
            controller: ScheduleController::new(config),
            running: true,
        };
        cli.controller.update(&cli.service, selection);
        cli
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       DOCTOR SCHEDULE");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. Select doctor");
        println!("2. Change date");
        println!("3. Toggle day/week view");
        println!("4. Show schedule");
        println!("5. Next period");
        println!("6. Previous period");
        println!("7. List doctors");
        println!("8. Reload");
        println!("9. Exit");
        println!("{}", "-".repeat(20));
    }

    fn get_input(&mut self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).unwrap_or(0) == 0 {
            // stdin closed
            self.running = false;
            return String::new();
        }
        let input = input.trim();

        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input.to_string()
        }
    }

    fn refresh(&mut self, ticket: Option<QueryTicket>) {
        match ticket {
            Some(ticket) => {
                self.controller.run(&self.service, ticket);
                self.show_schedule();
            }
            None => println!("\nSelection unchanged"),
        }
    }

    fn select_doctor(&mut self) {
        self.list_doctors();
        let doctor_id = self.get_input("Doctor ID", Some("doc-1"));
        let ticket = self.controller.set_doctor(&doctor_id);
        self.refresh(ticket);
    }

    fn change_date(&mut self) {
        let input = self.get_input("Date (YYYY-MM-DD)", None);
        match input.parse::<NaiveDate>() {
            Ok(date) => {
                let ticket = self.controller.set_anchor_date(date);
                self.refresh(ticket);
            }
            Err(e) => println!("Invalid date '{}': {}", input, e),
        }
    }

    fn toggle_view(&mut self) {
        let Some(current) = self.controller.selection().map(|s| s.view) else {
            return;
        };
        let ticket = self.controller.set_view_mode(current.toggled());
        self.refresh(ticket);
    }

    fn shift_period(&mut self, forward: bool) {
        let Some(selection) = self.controller.selection() else {
            return;
        };
        let step = match selection.view {
            ViewMode::Day => Duration::days(1),
            ViewMode::Week => Duration::days(7),
        };
        let date = if forward {
            selection.anchor_date + step
        } else {
            selection.anchor_date - step
        };
        let ticket = self.controller.set_anchor_date(date);
        self.refresh(ticket);
    }

    fn list_doctors(&self) {
        println!("\n--- Doctors ---");
        for doctor in self.service.store().doctors() {
            println!("  {:6} {} ({})", doctor.id, doctor.name, doctor.specialty);
        }
    }

    fn show_schedule(&mut self) {
        let state = self.controller.state();
        if let Some(error) = &state.error {
            println!("\nCould not load schedule: {}", error);
            return;
        }
        match &state.doctor {
            Some(doctor) => println!("\n{} - {}", doctor.name, doctor.specialty),
            None => println!("\nUnknown doctor, no appointments"),
        }

        match self.controller.layout() {
            Some(ScheduleLayout::Day(grid)) => self.print_day(&grid),
            Some(ScheduleLayout::Week(grid)) => self.print_week(&grid),
            None => println!("Nothing selected"),
        }
    }

    fn card(&self, apt: &Appointment) -> String {
        let patient = patient_name(&self.service, apt);
        format!(
            "[{}] {} ({}-{})",
            apt.kind.display().label,
            patient,
            apt.start_time.format("%H:%M"),
            apt.end_time.format("%H:%M")
        )
    }

    fn print_day(&self, grid: &DayGrid) {
        println!("{}", grid.date.format("%A, %Y-%m-%d"));
        for row in &grid.rows {
            let cards: Vec<String> = row.appointments.iter().map(|a| self.card(a)).collect();
            println!("  {} | {}", row.slot.label, cards.join("; "));
        }
    }

    fn print_week(&self, grid: &WeekGrid) {
        let header: Vec<String> = grid
            .dates
            .iter()
            .map(|d| format!("{:<13}", d.format("%a %m-%d").to_string()))
            .collect();
        println!("        {}", header.join(""));

        for row in &grid.rows {
            let cells: Vec<String> = row
                .days
                .iter()
                .map(|cell| {
                    let text = match cell.appointments.as_slice() {
                        [] => String::new(),
                        [only] => only.kind.display().label.to_string(),
                        [first, rest @ ..] => {
                            format!("{} +{}", first.kind.display().label, rest.len())
                        }
                    };
                    format!("{:<13}", text)
                })
                .collect();
            println!("  {} {}", row.slot.label, cells.join(""));
        }
    }

    fn run(&mut self) {
        self.print_header();
        self.show_schedule();

        while self.running {
            self.print_menu();

            let choice = self.get_input("Enter choice", Some("4"));

            match choice.as_str() {
                "1" => self.select_doctor(),
                "2" => self.change_date(),
                "3" => self.toggle_view(),
                "4" => self.show_schedule(),
                "5" => self.shift_period(true),
                "6" => self.shift_period(false),
                "7" => self.list_doctors(),
                "8" => {
                    let ticket = self.controller.refresh();
                    self.refresh(ticket);
                }
                "9" | "" => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

/// Patient name for a card, falling back to the id when the lookup misses
/// or fails.
fn patient_name<S: AppointmentStore>(service: &AppointmentQueryService<S>, apt: &Appointment) -> String {
    match service.patient_by_id(&apt.patient_id) {
        Ok(Some(patient)) => patient.name,
        Ok(None) => apt.patient_id.clone(),
        Err(e) => {
            warn!(error = %e, patient_id = %apt.patient_id, "patient lookup failed");
            apt.patient_id.clone()
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match CalendarConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CalendarConfig::default(),
    };

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let mut cli = ScheduleCLI::new(config, Selection::new(&args.doctor, date, args.view));
    cli.run();

    ExitCode::SUCCESS
}
