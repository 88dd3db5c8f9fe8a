//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `petcare_core` linkage.
//! - Seed the demo data set into an in-memory database and print today's
//!   agenda, so schedule and agenda wiring can be checked without a UI.
//! - Write core logs when `PETCARE_LOG_DIR` names an absolute directory.

use chrono::Duration;
use petcare_core::db::open_db_in_memory;
use petcare_core::{
    seed_demo_data, AgendaService, Clock, CoreConfig, DueAgenda, MedicationService,
    SqliteCareStore, SystemClock,
};
use std::error::Error;

const DEMO_OWNER: &str = "demo@local";
const LOG_DIR_ENV: &str = "PETCARE_LOG_DIR";

fn main() {
    println!("petcare_core ping={}", petcare_core::ping());
    println!("petcare_core version={}", petcare_core::core_version());

    if let Err(err) = run_demo() {
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}

fn run_demo() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let store = SqliteCareStore::try_new(&conn)?;
    let clock = SystemClock;
    let config = CoreConfig::default();
    config.validate()?;
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        config.init_logging(&log_dir)?;
    }
    let today = clock.now().date();

    let summary = seed_demo_data(&store, DEMO_OWNER, today)?;
    let medications = MedicationService::new(&store, clock, config.clone());
    for id in &summary.medication_ids {
        medications.materialize_doses(DEMO_OWNER, *id, today, today + Duration::days(1))?;
    }
    medications.materialize_feedings(DEMO_OWNER, None, today)?;

    let agenda = AgendaService::new(&store, clock, config);
    let report = agenda.today(DEMO_OWNER, None);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    let views = DueAgenda::split(report.items);
    println!("today: {} items, {} overdue", views.today.len(), views.overdue_count());
    for item in views.today.iter().chain(views.upcoming.iter()) {
        println!(
            "{} {:<18} {}{}",
            item.scheduled_at.format("%Y-%m-%d %H:%M"),
            item.kind.as_str(),
            item.title,
            if item.is_overdue { " (overdue)" } else { "" }
        );
    }

    Ok(())
}
