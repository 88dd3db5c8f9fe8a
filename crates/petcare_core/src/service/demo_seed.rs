//! Demo data set for local development and smoke runs.
//!
//! Dates are relative to the `today` argument so the seeded agenda always has
//! something due: a vet follow-up tomorrow and a medication course running
//! through today.

use crate::model::care_log::{GroomingLog, VetVisit};
use crate::model::feeding::FeedingPlan;
use crate::model::medication::{Frequency, Medication, MedicationRule};
use crate::model::pet::Pet;
use crate::model::record::RecordId;
use crate::repo::care_store::{CareStore, RepoResult};
use chrono::{Duration, NaiveDate, NaiveTime};
use log::info;

/// Ids of what `seed_demo_data` created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    pub pets: Vec<Pet>,
    pub medication_ids: Vec<RecordId>,
    pub vet_visits: usize,
    pub grooming_logs: usize,
    pub feeding_plans: usize,
}

/// Seeds two pets with vet visits, medications, grooming and feeding plans.
pub fn seed_demo_data<S: CareStore>(
    store: &S,
    owner: &str,
    today: NaiveDate,
) -> RepoResult<DemoSummary> {
    let mut dog = Pet::new("Queenie", "dog");
    dog.breed = Some("Golden Retriever".to_string());
    dog.date_of_birth = NaiveDate::from_ymd_opt(2020, 3, 15);
    let mut cat = Pet::new("Oliver", "cat");
    cat.breed = Some("Maine Coon".to_string());
    cat.date_of_birth = NaiveDate::from_ymd_opt(2019, 7, 22);
    store.create(owner, &dog)?;
    store.create(owner, &cat)?;

    let mut ear_check = VetVisit::new(
        dog.id,
        today - Duration::days(7),
        "Happy Paws Veterinary Clinic",
        "Minor ear infection",
    );
    ear_check.follow_up_date = Some(today + Duration::days(1));
    let visits = [
        VetVisit::new(
            dog.id,
            today - Duration::days(30),
            "Happy Paws Veterinary Clinic",
            "Annual checkup and vaccinations",
        ),
        ear_check,
        VetVisit::new(
            cat.id,
            today - Duration::days(45),
            "Feline Friends Clinic",
            "Routine wellness exam",
        ),
    ];
    for visit in &visits {
        store.create(owner, visit)?;
    }

    let mut ear_drops = Medication::new(
        dog.id,
        "Ear Drops",
        MedicationRule::new(
            Frequency::TwiceDaily,
            today - Duration::days(7),
            Some(today + Duration::days(7)),
        )?,
    );
    ear_drops.dose = Some("3".to_string());
    ear_drops.unit = Some("drops".to_string());
    let mut hairball = Medication::new(
        cat.id,
        "Hairball Prevention",
        MedicationRule::new(Frequency::OnceDaily, today, None)?,
    );
    hairball.dose = Some("1".to_string());
    hairball.unit = Some("tablets".to_string());
    hairball.refill_by_date = Some(today + Duration::days(25));
    store.create(owner, &ear_drops)?;
    store.create(owner, &hairball)?;

    let mut full_groom = GroomingLog::new(dog.id, "full_groom", today - Duration::days(14));
    full_groom.next_date = Some(today + Duration::days(28));
    let nail_trim = GroomingLog::new(cat.id, "nail_trim", today - Duration::days(10));
    store.create(owner, &full_groom)?;
    store.create(owner, &nail_trim)?;

    let plans = [
        FeedingPlan::new(dog.id, "Dry food", vec![hm(7, 30), hm(18, 0)]),
        FeedingPlan::new(cat.id, "Wet food", vec![hm(8, 0), hm(17, 30)]),
    ];
    for plan in &plans {
        store.create(owner, plan)?;
    }

    info!("event=demo_seed module=service status=ok pets=2");

    Ok(DemoSummary {
        pets: vec![dog, cat],
        medication_ids: vec![ear_drops.id, hairball.id],
        vet_visits: visits.len(),
        grooming_logs: 2,
        feeding_plans: plans.len(),
    })
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
