use chrono::{NaiveDate, NaiveTime};
use petcare_core::db::open_db_in_memory;
use petcare_core::{
    seed_demo_data, AgendaService, CareStore, CoreConfig, DueKind, FeedingEntry, FeedingPlan,
    FixedClock, Frequency, Medication, MedicationDose, MedicationRule, MedicationService,
    MedicationServiceError, RecordQuery, SqliteCareStore,
};
use uuid::Uuid;

const OWNER: &str = "owner@example.com";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

fn clock() -> FixedClock {
    FixedClock(date(2024, 1, 2).and_hms_opt(8, 0, 0).expect("valid time of day"))
}

fn once_daily(start: NaiveDate, end: Option<NaiveDate>) -> Medication {
    Medication::new(
        Uuid::new_v4(),
        "Hairball Prevention",
        MedicationRule::new(Frequency::OnceDaily, start, end).expect("valid rule"),
    )
}

#[test]
fn materialize_doses_is_idempotent() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let service = MedicationService::new(&store, clock(), CoreConfig::default());
    let medication = once_daily(date(2024, 1, 1), Some(date(2024, 1, 3)));
    service.create_medication(OWNER, &medication).expect("medication should be created");

    let created = service
        .materialize_doses(OWNER, medication.id, date(2024, 1, 1), date(2024, 1, 5))
        .expect("doses should materialize");
    assert_eq!(created.len(), 3);
    let morning = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time of day");
    assert!(created.iter().all(|dose| dose.scheduled_at.time() == morning));

    let again = service
        .materialize_doses(OWNER, medication.id, date(2024, 1, 1), date(2024, 1, 5))
        .expect("doses should materialize");
    assert!(again.is_empty());

    let stored: Vec<MedicationDose> = store.list(OWNER, &RecordQuery::default())
        .expect("list should succeed");
    assert_eq!(stored.len(), 3);
}

#[test]
fn inactive_medication_materializes_nothing() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let service = MedicationService::new(&store, clock(), CoreConfig::default());
    let medication = once_daily(date(2024, 1, 1), None);
    service.create_medication(OWNER, &medication).expect("medication should be created");

    let updated = service.set_active(OWNER, medication.id, false)
        .expect("active flag should update");
    assert!(!updated.is_active);
    let stored: Medication = store
        .get(OWNER, medication.id)
        .expect("lookup should succeed")
        .expect("record should exist");
    assert!(!stored.is_active);

    let created = service
        .materialize_doses(OWNER, medication.id, date(2024, 1, 1), date(2024, 1, 31))
        .expect("doses should materialize");
    assert!(created.is_empty());
}

#[test]
fn invalid_rule_and_unknown_medication_are_reported() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let service = MedicationService::new(&store, clock(), CoreConfig::default());

    let mut medication = once_daily(date(2024, 1, 10), None);
    medication.rule.end_date = Some(date(2024, 1, 1));
    assert!(matches!(
        service.create_medication(OWNER, &medication).expect_err("inverted rule must fail"),
        MedicationServiceError::Validation(_)
    ));

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.schedule_preview(OWNER, missing).expect_err("unknown medication must fail"),
        MedicationServiceError::MedicationNotFound(id) if id == missing
    ));
}

#[test]
fn preview_uses_configured_days() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let config = CoreConfig::from_json_str("{\"preview_days\": 14}").expect("valid config");
    let service = MedicationService::new(&store, clock(), config);
    let mut medication = once_daily(date(2024, 1, 1), None);
    medication.rule.frequency = Frequency::ThreeTimesDaily;
    service.create_medication(OWNER, &medication).expect("medication should be created");

    let preview = service.schedule_preview(OWNER, medication.id).expect("preview should build");
    assert_eq!(preview.days.len(), 14);
    assert_eq!(preview.total_doses(), 42);
}

#[test]
fn refill_alerts_cover_missed_and_upcoming_refills() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let service = MedicationService::new(&store, clock(), CoreConfig::default());

    let mut missed = once_daily(date(2023, 12, 1), None);
    missed.name = "Missed".to_string();
    missed.refill_by_date = Some(date(2023, 12, 30));
    let mut soon = once_daily(date(2023, 12, 1), None);
    soon.name = "Soon".to_string();
    soon.refill_by_date = Some(date(2024, 1, 5));
    let mut later = once_daily(date(2023, 12, 1), None);
    later.refill_by_date = Some(date(2024, 3, 1));
    for medication in [&missed, &soon, &later] {
        service.create_medication(OWNER, medication).expect("medication should be created");
    }

    let names: Vec<_> = service
        .refill_alerts(OWNER, None)
        .expect("refill alerts should load")
        .into_iter()
        .map(|medication| medication.name)
        .collect();
    assert_eq!(names, vec!["Missed", "Soon"]);
}

#[test]
fn feeding_plans_materialize_once_per_day() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let service = MedicationService::new(&store, clock(), CoreConfig::default());
    let pet = Uuid::new_v4();
    let plan = FeedingPlan::new(
        pet,
        "Dry food",
        vec![
            NaiveTime::from_hms_opt(18, 0, 0).expect("valid time of day"),
            NaiveTime::from_hms_opt(7, 30, 0).expect("valid time of day"),
        ],
    );
    store.create(OWNER, &plan).expect("record should be created");

    let created = service
        .materialize_feedings(OWNER, Some(pet), date(2024, 1, 2))
        .expect("feedings should materialize");
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|entry| entry.plan_id == Some(plan.id)));

    let again = service
        .materialize_feedings(OWNER, Some(pet), date(2024, 1, 2))
        .expect("feedings should materialize");
    assert!(again.is_empty());

    let next_day = service
        .materialize_feedings(OWNER, Some(pet), date(2024, 1, 3))
        .expect("feedings should materialize");
    assert_eq!(next_day.len(), 2);

    let stored: Vec<FeedingEntry> = store.list(OWNER, &RecordQuery::default())
        .expect("list should succeed");
    assert_eq!(stored.len(), 4);
}

#[test]
fn seeded_demo_data_produces_a_today_agenda() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let today = date(2024, 1, 2);
    let now = today.and_hms_opt(12, 0, 0).expect("valid time of day");
    let summary = seed_demo_data(&store, OWNER, today).expect("demo data should seed");
    assert_eq!(summary.pets.len(), 2);

    let medications = MedicationService::new(&store, FixedClock(now), CoreConfig::default());
    for id in &summary.medication_ids {
        medications
            .materialize_doses(OWNER, *id, today, today)
            .expect("doses should materialize");
    }
    medications.materialize_feedings(OWNER, None, today).expect("feedings should materialize");

    let agenda = AgendaService::new(&store, FixedClock(now), CoreConfig::default());
    let report = agenda.today(OWNER, None);
    let count = |kind: DueKind| report.items.iter().filter(|item| item.kind == kind).count();

    // Ear drops twice daily + hairball once daily.
    assert_eq!(count(DueKind::MedicationDose), 3);
    assert_eq!(count(DueKind::Feeding), 4);
    assert_eq!(count(DueKind::VetFollowup), 1);
    assert_eq!(count(DueKind::GroomingNext), 0);
    assert_eq!(count(DueKind::MedicationRefill), 0);
    assert!(report
        .items
        .iter()
        .filter(|item| item.is_overdue)
        .all(|item| item.scheduled_at < now));
}
