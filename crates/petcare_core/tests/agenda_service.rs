use chrono::{Duration, NaiveDate, NaiveDateTime};
use petcare_core::db::open_db_in_memory;
use petcare_core::{
    AgendaService, AgendaWindows, CareRecord, CareStore, CoreConfig, DoseStatus, DueKind,
    FeedingEntry, FeedingStatus, FixedClock, MedicationDose, RecordId, RecordKind, RecordQuery,
    Reminder, RepoError, RepoResult, SqliteCareStore, ToggleError, ToggledRecord, VetVisit,
};
use uuid::Uuid;

const OWNER: &str = "owner@example.com";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 10).expect("valid calendar date")
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    today().and_hms_opt(hour, minute, 0).expect("valid time of day")
}

/// Delegates to an inner store but fails listing one kind and, optionally,
/// every update.
struct FlakyStore<'a> {
    inner: &'a SqliteCareStore<'a>,
    failing_list: Option<RecordKind>,
    fail_updates: bool,
}

impl CareStore for FlakyStore<'_> {
    fn list<R: CareRecord>(&self, owner: &str, query: &RecordQuery) -> RepoResult<Vec<R>> {
        if self.failing_list == Some(R::KIND) {
            return Err(RepoError::InvalidData("collection offline".to_string()));
        }
        self.inner.list(owner, query)
    }

    fn get<R: CareRecord>(&self, owner: &str, id: RecordId) -> RepoResult<Option<R>> {
        self.inner.get(owner, id)
    }

    fn create<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<RecordId> {
        self.inner.create(owner, record)
    }

    fn update<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<()> {
        if self.fail_updates {
            return Err(RepoError::InvalidData("write rejected".to_string()));
        }
        self.inner.update(owner, record)
    }

    fn delete(&self, owner: &str, kind: RecordKind, id: RecordId) -> RepoResult<()> {
        self.inner.delete(owner, kind, id)
    }
}

#[test]
fn pending_feeding_at_eight_is_overdue_at_nine() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let feeding = FeedingEntry::pending(Uuid::new_v4(), "Breakfast", at(8, 0));
    store.create(OWNER, &feeding).expect("record should be created");

    let service = AgendaService::new(&store, FixedClock(at(9, 0)), CoreConfig::default());
    let report = service.today(OWNER, None);

    assert!(report.warnings.is_empty());
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].source_id, feeding.id);
    assert!(report.items[0].is_overdue);
}

#[test]
fn agenda_is_sorted_and_scoped_to_pet() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let pet = Uuid::new_v4();
    let other_pet = Uuid::new_v4();
    let medication = Uuid::new_v4();

    store
        .create(OWNER, &MedicationDose::pending(pet, medication, "Evening", at(21, 0)))
        .expect("record should be created");
    store
        .create(OWNER, &MedicationDose::pending(pet, medication, "Morning", at(9, 0)))
        .expect("record should be created");
    store
        .create(OWNER, &Reminder::active(pet, "Brush", at(12, 0)))
        .expect("record should be created");
    store
        .create(OWNER, &FeedingEntry::pending(other_pet, "Other pet", at(10, 0)))
        .expect("record should be created");

    let service = AgendaService::new(&store, FixedClock(at(8, 0)), CoreConfig::default());
    let report = service.today(OWNER, Some(pet));

    let titles: Vec<_> = report.items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["Morning", "Brush", "Evening"]);
    assert!(report
        .items
        .windows(2)
        .all(|pair| pair[0].scheduled_at <= pair[1].scheduled_at));
}

#[test]
fn same_instant_doses_keep_creation_order() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let pet = Uuid::new_v4();
    let medication = Uuid::new_v4();

    store
        .create(OWNER, &MedicationDose::pending(pet, medication, "First", at(9, 0)))
        .expect("record should be created");
    store
        .create(OWNER, &MedicationDose::pending(pet, medication, "Second", at(9, 0)))
        .expect("record should be created");

    let service = AgendaService::new(&store, FixedClock(at(8, 0)), CoreConfig::default());
    let report = service.today(OWNER, Some(pet));

    let titles: Vec<_> = report.items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[test]
fn explicit_windows_select_upcoming_follow_ups() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let mut visit = VetVisit::new(Uuid::new_v4(), today(), "Happy Paws", "Ear infection");
    visit.follow_up_date = Some(today() + Duration::days(10));
    store.create(OWNER, &visit).expect("record should be created");

    let service = AgendaService::new(&store, FixedClock(at(9, 0)), CoreConfig::default());
    assert!(service.today(OWNER, None).items.is_empty());

    let windows = AgendaWindows::for_day(today(), Duration::days(14));
    let report = service.collect(OWNER, None, &windows, at(9, 0));
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].kind, DueKind::VetFollowup);
}

#[test]
fn unavailable_source_degrades_to_empty_with_warning() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let inner = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let pet = Uuid::new_v4();
    inner
        .create(OWNER, &Reminder::active(pet, "Flea drops", at(10, 0)))
        .expect("record should be created");
    inner
        .create(OWNER, &FeedingEntry::pending(pet, "Breakfast", at(8, 0)))
        .expect("record should be created");

    let store = FlakyStore {
        inner: &inner,
        failing_list: Some(RecordKind::Reminder),
        fail_updates: false,
    };
    let service = AgendaService::new(store, FixedClock(at(9, 0)), CoreConfig::default());
    let report = service.today(OWNER, None);

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].kind, DueKind::Feeding);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, RecordKind::Reminder);
    assert!(report.warnings[0].to_string().contains("collection offline"));
}

#[test]
fn toggling_dose_twice_round_trips_through_storage() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let dose = MedicationDose::pending(Uuid::new_v4(), Uuid::new_v4(), "Ear Drops", at(9, 0));
    store.create(OWNER, &dose).expect("record should be created");

    let now = at(9, 20);
    let service = AgendaService::new(&store, FixedClock(now), CoreConfig::default());
    let item = service.today(OWNER, None).items.remove(0);

    match service.toggle_status(OWNER, &item).expect("toggle should succeed") {
        ToggledRecord::Dose(updated) => {
            assert_eq!(updated.status, DoseStatus::Taken);
            assert_eq!(updated.actual_at, Some(now));
        }
        other => panic!("unexpected record: {other:?}"),
    }
    let stored: MedicationDose = store
        .get(OWNER, dose.id)
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(stored.status, DoseStatus::Taken);

    let item = service.today(OWNER, None).items.remove(0);
    assert!(!item.is_overdue);
    service.toggle_status(OWNER, &item).expect("toggle should succeed");

    let stored: MedicationDose = store
        .get(OWNER, dose.id)
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(stored.status, DoseStatus::Pending);
    assert_eq!(stored.actual_at, None);
}

#[test]
fn toggling_feeding_marks_completed() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let feeding = FeedingEntry::pending(Uuid::new_v4(), "Dinner", at(18, 0));
    store.create(OWNER, &feeding).expect("record should be created");

    let service = AgendaService::new(&store, FixedClock(at(18, 5)), CoreConfig::default());
    let item = service.today(OWNER, None).items.remove(0);
    service.toggle_status(OWNER, &item).expect("toggle should succeed");

    let stored: FeedingEntry = store
        .get(OWNER, feeding.id)
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(stored.status, FeedingStatus::Completed);
    assert_eq!(stored.actual_at, Some(at(18, 5)));
}

#[test]
fn failed_write_leaves_record_and_item_unchanged() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let inner = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let dose = MedicationDose::pending(Uuid::new_v4(), Uuid::new_v4(), "Ear Drops", at(9, 0));
    inner.create(OWNER, &dose).expect("record should be created");

    let store = FlakyStore {
        inner: &inner,
        failing_list: None,
        fail_updates: true,
    };
    let service = AgendaService::new(store, FixedClock(at(10, 0)), CoreConfig::default());
    let item = service.today(OWNER, None).items.remove(0);
    let before = item.clone();

    let err = service.toggle_status(OWNER, &item).expect_err("rejected write must fail");
    assert!(matches!(err, ToggleError::Persistence(_)));
    assert_eq!(item, before);

    let stored: MedicationDose = inner
        .get(OWNER, dose.id)
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(stored.status, DoseStatus::Pending);
}

#[test]
fn reminders_cannot_be_toggled_and_missing_records_are_reported() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = SqliteCareStore::try_new(&conn).expect("store over migrated db");
    let reminder = Reminder::active(Uuid::new_v4(), "Vet call", at(11, 0));
    let dose = MedicationDose::pending(Uuid::new_v4(), Uuid::new_v4(), "Pills", at(12, 0));
    store.create(OWNER, &reminder).expect("record should be created");
    store.create(OWNER, &dose).expect("record should be created");

    let service = AgendaService::new(&store, FixedClock(at(10, 0)), CoreConfig::default());
    let items = service.today(OWNER, None).items;
    assert_eq!(items.len(), 2);

    let reminder_item = items
        .iter()
        .find(|item| item.kind == DueKind::Reminder)
        .expect("reminder should be listed");
    assert!(matches!(
        service.toggle_status(OWNER, reminder_item).expect_err("reminders are not toggleable"),
        ToggleError::NotToggleable(DueKind::Reminder)
    ));

    let dose_item = items
        .iter()
        .find(|item| item.kind == DueKind::MedicationDose)
        .expect("dose should be listed");
    store
        .delete(OWNER, RecordKind::MedicationDose, dose.id)
        .expect("record should be deleted");
    assert!(matches!(
        service.toggle_status(OWNER, dose_item).expect_err("deleted dose must fail"),
        ToggleError::NotFound {
            kind: RecordKind::MedicationDose,
            ..
        }
    ));
}
