use std::path::PathBuf;
use std::sync::Arc;

use reading_core::model::MonthId;
use services::{AppServices, AppServicesError, TrackerConfig, parse_plan};
use storage::repository::{InMemoryRepository, ProgressRepository, Storage};

const PLAN_JSON: &str = include_str!("fixtures/plan.json");

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/plan.json")
}

#[tokio::test]
async fn progress_survives_a_new_session() {
    let config = TrackerConfig::new(
        "sqlite:file:memdb_tracker_flow?mode=memory&cache=shared",
        fixture_path(),
    );
    let app = AppServices::new_sqlite(&config).await.expect("bootstrap");

    let jan = MonthId::new("jan");
    let mut first = app.open_tracker().await;
    assert_eq!(first.global_stats().total(), 30);
    first.toggle_day(&jan, 1).await.expect("toggle");
    first.toggle_day(&jan, 5).await.expect("toggle");
    drop(first);

    let second = app.open_tracker().await;
    let stats = second.month_stats(&jan);
    assert_eq!(stats.read(), 7);
    assert_eq!(stats.total(), 20);
    assert_eq!(stats.percentage(), 35);
    assert_eq!(stats.read_days, 2);
}

#[tokio::test]
async fn explicit_chapter_counts_drive_month_totals() {
    let plan = parse_plan(PLAN_JSON).expect("plan");
    let app = AppServices::new(Storage::in_memory(), plan, "k");
    assert_eq!(app.storage_key(), "k");
    let tracker = app.open_tracker().await;

    // Parsing would give 4 + 1 + 4; the table says 4 + 2 + 4.
    let fev = tracker.month_stats(&MonthId::new("fev"));
    assert_eq!(fev.total(), 10);

    let global = tracker.global_stats();
    let summed: u32 = tracker
        .month_overview()
        .iter()
        .map(|summary| summary.stats.total())
        .sum();
    assert_eq!(global.total(), summed);
}

#[tokio::test]
async fn corrupt_storage_starts_from_scratch() {
    let repo = InMemoryRepository::new();
    repo.insert_raw("k", "{\"jan-1\": maybe}").expect("insert");
    let storage = Storage {
        progress: Arc::new(repo.clone()),
    };
    let app = AppServices::new(storage, parse_plan(PLAN_JSON).expect("plan"), "k");

    let mut tracker = app.open_tracker().await;
    assert_eq!(tracker.global_stats().read(), 0);

    tracker
        .toggle_day(&MonthId::new("fev"), 3)
        .await
        .expect("toggle");
    let stored = repo.load_progress("k").await.expect("load").expect("saved");
    assert!(stored.is_read_raw("fev-3"));
}

#[tokio::test]
async fn reset_clears_persisted_progress() {
    let repo = InMemoryRepository::new();
    let storage = Storage {
        progress: Arc::new(repo.clone()),
    };
    let app = AppServices::new(storage, parse_plan(PLAN_JSON).expect("plan"), "k");

    let mut tracker = app.open_tracker().await;
    tracker
        .toggle_day(&MonthId::new("jan"), 2)
        .await
        .expect("toggle");
    tracker
        .toggle_day(&MonthId::new("fev"), 2)
        .await
        .expect("toggle");
    assert!(tracker.reset_progress(|| true).await);
    drop(tracker);

    let reopened = app.open_tracker().await;
    assert_eq!(reopened.global_stats().read(), 0);
    assert_eq!(repo.raw("k").expect("raw").as_deref(), Some("{}"));
}

#[tokio::test]
async fn sessions_take_turns_and_keep_each_others_progress() {
    let repo = InMemoryRepository::new();
    let storage = Storage {
        progress: Arc::new(repo.clone()),
    };
    let app = AppServices::new(storage, parse_plan(PLAN_JSON).expect("plan"), "k");

    let mut first = app.open_tracker().await;
    assert!(matches!(
        app.try_open_tracker().await,
        Err(AppServicesError::SessionInUse)
    ));

    let waiting = tokio::spawn({
        let app = app.clone();
        async move {
            let mut second = app.open_tracker().await;
            second
                .toggle_day(&MonthId::new("jan"), 2)
                .await
                .expect("toggle");
            second.global_stats().read_days
        }
    });

    first
        .toggle_day(&MonthId::new("jan"), 1)
        .await
        .expect("toggle");
    drop(first);

    assert_eq!(waiting.await.expect("join"), 2);
    let stored = repo.load_progress("k").await.expect("load").expect("saved");
    assert!(stored.is_read_raw("jan-1"));
    assert!(stored.is_read_raw("jan-2"));
    assert!(app.try_open_tracker().await.is_ok());
}

#[tokio::test]
async fn missing_plan_file_fails_bootstrap() {
    let config = TrackerConfig::new(
        "sqlite:file:memdb_missing_plan?mode=memory&cache=shared",
        "/nonexistent/plan.json",
    );
    let err = AppServices::new_sqlite(&config).await.err().expect("error");
    assert!(matches!(err, AppServicesError::PlanLoad(_)));
}
