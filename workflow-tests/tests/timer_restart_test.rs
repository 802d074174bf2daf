//! Snapshot persistence across simulated app restarts.

mod common;

use client_core::backend::models::TimerState;
use common::setup;

#[tokio::test]
async fn the_running_display_survives_a_restart() {
    let ctx = setup();
    let client = ctx.backend.seed_client("Acme Corp", None).await;
    let project = ctx.backend.seed_project(client.id, "Website Redesign").await;

    ctx.timer
        .start(project.id, Some("API work".to_string()))
        .await;
    ctx.timer.shutdown().await;
    ctx.timer.tick().await;
    ctx.timer.tick().await;
    let before = ctx.timer.timer().await;

    let ctx = ctx.restart();

    // before any backend round trip, the persisted display comes back
    assert_eq!(ctx.timer.timer().await, before);

    // and the first refresh replaces it with the authoritative state
    ctx.timer.refresh().await;
    assert!(ctx.timer.timer().await.is_running);
    assert!(ctx.timer.error().await.is_none());
    ctx.timer.shutdown().await;
}

#[tokio::test]
async fn a_corrupt_snapshot_restores_as_idle() {
    let ctx = setup();
    let client = ctx.backend.seed_client("Acme Corp", None).await;
    let project = ctx.backend.seed_project(client.id, "Website Redesign").await;

    ctx.timer.start(project.id, None).await;
    ctx.timer.shutdown().await;
    std::fs::write(&ctx.snapshot_path, b"{ truncated").expect("overwrite snapshot");

    let ctx = ctx.restart();
    assert_eq!(ctx.timer.timer().await, TimerState::default());
}

#[tokio::test]
async fn an_idle_stop_is_what_restarts_see() {
    let ctx = setup();
    let client = ctx.backend.seed_client("Acme Corp", None).await;
    let project = ctx.backend.seed_project(client.id, "Website Redesign").await;

    ctx.timer.start(project.id, None).await;
    ctx.timer.shutdown().await;
    ctx.timer.stop().await;

    let ctx = ctx.restart();
    assert_eq!(ctx.timer.timer().await, TimerState::default());
}
