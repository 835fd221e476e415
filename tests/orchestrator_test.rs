mod common;

use anyhow::Result;
use common::{fault, text, ScriptedChannel, RUNNING_ALL};
use layout_orchestrator::config::device_profile::GENERIC_PROFILE;
use layout_orchestrator::{
    DeviceIdentity, DisplayMetrics, LayoutConfig, Orchestrator, OrchestratorError, Rect, Timings,
};
use std::sync::Arc;

fn orchestrator(channel: &Arc<ScriptedChannel>) -> Orchestrator<Arc<ScriptedChannel>> {
    Orchestrator::with_profile(
        Arc::clone(channel),
        GENERIC_PROFILE.with_inset_overrides(Some(0), Some(0)),
        DisplayMetrics::new(1920, 1200, 160),
    )
    .with_timings(Timings::immediate())
}

#[tokio::test]
async fn test_offline_channel_fails_without_commands() {
    let channel = Arc::new(ScriptedChannel::offline());
    let result = orchestrator(&channel).apply_layout(&LayoutConfig::default()).await;

    assert!(!result.success);
    assert!(result.launches.is_empty());
    assert!(result.message.contains("not alive"));
    assert!(channel.calls().await.is_empty());
}

#[tokio::test]
async fn test_unauthorized_channel_fails_without_commands() {
    let channel = Arc::new(ScriptedChannel::unauthorized());
    let result = orchestrator(&channel).apply_layout(&LayoutConfig::default()).await;

    assert!(!result.success);
    assert!(result.message.contains("not authorized"));
    assert!(channel.calls().await.is_empty());
}

#[tokio::test]
async fn test_full_run_order_and_phases() {
    let channel = Arc::new(ScriptedChannel::new().on("ps -A", text(RUNNING_ALL)));
    let result = orchestrator(&channel).apply_layout(&LayoutConfig::default()).await;

    assert!(result.success);
    assert_eq!(result.message, "Layout applied: 6/6 operations successful");
    assert_eq!(result.success_count, 6);

    let calls = channel.calls().await;
    assert!(calls[0].starts_with("settings put"));

    let launches: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| c.starts_with("cmd activity start-activity"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(launches.len(), 3);
    assert!(calls[launches[0]].ends_with("com.whatsapp"));
    assert!(calls[launches[1]].ends_with("com.spotify.client"));
    assert!(calls[launches[2]].ends_with("com.android.chrome/com.google.android.apps.chrome.Main"));

    let first_swipe = calls
        .iter()
        .position(|c| c.starts_with("input swipe"))
        .expect("positioning issued swipes");
    assert!(first_swipe > launches[2]);
    assert!(calls[first_swipe..]
        .iter()
        .all(|c| !c.contains("start-activity")));
    assert_eq!(channel.calls_containing("input swipe").await.len(), 6);

    // bottom-left positioned first, top last
    let swipes = channel.calls_containing("input swipe").await;
    assert!(swipes[0].contains(" 480 456 "));
    assert!(swipes[4].contains(" 960 60 "));
}

#[tokio::test]
async fn test_one_failed_launch_still_succeeds() {
    let channel = Arc::new(
        ScriptedChannel::new()
            .on("com.spotify.client", text("Error: Activity not started, unable to resolve Intent"))
            .on("ps -A", text(RUNNING_ALL)),
    );
    let result = orchestrator(&channel).apply_layout(&LayoutConfig::default()).await;

    assert!(result.success);
    assert_eq!(result.success_count, 5);
    assert!(result
        .message
        .ends_with("first failure: Bottom Right launch: Launch command failed"));
    assert_eq!(result.positions.len(), 3);
}

#[tokio::test]
async fn test_two_failed_launches_fall_below_threshold() {
    let channel = Arc::new(
        ScriptedChannel::new()
            .on("com.spotify.client", text("Error: unable to resolve Intent"))
            .on("com.whatsapp", fault("connection reset"))
            .on("ps -A", text(RUNNING_ALL)),
    );
    let result = orchestrator(&channel).apply_layout(&LayoutConfig::default()).await;

    assert!(!result.success);
    assert_eq!(result.success_count, 4);
    assert!(result.message.starts_with("Layout applied: 4/6 operations successful"));
    assert!(result.message.contains("Bottom Left launch: Launch fault:"));
    // failures do not stop later apps or the positioning phase
    assert_eq!(result.launches.len(), 3);
    assert!(result.launches[2].success);
    assert!(result.positions.iter().all(|p| p.success));
}

#[tokio::test]
async fn test_configurable_threshold() {
    let channel = Arc::new(
        ScriptedChannel::new()
            .on("com.spotify.client", text("Error"))
            .on("com.whatsapp", text("Error"))
            .on("ps -A", text(RUNNING_ALL)),
    );
    let timings = Timings {
        success_threshold: 0.6,
        ..Timings::immediate()
    };
    let result = orchestrator(&channel)
        .with_timings(timings)
        .apply_layout(&LayoutConfig::default())
        .await;

    assert_eq!(result.success_count, 4);
    assert!(result.success);
}

#[tokio::test]
async fn test_invalid_layout_is_reported_as_failed_result() {
    let channel = Arc::new(ScriptedChannel::new());
    let layout = LayoutConfig {
        split_ratio: 1.0,
        ..LayoutConfig::default()
    };
    let result = orchestrator(&channel).apply_layout(&layout).await;

    assert!(!result.success);
    assert!(result.message.starts_with("Error:"));
    assert!(channel.calls().await.is_empty());
}

#[tokio::test]
async fn test_reference_geometry() {
    let channel = Arc::new(ScriptedChannel::new());
    let bounds = orchestrator(&channel).layout_bounds(0.33);

    assert_eq!(bounds.top, Rect::new(0, 0, 1920, 396));
    assert_eq!(bounds.bottom_left.width(), 960);
    assert_eq!(bounds.bottom_right.width(), 960);
    assert_eq!(bounds.bottom_left.top, 396);
    assert_eq!(bounds.bottom_left.height(), 804);
}

#[tokio::test]
async fn test_enable_flags_entry_point() -> Result<()> {
    let channel = Arc::new(ScriptedChannel::new().on("animator_duration_scale", fault("denied")));
    let lenovo = Orchestrator::new(
        Arc::clone(&channel),
        &DeviceIdentity::new("lenovo", "TB-X606F"),
        DisplayMetrics::new(1200, 2000, 240),
    );

    let report = lenovo.enable_freeform_flags().await?;
    assert_eq!(report.issued, 8);
    assert_eq!(report.accepted, 7);
    assert_eq!(channel.calls().await.len(), 8);
    Ok(())
}

#[tokio::test]
async fn test_enable_flags_requires_preflight() {
    let channel = Arc::new(ScriptedChannel::offline());
    let err = orchestrator(&channel)
        .enable_freeform_flags()
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::PreflightFailed { .. }));
    assert!(channel.calls().await.is_empty());
}
