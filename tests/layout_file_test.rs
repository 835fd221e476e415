use anyhow::Result;
use layout_orchestrator::config::toml_config::LayoutFile;
use layout_orchestrator::utils::validation::Validate;
use tempfile::TempDir;

const WORK_LAYOUT: &str = r#"
[layout]
name = "Work"
split_ratio = 0.4

[layout.top]
package = "com.android.chrome"
component = "com.google.android.apps.chrome.Main"
display_name = "Chrome"

[layout.bottom_left]
package = "com.slack"
display_name = "Slack"

[layout.bottom_right]
package = "com.google.android.keep"

[timing]
success_threshold = 0.8
launch_settle_ms = 1200

[device]
serial = "HA1B2C3D"
command_timeout_ms = 5000
status_inset_px = 36
"#;

#[test]
fn test_load_layout_file_from_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("work.toml");
    std::fs::write(&path, WORK_LAYOUT)?;

    let file = LayoutFile::from_file(&path)?;
    file.validate()?;

    let layout = file.layout_config();
    assert_eq!(layout.name, "Work");
    assert_eq!(layout.split_ratio, 0.4);
    assert_eq!(
        layout.top.target_component(),
        "com.android.chrome/com.google.android.apps.chrome.Main"
    );
    assert_eq!(layout.bottom_left.display_name(), "Slack");
    assert_eq!(layout.bottom_right.display_name(), "com.google.android.keep");

    let timings = file.timings();
    assert_eq!(timings.success_threshold, 0.8);
    assert_eq!(timings.launch_settle_ms, 1200);
    assert_eq!(timings.inter_launch_ms, 400);

    let device = file.device();
    assert_eq!(device.serial.as_deref(), Some("HA1B2C3D"));
    assert_eq!(device.command_timeout_ms, Some(5000));
    assert_eq!(device.status_inset_px, Some(36));
    assert_eq!(device.nav_inset_px, None);
    Ok(())
}

#[test]
fn test_partial_layout_fills_defaults() -> Result<()> {
    let file = LayoutFile::from_toml_str(
        r#"
[layout.bottom_left]
package = "org.telegram.messenger"
"#,
    )?;
    let layout = file.layout_config();
    assert_eq!(layout.name, "Default");
    assert_eq!(layout.bottom_left.package, "org.telegram.messenger");
    assert_eq!(layout.top.package, "com.android.chrome");
    assert_eq!(layout.bottom_right.package, "com.spotify.client");
    Ok(())
}

#[test]
fn test_invalid_package_is_rejected() -> Result<()> {
    let file = LayoutFile::from_toml_str(
        r#"
[layout.top]
package = "not a package"
"#,
    )?;
    let err = file.validate().unwrap_err();
    assert!(err.to_string().contains("layout.top.package"));
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let err = LayoutFile::from_file("/nonexistent/layout.toml").unwrap_err();
    assert!(matches!(
        err,
        layout_orchestrator::OrchestratorError::IoError(_)
    ));
}
