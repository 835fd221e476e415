use clap::Parser;
use layout_orchestrator::config::cli::{CliCommand, LogFormat};
use layout_orchestrator::config::device_profile::resolve_profile;
use layout_orchestrator::config::toml_config::LayoutFile;
use layout_orchestrator::core::geometry::{calculate_bounds, validate_geometry};
use layout_orchestrator::utils::error::{ErrorSeverity, OrchestratorError};
use layout_orchestrator::utils::{logger, validation::Validate};
use layout_orchestrator::{
    AdbChannel, CliConfig, CommandChannel, DeviceIdentity, DisplayMetrics, LayoutResult,
    Orchestrator,
};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    match run(&cli).await {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            let exit_code = match e.severity() {
                ErrorSeverity::Critical => 3,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> layout_orchestrator::Result<i32> {
    match &cli.command {
        CliCommand::Bounds {
            width,
            height,
            density,
            manufacturer,
            model,
            split_ratio,
        } => {
            print_bounds(
                DisplayMetrics::new(*width, *height, *density),
                &DeviceIdentity::new(manufacturer.as_str(), model.as_str()),
                *split_ratio,
            )?;
            Ok(0)
        }
        CliCommand::EnableFlags => {
            let channel = open_channel(cli, &LayoutFile::default());
            let (identity, display) = probe(&channel).await?;
            let orchestrator = Orchestrator::new(channel, &identity, display);
            let report = orchestrator.enable_freeform_flags().await?;
            println!(
                "✅ Freeform settings pushed: {}/{} accepted",
                report.accepted, report.issued
            );
            Ok(0)
        }
        CliCommand::Apply {
            config,
            split_ratio,
            json,
        } => {
            let file = load_layout_file(config.as_deref())?;
            let mut layout = file.layout_config();
            if let Some(ratio) = split_ratio {
                layout.split_ratio = *ratio;
            }
            layout.validate()?;
            let timings = file.timings();

            let channel = open_channel(cli, &file);
            let (identity, display) = probe(&channel).await?;
            let device = file.device();
            let profile = resolve_profile(&identity)
                .with_inset_overrides(device.status_inset_px, device.nav_inset_px);
            let (width_px, height_px, density_dpi) =
                (display.width_px, display.height_px, display.density_dpi);
            tracing::info!(
                "📱 {} {} → profile '{}', display {}x{} @{}dpi",
                identity.manufacturer,
                identity.model,
                profile.name,
                width_px,
                height_px,
                density_dpi
            );

            let orchestrator =
                Orchestrator::with_profile(channel, profile, display).with_timings(timings);
            let result = orchestrator.apply_layout(&layout).await;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
            Ok(if result.success { 0 } else { 1 })
        }
    }
}

fn load_layout_file(path: Option<&Path>) -> layout_orchestrator::Result<LayoutFile> {
    let file = match path {
        Some(path) => {
            tracing::info!("📁 Loading layout from: {}", path.display());
            LayoutFile::from_file(path)?
        }
        None => LayoutFile::default(),
    };
    file.validate()?;
    Ok(file)
}

fn open_channel(cli: &CliConfig, file: &LayoutFile) -> AdbChannel {
    let device = file.device();
    let mut channel = AdbChannel::new().with_serial(cli.serial.clone().or(device.serial));
    if let Some(adb) = cli.adb.clone().or(device.adb_path) {
        channel = channel.with_adb_path(adb);
    }
    if let Some(timeout) = cli.timeout_ms.or(device.command_timeout_ms) {
        channel = channel.with_timeout_ms(timeout);
    }
    channel
}

/// 先確認連線，再讀取裝置資訊；連線不可用時不送出任何 shell 命令
async fn probe(channel: &AdbChannel) -> layout_orchestrator::Result<(DeviceIdentity, DisplayMetrics)> {
    if !channel.is_alive().await {
        return Err(OrchestratorError::PreflightFailed {
            reason: "no device reachable through adb".to_string(),
        });
    }
    if !channel.is_authorized().await {
        return Err(OrchestratorError::PreflightFailed {
            reason: "device has not authorized this computer".to_string(),
        });
    }
    channel.probe_device().await
}

fn print_bounds(
    display: DisplayMetrics,
    identity: &DeviceIdentity,
    split_ratio: f64,
) -> layout_orchestrator::Result<()> {
    let profile = resolve_profile(identity);
    let status = profile.status_inset_px(&display);
    let nav = profile.nav_inset_px(&display);
    validate_geometry(display.width_px, display.height_px, status, nav, split_ratio)?;

    let bounds = calculate_bounds(display.width_px, display.height_px, status, nav, split_ratio);
    println!("profile:      {} (insets {}px / {}px)", profile.name, status, nav);
    println!("top:          {}", bounds.top);
    println!("bottom left:  {}", bounds.bottom_left);
    println!("bottom right: {}", bounds.bottom_right);
    Ok(())
}

fn print_result(result: &LayoutResult) {
    let icon = if result.success { "✅" } else { "❌" };
    println!("{} {}", icon, result.message);
    for outcome in &result.launches {
        println!(
            "  launch   {:<12} {:<28} {}",
            outcome.position.label(),
            outcome.app.display_name(),
            outcome.message
        );
    }
    for outcome in &result.positions {
        println!(
            "  position {:<12} {:<28} {} ({:?})",
            outcome.position.label(),
            outcome.app.display_name(),
            outcome.message,
            outcome.bounds_source
        );
    }
}
