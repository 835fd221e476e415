use crate::config::device_profile::{DeviceIdentity, DisplayMetrics};
use crate::domain::ports::CommandChannel;
use crate::utils::error::{OrchestratorError, Result};
use async_trait::async_trait;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

/// adb 的錯誤輸出中代表連線本身有問題的片段
const LINK_FAILURES: &[&str] = &[
    "no devices/emulators found",
    "device offline",
    "device unauthorized",
    "error: device '",
    "cannot connect",
];

/// 透過 `adb shell` 執行命令的特權通道
#[derive(Debug, Clone)]
pub struct AdbChannel {
    adb_path: String,
    serial: Option<String>,
    timeout: Duration,
}

impl Default for AdbChannel {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            serial: None,
            timeout: Duration::from_millis(DEFAULT_COMMAND_TIMEOUT_MS),
        }
    }
}

impl AdbChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adb_path(mut self, path: impl Into<String>) -> Self {
        self.adb_path = path.into();
        self
    }

    pub fn with_serial(mut self, serial: Option<String>) -> Self {
        self.serial = serial.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms);
        self
    }

    async fn run(&self, args: &[&str], label: &str) -> Result<Output> {
        let mut cmd = Command::new(&self.adb_path);
        if let Some(serial) = &self.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd.args(args).kill_on_drop(true);

        tracing::trace!("adb {}", args.join(" "));
        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(OrchestratorError::ChannelUnavailable {
                message: format!("failed to run {}: {}", self.adb_path, e),
            }),
            Err(_) => Err(OrchestratorError::Timeout {
                command: label.to_string(),
                after_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    async fn get_state(&self) -> Option<(String, String)> {
        let output = self.run(&["get-state"], "get-state").await.ok()?;
        Some((
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }

    async fn getprop(&self, key: &str) -> Result<String> {
        Ok(self.execute(&format!("getprop {}", key)).await?.trim().to_string())
    }

    /// 一次讀取裝置識別與目前的顯示尺寸（已考慮旋轉）
    pub async fn probe_device(&self) -> Result<(DeviceIdentity, DisplayMetrics)> {
        let identity = DeviceIdentity {
            manufacturer: self.getprop("ro.product.manufacturer").await?,
            brand: self.getprop("ro.product.brand").await?,
            model: self.getprop("ro.product.model").await?,
        };

        let size = match self.execute("dumpsys window displays").await {
            Ok(dump) => parse_current_size(&dump),
            Err(e) => {
                tracing::debug!("dumpsys window displays failed: {}", e);
                None
            }
        };
        let (width_px, height_px) = match size {
            Some(size) => size,
            None => parse_wm_size(&self.execute("wm size").await?).ok_or_else(|| {
                OrchestratorError::ConfigError {
                    message: "could not read display size from 'wm size'".to_string(),
                }
            })?,
        };
        let density_dpi = parse_wm_density(&self.execute("wm density").await?).ok_or_else(|| {
            OrchestratorError::ConfigError {
                message: "could not read display density from 'wm density'".to_string(),
            }
        })?;

        Ok((identity, DisplayMetrics::new(width_px, height_px, density_dpi)))
    }
}

#[async_trait]
impl CommandChannel for AdbChannel {
    async fn is_alive(&self) -> bool {
        match self.get_state().await {
            Some((stdout, stderr)) => stdout == "device" || stderr.contains("unauthorized"),
            None => false,
        }
    }

    async fn is_authorized(&self) -> bool {
        matches!(self.get_state().await, Some((stdout, _)) if stdout == "device")
    }

    async fn execute(&self, command: &str) -> Result<String> {
        let output = self.run(&["shell", command], command).await?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if LINK_FAILURES.iter().any(|marker| stderr.contains(marker)) && stdout.is_empty() {
            return Err(OrchestratorError::ChannelUnavailable { message: stderr });
        }

        let combined = if !stderr.is_empty() && !stderr.contains("WARNING") {
            if stdout.is_empty() {
                stderr
            } else {
                format!("{}\n{}", stdout, stderr)
            }
        } else {
            stdout
        };

        if !output.status.success() {
            return Err(OrchestratorError::Transport {
                command: command.to_string(),
                message: format!("{} {}", output.status, combined).trim().to_string(),
            });
        }
        Ok(combined)
    }
}

fn parse_dimensions(text: &str) -> Option<(i32, i32)> {
    let (w, h) = text.trim().split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// `dumpsys window displays` 中的 `cur=2000x1200`
pub fn parse_current_size(dump: &str) -> Option<(i32, i32)> {
    dump.split_whitespace()
        .find_map(|token| token.strip_prefix("cur=").and_then(parse_dimensions))
}

/// `wm size` 的輸出；有 Override 時以它為準
pub fn parse_wm_size(output: &str) -> Option<(i32, i32)> {
    parse_wm_value(output, "size").and_then(|value| parse_dimensions(&value))
}

pub fn parse_wm_density(output: &str) -> Option<u32> {
    parse_wm_value(output, "density").and_then(|value| value.trim().parse().ok())
}

fn parse_wm_value(output: &str, key: &str) -> Option<String> {
    let lookup = |kind: &str| {
        let prefix = format!("{} {}:", kind, key);
        output
            .lines()
            .find_map(|line| line.trim().strip_prefix(prefix.as_str()).map(|v| v.trim().to_string()))
    };
    lookup("Override").or_else(|| lookup("Physical"))
}
