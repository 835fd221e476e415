use crate::config::timing::Timings;
use crate::domain::model::{AppConfig, LayoutConfig};
use crate::utils::error::{OrchestratorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 版面設定檔（TOML）
///
/// ```toml
/// [layout]
/// name = "Work"
/// split_ratio = 0.4
///
/// [layout.top]
/// package = "com.android.chrome"
/// component = "com.google.android.apps.chrome.Main"
/// display_name = "Chrome"
///
/// [layout.bottom_left]
/// package = "com.whatsapp"
///
/// [layout.bottom_right]
/// package = "com.spotify.client"
///
/// [timing]
/// success_threshold = 0.7
///
/// [device]
/// serial = "${TABLET_SERIAL}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutFile {
    #[serde(default)]
    pub layout: LayoutSection,
    pub timing: Option<Timings>,
    pub device: Option<DeviceSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSection {
    pub name: Option<String>,
    pub split_ratio: Option<f64>,
    pub top: Option<AppConfig>,
    pub bottom_left: Option<AppConfig>,
    pub bottom_right: Option<AppConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSection {
    pub serial: Option<String>,
    pub adb_path: Option<String>,
    pub command_timeout_ms: Option<u64>,
    pub status_inset_px: Option<i32>,
    pub nav_inset_px: Option<i32>,
}

impl LayoutFile {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${TABLET_SERIAL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| OrchestratorError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 未填寫的欄位沿用預設版面
    pub fn layout_config(&self) -> LayoutConfig {
        let defaults = LayoutConfig::default();
        LayoutConfig {
            name: self.layout.name.clone().unwrap_or(defaults.name),
            top: self.layout.top.clone().unwrap_or(defaults.top),
            bottom_left: self.layout.bottom_left.clone().unwrap_or(defaults.bottom_left),
            bottom_right: self.layout.bottom_right.clone().unwrap_or(defaults.bottom_right),
            split_ratio: self.layout.split_ratio.unwrap_or(defaults.split_ratio),
        }
    }

    pub fn timings(&self) -> Timings {
        self.timing.clone().unwrap_or_default()
    }

    pub fn device(&self) -> DeviceSection {
        self.device.clone().unwrap_or_default()
    }
}

impl Validate for LayoutConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("layout.name", &self.name)?;
        validation::validate_open_range("layout.split_ratio", self.split_ratio, 0.0, 1.0)?;
        for (field, app) in [
            ("layout.top.package", &self.top),
            ("layout.bottom_left.package", &self.bottom_left),
            ("layout.bottom_right.package", &self.bottom_right),
        ] {
            validation::validate_package_name(field, &app.package)?;
        }
        Ok(())
    }
}

impl Validate for Timings {
    fn validate(&self) -> Result<()> {
        validation::validate_range("timing.success_threshold", self.success_threshold, 0.0, 1.0)?;
        validation::validate_range("timing.move_gesture_ms", self.move_gesture_ms, 1, 10_000)?;
        validation::validate_range("timing.resize_gesture_ms", self.resize_gesture_ms, 1, 10_000)?;
        Ok(())
    }
}

impl Validate for LayoutFile {
    fn validate(&self) -> Result<()> {
        self.layout_config().validate()?;
        self.timings().validate()?;
        if let Some(device) = &self.device {
            if let Some(timeout) = device.command_timeout_ms {
                validation::validate_range("device.command_timeout_ms", timeout, 100, 600_000)?;
            }
            for (field, inset) in [
                ("device.status_inset_px", device.status_inset_px),
                ("device.nav_inset_px", device.nav_inset_px),
            ] {
                if let Some(px) = inset {
                    validation::validate_range(field, px, 0, 1_000)?;
                }
            }
        }
        Ok(())
    }
}
