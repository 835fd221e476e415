pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::adb::AdbChannel;
pub use crate::config::device_profile::{DeviceIdentity, DeviceProfile, DisplayMetrics};
pub use crate::config::timing::Timings;
pub use crate::core::orchestrator::{FlagReport, Orchestrator};
pub use crate::domain::model::{AppConfig, LayoutBounds, LayoutConfig, LayoutResult, Rect};
pub use crate::domain::ports::CommandChannel;
pub use crate::utils::error::{OrchestratorError, Result};
