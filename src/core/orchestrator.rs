use crate::config::catalog::{self, Intent};
use crate::config::device_profile::{resolve_profile, DeviceIdentity, DeviceProfile, DisplayMetrics};
use crate::config::timing::{settle, Timings};
use crate::core::geometry::{calculate_bounds, validate_geometry};
use crate::core::launch::LaunchSequencer;
use crate::core::position::PositionSequencer;
use crate::domain::model::{
    LaunchOutcome, LayoutBounds, LayoutConfig, LayoutResult, PositionOutcome,
};
use crate::domain::ports::CommandChannel;
use crate::utils::error::{OrchestratorError, Result};
use crate::utils::validation::Validate;
use std::fmt;
use tracing::Instrument;

/// 執行階段，只用於日誌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    PreflightCheck,
    EnablingFlags,
    Launching,
    Positioning,
    Aggregating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::PreflightCheck => "preflight",
            Stage::EnablingFlags => "enabling-flags",
            Stage::Launching => "launching",
            Stage::Positioning => "positioning",
            Stage::Aggregating => "aggregating",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// 系統設定批次的結果；設定本身不做驗證
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagReport {
    pub issued: usize,
    pub accepted: usize,
}

/// 三窗格版面的固定流程：預檢 → 設定 → 啟動 ×3 → 定位 ×3 → 彙總。
///
/// 裝置設定檔在建構時解析一次，之後傳給每個元件。預檢通過後，
/// `apply_layout` 不會把錯誤拋給呼叫者，一律轉成失敗的 [`LayoutResult`]。
/// 同時多次呼叫不會被協調，需要單一執行的呼叫者自行加鎖。
pub struct Orchestrator<C: CommandChannel> {
    channel: C,
    profile: DeviceProfile,
    display: DisplayMetrics,
    timings: Timings,
}

impl<C: CommandChannel> Orchestrator<C> {
    pub fn new(channel: C, identity: &DeviceIdentity, display: DisplayMetrics) -> Self {
        let profile = resolve_profile(identity);
        tracing::debug!(
            "Resolved device profile '{}' for {} {}",
            profile.name,
            identity.manufacturer,
            identity.model
        );
        Self::with_profile(channel, profile, display)
    }

    pub fn with_profile(channel: C, profile: DeviceProfile, display: DisplayMetrics) -> Self {
        Self {
            channel,
            profile,
            display,
            timings: Timings::default(),
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn layout_bounds(&self, split_ratio: f64) -> LayoutBounds {
        calculate_bounds(
            self.display.width_px,
            self.display.height_px,
            self.profile.status_inset_px(&self.display),
            self.profile.nav_inset_px(&self.display),
            split_ratio,
        )
    }

    pub async fn apply_layout(&self, config: &LayoutConfig) -> LayoutResult {
        let run_id = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f").to_string();
        let span = tracing::info_span!("apply_layout", run_id = %run_id, layout = %config.name);

        async move {
            tracing::info!("🚀 Applying layout '{}'", config.name);
            log_stage(Stage::Idle, Stage::PreflightCheck);

            if let Err(e) = self.preflight().await {
                log_stage(Stage::PreflightCheck, Stage::Done);
                tracing::error!("❌ {}", e);
                return LayoutResult::failed(format!(
                    "Privileged channel not available or permission denied: {}",
                    e
                ));
            }

            let result = match self.run_pipeline(config).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("❌ Layout run aborted: {}", e);
                    LayoutResult::failed(format!("Error: {}", e))
                }
            };

            log_stage(Stage::Aggregating, Stage::Done);
            if result.success {
                tracing::info!("✅ {}", result.message);
            } else {
                tracing::warn!("⚠️ {}", result.message);
            }
            result
        }
        .instrument(span)
        .await
    }

    /// 只送出自由視窗相關設定，不跑版面流程
    pub async fn enable_freeform_flags(&self) -> Result<FlagReport> {
        self.preflight().await?;
        Ok(self.issue_flags().await)
    }

    async fn preflight(&self) -> Result<()> {
        if !self.channel.is_alive().await {
            return Err(OrchestratorError::PreflightFailed {
                reason: "channel is not alive".to_string(),
            });
        }
        if !self.channel.is_authorized().await {
            return Err(OrchestratorError::PreflightFailed {
                reason: "channel is not authorized".to_string(),
            });
        }
        Ok(())
    }

    async fn run_pipeline(&self, config: &LayoutConfig) -> Result<LayoutResult> {
        config.validate()?;
        let status_inset = self.profile.status_inset_px(&self.display);
        let nav_inset = self.profile.nav_inset_px(&self.display);
        validate_geometry(
            self.display.width_px,
            self.display.height_px,
            status_inset,
            nav_inset,
            config.split_ratio,
        )?;

        log_stage(Stage::PreflightCheck, Stage::EnablingFlags);
        let flags = self.issue_flags().await;
        tracing::debug!("Freeform flags: {}/{} accepted", flags.accepted, flags.issued);
        settle(self.timings.flag_settle_ms).await;

        let bounds = self.layout_bounds(config.split_ratio);
        tracing::debug!(
            "Target bounds: top={}, bottom_left={}, bottom_right={}",
            bounds.top,
            bounds.bottom_left,
            bounds.bottom_right
        );

        log_stage(Stage::EnablingFlags, Stage::Launching);
        let launcher = LaunchSequencer::new(&self.channel, &self.profile, &self.timings);
        let order = config.in_launch_order();
        let mut launches = Vec::with_capacity(order.len());
        for (index, (app, position)) in order.iter().enumerate() {
            launches.push(launcher.launch_and_verify(app, *position).await);
            let delay = if index + 1 == order.len() {
                self.timings.after_last_launch_ms
            } else {
                self.timings.inter_launch_ms
            };
            settle(delay).await;
        }

        log_stage(Stage::Launching, Stage::Positioning);
        let positioner = PositionSequencer::new(&self.channel, &self.profile, &self.timings);
        let mut positions = Vec::with_capacity(order.len());
        for (app, position) in order.iter() {
            let target = bounds.for_position(*position);
            positions.push(
                positioner
                    .move_and_resize_detailed(app, *position, &target)
                    .await,
            );
            settle(self.timings.after_position_ms).await;
        }

        log_stage(Stage::Positioning, Stage::Aggregating);
        Ok(aggregate(launches, positions, self.timings.success_threshold))
    }

    async fn issue_flags(&self) -> FlagReport {
        let commands = catalog::commands_for(Intent::EnableFreeform, self.profile.family);
        let mut accepted = 0;
        for command in &commands {
            match self.channel.execute(command).await {
                Ok(response) if !catalog::signals_failure(&response) => accepted += 1,
                Ok(response) => tracing::debug!("Flag rejected: {} -> {}", command, response.trim()),
                Err(e) => tracing::debug!("Flag faulted: {} -> {}", command, e),
            }
        }
        FlagReport {
            issued: commands.len(),
            accepted,
        }
    }
}

fn log_stage(from: Stage, to: Stage) {
    tracing::debug!("Stage {} -> {}", from, to);
}

/// 成功數是否達到門檻（`success_count >= threshold * total`）
pub fn meets_threshold(success_count: usize, total: usize, threshold: f64) -> bool {
    total > 0 && success_count as f64 >= threshold * total as f64
}

pub fn aggregate(
    launches: Vec<LaunchOutcome>,
    positions: Vec<PositionOutcome>,
    threshold: f64,
) -> LayoutResult {
    let total_operations = launches.len() + positions.len();
    let success_count = launches.iter().filter(|o| o.success).count()
        + positions.iter().filter(|o| o.success).count();

    let first_failure = launches
        .iter()
        .find(|o| !o.success)
        .map(|o| format!("{} launch: {}", o.position, o.message))
        .or_else(|| {
            positions
                .iter()
                .find(|o| !o.success)
                .map(|o| format!("{} position: {}", o.position, o.message))
        });

    let mut message = format!(
        "Layout applied: {}/{} operations successful",
        success_count, total_operations
    );
    if let Some(reason) = first_failure {
        message.push_str("; first failure: ");
        message.push_str(&reason);
    }

    LayoutResult {
        success: meets_threshold(success_count, total_operations, threshold),
        message,
        launches,
        positions,
        success_count,
        total_operations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AppConfig, BoundsSource, Position};

    fn launch(position: Position, success: bool) -> LaunchOutcome {
        LaunchOutcome {
            app: AppConfig::new("com.example.app"),
            position,
            success,
            message: if success {
                "Launched successfully".to_string()
            } else {
                "Launch command failed".to_string()
            },
        }
    }

    fn place(position: Position, success: bool) -> PositionOutcome {
        PositionOutcome {
            app: AppConfig::new("com.example.app"),
            position,
            success,
            message: if success { "ok" } else { "move gesture: denied" }.to_string(),
            bounds_source: BoundsSource::Estimated,
        }
    }

    const ORDER: [Position; 3] = [Position::BottomLeft, Position::BottomRight, Position::Top];

    #[test]
    fn test_threshold_boundary() {
        assert!(!meets_threshold(4, 6, 0.7));
        assert!(meets_threshold(5, 6, 0.7));
        assert!(meets_threshold(6, 6, 0.7));
        assert!(!meets_threshold(0, 0, 0.7));
    }

    #[test]
    fn test_four_of_six_fails() {
        let launches = vec![
            launch(ORDER[0], true),
            launch(ORDER[1], false),
            launch(ORDER[2], true),
        ];
        let positions = vec![
            place(ORDER[0], true),
            place(ORDER[1], false),
            place(ORDER[2], true),
        ];
        let result = aggregate(launches, positions, 0.7);
        assert!(!result.success);
        assert_eq!(result.success_count, 4);
        assert_eq!(
            result.message,
            "Layout applied: 4/6 operations successful; first failure: Bottom Right launch: Launch command failed"
        );
    }

    #[test]
    fn test_five_of_six_succeeds_and_reports_position_failure() {
        let launches = ORDER.iter().map(|p| launch(*p, true)).collect();
        let positions = vec![
            place(ORDER[0], true),
            place(ORDER[1], true),
            place(ORDER[2], false),
        ];
        let result = aggregate(launches, positions, 0.7);
        assert!(result.success);
        assert_eq!(result.total_operations, 6);
        assert!(result
            .message
            .ends_with("first failure: Top position: move gesture: denied"));
    }

    #[test]
    fn test_all_success_message_has_no_failure_suffix() {
        let launches = ORDER.iter().map(|p| launch(*p, true)).collect();
        let positions = ORDER.iter().map(|p| place(*p, true)).collect();
        let result = aggregate(launches, positions, 0.7);
        assert_eq!(result.message, "Layout applied: 6/6 operations successful");
    }
}
