use crate::config::catalog::{self, Intent};
use crate::config::device_profile::DeviceProfile;
use crate::config::timing::{settle, Timings};
use crate::domain::model::{AppConfig, LaunchOutcome, Position};
use crate::domain::ports::CommandChannel;

pub const LAUNCH_COMMAND_FAILED: &str = "Launch command failed";

/// 啟動單一 app，並以行程清單確認它真的在執行。
///
/// 成功與否取決於行程是否出現，而不是命令是否被接受。
pub struct LaunchSequencer<'a, C: CommandChannel + ?Sized> {
    channel: &'a C,
    profile: &'a DeviceProfile,
    timings: &'a Timings,
}

enum CandidateRun {
    Accepted(String),
    Rejected,
    AllFaulted(String),
}

impl<'a, C: CommandChannel + ?Sized> LaunchSequencer<'a, C> {
    pub fn new(channel: &'a C, profile: &'a DeviceProfile, timings: &'a Timings) -> Self {
        Self {
            channel,
            profile,
            timings,
        }
    }

    pub async fn launch_and_verify(&self, app: &AppConfig, position: Position) -> LaunchOutcome {
        tracing::debug!("🚀 Launching {} ({})", app.display_name(), position);
        let component = app.target_component();
        let candidates = catalog::commands_for(
            Intent::LaunchApp {
                package: &app.package,
                component: &component,
            },
            self.profile.family,
        );

        let (success, message) = match self.run_candidates(&candidates).await {
            CandidateRun::Accepted(command) => {
                tracing::debug!("Launch accepted for {}: {}", app.display_name(), command);
                settle(self.timings.launch_settle_ms).await;
                match self.is_running(&app.package).await {
                    Ok(true) => (true, "Launched successfully".to_string()),
                    Ok(false) => (false, "Launch command succeeded but app not running".to_string()),
                    Err(reason) => (false, format!("Process check failed: {}", reason)),
                }
            }
            CandidateRun::Rejected => (false, LAUNCH_COMMAND_FAILED.to_string()),
            CandidateRun::AllFaulted(reason) => (false, format!("Launch fault: {}", reason)),
        };

        if success {
            tracing::info!("✅ {} ({}): {}", app.display_name(), position, message);
        } else {
            tracing::warn!("⚠️ {} ({}): {}", app.display_name(), position, message);
        }

        LaunchOutcome {
            app: app.clone(),
            position,
            success,
            message,
        }
    }

    async fn run_candidates(&self, candidates: &[String]) -> CandidateRun {
        let mut faults = 0;
        let mut last_fault = String::new();

        for command in candidates {
            match self.channel.execute(command).await {
                Ok(response) if !catalog::signals_failure(&response) => {
                    return CandidateRun::Accepted(command.clone());
                }
                Ok(response) => {
                    tracing::debug!("Candidate rejected: {} -> {}", command, response.trim());
                }
                Err(e) => {
                    tracing::debug!("Candidate faulted: {} -> {}", command, e);
                    faults += 1;
                    last_fault = e.to_string();
                }
            }
        }

        if faults > 0 && faults == candidates.len() {
            CandidateRun::AllFaulted(last_fault)
        } else {
            CandidateRun::Rejected
        }
    }

    /// 行程清單的子字串比對。帶有失敗標記的清單改用下一個查詢命令，
    /// 除非清單裡已經有這個 package；全部不可用時回傳最後的原因
    async fn is_running(&self, package: &str) -> std::result::Result<bool, String> {
        let mut last_fault = None;
        for command in catalog::commands_for(Intent::ListProcesses, self.profile.family) {
            match self.channel.execute(&command).await {
                Ok(listing) if listing.contains(package) => return Ok(true),
                Ok(listing) if !catalog::signals_failure(&listing) => return Ok(false),
                Ok(listing) => {
                    tracing::debug!("Process listing '{}' rejected: {}", command, listing.trim());
                    last_fault = Some(listing.trim().to_string());
                }
                Err(e) => {
                    tracing::debug!("Process listing '{}' failed: {}", command, e);
                    last_fault = Some(e.to_string());
                }
            }
        }
        Err(last_fault.unwrap_or_else(|| "no process listing available".to_string()))
    }
}
