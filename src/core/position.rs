use crate::config::catalog::{self, Intent};
use crate::config::device_profile::DeviceProfile;
use crate::config::timing::{settle, Timings};
use crate::domain::model::{AppConfig, BoundsSource, Position, PositionOutcome, Rect};
use crate::domain::ports::CommandChannel;
use regex::Regex;

/// 標題列抓取點距離視窗上緣的距離
const HEADER_GRAB_OFFSET: i32 = 60;
/// 右下角縮放把手向內的距離
const RESIZE_HANDLE_MARGIN: i32 = 15;
/// 找不到目前位置時，假設視窗比目標小這麼多
const ESTIMATE_SHRINK: i32 = 185;

/// 依優先順序比對的 bounds 樣式。傾印格式隨系統版本變動，所以保留多個。
fn bounds_patterns(package: &str) -> Vec<String> {
    let pkg = regex::escape(package);
    vec![
        format!(r"(?s)bounds=\[(\d+),(\d+)\]\[(\d+),(\d+)\].*?{}", pkg),
        format!(r"(?s){}.*?bounds=\[(\d+),(\d+)\]\[(\d+),(\d+)\]", pkg),
        format!(r"(?s)taskId=.*?{}.*?bounds=\[(\d+),(\d+)\]\[(\d+),(\d+)\]", pkg),
    ]
}

/// 從視窗傾印中找出 package 的 bounds，第一個符合的樣式勝出
pub fn parse_window_bounds(dump: &str, package: &str) -> Option<Rect> {
    for pattern in bounds_patterns(package) {
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if let Some(caps) = re.captures(dump) {
            let coords: Option<Vec<i32>> = (1..=4)
                .map(|i| caps.get(i).and_then(|m| m.as_str().parse().ok()))
                .collect();
            if let Some([left, top, right, bottom]) = coords.as_deref() {
                return Some(Rect::new(*left, *top, *right, *bottom));
            }
        }
    }
    None
}

/// 以目標位置推估目前視窗：左上角對齊，右下縮小
pub fn estimate_current_bounds(target: &Rect) -> Rect {
    Rect::new(
        target.left,
        target.top,
        (target.right - ESTIMATE_SHRINK).max(target.left + 1),
        (target.bottom - ESTIMATE_SHRINK).max(target.top + 1),
    )
}

fn header_point(rect: &Rect) -> (i32, i32) {
    (rect.center_x(), rect.top + HEADER_GRAB_OFFSET)
}

fn resize_handle_point(rect: &Rect) -> (i32, i32) {
    (rect.right - RESIZE_HANDLE_MARGIN, rect.bottom - RESIZE_HANDLE_MARGIN)
}

/// 用拖曳手勢把視窗移到目標位置並調整大小。盡力而為，不回傳錯誤。
pub struct PositionSequencer<'a, C: CommandChannel + ?Sized> {
    channel: &'a C,
    profile: &'a DeviceProfile,
    timings: &'a Timings,
}

impl<'a, C: CommandChannel + ?Sized> PositionSequencer<'a, C> {
    pub fn new(channel: &'a C, profile: &'a DeviceProfile, timings: &'a Timings) -> Self {
        Self {
            channel,
            profile,
            timings,
        }
    }

    pub async fn move_and_resize(&self, app: &AppConfig, target: &Rect) -> bool {
        self.reposition(app, target).await.0.is_ok()
    }

    pub async fn move_and_resize_detailed(
        &self,
        app: &AppConfig,
        position: Position,
        target: &Rect,
    ) -> PositionOutcome {
        let (result, bounds_source) = self.reposition(app, target).await;
        let (success, message) = match result {
            Ok(()) => (true, format!("Positioned at {}", target)),
            Err(reason) => {
                tracing::warn!("Failed to position {}: {}", app.display_name(), reason);
                (false, reason)
            }
        };

        PositionOutcome {
            app: app.clone(),
            position,
            success,
            message,
            bounds_source,
        }
    }

    async fn reposition(
        &self,
        app: &AppConfig,
        target: &Rect,
    ) -> (std::result::Result<(), String>, BoundsSource) {
        tracing::debug!("📐 Positioning {} to {}", app.display_name(), target);

        let (current, bounds_source) = match self.current_bounds(&app.package).await {
            Some(rect) => (rect, BoundsSource::Observed),
            None => {
                tracing::debug!(
                    "No bounds found for {}, estimating from target",
                    app.display_name()
                );
                (estimate_current_bounds(target), BoundsSource::Estimated)
            }
        };

        let move_ms = self.profile.scale_gesture_ms(self.timings.move_gesture_ms);
        let resize_ms = self.profile.scale_gesture_ms(self.timings.resize_gesture_ms);

        // 位置未知時從目標的標題列起拖，推估的視窗只用於縮放把手
        let move_from = match bounds_source {
            BoundsSource::Observed => header_point(&current),
            BoundsSource::Estimated => header_point(target),
        };

        let result = match self
            .drag(move_from, header_point(target), move_ms)
            .await
        {
            Ok(()) => self
                .drag(
                    resize_handle_point(&current),
                    resize_handle_point(target),
                    resize_ms,
                )
                .await
                .map_err(|reason| format!("resize gesture: {}", reason)),
            Err(reason) => Err(format!("move gesture: {}", reason)),
        };

        (result, bounds_source)
    }

    async fn current_bounds(&self, package: &str) -> Option<Rect> {
        for command in catalog::commands_for(Intent::DumpWindows, self.profile.family) {
            match self.channel.execute(&command).await {
                Ok(dump) => {
                    if let Some(rect) = parse_window_bounds(&dump, package) {
                        return Some(rect);
                    }
                }
                Err(e) => tracing::debug!("Window dump '{}' failed: {}", command, e),
            }
        }
        None
    }

    async fn drag(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        duration_ms: u64,
    ) -> std::result::Result<(), String> {
        let commands = catalog::commands_for(
            Intent::Drag {
                from,
                to,
                duration_ms,
            },
            self.profile.family,
        );
        let mut outcome = Err("no drag command".to_string());
        for command in commands {
            outcome = match self.channel.execute(&command).await {
                Ok(response) if !catalog::signals_failure(&response) => Ok(()),
                Ok(response) => Err(response.trim().to_string()),
                Err(e) => Err(e.to_string()),
            };
            if outcome.is_ok() {
                break;
            }
        }
        settle(self.timings.drag_settle_ms).await;
        outcome
    }
}
