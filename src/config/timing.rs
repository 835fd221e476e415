use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 等待與門檻值。預設值來自實機調校，沒有推導依據，因此全部可由設定檔覆蓋。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub flag_settle_ms: u64,
    pub launch_settle_ms: u64,
    pub inter_launch_ms: u64,
    pub after_last_launch_ms: u64,
    pub after_position_ms: u64,
    pub drag_settle_ms: u64,
    pub move_gesture_ms: u64,
    pub resize_gesture_ms: u64,
    pub success_threshold: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            flag_settle_ms: 500,
            launch_settle_ms: 900,
            inter_launch_ms: 400,
            after_last_launch_ms: 800,
            after_position_ms: 300,
            drag_settle_ms: 120,
            move_gesture_ms: 260,
            resize_gesture_ms: 240,
            success_threshold: 0.7,
        }
    }
}

impl Timings {
    /// 所有等待為零，手勢時間與門檻不變；供測試與離線模擬使用
    pub fn immediate() -> Self {
        Self {
            flag_settle_ms: 0,
            launch_settle_ms: 0,
            inter_launch_ms: 0,
            after_last_launch_ms: 0,
            after_position_ms: 0,
            drag_settle_ms: 0,
            ..Self::default()
        }
    }
}

pub async fn settle(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
