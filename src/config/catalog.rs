//! 每個意圖對應一組功能相同的候選命令，依裝置家族排序。
//!
//! 呼叫者依序嘗試，第一個沒有錯誤標記的回應即被接受。新增裝置家族時
//! 只能新增分支，不可改動其他家族的順序。

use crate::config::device_profile::CommandFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    /// 一批系統設定，全部都要送出
    EnableFreeform,
    LaunchApp { package: &'a str, component: &'a str },
    ListProcesses,
    DumpWindows,
    Drag {
        from: (i32, i32),
        to: (i32, i32),
        duration_ms: u64,
    },
}

const GENERIC_FREEFORM_FLAGS: &[&str] = &[
    "settings put global enable_freeform_support 1",
    "settings put secure freeform_window_management 1",
    "settings put global force_resizable_activities 1",
    "settings put global force_desktop_mode_on_external_displays 1",
];

const LENOVO_FREEFORM_FLAGS: &[&str] = &[
    "settings put global enable_freeform_support 1",
    "settings put secure freeform_window_management 1",
    "settings put global force_resizable_activities 1",
    "settings put global DEVELOPMENT_FORCE_RESIZABLE_ACTIVITIES 1",
    "settings put global force_desktop_mode_on_external_displays 1",
    "settings put global window_animation_scale 0.5",
    "settings put global transition_animation_scale 0.5",
    "settings put global animator_duration_scale 0.5",
];

const PROCESS_LISTINGS: &[&str] = &["ps -A -o NAME", "dumpsys activity processes"];

const WINDOW_DUMPS: &[&str] = &["dumpsys activity activities"];

pub fn commands_for(intent: Intent<'_>, family: CommandFamily) -> Vec<String> {
    match intent {
        Intent::EnableFreeform => match family {
            CommandFamily::Generic => owned(GENERIC_FREEFORM_FLAGS),
            CommandFamily::Lenovo => owned(LENOVO_FREEFORM_FLAGS),
        },
        Intent::LaunchApp { package, component } => launch_commands(package, component, family),
        Intent::ListProcesses => owned(PROCESS_LISTINGS),
        Intent::DumpWindows => owned(WINDOW_DUMPS),
        Intent::Drag {
            from,
            to,
            duration_ms,
        } => vec![format!(
            "input swipe {} {} {} {} {}",
            from.0, from.1, to.0, to.1, duration_ms
        )],
    }
}

fn launch_commands(package: &str, component: &str, family: CommandFamily) -> Vec<String> {
    let monkey = format!(
        "monkey -p {} -c android.intent.category.LAUNCHER 1",
        package
    );
    match family {
        CommandFamily::Generic => vec![
            format!(
                "cmd activity start-activity --user 0 --windowingMode 5 -n {}",
                component
            ),
            monkey,
            format!("am start --windowingMode 5 -n {}", component),
        ],
        CommandFamily::Lenovo => vec![
            format!(
                "cmd activity start-activity --user 0 --windowingMode 5 --activity.clearTop --activity.broughtToForeground -n {}",
                component
            ),
            format!(
                "am start --windowingMode 5 -n {} --activity.clearTop --activity.broughtToForeground",
                component
            ),
            monkey,
        ],
    }
}

fn owned(commands: &[&str]) -> Vec<String> {
    commands.iter().map(|c| c.to_string()).collect()
}

/// 回應中含有 error / exception（不分大小寫）即視為失敗
pub fn signals_failure(response: &str) -> bool {
    let lowered = response.to_ascii_lowercase();
    lowered.contains("error") || lowered.contains("exception")
}
