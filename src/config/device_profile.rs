//! 裝置識別 → 狀態列／導覽列高度與手勢時間倍率的查表。
//!
//! 整張表只在每次執行開始時查一次，解析出的 [`DeviceProfile`] 再傳給
//! 幾何計算、命令目錄與各個 sequencer；其他地方不再判斷裝置型號。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub manufacturer: String,
    #[serde(default)]
    pub brand: String,
    pub model: String,
}

impl DeviceIdentity {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            brand: String::new(),
            model: model.into(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    fn is_vendor(&self, vendor: &str) -> bool {
        self.manufacturer.trim().eq_ignore_ascii_case(vendor)
            || self.brand.trim().eq_ignore_ascii_case(vendor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width_px: i32,
    pub height_px: i32,
    pub density_dpi: u32,
}

impl DisplayMetrics {
    pub const BASELINE_DPI: u32 = 160;

    pub fn new(width_px: i32, height_px: i32, density_dpi: u32) -> Self {
        Self {
            width_px,
            height_px,
            density_dpi,
        }
    }

    pub fn dp_to_px(&self, dp: u32) -> i32 {
        (f64::from(dp) * f64::from(self.density_dpi) / f64::from(Self::BASELINE_DPI)) as i32
    }
}

/// 命令目錄的索引鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandFamily {
    Generic,
    Lenovo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceProfile {
    pub name: &'static str,
    pub family: CommandFamily,
    pub status_inset_dp: u32,
    pub nav_inset_dp: u32,
    pub gesture_multiplier: f64,
    pub status_inset_override_px: Option<i32>,
    pub nav_inset_override_px: Option<i32>,
}

impl DeviceProfile {
    pub fn status_inset_px(&self, display: &DisplayMetrics) -> i32 {
        self.status_inset_override_px
            .unwrap_or_else(|| display.dp_to_px(self.status_inset_dp))
    }

    pub fn nav_inset_px(&self, display: &DisplayMetrics) -> i32 {
        self.nav_inset_override_px
            .unwrap_or_else(|| display.dp_to_px(self.nav_inset_dp))
    }

    /// 設定檔中的像素值優先於表格的 dp 值
    pub fn with_inset_overrides(mut self, status_px: Option<i32>, nav_px: Option<i32>) -> Self {
        if status_px.is_some() {
            self.status_inset_override_px = status_px;
        }
        if nav_px.is_some() {
            self.nav_inset_override_px = nav_px;
        }
        self
    }

    pub fn scale_gesture_ms(&self, base_ms: u64) -> u64 {
        (base_ms as f64 * self.gesture_multiplier).round() as u64
    }
}

enum ModelMatch {
    Exact(&'static [&'static str]),
    Contains(&'static str),
    Any,
}

impl ModelMatch {
    fn matches(&self, model: &str) -> bool {
        let model = model.trim().to_ascii_uppercase();
        match self {
            ModelMatch::Exact(models) => models.iter().any(|m| model == m.to_ascii_uppercase()),
            ModelMatch::Contains(fragment) => model.contains(&fragment.to_ascii_uppercase()),
            ModelMatch::Any => true,
        }
    }
}

struct ProfileRule {
    vendor: &'static str,
    model: ModelMatch,
    profile: DeviceProfile,
}

const fn profile(
    name: &'static str,
    family: CommandFamily,
    status_inset_dp: u32,
    nav_inset_dp: u32,
    gesture_multiplier: f64,
) -> DeviceProfile {
    DeviceProfile {
        name,
        family,
        status_inset_dp,
        nav_inset_dp,
        gesture_multiplier,
        status_inset_override_px: None,
        nav_inset_override_px: None,
    }
}

pub const GENERIC_PROFILE: DeviceProfile = profile("generic", CommandFamily::Generic, 24, 48, 1.0);

// 依序比對，第一個符合的規則勝出
const PROFILE_TABLE: &[ProfileRule] = &[
    ProfileRule {
        vendor: "lenovo",
        model: ModelMatch::Exact(&["TB-X606F", "TB-X606X"]),
        profile: profile("lenovo-tab-m10-fhd-plus", CommandFamily::Lenovo, 30, 48, 1.4),
    },
    ProfileRule {
        vendor: "lenovo",
        model: ModelMatch::Exact(&["TB-X306X"]),
        profile: profile("lenovo-tab-m8", CommandFamily::Lenovo, 28, 42, 1.4),
    },
    ProfileRule {
        vendor: "lenovo",
        model: ModelMatch::Contains("TB-"),
        profile: profile("lenovo-tab", CommandFamily::Lenovo, 32, 56, 1.4),
    },
    ProfileRule {
        vendor: "lenovo",
        model: ModelMatch::Contains("YT-"),
        profile: profile("lenovo-yoga-tab", CommandFamily::Lenovo, 32, 56, 1.3),
    },
    ProfileRule {
        vendor: "lenovo",
        model: ModelMatch::Any,
        profile: profile("lenovo", CommandFamily::Lenovo, 32, 56, 1.2),
    },
];

pub fn resolve_profile(identity: &DeviceIdentity) -> DeviceProfile {
    PROFILE_TABLE
        .iter()
        .find(|rule| identity.is_vendor(rule.vendor) && rule.model.matches(&identity.model))
        .map(|rule| rule.profile.clone())
        .unwrap_or(GENERIC_PROFILE)
}
