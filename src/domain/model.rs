use serde::{Deserialize, Serialize};
use std::fmt;

/// 螢幕矩形，right/bottom 為不包含的邊界
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width().max(0)) * i64::from(self.height().max(0))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}][{},{}]", self.left, self.top, self.right, self.bottom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub package: String,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl AppConfig {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            component: None,
            display_name: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.package)
    }

    /// `package/component`，沒有 component 時只用 package
    pub fn target_component(&self) -> String {
        match self.component.as_deref().map(str::trim) {
            Some(component) if !component.is_empty() => format!("{}/{}", self.package, component),
            _ => self.package.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub name: String,
    pub top: AppConfig,
    pub bottom_left: AppConfig,
    pub bottom_right: AppConfig,
    pub split_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            top: AppConfig::new("com.android.chrome")
                .with_component("com.google.android.apps.chrome.Main")
                .with_display_name("Chrome"),
            bottom_left: AppConfig::new("com.whatsapp").with_display_name("WhatsApp"),
            bottom_right: AppConfig::new("com.spotify.client").with_display_name("Spotify"),
            split_ratio: 0.33,
        }
    }
}

impl LayoutConfig {
    /// 啟動與定位的固定順序：左下、右下、上方
    pub fn in_launch_order(&self) -> [(&AppConfig, Position); 3] {
        [
            (&self.bottom_left, Position::BottomLeft),
            (&self.bottom_right, Position::BottomRight),
            (&self.top, Position::Top),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Top,
    BottomLeft,
    BottomRight,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::Top => "Top",
            Position::BottomLeft => "Bottom Left",
            Position::BottomRight => "Bottom Right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBounds {
    pub top: Rect,
    pub bottom_left: Rect,
    pub bottom_right: Rect,
}

impl LayoutBounds {
    pub fn for_position(&self, position: Position) -> Rect {
        match position {
            Position::Top => self.top,
            Position::BottomLeft => self.bottom_left,
            Position::BottomRight => self.bottom_right,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchOutcome {
    pub app: AppConfig,
    pub position: Position,
    pub success: bool,
    pub message: String,
}

/// 定位起點是從視窗傾印解析出來，還是由目標位置推估
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoundsSource {
    Observed,
    Estimated,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionOutcome {
    pub app: AppConfig,
    pub position: Position,
    pub success: bool,
    pub message: String,
    pub bounds_source: BoundsSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub success: bool,
    pub message: String,
    pub launches: Vec<LaunchOutcome>,
    pub positions: Vec<PositionOutcome>,
    pub success_count: usize,
    pub total_operations: usize,
}

impl LayoutResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            launches: Vec::new(),
            positions: Vec::new(),
            success_count: 0,
            total_operations: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_component() {
        let chrome = AppConfig::new("com.android.chrome")
            .with_component("com.google.android.apps.chrome.Main");
        assert_eq!(
            chrome.target_component(),
            "com.android.chrome/com.google.android.apps.chrome.Main"
        );

        let blank = AppConfig::new("com.whatsapp").with_component("  ");
        assert_eq!(blank.target_component(), "com.whatsapp");
        assert_eq!(blank.display_name(), "com.whatsapp");
    }

    #[test]
    fn test_launch_order_is_fixed() {
        let config = LayoutConfig::default();
        let order: Vec<Position> = config.in_launch_order().iter().map(|(_, p)| *p).collect();
        assert_eq!(
            order,
            vec![Position::BottomLeft, Position::BottomRight, Position::Top]
        );
    }

    #[test]
    fn test_rect_intersection_is_exclusive_at_edges() {
        let a = Rect::new(0, 0, 960, 396);
        let b = Rect::new(0, 396, 960, 1200);
        let c = Rect::new(959, 395, 1000, 400);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert_eq!(a.area(), 960 * 396);
    }
}
