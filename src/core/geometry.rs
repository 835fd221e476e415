use crate::domain::model::{LayoutBounds, Rect};
use crate::utils::error::{OrchestratorError, Result};

/// 計算三個窗格的目標矩形：上方整列，下方左右平分。
///
/// 純函式，沒有失敗情況；比例是否合理由呼叫者負責（見 [`validate_geometry`]）。
/// 高度與寬度都以整數除法向下取整，奇數寬度時左右寬度最多差 1 px。
pub fn calculate_bounds(
    screen_width: i32,
    screen_height: i32,
    status_inset: i32,
    nav_inset: i32,
    split_ratio: f64,
) -> LayoutBounds {
    let usable_height = screen_height - status_inset - nav_inset;
    let top_height = (f64::from(usable_height) * split_ratio).floor() as i32;
    let bottom_y = status_inset + top_height;
    let bottom_edge = screen_height - nav_inset;
    let mid_x = screen_width / 2;

    LayoutBounds {
        top: Rect::new(0, status_inset, screen_width, status_inset + top_height),
        bottom_left: Rect::new(0, bottom_y, mid_x, bottom_edge),
        bottom_right: Rect::new(mid_x, bottom_y, screen_width, bottom_edge),
    }
}

pub fn validate_geometry(
    screen_width: i32,
    screen_height: i32,
    status_inset: i32,
    nav_inset: i32,
    split_ratio: f64,
) -> Result<()> {
    if screen_width <= 0 {
        return Err(OrchestratorError::Geometry {
            message: format!("screen width must be positive, got {}", screen_width),
        });
    }
    if status_inset < 0 || nav_inset < 0 {
        return Err(OrchestratorError::Geometry {
            message: format!("insets must not be negative ({}/{})", status_inset, nav_inset),
        });
    }
    let usable_height = screen_height - status_inset - nav_inset;
    if usable_height <= 0 {
        return Err(OrchestratorError::Geometry {
            message: format!(
                "no usable height: screen {} minus insets {}+{}",
                screen_height, status_inset, nav_inset
            ),
        });
    }
    if !(split_ratio > 0.0 && split_ratio < 1.0) {
        return Err(OrchestratorError::Geometry {
            message: format!("split ratio {} is outside (0, 1)", split_ratio),
        });
    }
    Ok(())
}
