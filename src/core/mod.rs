pub mod geometry;
pub mod launch;
pub mod orchestrator;
pub mod position;

pub use crate::domain::model::{LayoutBounds, LayoutConfig, LayoutResult, Rect};
pub use crate::domain::ports::CommandChannel;
pub use crate::utils::error::Result;
