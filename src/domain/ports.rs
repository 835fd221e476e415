use crate::utils::error::Result;
use async_trait::async_trait;

/// 特權命令通道（例如 adb shell）
///
/// `is_alive` 與 `is_authorized` 必須沒有副作用；每次執行只在開始時檢查一次。
/// `execute` 在連線中斷時回傳 `ChannelUnavailable`。
#[async_trait]
pub trait CommandChannel: Send + Sync {
    async fn is_alive(&self) -> bool;

    async fn is_authorized(&self) -> bool;

    async fn execute(&self, command: &str) -> Result<String>;
}

#[async_trait]
impl<C: CommandChannel + ?Sized> CommandChannel for std::sync::Arc<C> {
    async fn is_alive(&self) -> bool {
        (**self).is_alive().await
    }

    async fn is_authorized(&self) -> bool {
        (**self).is_authorized().await
    }

    async fn execute(&self, command: &str) -> Result<String> {
        (**self).execute(command).await
    }
}
