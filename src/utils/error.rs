use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Privileged channel unavailable: {message}")]
    ChannelUnavailable { message: String },

    #[error("Preflight failed: {reason}")]
    PreflightFailed { reason: String },

    #[error("Command '{command}' failed: {message}")]
    Transport { command: String, message: String },

    #[error("Command '{command}' timed out after {after_ms}ms")]
    Timeout { command: String, after_ms: u64 },

    #[error("Invalid layout geometry: {message}")]
    Geometry { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Device,
    Transport,
    Layout,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OrchestratorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ChannelUnavailable { .. } | Self::PreflightFailed { .. } => ErrorCategory::Device,
            Self::Transport { .. } | Self::Timeout { .. } => ErrorCategory::Transport,
            Self::Geometry { .. } => ErrorCategory::Layout,
            Self::ConfigError { .. }
            | Self::InvalidConfigValue { .. }
            | Self::TomlParse(_) => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一命令失敗可由下一個候選命令恢復
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Layout | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Device | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ChannelUnavailable { .. } => {
                "Cannot reach the device through adb".to_string()
            }
            Self::PreflightFailed { reason } => format!("Device not ready: {}", reason),
            Self::Transport { command, .. } => format!("Device rejected command: {}", command),
            Self::Timeout { command, after_ms } => {
                format!("Device did not answer '{}' within {}ms", command, after_ms)
            }
            Self::Geometry { message } => format!("Layout does not fit the screen: {}", message),
            Self::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Device => {
                "Connect the tablet, enable USB debugging and accept the authorization prompt"
            }
            ErrorCategory::Transport => "Retry the run; the device may still be settling",
            ErrorCategory::Layout => "Use a split ratio between 0 and 1 and check the screen insets",
            ErrorCategory::Configuration => "Check the layout file against the documented keys",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_errors_are_critical() {
        let err = OrchestratorError::PreflightFailed {
            reason: "unauthorized".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Device);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_timeout_is_recoverable_transport() {
        let err = OrchestratorError::Timeout {
            command: "ps -A -o NAME".to_string(),
            after_ms: 10_000,
        };
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("10000ms"));
    }
}
