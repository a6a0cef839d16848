use thiserror::Error;

use crate::config::ConfigError;
use crate::llm_client::LlmError;

/// Application-level error type.
///
/// Every variant is terminal for the current generation step. The bridge
/// reports `error_type()` and `user_message()`; the CLI prints the message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable classification string for machine callers.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Input(_) => "input_error",
            AppError::Llm(LlmError::Auth { .. }) => "auth_error",
            AppError::Llm(LlmError::RateLimited(_)) => "rate_limit_error",
            AppError::Llm(LlmError::Timeout) => "timeout_error",
            AppError::Llm(_) => "api_error",
            AppError::Io(_) => "io_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// User-facing message, one wording per bucket. Callers do the logging.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(ConfigError::Missing(var)) => {
                format!("{var} 环境变量未设置。请执行：export {var}='your-api-key'")
            }
            AppError::Input(msg) => msg.clone(),
            AppError::Llm(LlmError::Auth { .. }) => {
                "API Key 无效或已过期。请检查 ARK_API_KEY。".to_string()
            }
            AppError::Llm(LlmError::RateLimited(_)) => {
                "API 请求频率超限，请稍后重试。".to_string()
            }
            AppError::Llm(LlmError::Timeout) => "API 请求超时，请重试。".to_string(),
            AppError::Llm(e) => format!("调用豆包 API 失败：{e}"),
            AppError::Io(e) => format!("文件读写失败：{e}"),
            AppError::Internal(e) => format!("内部错误：{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_bucket_has_distinct_type() {
        let errors = [
            AppError::Config(ConfigError::Missing("ARK_API_KEY")),
            AppError::Input("bad".to_string()),
            AppError::Llm(LlmError::Auth {
                status: 401,
                message: String::new(),
            }),
            AppError::Llm(LlmError::RateLimited(String::new())),
            AppError::Llm(LlmError::Timeout),
            AppError::Llm(LlmError::EmptyContent),
        ];
        let types: std::collections::HashSet<_> = errors.iter().map(|e| e.error_type()).collect();
        assert_eq!(types.len(), errors.len());
    }

    #[test]
    fn test_api_failures_share_api_bucket() {
        let err = AppError::Llm(LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.error_type(), "api_error");
        assert!(err.user_message().contains("boom"));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_user_message_does_not_log() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || sink.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            AppError::Llm(LlmError::EmptyContent).user_message();
            AppError::Internal(anyhow::anyhow!("boom")).user_message();
        });
        assert!(captured.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_key_message_names_variable() {
        let err = AppError::from(ConfigError::Missing("ARK_API_KEY"));
        assert_eq!(err.error_type(), "config_error");
        assert!(err.user_message().contains("export ARK_API_KEY"));
    }
}
