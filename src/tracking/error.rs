//! 追踪模块统一错误处理

use thiserror::Error;

use crate::core::MailtrackError;

/// 追踪错误类型
#[derive(Error, Debug, Clone)]
pub enum TrackingError {
    /// HTML 解析错误
    #[error("HTML 解析错误: {0}")]
    Parse(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialize(String),
}

/// 从 MailtrackError 转换
impl From<MailtrackError> for TrackingError {
    fn from(error: MailtrackError) -> Self {
        TrackingError::Parse(error.to_string())
    }
}

/// 转换为 MailtrackError（向后兼容）
impl From<TrackingError> for MailtrackError {
    fn from(error: TrackingError) -> Self {
        MailtrackError::new(&error.to_string())
    }
}

/// 错误结果类型别名
pub type TrackingResult<T> = Result<T, TrackingError>;
