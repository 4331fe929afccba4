//! 错误定义模块

use thiserror::Error;

/// 排队系统统一错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("记录未找到: {0}")]
    NotFound(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),

    #[error("无效状态转换: 从 {from} 到 {to}")]
    InvalidStateTransition { from: String, to: String },
}

/// 排队系统统一结果类型
pub type Result<T> = std::result::Result<T, QueueError>;
