//! 统一错误定义
//!
//! 聚焦载荷序列化、载荷提取与通知中心三类失败，
//! 便于订阅端与投递端统一转换为 `NotifyError`。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NotifyError {
    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("payload error: channel={name}, key={key}, reason={reason}")]
    Payload {
        name: String,
        key: String,
        reason: String,
    },

    // --- 通知中心 ---
    #[error("notify center error: {reason}")]
    Center { reason: String },
    #[error("notify center closed: channel={name}")]
    Closed { name: String },
}

impl NotifyError {
    pub fn center(reason: impl Into<String>) -> Self {
        Self::Center {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type NotifyResult<T> = Result<T, NotifyError>;
