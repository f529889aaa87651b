//! 领域层统一错误定义
//!
//! 聚焦事件原语往返（解码/类型校验）与事件目录解析的最小必要集合；
//! 事件分发的失败另见 `eventing::DispatchError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化/原语往返 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("missing field: {field}")]
    MissingField { field: String },
    #[error("type mismatch: field={field}, expected={expected}, found={found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid value: field={field}, reason={reason}")]
    InvalidValue { field: String, reason: String },

    // --- 事件目录/分发 ---
    #[error("unknown event: {name}")]
    UnknownEvent { name: String },
    #[error("ambiguous event: name={name} maps to {candidates} types")]
    AmbiguousEvent { name: String, candidates: usize },
    #[error("event type mismatch: handler expects {expected}, got {found}")]
    EventTypeMismatch {
        expected: &'static str,
        found: String,
    },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        DomainError::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<chrono::ParseError> for DomainError {
    fn from(err: chrono::ParseError) -> Self {
        DomainError::InvalidValue {
            field: "occurred_on".to_string(),
            reason: err.to_string(),
        }
    }
}
