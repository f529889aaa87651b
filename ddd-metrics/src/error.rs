//! 指标层统一错误定义
//!
use thiserror::Error;

/// 命名空间违反的具体规则
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceViolation {
    #[error("namespace is empty")]
    Empty,
    #[error("namespace contains only whitespace")]
    WhitespaceOnly,
    #[error("namespace has {len} characters, at most 256 allowed")]
    TooLong { len: usize },
    #[error("namespace contains invalid character {ch:?}")]
    InvalidCharacter { ch: char },
}

/// 维度键/值与指标名违反的具体规则
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextViolation {
    #[error("value is empty")]
    Empty,
    #[error("value contains only whitespace")]
    WhitespaceOnly,
    #[error("value has {len} characters, at most {max} allowed")]
    TooLong { len: usize, max: usize },
    #[error("value contains non-ASCII character {ch:?}")]
    NonAscii { ch: char },
    #[error("value contains control character {ch:?}")]
    ControlCharacter { ch: char },
    #[error("value must not start with ':'")]
    LeadingColon,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MetricsError {
    // --- 校验 ---
    #[error("invalid namespace {namespace:?}: {violation}")]
    InvalidNamespace {
        namespace: String,
        violation: NamespaceViolation,
    },
    #[error("invalid dimension key {key:?}: {violation}")]
    InvalidDimensionKey {
        key: String,
        violation: TextViolation,
    },
    #[error("invalid dimension value {value:?}: {violation}")]
    InvalidDimensionValue {
        value: String,
        violation: TextViolation,
    },
    #[error("invalid metric name {name:?}: {violation}")]
    InvalidMetricName {
        name: String,
        violation: TextViolation,
    },
    #[error("duplicate dimension key: {key}")]
    DuplicateDimensionKey { key: String },
    #[error("cannot build a payload from an empty metric collection")]
    EmptyCollection,
    #[error("metric {metric} has dimensions [{}], expected [{}]", .found.join(", "), .expected.join(", "))]
    HeterogeneousDimensions {
        metric: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("metric name {name} collides with an existing key in the payload")]
    MetricNameConflict { name: String },

    // --- 配置 ---
    #[error("missing setting: {key}")]
    MissingSetting { key: &'static str },

    // --- 输出 ---
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MetricsError {
    /// 是否为构造期的校验错误（同步抛出，永不吞掉）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MetricsError::InvalidNamespace { .. }
                | MetricsError::InvalidDimensionKey { .. }
                | MetricsError::InvalidDimensionValue { .. }
                | MetricsError::InvalidMetricName { .. }
                | MetricsError::DuplicateDimensionKey { .. }
                | MetricsError::EmptyCollection
                | MetricsError::HeterogeneousDimensions { .. }
                | MetricsError::MetricNameConflict { .. }
        )
    }
}

pub type MetricsResult<T> = Result<T, MetricsError>;
