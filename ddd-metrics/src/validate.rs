//! EMF 校验
//!
//! CloudWatch 对命名空间、维度与指标名的约束；违反即返回
//! 指明具体规则的校验错误。
//!
use crate::error::{MetricsError, MetricsResult, NamespaceViolation, TextViolation};

pub const NAMESPACE_MAX_LEN: usize = 256;
pub const DIMENSION_KEY_MAX_LEN: usize = 255;
pub const DIMENSION_VALUE_MAX_LEN: usize = 1024;
pub const METRIC_NAME_MAX_LEN: usize = 255;

/// 命名空间允许的字符：`[A-Za-z0-9._#:/-]`
pub fn is_namespace_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '#' | ':' | '/' | '-')
}

pub fn validate_namespace(namespace: &str) -> MetricsResult<()> {
    namespace_violation(namespace).map_or(Ok(()), |violation| {
        Err(MetricsError::InvalidNamespace {
            namespace: namespace.to_string(),
            violation,
        })
    })
}

fn namespace_violation(namespace: &str) -> Option<NamespaceViolation> {
    if namespace.is_empty() {
        return Some(NamespaceViolation::Empty);
    }
    if namespace.trim().is_empty() {
        return Some(NamespaceViolation::WhitespaceOnly);
    }
    let len = namespace.chars().count();
    if len > NAMESPACE_MAX_LEN {
        return Some(NamespaceViolation::TooLong { len });
    }
    namespace
        .chars()
        .find(|ch| !is_namespace_char(*ch))
        .map(|ch| NamespaceViolation::InvalidCharacter { ch })
}

pub fn validate_dimension_key(key: &str) -> MetricsResult<()> {
    let violation = text_violation(key, DIMENSION_KEY_MAX_LEN, true).or_else(|| {
        key.starts_with(':').then_some(TextViolation::LeadingColon)
    });
    violation.map_or(Ok(()), |violation| {
        Err(MetricsError::InvalidDimensionKey {
            key: key.to_string(),
            violation,
        })
    })
}

pub fn validate_dimension_value(value: &str) -> MetricsResult<()> {
    text_violation(value, DIMENSION_VALUE_MAX_LEN, true).map_or(Ok(()), |violation| {
        Err(MetricsError::InvalidDimensionValue {
            value: value.to_string(),
            violation,
        })
    })
}

pub fn validate_metric_name(name: &str) -> MetricsResult<()> {
    text_violation(name, METRIC_NAME_MAX_LEN, false).map_or(Ok(()), |violation| {
        Err(MetricsError::InvalidMetricName {
            name: name.to_string(),
            violation,
        })
    })
}

// 控制字符：0x00–0x1F 与 0x7F
fn text_violation(text: &str, max: usize, ascii_only: bool) -> Option<TextViolation> {
    if text.is_empty() {
        return Some(TextViolation::Empty);
    }
    if text.trim().is_empty() {
        return Some(TextViolation::WhitespaceOnly);
    }
    for ch in text.chars() {
        if ascii_only && !ch.is_ascii() {
            return Some(TextViolation::NonAscii { ch });
        }
        if ch.is_ascii_control() {
            return Some(TextViolation::ControlCharacter { ch });
        }
    }
    let len = text.chars().count();
    (len > max).then_some(TextViolation::TooLong { len, max })
}
