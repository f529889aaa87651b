//! 事件原语（Primitive）
//!
//! 事件跨越传输/持久化边界时只保留原语形态：`ToPrimitives` 产出
//! `字段名 -> Primitive` 的有序映射，`FromPrimitives` 再逐字段还原。
//!
use crate::error::{DomainError, DomainResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 事件载荷的原语映射（键有序，便于比较与日志输出）
pub type Primitives = BTreeMap<String, Primitive>;

/// 原语值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Primitive {
    /// 原语种类名（用于类型不匹配的错误信息）
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Bool(_) => "bool",
            Primitive::Int(_) => "int",
            Primitive::Float(_) => "float",
            Primitive::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Primitive::Null)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::Text(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::Text(value)
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Int(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Primitive::Float(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Bool(value)
    }
}

/// 可作为事件载荷字段的类型：与 `Primitive` 之间无损往返
pub trait PrimitiveField: Sized {
    fn to_primitive(&self) -> Primitive;

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self>;

    /// 字段缺失时的取值，默认视为错误
    fn when_missing(field: &str) -> DomainResult<Self> {
        Err(DomainError::missing_field(field))
    }
}

/// 从原语映射中取出并还原一个字段（供 `#[domain_event]` 生成代码使用）
pub fn take_field<T: PrimitiveField>(body: &mut Primitives, field: &str) -> DomainResult<T> {
    match body.remove(field) {
        Some(value) => T::from_primitive(field, value),
        None => T::when_missing(field),
    }
}

fn mismatch(field: &str, expected: &'static str, found: &Primitive) -> DomainError {
    DomainError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}

impl PrimitiveField for String {
    fn to_primitive(&self) -> Primitive {
        Primitive::Text(self.clone())
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        match value {
            Primitive::Text(s) => Ok(s),
            other => Err(mismatch(field, "text", &other)),
        }
    }
}

impl PrimitiveField for bool {
    fn to_primitive(&self) -> Primitive {
        Primitive::Bool(*self)
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        match value {
            Primitive::Bool(b) => Ok(b),
            other => Err(mismatch(field, "bool", &other)),
        }
    }
}

impl PrimitiveField for i64 {
    fn to_primitive(&self) -> Primitive {
        Primitive::Int(*self)
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        match value {
            Primitive::Int(n) => Ok(n),
            other => Err(mismatch(field, "int", &other)),
        }
    }
}

impl PrimitiveField for i32 {
    fn to_primitive(&self) -> Primitive {
        Primitive::Int(i64::from(*self))
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        let n = i64::from_primitive(field, value)?;
        i32::try_from(n).map_err(|e| DomainError::invalid_value(field, e.to_string()))
    }
}

impl PrimitiveField for u32 {
    fn to_primitive(&self) -> Primitive {
        Primitive::Int(i64::from(*self))
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        let n = i64::from_primitive(field, value)?;
        u32::try_from(n).map_err(|e| DomainError::invalid_value(field, e.to_string()))
    }
}

impl PrimitiveField for f64 {
    fn to_primitive(&self) -> Primitive {
        Primitive::Float(*self)
    }

    // 整数原语也接受为浮点（JSON 中 `5` 与 `5.0` 不做区分）
    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        match value {
            Primitive::Float(f) => Ok(f),
            Primitive::Int(n) => Ok(n as f64),
            other => Err(mismatch(field, "float", &other)),
        }
    }
}

impl PrimitiveField for Uuid {
    fn to_primitive(&self) -> Primitive {
        Primitive::Text(self.to_string())
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        let s = String::from_primitive(field, value)?;
        Uuid::parse_str(&s).map_err(|e| DomainError::invalid_value(field, e.to_string()))
    }
}

impl PrimitiveField for DateTime<Utc> {
    fn to_primitive(&self) -> Primitive {
        Primitive::Text(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        let s = String::from_primitive(field, value)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DomainError::invalid_value(field, e.to_string()))
    }
}

impl<T: PrimitiveField> PrimitiveField for Option<T> {
    fn to_primitive(&self) -> Primitive {
        match self {
            Some(v) => v.to_primitive(),
            None => Primitive::Null,
        }
    }

    fn from_primitive(field: &str, value: Primitive) -> DomainResult<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_primitive(field, value).map(Some)
    }

    fn when_missing(_field: &str) -> DomainResult<Self> {
        Ok(None)
    }
}
