//! 指标命名空间（Namespace）
//!
//! 构造即校验；反序列化同样经过校验。
//!
use crate::error::{MetricsError, MetricsResult};
use crate::validate::validate_namespace;
use ddd_domain::value_object::ValueObject;
use ddd_macros::value_object;
use std::fmt;

#[value_object(default = false)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    pub fn new(namespace: impl Into<String>) -> MetricsResult<Self> {
        let namespace = Self(namespace.into());
        namespace.validate()?;
        Ok(namespace)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Namespace {
    type Error = MetricsError;

    fn validate(&self) -> Result<(), Self::Error> {
        validate_namespace(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = MetricsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
