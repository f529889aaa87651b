//! 指标维度（MetricDimension / MetricDimensions）
//!
//! 维度在构造时校验键与值；维度集合保持插入顺序且键唯一，
//! 其顺序即 EMF 中 `Dimensions` 的顺序。
//!
use crate::error::{MetricsError, MetricsResult};
use crate::validate::{validate_dimension_key, validate_dimension_value};
use ddd_domain::value_object::ValueObject;
use ddd_macros::value_object;

#[value_object(default = false)]
#[derive(Hash)]
pub struct MetricDimension {
    key: String,
    value: String,
}

impl MetricDimension {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> MetricsResult<Self> {
        let dimension = Self {
            key: key.into(),
            value: value.into(),
        };
        dimension.validate()?;
        Ok(dimension)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl ValueObject for MetricDimension {
    type Error = MetricsError;

    fn validate(&self) -> Result<(), Self::Error> {
        validate_dimension_key(&self.key)?;
        validate_dimension_value(&self.value)
    }
}

/// 有序、键唯一的维度集合
#[value_object]
pub struct MetricDimensions(Vec<MetricDimension>);

impl MetricDimensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由键值对构造；逐个校验，重复键失败
    pub fn from_pairs<I, K, V>(pairs: I) -> MetricsResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |dims, (key, value)| dims.with(key, value))
    }

    /// 追加一个维度并返回新的集合
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> MetricsResult<Self> {
        self.push(MetricDimension::new(key, value)?)?;
        Ok(self)
    }

    pub fn push(&mut self, dimension: MetricDimension) -> MetricsResult<()> {
        if self.get(dimension.key()).is_some() {
            return Err(MetricsError::DuplicateDimensionKey {
                key: dimension.key,
            });
        }
        self.0.push(dimension);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|d| d.key == key)
            .map(MetricDimension::value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(MetricDimension::key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricDimension> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `key=value` 形式，用于错误信息
    pub(crate) fn describe(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|d| format!("{}={}", d.key, d.value))
            .collect()
    }
}

impl ValueObject for MetricDimensions {
    type Error = MetricsError;

    fn validate(&self) -> Result<(), Self::Error> {
        let mut seen = std::collections::HashSet::new();
        for dimension in &self.0 {
            dimension.validate()?;
            if !seen.insert(dimension.key()) {
                return Err(MetricsError::DuplicateDimensionKey {
                    key: dimension.key.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MetricDimensions {
    type Item = &'a MetricDimension;
    type IntoIter = std::slice::Iter<'a, MetricDimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
