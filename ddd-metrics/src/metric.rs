//! 业务指标（BusinessMetric）
//!
use crate::dimension::MetricDimensions;
use crate::error::MetricsResult;
use crate::unit::MetricUnit;
use crate::validate::validate_metric_name;
use bon::Builder;
use serde::{Serialize, Serializer};

/// 指标值：整数按整数输出（`5` 而非 `5.0`）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Int(n) => *n as f64,
            MetricValue::Float(f) => *f,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            MetricValue::Int(_) => true,
            MetricValue::Float(f) => f.is_finite(),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Int(n) => serializer.serialize_i64(*n),
            MetricValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            MetricValue::Float(f) => Err(serde::ser::Error::custom(format_args!(
                "metric value {f} is not a finite number"
            ))),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Int(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Int(i64::from(value))
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        MetricValue::Int(i64::from(value))
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

/// 业务指标：名称、值、单位与维度
pub trait BusinessMetric {
    fn name(&self) -> &str;

    fn value(&self) -> MetricValue;

    fn unit(&self) -> MetricUnit;

    fn dimensions(&self) -> &MetricDimensions;
}

impl<T: BusinessMetric + ?Sized> BusinessMetric for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn value(&self) -> MetricValue {
        (**self).value()
    }

    fn unit(&self) -> MetricUnit {
        (**self).unit()
    }

    fn dimensions(&self) -> &MetricDimensions {
        (**self).dimensions()
    }
}

impl<T: BusinessMetric + ?Sized> BusinessMetric for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn value(&self) -> MetricValue {
        (**self).value()
    }

    fn unit(&self) -> MetricUnit {
        (**self).unit()
    }

    fn dimensions(&self) -> &MetricDimensions {
        (**self).dimensions()
    }
}

/// 通用的业务指标值
///
/// ```
/// use ddd_metrics::dimension::MetricDimensions;
/// use ddd_metrics::metric::{BusinessMetric, Metric};
/// use ddd_metrics::unit::MetricUnit;
///
/// let metric = Metric::builder()
///     .name("OrdersPlaced")
///     .value(5)
///     .unit(MetricUnit::Count)
///     .dimensions(MetricDimensions::from_pairs([("Endpoint", "Order")]).unwrap())
///     .build();
/// assert_eq!(metric.name(), "OrdersPlaced");
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Metric {
    #[builder(into)]
    name: String,
    #[builder(into)]
    value: MetricValue,
    #[builder(default)]
    unit: MetricUnit,
    #[builder(default)]
    dimensions: MetricDimensions,
}

impl Metric {
    /// 构造并校验指标名
    pub fn try_new(
        name: impl Into<String>,
        value: impl Into<MetricValue>,
        unit: MetricUnit,
        dimensions: MetricDimensions,
    ) -> MetricsResult<Self> {
        let name = name.into();
        validate_metric_name(&name)?;
        Ok(Self {
            name,
            value: value.into(),
            unit,
            dimensions,
        })
    }
}

impl BusinessMetric for Metric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> MetricValue {
        self.value
    }

    fn unit(&self) -> MetricUnit {
        self.unit
    }

    fn dimensions(&self) -> &MetricDimensions {
        &self.dimensions
    }
}
