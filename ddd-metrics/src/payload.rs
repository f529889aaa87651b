//! EMF 载荷（EmfPayload）
//!
//! 序列化形态：
//!
//! ```text
//! {"_aws":{"Timestamp":<ms>,"CloudWatchMetrics":[{"Namespace":..,"Dimensions":[[..]],"Metrics":[{"Name":..,"Unit":..}]}]},
//!  <dimension>:<value>,...,<metric>:<value>,...}
//! ```
//!
//! 顶层依次为 `_aws`、各维度（按维度顺序）、各指标（按追加顺序）。
//! 载荷是持久值：`with_added_metric` 返回新载荷，原载荷不变。
//!
use crate::dimension::MetricDimensions;
use crate::error::{MetricsError, MetricsResult};
use crate::metric::MetricValue;
use crate::namespace::Namespace;
use crate::unit::MetricUnit;
use crate::validate::validate_metric_name;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

const AWS_KEY: &str = "_aws";

/// 指标定义（`{"Name":..,"Unit":..}`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDefinition {
    name: String,
    unit: MetricUnit,
}

impl MetricDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> MetricUnit {
        self.unit
    }
}

#[derive(Debug, Clone, PartialEq)]
struct AwsMetadata {
    timestamp: i64,
    namespace: Namespace,
    dimension_keys: Vec<String>,
    metric_definitions: Vec<MetricDefinition>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct MetricDirective<'a> {
    namespace: &'a str,
    dimensions: [&'a [String]; 1],
    metrics: &'a [MetricDefinition],
}

impl Serialize for AwsMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let directive = MetricDirective {
            namespace: self.namespace.as_str(),
            dimensions: [self.dimension_keys.as_slice()],
            metrics: &self.metric_definitions,
        };
        let mut st = serializer.serialize_struct("AwsMetadata", 2)?;
        st.serialize_field("Timestamp", &self.timestamp)?;
        st.serialize_field("CloudWatchMetrics", &[directive])?;
        st.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmfPayload {
    aws: AwsMetadata,
    dimension_values: Vec<(String, String)>,
    metric_values: Vec<(String, MetricValue)>,
}

impl EmfPayload {
    /// 不含指标的载荷
    pub fn new(timestamp: i64, namespace: Namespace, dimensions: &MetricDimensions) -> Self {
        Self {
            aws: AwsMetadata {
                timestamp,
                namespace,
                dimension_keys: dimensions.keys().map(str::to_string).collect(),
                metric_definitions: Vec::new(),
            },
            dimension_values: dimensions
                .iter()
                .map(|d| (d.key().to_string(), d.value().to_string()))
                .collect(),
            metric_values: Vec::new(),
        }
    }

    /// 追加一个指标，返回新的载荷
    ///
    /// 指标名与维度键、已有指标名或 `_aws` 重复时失败（会产生重复的 JSON 键）。
    pub fn with_added_metric(
        &self,
        name: impl Into<String>,
        unit: MetricUnit,
        value: MetricValue,
    ) -> MetricsResult<Self> {
        let name = name.into();
        validate_metric_name(&name)?;
        if self.has_key(&name) {
            return Err(MetricsError::MetricNameConflict { name });
        }

        let mut next = self.clone();
        next.aws.metric_definitions.push(MetricDefinition {
            name: name.clone(),
            unit,
        });
        next.metric_values.push((name, value));
        Ok(next)
    }

    fn has_key(&self, name: &str) -> bool {
        name == AWS_KEY
            || self.aws.dimension_keys.iter().any(|k| k == name)
            || self.metric_values.iter().any(|(k, _)| k == name)
    }

    pub fn timestamp(&self) -> i64 {
        self.aws.timestamp
    }

    pub fn namespace(&self) -> &Namespace {
        &self.aws.namespace
    }

    pub fn dimension_keys(&self) -> &[String] {
        &self.aws.dimension_keys
    }

    pub fn metric_definitions(&self) -> &[MetricDefinition] {
        &self.aws.metric_definitions
    }

    pub fn dimension_values(&self) -> &[(String, String)] {
        &self.dimension_values
    }

    pub fn metric_values(&self) -> &[(String, MetricValue)] {
        &self.metric_values
    }

    /// 单行 JSON
    pub fn to_json(&self) -> MetricsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for EmfPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.dimension_values.len() + self.metric_values.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(AWS_KEY, &self.aws)?;
        for (key, value) in &self.dimension_values {
            map.serialize_entry(key, value)?;
        }
        for (name, value) in &self.metric_values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
