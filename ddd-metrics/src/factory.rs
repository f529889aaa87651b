//! EMF 载荷工厂（EmfPayloadFactory）
//!
//! 命名空间在构造时校验一次，之后作为只读配置；时间戳由注入的
//! `TimestampProvider` 提供。
//!
use crate::clock::TimestampProvider;
use crate::dimension::MetricDimensions;
use crate::error::{MetricsError, MetricsResult};
use crate::metric::BusinessMetric;
use crate::namespace::Namespace;
use crate::payload::EmfPayload;
use crate::validate::validate_metric_name;
use ddd_domain::value_object::ValueObject;
use std::sync::Arc;

#[derive(Clone)]
pub struct EmfPayloadFactory {
    namespace: Namespace,
    clock: Arc<dyn TimestampProvider>,
}

impl EmfPayloadFactory {
    pub fn new(namespace: impl Into<String>, clock: Arc<dyn TimestampProvider>) -> MetricsResult<Self> {
        Ok(Self::with_namespace(Namespace::new(namespace)?, clock))
    }

    pub fn with_namespace(namespace: Namespace, clock: Arc<dyn TimestampProvider>) -> Self {
        Self { namespace, clock }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// 单个指标的载荷
    pub fn create_from_metric<M>(&self, metric: &M) -> MetricsResult<EmfPayload>
    where
        M: BusinessMetric + ?Sized,
    {
        let dimensions = metric.dimensions();
        dimensions.validate()?;
        self.append(self.empty_payload(dimensions), metric)
    }

    /// 一组指标的载荷：共享第一个指标的维度，指标按顺序追加
    pub fn create_from_collection<M>(&self, metrics: &[M]) -> MetricsResult<EmfPayload>
    where
        M: BusinessMetric,
    {
        let Some(first) = metrics.first() else {
            return Err(MetricsError::EmptyCollection);
        };

        let dimensions = first.dimensions();
        dimensions.validate()?;

        metrics
            .iter()
            .try_fold(self.empty_payload(dimensions), |payload, metric| {
                if metric.dimensions() != dimensions {
                    return Err(MetricsError::HeterogeneousDimensions {
                        metric: metric.name().to_string(),
                        expected: dimensions.describe(),
                        found: metric.dimensions().describe(),
                    });
                }
                self.append(payload, metric)
            })
    }

    fn empty_payload(&self, dimensions: &MetricDimensions) -> EmfPayload {
        EmfPayload::new(
            self.clock.current_timestamp(),
            self.namespace.clone(),
            dimensions,
        )
    }

    fn append<M>(&self, payload: EmfPayload, metric: &M) -> MetricsResult<EmfPayload>
    where
        M: BusinessMetric + ?Sized,
    {
        validate_metric_name(metric.name())?;
        payload.with_added_metric(metric.name(), metric.unit(), metric.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::metric::Metric;
    use crate::unit::MetricUnit;

    fn factory() -> EmfPayloadFactory {
        EmfPayloadFactory::new("App/Metrics", Arc::new(FixedClock(42))).unwrap()
    }

    fn metric(name: &str, pairs: &[(&str, &str)]) -> Metric {
        Metric::builder()
            .name(name)
            .value(1)
            .unit(MetricUnit::Count)
            .dimensions(MetricDimensions::from_pairs(pairs.iter().copied()).unwrap())
            .build()
    }

    #[test]
    fn new_rejects_invalid_namespace() {
        assert!(matches!(
            EmfPayloadFactory::new("", Arc::new(FixedClock(0))),
            Err(MetricsError::InvalidNamespace { .. })
        ));
    }

    #[test]
    fn timestamp_comes_from_provider() {
        let payload = factory().create_from_metric(&metric("A", &[])).unwrap();
        assert_eq!(payload.timestamp(), 42);
        assert_eq!(payload.namespace().as_str(), "App/Metrics");
    }

    #[test]
    fn metric_name_is_validated() {
        let bad = metric("bad\u{1}name", &[("Endpoint", "Order")]);
        assert!(matches!(
            factory().create_from_metric(&bad),
            Err(MetricsError::InvalidMetricName { .. })
        ));
    }

    #[test]
    fn heterogeneous_dimensions_fail_fast() {
        let metrics = [
            metric("A", &[("Endpoint", "Order")]),
            metric("B", &[("Endpoint", "Cart")]),
        ];
        match factory().create_from_collection(&metrics) {
            Err(MetricsError::HeterogeneousDimensions {
                metric,
                expected,
                found,
            }) => {
                assert_eq!(metric, "B");
                assert_eq!(expected, vec!["Endpoint=Order"]);
                assert_eq!(found, vec!["Endpoint=Cart"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_metric_names_in_collection_conflict() {
        let metrics = [metric("A", &[]), metric("A", &[])];
        assert!(matches!(
            factory().create_from_collection(&metrics),
            Err(MetricsError::MetricNameConflict { .. })
        ));
    }
}
