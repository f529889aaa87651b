//! 业务指标与 CloudWatch EMF 输出（ddd-metrics）
//!
//! 将业务指标编码为 CloudWatch Embedded Metric Format（EMF）的 JSON 行：
//! - 值对象：`MetricUnit`、`MetricDimension` / `MetricDimensions`、`Namespace`
//! - 校验（`validate`）：命名空间、维度键/值与指标名在构造时即失败
//! - 载荷（`payload`）与工厂（`factory`）：持久化的 `EmfPayload`，序列化顺序固定
//! - 输出（`emitter`）：每次输出一行 JSON，序列化或 I/O 失败只上报、不抛出
//!
//! 命名空间是显式配置（`MetricsConfig`），不存在全局状态。
//!
pub mod clock;
pub mod config;
pub mod dimension;
pub mod emitter;
pub mod error;
pub mod factory;
pub mod metric;
pub mod namespace;
pub mod payload;
pub mod unit;
pub mod validate;
