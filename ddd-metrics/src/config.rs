//! 指标配置（MetricsConfig）
//!
//! 命名空间与输出目标均为显式配置；可由环境变量构造：
//! - `METRICS_NAMESPACE`：必填；
//! - `METRICS_SINK`：`stdout`（默认）、`stderr` 或文件路径（追加写入）。
//!
use crate::error::{MetricsError, MetricsResult};
use crate::namespace::Namespace;
use bon::Builder;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

pub const NAMESPACE_ENV: &str = "METRICS_NAMESPACE";
pub const SINK_ENV: &str = "METRICS_SINK";

/// EMF 行的输出目标
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MetricsSink {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

impl MetricsSink {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "stdout" | "-" => MetricsSink::Stdout,
            "stderr" => MetricsSink::Stderr,
            path => MetricsSink::File(PathBuf::from(path)),
        }
    }

    /// 打开输出目标
    pub fn open(&self) -> MetricsResult<Box<dyn Write + Send>> {
        let writer: Box<dyn Write + Send> = match self {
            MetricsSink::Stdout => Box::new(io::stdout()),
            MetricsSink::Stderr => Box::new(io::stderr()),
            MetricsSink::File(path) => Box::new(OpenOptions::new().create(true).append(true).open(path)?),
        };
        Ok(writer)
    }
}

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct MetricsConfig {
    namespace: Namespace,
    #[builder(default)]
    sink: MetricsSink,
}

impl MetricsConfig {
    /// 从进程环境读取
    pub fn from_env() -> MetricsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取
    pub fn from_lookup<F>(lookup: F) -> MetricsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup(NAMESPACE_ENV).ok_or(MetricsError::MissingSetting { key: NAMESPACE_ENV })?;
        let sink = lookup(SINK_ENV)
            .map(|raw| MetricsSink::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            namespace: Namespace::new(namespace)?,
            sink,
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn sink(&self) -> &MetricsSink {
        &self.sink
    }
}
