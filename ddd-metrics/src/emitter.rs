//! EMF 输出（MetricsEmitter）
//!
//! 每次输出一行 JSON（`\n` 结尾）并 flush。输出是尽力而为的：
//! 序列化或 I/O 失败交给 `EmitErrorReporter`，本次输出被跳过，
//! 错误不向调用方传播；校验错误则同步返回。
//!
use crate::clock::TimestampProvider;
use crate::config::MetricsConfig;
use crate::error::{MetricsError, MetricsResult};
use crate::factory::EmfPayloadFactory;
use crate::metric::BusinessMetric;
use crate::payload::EmfPayload;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// 输出失败的上报协作者
pub trait EmitErrorReporter: Send + Sync {
    fn report(&self, payload: &EmfPayload, error: &MetricsError);
}

/// 基于 `tracing` 的默认实现
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitErrorReporter;

impl EmitErrorReporter for TracingEmitErrorReporter {
    fn report(&self, payload: &EmfPayload, error: &MetricsError) {
        let metrics: Vec<&str> = payload
            .metric_definitions()
            .iter()
            .map(|d| d.name())
            .collect();
        tracing::error!(
            namespace = %payload.namespace(),
            metrics = ?metrics,
            error = %error,
            "metrics emission skipped"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitStatus {
    Emitted,
    Skipped,
}

pub struct MetricsEmitter {
    factory: EmfPayloadFactory,
    sink: Mutex<Box<dyn Write + Send>>,
    reporter: Arc<dyn EmitErrorReporter>,
}

impl MetricsEmitter {
    pub fn new<W>(factory: EmfPayloadFactory, sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            factory,
            sink: Mutex::new(Box::new(sink)),
            reporter: Arc::new(TracingEmitErrorReporter),
        }
    }

    /// 按配置打开输出目标
    pub fn from_config(config: &MetricsConfig, clock: Arc<dyn TimestampProvider>) -> MetricsResult<Self> {
        let factory = EmfPayloadFactory::with_namespace(config.namespace().clone(), clock);
        Ok(Self {
            factory,
            sink: Mutex::new(config.sink().open()?),
            reporter: Arc::new(TracingEmitErrorReporter),
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn EmitErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn factory(&self) -> &EmfPayloadFactory {
        &self.factory
    }

    /// 输出一个载荷；失败只上报
    pub fn emit(&self, payload: &EmfPayload) -> EmitStatus {
        match self.try_emit(payload) {
            Ok(()) => EmitStatus::Emitted,
            Err(err) => {
                self.reporter.report(payload, &err);
                EmitStatus::Skipped
            }
        }
    }

    /// 输出一个载荷并返回序列化或 I/O 错误
    pub fn try_emit(&self, payload: &EmfPayload) -> MetricsResult<()> {
        let mut line = payload.to_json()?;
        line.push('\n');

        let mut sink = self.lock_sink();
        sink.write_all(line.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// 构造并输出单个指标；校验错误同步返回
    pub fn emit_metric<M>(&self, metric: &M) -> MetricsResult<EmitStatus>
    where
        M: BusinessMetric + ?Sized,
    {
        let payload = self.factory.create_from_metric(metric)?;
        Ok(self.emit(&payload))
    }

    /// 构造并输出一组指标（共享维度）；校验错误同步返回
    pub fn emit_all<M>(&self, metrics: &[M]) -> MetricsResult<EmitStatus>
    where
        M: BusinessMetric,
    {
        let payload = self.factory.create_from_collection(metrics)?;
        Ok(self.emit(&payload))
    }

    // 写入过程中 panic 不影响后续输出
    fn lock_sink(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
