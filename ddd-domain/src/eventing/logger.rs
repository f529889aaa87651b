//! 失败日志（ErrorLogger）
//!
//! 弹性装饰器对每个失败处理器输出一条结构化错误记录；
//! 默认实现写入 `tracing`，测试或其他基础设施可替换。
//!
use super::failure::HandlerFailure;
use crate::domain_event::{DomainEvent, Primitives};
use serde::Serialize;

/// 失败记录的上下文字段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureContext {
    pub handler: String,
    pub event_name: String,
    pub event_id: String,
    pub error_message: String,
    pub error_kind: String,
    pub backtrace: String,
    pub occurred_on: String,
    pub payload: Primitives,
}

impl FailureContext {
    pub fn new(failure: &HandlerFailure, event: &dyn DomainEvent) -> Self {
        Self {
            handler: failure.handler().to_string(),
            event_name: event.event_name().to_string(),
            event_id: event.event_id().to_string(),
            error_message: failure.message().to_string(),
            error_kind: failure.kind().to_string(),
            backtrace: failure.backtrace().to_string(),
            occurred_on: event.occurred_on().to_string(),
            payload: event.to_primitives(),
        }
    }
}

/// 错误日志协作者
pub trait ErrorLogger: Send + Sync {
    fn error(&self, message: &str, context: &FailureContext);
}

/// 基于 `tracing` 的默认实现
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn error(&self, message: &str, context: &FailureContext) {
        let payload = serde_json::to_string(&context.payload)
            .unwrap_or_else(|e| format!("<unserializable payload: {e}>"));

        tracing::error!(
            handler = %context.handler,
            event_name = %context.event_name,
            event_id = %context.event_id,
            error.message = %context.error_message,
            error.kind = %context.error_kind,
            backtrace = %context.backtrace,
            occurred_on = %context.occurred_on,
            payload = %payload,
            "{message}"
        );
    }
}
