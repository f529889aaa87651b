//! 弹性装饰器（ResilienceDecorator）
//!
//! 副作用处理器（缓存失效、指标、通知等）的失败不得中断主业务流程：
//! - 成功时透明透传，无任何副作用；
//! - 失败（返回错误或 panic）时捕获、按失败处理器逐条记录日志，绝不向调用方传播；
//! - 复合失败拆开后逐条记录。
//!
use super::failure::{DispatchError, HandlerFailure};
use super::handler::ErasedEventHandler;
use super::logger::{ErrorLogger, FailureContext, TracingErrorLogger};
use super::panic_trace;
use crate::domain_event::DomainEvent;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

const FAILURE_MESSAGE: &str = "event handler failed";

/// 已记录日志的失败
#[derive(Debug, Clone)]
pub struct LoggedFailure {
    failure: HandlerFailure,
}

impl LoggedFailure {
    pub fn failure(&self) -> &HandlerFailure {
        &self.failure
    }

    pub fn handler(&self) -> &str {
        self.failure.handler()
    }
}

/// 调用处理器并把错误与 panic 统一转换为 `HandlerFailure`（不记录日志）
///
/// panic 的调用栈在发生点抓取，默认 hook 的文本输出被结构化失败日志取代。
pub(crate) fn invoke(
    handler: &dyn ErasedEventHandler,
    event: &dyn DomainEvent,
) -> Result<(), HandlerFailure> {
    let outcome =
        panic_trace::guarded(|| panic::catch_unwind(AssertUnwindSafe(|| handler.call(event))));
    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(HandlerFailure::from_error(handler.handler_name(), err)),
        Err(payload) => Err(HandlerFailure::from_panic(
            handler.handler_name(),
            payload,
            panic_trace::take(),
        )),
    }
}

#[derive(Clone)]
pub struct ResilienceDecorator {
    logger: Arc<dyn ErrorLogger>,
}

impl Default for ResilienceDecorator {
    fn default() -> Self {
        Self::new(Arc::new(TracingErrorLogger))
    }
}

impl ResilienceDecorator {
    pub fn new(logger: Arc<dyn ErrorLogger>) -> Self {
        Self { logger }
    }

    /// 包装一次处理器调用
    pub fn execute(
        &self,
        handler: &dyn ErasedEventHandler,
        event: &dyn DomainEvent,
    ) -> Result<(), LoggedFailure> {
        invoke(handler, event).map_err(|failure| self.report(event, failure))
    }

    /// 吸收一次严格分发的错误：复合错误拆开后逐条记录
    pub fn absorb(&self, event: &dyn DomainEvent, error: DispatchError) -> Vec<LoggedFailure> {
        error
            .into_failures()
            .into_iter()
            .map(|failure| self.report(event, failure))
            .collect()
    }

    fn report(&self, event: &dyn DomainEvent, failure: HandlerFailure) -> LoggedFailure {
        let context = FailureContext::new(&failure, event);
        self.logger.error(FAILURE_MESSAGE, &context);
        LoggedFailure { failure }
    }
}
