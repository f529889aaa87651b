//! 处理器失败与分发错误
//!
use super::handler::HandlerError;
use super::panic_trace::PanicTrace;
use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use thiserror::Error;

/// 失败的具体种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 处理器返回错误，携带其错误类型名
    Error(&'static str),
    /// 处理器 panic
    Panic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(ty) => f.write_str(ty),
            Self::Panic => f.write_str("panic"),
        }
    }
}

/// 单个处理器的失败
#[derive(Debug, Clone, Error)]
#[error("event handler failed: handler={handler}, kind={kind}, reason={message}")]
pub struct HandlerFailure {
    handler: String,
    kind: FailureKind,
    message: String,
    backtrace: String,
}

impl HandlerFailure {
    pub(crate) fn from_error(handler: &str, err: HandlerError) -> Self {
        Self {
            handler: handler.to_string(),
            kind: FailureKind::Error(err.kind()),
            message: err.message(),
            backtrace: err.backtrace().to_string(),
        }
    }

    /// `trace` 为 panic 发生点抓取的调用栈；缺失时退回到当前位置
    pub(crate) fn from_panic(
        handler: &str,
        payload: Box<dyn Any + Send>,
        trace: Option<PanicTrace>,
    ) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "handler panicked with a non-string payload".to_string()
        };

        Self {
            handler: handler.to_string(),
            kind: FailureKind::Panic,
            message,
            backtrace: render_panic_trace(trace),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> &str {
        &self.backtrace
    }
}

fn render_panic_trace(trace: Option<PanicTrace>) -> String {
    match trace {
        Some(PanicTrace {
            location: Some(location),
            backtrace,
        }) => format!("panicked at {location}\n{backtrace}"),
        Some(PanicTrace { backtrace, .. }) => backtrace.to_string(),
        None => Backtrace::force_capture().to_string(),
    }
}

/// 严格分发（`try_dispatch`）的错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    HandlerFailed(HandlerFailure),
    #[error("{} event handlers failed", .0.len())]
    Composite(Vec<HandlerFailure>),
}

impl DispatchError {
    /// 由失败列表构造：无失败返回 None，单个失败不包装为复合错误
    pub fn from_failures(mut failures: Vec<HandlerFailure>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop().map(DispatchError::HandlerFailed),
            _ => Some(DispatchError::Composite(failures)),
        }
    }

    /// 拆开为各个处理器失败
    pub fn into_failures(self) -> Vec<HandlerFailure> {
        match self {
            DispatchError::HandlerFailed(f) => vec![f],
            DispatchError::Composite(fs) => fs,
        }
    }
}
