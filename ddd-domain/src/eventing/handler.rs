//! 事件处理器（EventHandler）
//!
//! 处理器以两种方式声明其唯一的输入事件类型：
//! - `EventHandler<E>`：泛型参数即输入类型，编译期确定；
//! - `NamedEventHandler`：以事件名声明，启动时经事件目录解析为具体类型。
//!
//! 二者在注册时被擦除为 `ErasedEventHandler`，由分发器统一调用。
//!
use crate::domain_event::{DomainEvent, EventKey, downcast_event};
use crate::error::DomainError;
use std::any::type_name;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 处理某一具体类型事件的处理器
pub trait EventHandler<E>: Send + Sync
where
    E: DomainEvent,
{
    /// 任何可转换为 `anyhow::Error` 的错误，包括 `anyhow::Error` 自身
    type Error: Into<anyhow::Error> + 'static;

    /// 处理器名称（用于失败日志与审计）
    fn handler_name(&self) -> &str {
        type_name::<Self>()
    }

    fn handle(&self, event: &E) -> Result<(), Self::Error>;
}

/// 以事件名声明输入类型的处理器
pub trait NamedEventHandler: Send + Sync {
    type Error: Into<anyhow::Error> + 'static;

    fn handler_name(&self) -> &str {
        type_name::<Self>()
    }

    /// 订阅的事件名
    fn subscribed_to(&self) -> &str;

    fn handle(&self, event: &dyn DomainEvent) -> Result<(), Self::Error>;
}

/// 处理器声明的输入
#[derive(Clone, Debug)]
pub enum HandlerInput {
    Typed(EventKey),
    Named(String),
}

/// 处理器返回的错误：保留具体错误类型名、错误链与调用栈
///
/// 调用栈优先取 `anyhow` 在错误产生处抓取的那份；未抓取时在转换处强制抓取。
pub struct HandlerError {
    kind: &'static str,
    source: anyhow::Error,
    backtrace: Option<Backtrace>,
}

impl HandlerError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<anyhow::Error> + 'static,
    {
        let source = err.into();
        let backtrace = match source.backtrace().status() {
            BacktraceStatus::Captured => None,
            _ => Some(Backtrace::force_capture()),
        };
        Self {
            kind: type_name::<E>(),
            source,
            backtrace,
        }
    }

    /// 具体错误类型名
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// 含错误链的完整描述
    pub fn message(&self) -> String {
        format!("{:#}", self.source)
    }

    pub fn backtrace(&self) -> &Backtrace {
        self.backtrace
            .as_ref()
            .unwrap_or_else(|| self.source.backtrace())
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerError")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

/// 擦除后的处理器
pub trait ErasedEventHandler: Send + Sync {
    fn handler_name(&self) -> &str;

    fn input(&self) -> HandlerInput;

    fn call(&self, event: &dyn DomainEvent) -> Result<(), HandlerError>;
}

struct Typed<E, H> {
    inner: H,
    _event: PhantomData<fn(&E)>,
}

impl<E, H> ErasedEventHandler for Typed<E, H>
where
    E: DomainEvent + 'static,
    H: EventHandler<E>,
{
    fn handler_name(&self) -> &str {
        self.inner.handler_name()
    }

    fn input(&self) -> HandlerInput {
        HandlerInput::Typed(EventKey::of::<E>())
    }

    fn call(&self, event: &dyn DomainEvent) -> Result<(), HandlerError> {
        // 注册表按 TypeId 建键，正常情况下这里的 downcast 不会失败
        let Some(typed) = downcast_event::<E>(event) else {
            return Err(HandlerError::new(DomainError::EventTypeMismatch {
                expected: E::name(),
                found: event.event_name().to_string(),
            }));
        };
        self.inner.handle(typed).map_err(HandlerError::new)
    }
}

struct Named<H> {
    inner: H,
}

impl<H> ErasedEventHandler for Named<H>
where
    H: NamedEventHandler,
{
    fn handler_name(&self) -> &str {
        self.inner.handler_name()
    }

    fn input(&self) -> HandlerInput {
        HandlerInput::Named(self.inner.subscribed_to().to_string())
    }

    fn call(&self, event: &dyn DomainEvent) -> Result<(), HandlerError> {
        self.inner.handle(event).map_err(HandlerError::new)
    }
}

/// 擦除一个泛型处理器
pub fn typed<E, H>(handler: H) -> Arc<dyn ErasedEventHandler>
where
    E: DomainEvent + 'static,
    H: EventHandler<E> + 'static,
{
    Arc::new(Typed {
        inner: handler,
        _event: PhantomData,
    })
}

/// 擦除一个按名订阅的处理器
pub fn named<H>(handler: H) -> Arc<dyn ErasedEventHandler>
where
    H: NamedEventHandler + 'static,
{
    Arc::new(Named { inner: handler })
}
