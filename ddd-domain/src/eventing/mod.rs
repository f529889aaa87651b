//! 事件子系统（eventing）
//!
//! 同步、进程内的领域事件分发：
//! - `EventHandler` / `NamedEventHandler`：处理器及其唯一输入类型的声明；
//! - `EventCatalog` / `HandlerTypeExtractor`：启动期把处理器输入解析为具体事件类型；
//! - `EventDispatcher`：事件类型 -> 有序处理器列表，按运行时精确类型分发；
//! - `ResilienceDecorator`：包装每次处理器调用，失败只记录、不传播；
//! - `EventConsumer`：传输边界入口，解码后严格分发并吸收复合失败。
//!
//! 该模块不含后台任务、队列或异步运行时；异步投递交由外部传输负责。
//!
pub mod consumer;
pub mod dispatcher;
pub mod extractor;
pub mod failure;
pub mod handler;
pub mod logger;
mod panic_trace;
mod registry;
pub mod resilience;

pub use consumer::{ConsumeOutcome, EventConsumer};
pub use dispatcher::{DispatchOutcome, DispatcherConfig, EventDispatcher, EventDispatcherBuilder};
pub use extractor::{EventCatalog, HandlerTypeExtractor, Resolution, UnresolvedInput};
pub use failure::{DispatchError, FailureKind, HandlerFailure};
pub use handler::{ErasedEventHandler, EventHandler, HandlerError, HandlerInput, NamedEventHandler};
pub use logger::{ErrorLogger, FailureContext, TracingErrorLogger};
pub use resilience::{LoggedFailure, ResilienceDecorator};
