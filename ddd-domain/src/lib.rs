//! DDD 领域层基础库（ddd-domain）
//!
//! 提供以领域事件为中心的通用抽象与构件：
//! - 领域事件（`domain_event`）：事件契约、元数据与原语往返（`to_primitives`/`from_primitives`）
//! - 事件系统（`eventing`）：按事件运行时类型分发到处理器，并以韧性装饰器隔离失败
//! - 值对象（`value_object`）：无标识、以值相等为准的概念
//!
//! 分发完全同步、进程内执行；不包含总线、队列或持久化，
//! 传输层只需把收到的消息交给 `eventing::EventConsumer`。
//!
//! 典型用法：
//! 1. 用 `#[domain_event]` 定义事件；
//! 2. 为事件实现 `EventHandler`（或按名称声明输入的 `NamedEventHandler`）；
//! 3. 通过 `EventDispatcher::builder()` 注册处理器并构建分发器；
//! 4. 调用 `dispatch` 分发，或在传输边界使用 `EventConsumer::consume`。
//!
pub mod domain_event;
pub mod error;
pub mod eventing;
pub mod value_object;

// 允许在本 crate 内部通过 ::ddd_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::ddd_domain 路径。
extern crate self as ddd_domain;
