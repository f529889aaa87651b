//! 领域事件（Domain Event）
//!
//! 定义事件需要实现的最小接口（`DomainEvent`）、事件元数据（`EventMeta`）、
//! 原语往返（`Primitive` / `PrimitiveField`）以及跨边界的 `EventMessage`。

mod domain_event_trait;
mod event_message;
mod event_meta;
mod primitives;

pub use domain_event_trait::{AsAny, DomainEvent, EventKey, downcast_event};
pub use event_message::EventMessage;
pub use event_meta::EventMeta;
pub use primitives::{Primitive, PrimitiveField, Primitives, take_field};
