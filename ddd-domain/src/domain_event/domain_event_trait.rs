use super::primitives::Primitives;
use crate::error::DomainResult;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 以 `&dyn Any` 访问具体类型（用于按运行时精确类型分发）
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 领域事件需要满足的通用能力边界
///
/// 该 trait 可作为 `dyn DomainEvent` 使用；带 `where Self: Sized` 的方法仅在
/// 具体类型上可用。
pub trait DomainEvent: AsAny + fmt::Debug + Send + Sync {
    /// 事件名（静态，形如 `order.placed`）
    fn name() -> &'static str
    where
        Self: Sized;

    /// 事件名（经由实例获取，可用于 `dyn DomainEvent`）
    fn event_name(&self) -> &'static str;

    /// 事件唯一标识
    fn event_id(&self) -> &str;

    /// 事件发生时间
    fn occurred_on(&self) -> &str;

    /// 事件载荷的原语形态
    fn to_primitives(&self) -> Primitives;

    /// 由原语形态还原事件
    ///
    /// 对任意事件 `e`：`from_primitives(e.to_primitives(), e.event_id(), e.occurred_on())`
    /// 应还原出与 `e` 观察等价的事件。
    fn from_primitives(body: Primitives, event_id: String, occurred_on: String) -> DomainResult<Self>
    where
        Self: Sized;
}

/// 事件类型判别键：以 `TypeId` 判等，携带事件名用于日志
#[derive(Clone, Copy)]
pub struct EventKey {
    type_id: TypeId,
    name: &'static str,
}

impl EventKey {
    pub fn of<E: DomainEvent + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            name: E::name(),
        }
    }

    /// 取事件实例的运行时精确类型
    pub fn of_event(event: &dyn DomainEvent) -> Self {
        Self {
            type_id: event.as_any().type_id(),
            name: event.event_name(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EventKey {}

impl Hash for EventKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventKey").field(&self.name).finish()
    }
}

/// 将事件实例向下转型为具体类型
pub fn downcast_event<E: DomainEvent + 'static>(event: &dyn DomainEvent) -> Option<&E> {
    event.as_any().downcast_ref::<E>()
}
