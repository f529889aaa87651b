//! 事件消息（EventMessage）
//!
//! 事件跨越传输边界时的标准形态：事件名、标识、发生时间与原语载荷。
//!
use super::domain_event_trait::DomainEvent;
use super::primitives::Primitives;
use bon::Builder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct EventMessage {
    /// 事件名，用于在事件目录中定位具体类型
    #[builder(into)]
    event_name: String,
    /// 事件唯一标识符
    #[builder(into)]
    event_id: String,
    /// 事件发生时间
    #[builder(into)]
    occurred_on: String,
    /// 事件负载（原语形态）
    #[builder(default)]
    body: Primitives,
}

impl EventMessage {
    pub fn from_event(event: &dyn DomainEvent) -> Self {
        Self {
            event_name: event.event_name().to_string(),
            event_id: event.event_id().to_string(),
            occurred_on: event.occurred_on().to_string(),
            body: event.to_primitives(),
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn occurred_on(&self) -> &str {
        &self.occurred_on
    }

    pub fn body(&self) -> &Primitives {
        &self.body
    }
}
