//! 传输边界的事件消费者（EventConsumer）
//!
//! 外部传输（队列、HTTP 回调等）收到事件消息后的入口：
//! 解码（`FromPrimitives`）→ 严格分发 → 吸收全部失败。
//! 该入口总是正常返回，任何失败都只以日志形式出现。
//!
use super::dispatcher::EventDispatcher;
use crate::domain_event::EventMessage;
use std::sync::Arc;

/// 一次消费的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// 全部处理器成功
    Delivered,
    /// 有处理器失败，已逐条记录
    Absorbed { failures: usize },
    /// 消息无法解码，未分发
    Rejected,
}

#[derive(Clone)]
pub struct EventConsumer {
    dispatcher: Arc<EventDispatcher>,
}

impl EventConsumer {
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn consume(&self, message: &EventMessage) -> ConsumeOutcome {
        let event = match self.dispatcher.catalog().decode(message) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(
                    event_name = message.event_name(),
                    event_id = message.event_id(),
                    error = %err,
                    "failed to decode event message"
                );
                return ConsumeOutcome::Rejected;
            }
        };

        match self.dispatcher.try_dispatch(&*event) {
            Ok(()) => ConsumeOutcome::Delivered,
            Err(err) => {
                let logged = self.dispatcher.decorator().absorb(&*event, err);
                ConsumeOutcome::Absorbed {
                    failures: logged.len(),
                }
            }
        }
    }

    /// 消费 JSON 形态的事件消息
    pub fn consume_json(&self, raw: &str) -> ConsumeOutcome {
        match serde_json::from_str::<EventMessage>(raw) {
            Ok(message) => self.consume(&message),
            Err(err) => {
                tracing::error!(error = %err, "malformed event message");
                ConsumeOutcome::Rejected
            }
        }
    }
}
