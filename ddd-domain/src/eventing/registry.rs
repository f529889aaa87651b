use super::handler::ErasedEventHandler;
use crate::domain_event::EventKey;
use std::collections::HashMap;
use std::sync::Arc;

/// 事件类型 -> 有序处理器列表
///
/// 启动期构建后只读；按事件的运行时精确类型查找，不做任何回退匹配。
#[derive(Clone, Default)]
pub(crate) struct HandlerRegistry {
    by_type: HashMap<EventKey, Vec<Arc<dyn ErasedEventHandler>>>,
}

impl HandlerRegistry {
    pub(crate) fn insert(&mut self, key: EventKey, handler: Arc<dyn ErasedEventHandler>) {
        self.by_type.entry(key).or_default().push(handler);
    }

    pub(crate) fn matching(&self, key: &EventKey) -> &[Arc<dyn ErasedEventHandler>] {
        self.by_type.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn handler_names(&self, key: &EventKey) -> Vec<&str> {
        self.matching(key).iter().map(|h| h.handler_name()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }
}
