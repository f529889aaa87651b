//! 处理器输入类型解析（HandlerTypeExtractor）与事件目录（EventCatalog）
//!
//! 事件目录在启动期登记全部已知事件类型（事件名 -> 具体类型 + 原语解码器），
//! 解析器据此把处理器声明的输入解析为唯一的具体事件类型。
//!
use super::handler::{ErasedEventHandler, HandlerInput};
use crate::domain_event::{DomainEvent, EventKey, EventMessage, Primitives};
use crate::error::{DomainError, DomainResult};
use std::collections::HashMap;
use std::fmt;

type Decoder = fn(Primitives, String, String) -> DomainResult<Box<dyn DomainEvent>>;

fn decode_as<E: DomainEvent + 'static>(
    body: Primitives,
    event_id: String,
    occurred_on: String,
) -> DomainResult<Box<dyn DomainEvent>> {
    Ok(Box::new(E::from_primitives(body, event_id, occurred_on)?))
}

#[derive(Clone, Copy)]
struct CatalogEntry {
    key: EventKey,
    decode: Decoder,
}

/// 事件名解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unique(EventKey),
    Unknown,
    Ambiguous(usize),
}

/// 已知事件类型目录
#[derive(Clone, Default)]
pub struct EventCatalog {
    by_name: HashMap<&'static str, Vec<CatalogEntry>>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记事件类型；同一类型重复登记无副作用
    pub fn register<E: DomainEvent + 'static>(&mut self) -> &mut Self {
        let key = EventKey::of::<E>();
        let entries = self.by_name.entry(key.name()).or_default();
        if !entries.iter().any(|e| e.key == key) {
            entries.push(CatalogEntry {
                key,
                decode: decode_as::<E>,
            });
        }
        self
    }

    /// 合并另一个目录
    pub fn extend(&mut self, other: EventCatalog) {
        for entries in other.by_name.into_values() {
            for entry in entries {
                let slot = self.by_name.entry(entry.key.name()).or_default();
                if !slot.iter().any(|e| e.key == entry.key) {
                    slot.push(entry);
                }
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        match self.by_name.get(name).map(Vec::as_slice) {
            None | Some([]) => Resolution::Unknown,
            Some([entry]) => Resolution::Unique(entry.key),
            Some(entries) => Resolution::Ambiguous(entries.len()),
        }
    }

    /// 将事件消息还原为具体事件（`FromPrimitives`）
    pub fn decode(&self, message: &EventMessage) -> DomainResult<Box<dyn DomainEvent>> {
        let name = message.event_name();
        match self.by_name.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(DomainError::UnknownEvent {
                name: name.to_string(),
            }),
            Some([entry]) => (entry.decode)(
                message.body().clone(),
                message.event_id().to_string(),
                message.occurred_on().to_string(),
            ),
            Some(entries) => Err(DomainError::AmbiguousEvent {
                name: name.to_string(),
                candidates: entries.len(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EventCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        f.debug_struct("EventCatalog").field("events", &names).finish()
    }
}

/// 无法解析为唯一具体类型的处理器输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedInput {
    UnknownName(String),
    AmbiguousName { name: String, candidates: usize },
}

impl fmt::Display for UnresolvedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName(name) => write!(f, "no event type named {name}"),
            Self::AmbiguousName { name, candidates } => {
                write!(f, "event name {name} maps to {candidates} types")
            }
        }
    }
}

/// 处理器输入类型解析器
pub struct HandlerTypeExtractor<'a> {
    catalog: &'a EventCatalog,
}

impl<'a> HandlerTypeExtractor<'a> {
    pub fn new(catalog: &'a EventCatalog) -> Self {
        Self { catalog }
    }

    pub fn extract(&self, handler: &dyn ErasedEventHandler) -> Result<EventKey, UnresolvedInput> {
        match handler.input() {
            HandlerInput::Typed(key) => Ok(key),
            HandlerInput::Named(name) => match self.catalog.resolve(&name) {
                Resolution::Unique(key) => Ok(key),
                Resolution::Unknown => Err(UnresolvedInput::UnknownName(name)),
                Resolution::Ambiguous(candidates) => {
                    Err(UnresolvedInput::AmbiguousName { name, candidates })
                }
            },
        }
    }
}
