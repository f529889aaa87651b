//! 事件分发器（EventDispatcher）
//!
//! 启动期对全部已注册处理器运行 `HandlerTypeExtractor`，构建
//! “事件类型 -> 有序处理器列表” 的分发表：
//! - 输入类型无法解析为唯一具体类型的处理器被排除（配置告警，非致命）；
//! - `dispatch` 按事件的运行时精确类型查找，在调用线程上按注册顺序同步执行全部处理器；
//! - 每次处理器调用都经 `ResilienceDecorator` 包装，失败只记录、不传播。
//!
use super::extractor::{EventCatalog, HandlerTypeExtractor};
use super::failure::DispatchError;
use super::handler::{self, ErasedEventHandler, EventHandler, NamedEventHandler};
use super::logger::ErrorLogger;
use super::registry::HandlerRegistry;
use super::resilience::{self, LoggedFailure, ResilienceDecorator};
use crate::domain_event::{DomainEvent, EventKey};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 分发器配置
#[derive(Clone, Copy, Debug)]
pub struct DispatcherConfig {
    /// 处理器耗时超过该阈值时输出告警（仅观测，不中断执行）
    pub slow_handler_threshold: Option<Duration>,
    /// 排除无法解析的处理器时是否输出告警
    pub warn_on_unresolved: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            slow_handler_threshold: None,
            warn_on_unresolved: true,
        }
    }
}

/// 一次分发的结果
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    event_name: &'static str,
    invoked: usize,
    failures: Vec<LoggedFailure>,
}

impl DispatchOutcome {
    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// 实际调用的处理器数量（含失败者）
    pub fn invoked(&self) -> usize {
        self.invoked
    }

    pub fn failures(&self) -> &[LoggedFailure] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct EventDispatcher {
    registry: HandlerRegistry,
    catalog: EventCatalog,
    decorator: ResilienceDecorator,
    config: DispatcherConfig,
}

impl EventDispatcher {
    pub fn builder() -> EventDispatcherBuilder {
        EventDispatcherBuilder::default()
    }

    /// 分发事件；总是正常返回
    pub fn dispatch(&self, event: &dyn DomainEvent) -> DispatchOutcome {
        let key = EventKey::of_event(event);
        let handlers = self.registry.matching(&key);

        let mut failures = Vec::new();
        for handler in handlers {
            let started = Instant::now();
            if let Err(failure) = self.decorator.execute(handler.as_ref(), event) {
                failures.push(failure);
            }
            self.observe(handler.as_ref(), event, started.elapsed());
        }

        DispatchOutcome {
            event_name: key.name(),
            invoked: handlers.len(),
            failures,
        }
    }

    /// 严格分发：执行全部处理器，把失败汇总为错误返回而不记录日志
    ///
    /// 供传输边界在外层统一吸收（见 `EventConsumer`）。
    pub fn try_dispatch(&self, event: &dyn DomainEvent) -> Result<(), DispatchError> {
        let key = EventKey::of_event(event);

        let mut failures = Vec::new();
        for handler in self.registry.matching(&key) {
            let started = Instant::now();
            if let Err(failure) = resilience::invoke(handler.as_ref(), event) {
                failures.push(failure);
            }
            self.observe(handler.as_ref(), event, started.elapsed());
        }

        match DispatchError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn decorator(&self) -> &ResilienceDecorator {
        &self.decorator
    }

    /// 某事件类型的处理器名称（按注册顺序）
    pub fn handlers_for<E: DomainEvent + 'static>(&self) -> Vec<&str> {
        self.registry.handler_names(&EventKey::of::<E>())
    }

    /// 分发表中的处理器总数
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    fn observe(&self, handler: &dyn ErasedEventHandler, event: &dyn DomainEvent, elapsed: Duration) {
        let Some(threshold) = self.config.slow_handler_threshold else {
            return;
        };
        if elapsed > threshold {
            tracing::warn!(
                handler = handler.handler_name(),
                event_name = event.event_name(),
                event_id = event.event_id(),
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = threshold.as_millis() as u64,
                "slow event handler"
            );
        }
    }
}

#[derive(Default)]
pub struct EventDispatcherBuilder {
    catalog: EventCatalog,
    handlers: Vec<Arc<dyn ErasedEventHandler>>,
    logger: Option<Arc<dyn ErrorLogger>>,
    config: DispatcherConfig,
}

impl EventDispatcherBuilder {
    /// 合并事件目录
    pub fn catalog(mut self, catalog: EventCatalog) -> Self {
        self.catalog.extend(catalog);
        self
    }

    /// 登记一个事件类型（供按名订阅的处理器与传输边界解码使用）
    pub fn event<E: DomainEvent + 'static>(mut self) -> Self {
        self.catalog.register::<E>();
        self
    }

    /// 订阅具体类型的事件；该类型同时登记到事件目录
    pub fn subscribe<E, H>(mut self, handler: H) -> Self
    where
        E: DomainEvent + 'static,
        H: EventHandler<E> + 'static,
    {
        self.catalog.register::<E>();
        self.handlers.push(handler::typed::<E, H>(handler));
        self
    }

    /// 按事件名订阅
    pub fn subscribe_named<H>(mut self, handler: H) -> Self
    where
        H: NamedEventHandler + 'static,
    {
        self.handlers.push(handler::named(handler));
        self
    }

    /// 注册已擦除的处理器
    pub fn handler(mut self, handler: Arc<dyn ErasedEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> EventDispatcher {
        let mut registry = HandlerRegistry::default();
        let extractor = HandlerTypeExtractor::new(&self.catalog);

        for handler in self.handlers {
            match extractor.extract(handler.as_ref()) {
                Ok(key) => registry.insert(key, handler),
                Err(unresolved) => {
                    if self.config.warn_on_unresolved {
                        tracing::warn!(
                            handler = handler.handler_name(),
                            reason = %unresolved,
                            "event handler excluded: input type cannot be resolved"
                        );
                    }
                }
            }
        }

        let decorator = match self.logger {
            Some(logger) => ResilienceDecorator::new(logger),
            None => ResilienceDecorator::default(),
        };

        EventDispatcher {
            registry,
            catalog: self.catalog,
            decorator,
            config: self.config,
        }
    }
}
