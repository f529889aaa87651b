use ddd_domain::domain_event::{DomainEvent, EventMessage, EventMeta};
use ddd_domain::eventing::{DispatcherConfig, EventConsumer, EventDispatcher, EventHandler, NamedEventHandler};
use ddd_macros::domain_event;
use ddd_metrics::clock::SystemClock;
use ddd_metrics::config::{MetricsConfig, MetricsSink};
use ddd_metrics::dimension::MetricDimensions;
use ddd_metrics::emitter::MetricsEmitter;
use ddd_metrics::error::MetricsError;
use ddd_metrics::metric::Metric;
use ddd_metrics::namespace::Namespace;
use ddd_metrics::unit::MetricUnit;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ulid::Ulid;

#[domain_event(name = "order.placed")]
struct OrderPlaced {
    order_id: String,
    customer_id: String,
    amount_cents: i64,
    item_count: u32,
}

#[domain_event(name = "order.cancelled")]
struct OrderCancelled {
    order_id: String,
    reason: String,
}

/// 下单后输出业务指标
struct RecordOrderMetrics {
    emitter: Arc<MetricsEmitter>,
}

impl EventHandler<OrderPlaced> for RecordOrderMetrics {
    type Error = MetricsError;

    fn handler_name(&self) -> &str {
        "record_order_metrics"
    }

    fn handle(&self, event: &OrderPlaced) -> Result<(), Self::Error> {
        let dimensions = MetricDimensions::from_pairs([("Endpoint", "Order"), ("Operation", "create")])?;
        let metrics = [
            Metric::try_new("OrdersPlaced", 1, MetricUnit::Count, dimensions.clone())?,
            Metric::try_new("OrderItems", event.item_count, MetricUnit::Count, dimensions.clone())?,
            Metric::try_new("OrderValue", event.amount_cents as f64 / 100.0, MetricUnit::None, dimensions)?,
        ];
        self.emitter.emit_all(&metrics)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("warehouse cannot reserve {requested} items for order {order_id}")]
struct WarehouseUnavailable {
    order_id: String,
    requested: u32,
}

/// 大单预留库存失败（演示失败隔离）
struct ReserveStock;

impl EventHandler<OrderPlaced> for ReserveStock {
    type Error = WarehouseUnavailable;

    fn handler_name(&self) -> &str {
        "reserve_stock"
    }

    fn handle(&self, event: &OrderPlaced) -> Result<(), Self::Error> {
        if event.item_count > 10 {
            return Err(WarehouseUnavailable {
                order_id: event.order_id.clone(),
                requested: event.item_count,
            });
        }
        tracing::info!(order_id = %event.order_id, "stock reserved");
        Ok(())
    }
}

/// 按事件名订阅的审计处理器
struct AuditCancellations;

impl NamedEventHandler for AuditCancellations {
    type Error = Infallible;

    fn handler_name(&self) -> &str {
        "audit_cancellations"
    }

    fn subscribed_to(&self) -> &str {
        "order.cancelled"
    }

    fn handle(&self, event: &dyn DomainEvent) -> Result<(), Self::Error> {
        tracing::info!(
            event_id = event.event_id(),
            payload = ?event.to_primitives(),
            "cancellation audited"
        );
        Ok(())
    }
}

fn metrics_config() -> Result<MetricsConfig, MetricsError> {
    match MetricsConfig::from_env() {
        Err(MetricsError::MissingSetting { .. }) => Ok(MetricsConfig::builder()
            .namespace(Namespace::new("Demo/Orders")?)
            .sink(MetricsSink::Stdout)
            .build()),
        other => other,
    }
}

fn place_order(customer_id: &str, amount_cents: i64, item_count: u32) -> OrderPlaced {
    OrderPlaced {
        meta: EventMeta::new(),
        order_id: Ulid::new().to_string(),
        customer_id: customer_id.to_string(),
        amount_cents,
        item_count,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 日志写 stderr，stdout 只保留 EMF 行
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let emitter = Arc::new(MetricsEmitter::from_config(&metrics_config()?, Arc::new(SystemClock))?);

    let dispatcher = Arc::new(
        EventDispatcher::builder()
            .event::<OrderCancelled>()
            .subscribe::<OrderPlaced, _>(ReserveStock)
            .subscribe::<OrderPlaced, _>(RecordOrderMetrics {
                emitter: emitter.clone(),
            })
            .subscribe_named(AuditCancellations)
            .config(DispatcherConfig {
                slow_handler_threshold: Some(Duration::from_millis(50)),
                ..DispatcherConfig::default()
            })
            .build(),
    );

    for order in [place_order("cus-1", 4_990, 2), place_order("cus-2", 129_900, 12)] {
        let outcome = dispatcher.dispatch(&order);
        tracing::info!(
            order_id = %order.order_id,
            invoked = outcome.invoked(),
            failed = outcome.failures().len(),
            "order dispatched"
        );
    }

    // 模拟传输层收到的消息
    let consumer = EventConsumer::new(dispatcher.clone());
    let cancelled = OrderCancelled {
        meta: EventMeta::new(),
        order_id: Ulid::new().to_string(),
        reason: "customer request".to_string(),
    };
    let outcome = consumer.consume(&EventMessage::from_event(&cancelled));
    tracing::info!(outcome = ?outcome, "cancellation consumed");

    Ok(())
}
