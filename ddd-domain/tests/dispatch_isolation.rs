mod common;

use common::{CaptureLayer, Journal, RecordingLogger};
use ddd_domain::domain_event::{DomainEvent, EventMessage, EventMeta, Primitive};
use ddd_domain::eventing::{
    ConsumeOutcome, DispatchError, DispatcherConfig, EventConsumer, EventDispatcher,
    EventHandler, FailureKind, NamedEventHandler,
};
use ddd_macros::domain_event;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[domain_event(name = "order.placed")]
struct OrderPlaced {
    order_id: String,
    amount: i64,
}

// 与 OrderPlaced 同名但类型不同
#[domain_event(name = "order.placed")]
struct LegacyOrderPlaced {
    order_id: String,
}

#[domain_event(name = "order.shipped")]
struct OrderShipped {
    order_id: String,
}

fn placed(order_id: &str) -> OrderPlaced {
    OrderPlaced {
        meta: EventMeta::new(),
        order_id: order_id.to_string(),
        amount: 42,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("inventory service unavailable")]
struct InventoryDown;

struct ReserveInventory;

impl EventHandler<OrderPlaced> for ReserveInventory {
    type Error = InventoryDown;

    fn handler_name(&self) -> &str {
        "reserve_inventory"
    }

    fn handle(&self, _event: &OrderPlaced) -> Result<(), Self::Error> {
        Err(InventoryDown)
    }
}

struct Record {
    name: &'static str,
    journal: Journal,
}

impl EventHandler<OrderPlaced> for Record {
    type Error = Infallible;

    fn handler_name(&self) -> &str {
        self.name
    }

    fn handle(&self, event: &OrderPlaced) -> Result<(), Self::Error> {
        self.journal.record(format!("{}:{}", self.name, event.order_id));
        Ok(())
    }
}

impl EventHandler<LegacyOrderPlaced> for Record {
    type Error = Infallible;

    fn handler_name(&self) -> &str {
        self.name
    }

    fn handle(&self, event: &LegacyOrderPlaced) -> Result<(), Self::Error> {
        self.journal.record(format!("{}:{}", self.name, event.order_id));
        Ok(())
    }
}

struct Explode;

impl EventHandler<OrderPlaced> for Explode {
    type Error = Infallible;

    fn handler_name(&self) -> &str {
        "explode"
    }

    fn handle(&self, _event: &OrderPlaced) -> Result<(), Self::Error> {
        panic!("boom")
    }
}

struct ChargeCard;

impl EventHandler<OrderPlaced> for ChargeCard {
    type Error = anyhow::Error;

    fn handler_name(&self) -> &str {
        "charge_card"
    }

    fn handle(&self, event: &OrderPlaced) -> anyhow::Result<()> {
        anyhow::bail!("card declined for {}", event.order_id)
    }
}

#[inline(never)]
fn release_stock(order_id: &str) {
    panic!("stock ledger corrupted for {order_id}")
}

struct ReleaseStock;

impl EventHandler<OrderPlaced> for ReleaseStock {
    type Error = Infallible;

    fn handler_name(&self) -> &str {
        "release_stock"
    }

    fn handle(&self, event: &OrderPlaced) -> Result<(), Self::Error> {
        release_stock(&event.order_id);
        Ok(())
    }
}

struct Audit {
    subscribed: &'static str,
    journal: Journal,
}

impl NamedEventHandler for Audit {
    type Error = Infallible;

    fn handler_name(&self) -> &str {
        "audit"
    }

    fn subscribed_to(&self) -> &str {
        self.subscribed
    }

    fn handle(&self, event: &dyn DomainEvent) -> Result<(), Self::Error> {
        self.journal
            .record(format!("audit:{}", event.event_name()));
        Ok(())
    }
}

#[test]
fn failing_handler_does_not_block_later_handlers() {
    let journal = Journal::default();
    let logger = RecordingLogger::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ReserveInventory)
        .subscribe::<OrderPlaced, _>(Record {
            name: "send_receipt",
            journal: journal.clone(),
        })
        .logger(Arc::new(logger.clone()))
        .build();

    let event = placed("o-1");
    let outcome = dispatcher.dispatch(&event);

    assert_eq!(outcome.event_name(), "order.placed");
    assert_eq!(outcome.invoked(), 2);
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(outcome.failures()[0].handler(), "reserve_inventory");
    assert_eq!(journal.calls(), vec!["send_receipt:o-1"]);

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    let (message, context) = &entries[0];
    assert_eq!(message, "event handler failed");
    assert_eq!(context.handler, "reserve_inventory");
    assert_eq!(context.event_name, "order.placed");
    assert_eq!(context.event_id, event.event_id());
    assert_eq!(context.occurred_on, event.occurred_on());
    assert_eq!(context.error_message, "inventory service unavailable");
    assert!(context.error_kind.ends_with("InventoryDown"));
    assert_eq!(
        context.payload.get("order_id"),
        Some(&Primitive::Text("o-1".into()))
    );
}

#[test]
fn handlers_run_in_registration_order() {
    let journal = Journal::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(Record {
            name: "first",
            journal: journal.clone(),
        })
        .subscribe::<OrderPlaced, _>(Record {
            name: "second",
            journal: journal.clone(),
        })
        .subscribe::<OrderPlaced, _>(Record {
            name: "third",
            journal: journal.clone(),
        })
        .build();

    assert_eq!(
        dispatcher.handlers_for::<OrderPlaced>(),
        vec!["first", "second", "third"]
    );

    let outcome = dispatcher.dispatch(&placed("o-2"));
    assert!(outcome.is_clean());
    assert_eq!(
        journal.calls(),
        vec!["first:o-2", "second:o-2", "third:o-2"]
    );
}

#[test]
fn dispatch_matches_exact_runtime_type_only() {
    let journal = Journal::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<LegacyOrderPlaced, _>(Record {
            name: "legacy",
            journal: journal.clone(),
        })
        .build();

    // 同名的不同类型不会命中
    let outcome = dispatcher.dispatch(&placed("o-3"));
    assert_eq!(outcome.invoked(), 0);
    assert!(journal.calls().is_empty());

    let legacy = LegacyOrderPlaced {
        meta: EventMeta::new(),
        order_id: "o-4".into(),
    };
    let outcome = dispatcher.dispatch(&legacy);
    assert_eq!(outcome.invoked(), 1);
    assert_eq!(journal.calls(), vec!["legacy:o-4"]);
}

#[test]
fn event_without_handlers_is_a_clean_noop() {
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ReserveInventory)
        .build();

    let shipped = OrderShipped {
        meta: EventMeta::new(),
        order_id: "o-5".into(),
    };
    let outcome = dispatcher.dispatch(&shipped);

    assert_eq!(outcome.invoked(), 0);
    assert!(outcome.is_clean());
}

#[test]
fn panicking_handler_is_contained() {
    let journal = Journal::default();
    let logger = RecordingLogger::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(Explode)
        .subscribe::<OrderPlaced, _>(Record {
            name: "after_panic",
            journal: journal.clone(),
        })
        .logger(Arc::new(logger.clone()))
        .build();

    let outcome = dispatcher.dispatch(&placed("o-6"));

    assert_eq!(outcome.failures().len(), 1);
    let failure = outcome.failures()[0].failure();
    assert_eq!(failure.handler(), "explode");
    assert_eq!(failure.kind(), FailureKind::Panic);
    assert_eq!(failure.message(), "boom");
    assert_eq!(journal.calls(), vec!["after_panic:o-6"]);
    assert_eq!(logger.entries()[0].1.error_kind, "panic");
}

#[test]
fn anyhow_handlers_fail_with_their_error_chain() {
    let logger = RecordingLogger::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ChargeCard)
        .logger(Arc::new(logger.clone()))
        .build();

    let outcome = dispatcher.dispatch(&placed("o-6a"));

    assert_eq!(outcome.failures().len(), 1);
    let (_, context) = &logger.entries()[0];
    assert_eq!(context.handler, "charge_card");
    assert_eq!(context.error_kind, "anyhow::Error");
    assert_eq!(context.error_message, "card declined for o-6a");
    assert!(!context.backtrace.is_empty());
    assert_ne!(context.backtrace, "disabled backtrace");
}

#[test]
fn failure_records_carry_the_panic_origin_backtrace() {
    let logger = RecordingLogger::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ReleaseStock)
        .logger(Arc::new(logger.clone()))
        .build();

    dispatcher.dispatch(&placed("o-6b"));

    let (_, context) = &logger.entries()[0];
    assert_eq!(context.error_kind, "panic");
    assert_eq!(context.error_message, "stock ledger corrupted for o-6b");
    assert_ne!(context.backtrace, "disabled backtrace");
    assert!(context.backtrace.starts_with("panicked at "), "{}", context.backtrace);
    assert!(context.backtrace.contains("dispatch_isolation.rs"));
    assert!(
        context.backtrace.contains("release_stock"),
        "{}",
        context.backtrace
    );
}

#[test]
fn try_dispatch_reports_single_and_composite_failures() {
    let single = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ReserveInventory)
        .build();
    match single.try_dispatch(&placed("o-7")) {
        Err(DispatchError::HandlerFailed(failure)) => {
            assert_eq!(failure.handler(), "reserve_inventory");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let composite = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ReserveInventory)
        .subscribe::<OrderPlaced, _>(Explode)
        .build();
    let err = composite.try_dispatch(&placed("o-8")).unwrap_err();
    assert_eq!(err.to_string(), "2 event handlers failed");
    let handlers: Vec<String> = err
        .into_failures()
        .into_iter()
        .map(|f| f.handler().to_string())
        .collect();
    assert_eq!(handlers, vec!["reserve_inventory", "explode"]);
}

#[test]
fn named_handler_resolves_through_catalog() {
    let journal = Journal::default();
    let dispatcher = EventDispatcher::builder()
        .event::<OrderShipped>()
        .subscribe_named(Audit {
            subscribed: "order.shipped",
            journal: journal.clone(),
        })
        .build();

    assert_eq!(dispatcher.handler_count(), 1);
    assert_eq!(dispatcher.handlers_for::<OrderShipped>(), vec!["audit"]);

    let shipped = OrderShipped {
        meta: EventMeta::new(),
        order_id: "o-9".into(),
    };
    dispatcher.dispatch(&shipped);
    assert_eq!(journal.calls(), vec!["audit:order.shipped"]);
}

#[test]
fn unresolvable_named_handlers_are_excluded_with_warning() {
    let capture = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let journal = Journal::default();

    let dispatcher = tracing::subscriber::with_default(subscriber, || {
        EventDispatcher::builder()
            // 两个类型共享 order.placed，按名解析有歧义
            .event::<OrderPlaced>()
            .event::<LegacyOrderPlaced>()
            .subscribe_named(Audit {
                subscribed: "order.placed",
                journal: journal.clone(),
            })
            .subscribe_named(Audit {
                subscribed: "order.cancelled",
                journal: journal.clone(),
            })
            .build()
    });

    assert_eq!(dispatcher.handler_count(), 0);
    let warnings = capture.at(Level::WARN);
    assert_eq!(warnings.len(), 2);
    assert!(
        warnings
            .iter()
            .all(|w| w.message == "event handler excluded: input type cannot be resolved")
    );
    assert_eq!(
        warnings[0].fields.get("reason").map(String::as_str),
        Some("event name order.placed maps to 2 types")
    );
    assert_eq!(
        warnings[1].fields.get("reason").map(String::as_str),
        Some("no event type named order.cancelled")
    );

    dispatcher.dispatch(&placed("o-10"));
    assert!(journal.calls().is_empty());
}

#[test]
fn default_logger_emits_one_error_record_per_failure() {
    let capture = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ReserveInventory)
        .subscribe::<OrderPlaced, _>(Record {
            name: "send_receipt",
            journal: Journal::default(),
        })
        .build();

    let event = placed("o-11");
    tracing::subscriber::with_default(subscriber, || {
        dispatcher.dispatch(&event);
    });

    let errors = capture.at(Level::ERROR);
    assert_eq!(errors.len(), 1);
    let record = &errors[0];
    assert_eq!(record.message, "event handler failed");
    assert_eq!(record.fields["handler"], "reserve_inventory");
    assert_eq!(record.fields["event_name"], "order.placed");
    assert_eq!(record.fields["event_id"], event.event_id());
    assert_eq!(record.fields["error.message"], "inventory service unavailable");
    assert!(record.fields["payload"].contains("\"order_id\":\"o-11\""));
}

#[test]
fn slow_handlers_are_reported_but_not_interrupted() {
    struct Sleepy(Journal);

    impl EventHandler<OrderPlaced> for Sleepy {
        type Error = Infallible;

        fn handle(&self, event: &OrderPlaced) -> Result<(), Self::Error> {
            std::thread::sleep(Duration::from_millis(5));
            self.0.record(event.order_id.clone());
            Ok(())
        }
    }

    let capture = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let journal = Journal::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(Sleepy(journal.clone()))
        .config(DispatcherConfig {
            slow_handler_threshold: Some(Duration::from_millis(1)),
            ..DispatcherConfig::default()
        })
        .build();

    tracing::subscriber::with_default(subscriber, || {
        dispatcher.dispatch(&placed("o-12"));
    });

    assert_eq!(journal.calls(), vec!["o-12"]);
    let warnings = capture.at(Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "slow event handler");
    assert!(warnings[0].fields["handler"].ends_with("Sleepy"));
}

#[test]
fn consumer_decodes_dispatches_and_absorbs_composite_failures() {
    let journal = Journal::default();
    let logger = RecordingLogger::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(ReserveInventory)
        .subscribe::<OrderPlaced, _>(Explode)
        .subscribe::<OrderPlaced, _>(Record {
            name: "send_receipt",
            journal: journal.clone(),
        })
        .logger(Arc::new(logger.clone()))
        .build();
    let consumer = EventConsumer::new(Arc::new(dispatcher));

    let message = EventMessage::from_event(&placed("o-13"));
    let outcome = consumer.consume(&message);

    assert_eq!(outcome, ConsumeOutcome::Absorbed { failures: 2 });
    assert_eq!(journal.calls(), vec!["send_receipt:o-13"]);
    let handlers: Vec<String> = logger
        .entries()
        .into_iter()
        .map(|(_, ctx)| ctx.handler)
        .collect();
    assert_eq!(handlers, vec!["reserve_inventory", "explode"]);
}

#[test]
fn consumer_delivers_clean_messages_and_rejects_undecodable_ones() {
    let journal = Journal::default();
    let dispatcher = EventDispatcher::builder()
        .subscribe::<OrderPlaced, _>(Record {
            name: "send_receipt",
            journal: journal.clone(),
        })
        .build();
    let consumer = EventConsumer::new(Arc::new(dispatcher));

    let raw = serde_json::to_string(&EventMessage::from_event(&placed("o-14"))).unwrap();
    assert_eq!(consumer.consume_json(&raw), ConsumeOutcome::Delivered);
    assert_eq!(journal.calls(), vec!["send_receipt:o-14"]);

    let unknown = EventMessage::builder()
        .event_name("order.refunded")
        .event_id("e-1")
        .occurred_on("2024-01-01T00:00:00.000Z")
        .build();
    assert_eq!(consumer.consume(&unknown), ConsumeOutcome::Rejected);

    let missing_amount = EventMessage::builder()
        .event_name("order.placed")
        .event_id("e-2")
        .occurred_on("2024-01-01T00:00:00.000Z")
        .body([("order_id".to_string(), Primitive::from("o-15"))].into())
        .build();
    assert_eq!(consumer.consume(&missing_amount), ConsumeOutcome::Rejected);

    assert_eq!(consumer.consume_json("{not json"), ConsumeOutcome::Rejected);
    assert_eq!(journal.calls().len(), 1);
}
