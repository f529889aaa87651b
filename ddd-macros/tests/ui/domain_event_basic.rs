use ddd_domain::domain_event::{DomainEvent, EventMeta};
use ddd_macros::domain_event;

#[domain_event(name = "account.opened")]
struct AccountOpened {
    account_id: String,
    initial_balance: i64,
    nickname: Option<String>,
}

// 已声明 meta 字段时保留原定义
#[domain_event]
#[derive(Eq)]
struct AccountClosed {
    meta: EventMeta,
    account_id: String,
}

fn main() {
    let opened = AccountOpened {
        meta: EventMeta::new(),
        account_id: "acc-1".into(),
        initial_balance: 100,
        nickname: None,
    };
    assert_eq!(AccountOpened::name(), "account.opened");
    assert_eq!(opened.event_name(), "account.opened");

    let restored = AccountOpened::from_primitives(
        opened.to_primitives(),
        opened.event_id().to_string(),
        opened.occurred_on().to_string(),
    )
    .unwrap();
    assert_eq!(restored, opened);

    let closed = AccountClosed {
        meta: EventMeta::new(),
        account_id: "acc-1".into(),
    };
    assert_eq!(AccountClosed::name(), "AccountClosed");
    let _dyn_event: &dyn DomainEvent = &closed;
    let _ = format!("{:?}", closed.clone());
}
