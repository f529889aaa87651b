//! ddd 过程宏
//!
//! - `#[domain_event]`：为具名字段结构体生成 `DomainEvent` 实现（事件名、标识、
//!   发生时间与原语往返）；
//! - `#[value_object]`：为值对象合并常用派生。
//!
use proc_macro::TokenStream;

mod domain_event;
mod utils;
mod value_object;

/// 领域事件宏
///
/// ```ignore
/// #[domain_event(name = "order.placed")]
/// struct OrderPlaced {
///     order_id: String,
///     amount: i64,
/// }
/// ```
///
/// - 缺失时在最前追加 `meta: ::ddd_domain::domain_event::EventMeta` 字段；
/// - 合并派生：`Debug, Clone, PartialEq`；
/// - `name` 缺省为结构体名；
/// - 除 `meta` 外的每个字段都必须实现 `PrimitiveField`。
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}

/// 值对象宏
///
/// 合并派生：`Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq`，
/// 支持参数 `debug = false`、`default = false`、`copy = true`（追加 `Copy, Hash`）。
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
