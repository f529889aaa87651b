use crate::error::DomainResult;
use bon::Builder;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 事件元数据：全局唯一标识与发生时间
///
/// 发生时间以 RFC 3339（UTC，毫秒精度）字符串保存，
/// 与原语往返中的 `occurred_on` 完全一致。
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    #[builder(into)]
    event_id: String,
    #[builder(into)]
    occurred_on: String,
}

impl EventMeta {
    /// 生成新的事件元数据（uuid v4 + 当前时间）
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// 指定发生时间生成元数据
    pub fn at(occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            occurred_on: occurred_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// 从原语形态还原（不做校验，保持往返无损）
    pub fn restore(event_id: String, occurred_on: String) -> Self {
        Self {
            event_id,
            occurred_on,
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn occurred_on(&self) -> &str {
        &self.occurred_on
    }

    /// 解析发生时间
    pub fn occurred_at(&self) -> DomainResult<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(&self.occurred_on)?.with_timezone(&Utc))
    }
}

impl Default for EventMeta {
    fn default() -> Self {
        Self::new()
    }
}
