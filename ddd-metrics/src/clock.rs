//! 时间戳来源（TimestampProvider）
//!
use chrono::Utc;

/// 以 Unix 毫秒提供当前时间
pub trait TimestampProvider: Send + Sync {
    fn current_timestamp(&self) -> i64;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimestampProvider for SystemClock {
    fn current_timestamp(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// 固定时钟，始终返回同一时间戳
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl TimestampProvider for FixedClock {
    fn current_timestamp(&self) -> i64 {
        self.0
    }
}
