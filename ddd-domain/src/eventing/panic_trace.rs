//! 处理器 panic 的调用栈捕获
//!
//! 在 panic 发生点（展开之前）抓取调用栈，供失败记录使用。
//! 仅对处于 `guarded` 作用域内的线程生效；其余 panic 交还给原有 hook。
//! 作用域内的 panic 不再输出默认的 "thread panicked at" 文本，
//! 由弹性装饰器写出结构化失败日志。
//!
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, PanicHookInfo};
use std::sync::Once;

thread_local! {
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<PanicTrace>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// panic 发生点的位置与调用栈
#[derive(Debug)]
pub(crate) struct PanicTrace {
    pub(crate) location: Option<String>,
    pub(crate) backtrace: Backtrace,
}

fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if GUARD_DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let trace = PanicTrace {
                location: info.location().map(|l| l.to_string()),
                backtrace: Backtrace::force_capture(),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(trace));
        }));
    });
}

struct DepthGuard;

impl Drop for DepthGuard {
    fn drop(&mut self) {
        GUARD_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// 在受保护作用域内执行 `f`；作用域内的 panic 调用栈可由 `take` 取回
pub(crate) fn guarded<R>(f: impl FnOnce() -> R) -> R {
    install();
    LAST_PANIC.with(|slot| slot.borrow_mut().take());
    GUARD_DEPTH.with(|d| d.set(d.get() + 1));
    let _guard = DepthGuard;
    f()
}

/// 取回当前线程最近一次受保护 panic 的调用栈
pub(crate) fn take() -> Option<PanicTrace> {
    LAST_PANIC.with(|slot| slot.borrow_mut().take())
}
