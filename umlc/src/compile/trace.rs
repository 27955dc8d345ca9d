//! Opt-in compiler tracing.
//!
//! Mirrors the teacher's `compile::diagnostics::DiagnosticsCollector`: a
//! thread-local, disabled-by-default collector callers can toggle on to get
//! visibility into allocation/register/jump-resolution decisions without
//! pulling in a logging-framework dependency this synchronous, single-shot
//! compiler has no use for.

use std::cell::RefCell;

/// One recorded event during compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// A function, array global, or array literal was assigned a PIC index.
    StaticAllocation { description: String, index: u32 },
    /// A scratch register was handed out.
    RegisterOccupied { register: &'static str },
    /// A scratch register was returned to the pool.
    RegisterReleased { register: &'static str },
    /// A jump-target label resolved to a concrete instruction pointer.
    JumpTargetResolved { ip: u32 },
}

thread_local! {
    static ENABLED: RefCell<bool> = const { RefCell::new(false) };
    static EVENTS: RefCell<Vec<TraceEvent>> = const { RefCell::new(Vec::new()) };
}

/// Thread-local collector of [`TraceEvent`]s.
#[derive(Debug)]
pub struct TraceCollector;

impl TraceCollector {
    pub fn enable() {
        ENABLED.with(|enabled| *enabled.borrow_mut() = true);
    }

    pub fn disable() {
        ENABLED.with(|enabled| *enabled.borrow_mut() = false);
    }

    pub fn is_enabled() -> bool {
        ENABLED.with(|enabled| *enabled.borrow())
    }

    pub fn emit(event: TraceEvent) {
        if Self::is_enabled() {
            EVENTS.with(|events| events.borrow_mut().push(event));
        }
    }

    pub fn take() -> Vec<TraceEvent> {
        EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
    }

    pub fn clear() {
        EVENTS.with(|events| events.borrow_mut().clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default_and_a_no_op() {
        TraceCollector::disable();
        TraceCollector::clear();
        TraceCollector::emit(TraceEvent::RegisterOccupied { register: "ax" });
        assert!(TraceCollector::take().is_empty());
    }

    #[test]
    fn collects_events_once_enabled() {
        TraceCollector::enable();
        TraceCollector::clear();
        TraceCollector::emit(TraceEvent::StaticAllocation {
            description: "main".to_string(),
            index: 0,
        });
        TraceCollector::emit(TraceEvent::JumpTargetResolved { ip: 12 });
        let events = TraceCollector::take();
        assert_eq!(events.len(), 2);
        assert!(TraceCollector::take().is_empty());
        TraceCollector::disable();
    }
}
