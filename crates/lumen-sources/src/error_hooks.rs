//! Panic reporting and host-reported errors.
//!
//! The panic hook is process-global. It is installed at most once, chains
//! whatever hook was there before, and reports through the attached sink.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::Cell;
use std::panic::PanicHookInfo;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lumen_core::traits::IEventSink;
use lumen_core::{Action, Category, Event, Priority};
use lumen_observability::tracing_setup::events;

static INSTALLED: AtomicBool = AtomicBool::new(false);
static SINK: Mutex<Option<Arc<dyn IEventSink>>> = Mutex::new(None);

thread_local! {
    // Set while a panic is being reported, so a panic inside the sink does
    // not report itself forever.
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

/// Attach `sink` and install the panic hook if it is not installed yet.
///
/// The first attached sink wins: while a sink is attached, further calls
/// leave it in place and return false. Call [`detach`] first to switch
/// sinks. Returns true when `sink` was attached.
pub fn install(sink: Arc<dyn IEventSink>) -> bool {
    {
        let mut slot = SINK.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return false;
        }
        *slot = Some(sink);
    }
    if !INSTALLED.swap(true, Ordering::SeqCst) {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            report_panic(info);
            previous(info);
        }));
        events::panic_hook_installed();
    }
    true
}

/// Stop reporting panics. The hook stays installed but becomes a pass-through.
pub fn detach() {
    SINK.lock().unwrap_or_else(|e| e.into_inner()).take();
}

pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

fn report_panic(info: &PanicHookInfo<'_>) {
    if REPORTING.with(|r| r.replace(true)) {
        return;
    }
    let sink = SINK.lock().unwrap_or_else(|e| e.into_inner()).clone();
    if let Some(sink) = sink {
        let source = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        events::panic_captured(source.as_deref());
        let mut event = exception(&payload_message(info.payload()));
        if let Some(source) = source {
            event = event.with_meta("source", source);
        }
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            event = event.with_meta("stack", backtrace.to_string());
        }
        sink.track_nonblocking(event);
    }
    REPORTING.with(|r| r.set(false));
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

fn exception(message: &str) -> Event {
    Event::new(Category::Error, Action::Exception)
        .with_priority(Priority::High)
        .with_meta("message", message)
}

/// Report an error the host caught itself (`window.onerror` analogue).
pub fn report_error(sink: &dyn IEventSink, message: &str, source: Option<&str>) {
    let mut event = exception(message);
    if let Some(source) = source {
        event = event.with_meta("source", source);
    }
    sink.track(event);
}

/// Report a rejected promise / failed background task nobody awaited.
pub fn report_rejection(sink: &dyn IEventSink, reason: &str) {
    sink.track(
        Event::new(Category::Error, Action::UnhandledRejection)
            .with_priority(Priority::High)
            .with_meta("reason", reason),
    );
}
