use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use ims_core::LogLevel;
use tracing::Subscriber;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, reload};

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: tracing::Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn timestamp_secs(&self) -> u64 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0)
    }

    pub fn format_line(&self) -> String {
        format!(
            "[{:>10}] {:<5} {:<10} {}",
            self.timestamp_secs(),
            self.level.as_str(),
            self.target,
            self.message
        )
    }
}

/// Ring buffer of captured events shown on the Diagnostics tab.
#[derive(Debug, Clone)]
pub struct LogStore {
    inner: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut guard) = self.inner.lock() {
            if guard.len() >= self.capacity {
                guard.pop_front();
            }
            guard.push_back(entry);
        }
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        if let Ok(guard) = self.inner.lock() {
            return guard.iter().cloned().collect();
        }
        Vec::new()
    }
}

pub type ReloadHandle = reload::Handle<EnvFilter, Registry>;

fn level_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::default().add_directive(level.to_level_filter().into())
}

/// Installs the global subscriber. `RUST_LOG`, when set and valid, wins over
/// the configured level until the level is changed at runtime.
pub fn init_logging(store: LogStore, level: LogLevel) -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level));
    let (reload_layer, handle) = reload::Layer::new(env_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false);

    let subscriber = Registry::default()
        .with(reload_layer)
        .with(LogCaptureLayer::new(store))
        .with(fmt_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);

    handle
}

pub fn apply_log_level(handle: &ReloadHandle, level: LogLevel) {
    let new_filter = level_filter(level);
    let _ = handle.modify(|filter| {
        *filter = new_filter;
    });
}

struct LogCaptureLayer {
    store: LogStore,
}

impl LogCaptureLayer {
    fn new(store: LogStore) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for LogCaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.store.push(LogEntry {
            timestamp: SystemTime::now(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.into_message(),
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl FieldVisitor {
    /// Message first, structured fields appended as `key=value`.
    fn into_message(self) -> String {
        match (self.message, self.fields.is_empty()) {
            (Some(message), true) => message,
            (Some(message), false) => format!("{message} ({})", self.fields.join(", ")),
            (None, _) => self.fields.join(", "),
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(value.trim_matches('"').to_string());
        } else {
            self.fields
                .push(format!("{}={}", field.name(), value.trim_matches('"')));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: UNIX_EPOCH,
            level: tracing::Level::INFO,
            target: "ims::sync".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn store_drops_oldest_beyond_capacity() {
        let store = LogStore::new(2);
        store.push(entry("first"));
        store.push(entry("second"));
        store.push(entry("third"));

        let messages: Vec<_> = store
            .snapshot()
            .into_iter()
            .map(|entry| entry.message)
            .collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn format_line_includes_level_and_target() {
        let line = entry("Collection ready").format_line();
        assert!(line.contains("INFO"));
        assert!(line.contains("ims::sync"));
        assert!(line.ends_with("Collection ready"));
    }

    #[test]
    fn fields_follow_message() {
        let visitor = FieldVisitor {
            message: Some("HTTP ok".to_string()),
            fields: vec!["status=200".to_string()],
        };
        assert_eq!(visitor.into_message(), "HTTP ok (status=200)");
    }
}
