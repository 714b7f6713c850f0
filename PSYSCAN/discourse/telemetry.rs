use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde_json::Value;
use shared_event_bus::{EventPublisher, EventRecord};
use shared_logging::{JsonLogger, LogLevel, LogRecord};
use tokio::{
    runtime::{Builder, Handle, Runtime},
    task::JoinHandle,
};

/// Builder for engine telemetry sinks.
pub struct DiscourseTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
    event_publisher: Option<Arc<dyn EventPublisher>>,
}

impl DiscourseTelemetryBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::Debug,
            event_publisher: None,
        }
    }

    /// Sets the JSON-lines log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Drops log records below this level.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Sets the event publisher.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Builds the telemetry handle.
    pub fn build(self) -> Result<DiscourseTelemetry> {
        let logger = match self.log_path {
            Some(path) => Some(JsonLogger::with_min_level(path, self.min_level)?),
            None => None,
        };
        Ok(DiscourseTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger,
                event: self.event_publisher.map(EventHandle::new),
            }),
        })
    }
}

/// Telemetry handle shared across engine components.
#[derive(Clone)]
pub struct DiscourseTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for DiscourseTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscourseTelemetry")
            .field("module", &self.inner.module)
            .field("logs", &self.inner.logger.is_some())
            .field("events", &self.inner.event.is_some())
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
    event: Option<EventHandle>,
}

struct EventHandle {
    // Only built when publishing outside any tokio runtime.
    runtime: OnceCell<Runtime>,
    publisher: Arc<dyn EventPublisher>,
    // Last spawned publish. Each task awaits its predecessor, so events
    // reach the publisher in emission order.
    tail: Mutex<Option<JoinHandle<()>>>,
}

impl EventHandle {
    fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            runtime: OnceCell::new(),
            publisher,
            tail: Mutex::new(None),
        }
    }

    fn publish(&self, record: EventRecord) -> Result<()> {
        if let Ok(handle) = Handle::try_current() {
            let publisher = Arc::clone(&self.publisher);
            let mut tail = self.tail.lock();
            let previous = tail.take();
            *tail = Some(handle.spawn(async move {
                if let Some(previous) = previous {
                    if let Err(err) = previous.await {
                        tracing::warn!("telemetry event task failed: {err:?}");
                    }
                }
                if let Err(err) = publisher.publish(record).await {
                    tracing::warn!("telemetry event publish failed: {err:?}");
                }
            }));
            Ok(())
        } else {
            let runtime = self
                .runtime
                .get_or_try_init(|| Builder::new_current_thread().enable_all().build())?;
            runtime.block_on(self.publisher.publish(record))
        }
    }
}

impl DiscourseTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> DiscourseTelemetryBuilder {
        DiscourseTelemetryBuilder::new(module)
    }

    /// Logs a message with structured metadata.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let record =
                LogRecord::new(&self.inner.module, level, message).with_metadata(&metadata);
            logger.log(&record)?;
        }
        Ok(())
    }

    /// Waits for events published from inside a runtime to be delivered.
    pub async fn flush(&self) {
        let Some(handle) = &self.inner.event else {
            return;
        };
        let tail = handle.tail.lock().take();
        if let Some(task) = tail {
            if let Err(err) = task.await {
                tracing::warn!("telemetry event task failed: {err:?}");
            }
        }
    }

    /// Emits an event on the bus. Events of one handle are delivered in
    /// the order they are emitted, inside a runtime or not.
    pub fn event(&self, event_type: &str, payload: Value) -> Result<()> {
        if let Some(handle) = &self.inner.event {
            handle.publish(EventRecord::new(
                self.inner.module.clone(),
                event_type,
                payload,
            ))?;
        }
        Ok(())
    }
}
