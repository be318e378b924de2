//! Tracing sink: start/event*/end span records for one run.
//!
//! A Runner invocation owns exactly one top-level span. The sink is a
//! null-object capability: when tracing is disabled the Runner drives a
//! [`NoopTraceSink`] and behaves identically minus the recorded events.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique span identifier.
pub type SpanId = Uuid;

/// One record in a span's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceRecord {
    StartSpan {
        span_id: SpanId,
        name: String,
        attributes: serde_json::Value,
        timestamp: DateTime<Utc>,
    },
    Event {
        span_id: SpanId,
        attributes: serde_json::Value,
        timestamp: DateTime<Utc>,
    },
    EndSpan {
        span_id: SpanId,
        timestamp: DateTime<Utc>,
    },
}

impl TraceRecord {
    pub fn span_id(&self) -> SpanId {
        match self {
            Self::StartSpan { span_id, .. }
            | Self::Event { span_id, .. }
            | Self::EndSpan { span_id, .. } => *span_id,
        }
    }
}

/// The tracing collaborator.
pub trait TraceSink: Send + Sync {
    fn start_span(&self, name: &str, attributes: serde_json::Value) -> SpanId;
    fn record_event(&self, span_id: SpanId, attributes: serde_json::Value);
    fn end_span(&self, span_id: SpanId);
}

/// Sink that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTraceSink;

impl TraceSink for NoopTraceSink {
    fn start_span(&self, _name: &str, _attributes: serde_json::Value) -> SpanId {
        Uuid::new_v4()
    }

    fn record_event(&self, _span_id: SpanId, _attributes: serde_json::Value) {}

    fn end_span(&self, _span_id: SpanId) {}
}

/// Sink that retains records in memory, for inspection and tests.
#[derive(Debug, Default)]
pub struct MemoryTraceSink {
    records: Mutex<Vec<TraceRecord>>,
}

impl MemoryTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records so far.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().unwrap().clone()
    }

    fn push(&self, record: TraceRecord) {
        self.records.lock().unwrap().push(record);
    }
}

impl TraceSink for MemoryTraceSink {
    fn start_span(&self, name: &str, attributes: serde_json::Value) -> SpanId {
        let span_id = Uuid::new_v4();
        self.push(TraceRecord::StartSpan {
            span_id,
            name: name.to_string(),
            attributes,
            timestamp: Utc::now(),
        });
        span_id
    }

    fn record_event(&self, span_id: SpanId, attributes: serde_json::Value) {
        self.push(TraceRecord::Event {
            span_id,
            attributes,
            timestamp: Utc::now(),
        });
    }

    fn end_span(&self, span_id: SpanId) {
        self.push(TraceRecord::EndSpan {
            span_id,
            timestamp: Utc::now(),
        });
    }
}

/// Callback invoked for each record.
pub type TraceProcessor = Arc<dyn Fn(&TraceRecord) + Send + Sync>;

/// Sink that forwards every record to an ordered processor list.
#[derive(Default)]
pub struct ProcessorTraceSink {
    processors: Vec<TraceProcessor>,
}

impl ProcessorTraceSink {
    pub fn new(processors: Vec<TraceProcessor>) -> Self {
        Self { processors }
    }

    pub fn with_processor<F>(mut self, processor: F) -> Self
    where
        F: Fn(&TraceRecord) + Send + Sync + 'static,
    {
        self.processors.push(Arc::new(processor));
        self
    }

    fn dispatch(&self, record: TraceRecord) {
        for processor in &self.processors {
            processor(&record);
        }
    }
}

impl TraceSink for ProcessorTraceSink {
    fn start_span(&self, name: &str, attributes: serde_json::Value) -> SpanId {
        let span_id = Uuid::new_v4();
        self.dispatch(TraceRecord::StartSpan {
            span_id,
            name: name.to_string(),
            attributes,
            timestamp: Utc::now(),
        });
        span_id
    }

    fn record_event(&self, span_id: SpanId, attributes: serde_json::Value) {
        self.dispatch(TraceRecord::Event {
            span_id,
            attributes,
            timestamp: Utc::now(),
        });
    }

    fn end_span(&self, span_id: SpanId) {
        self.dispatch(TraceRecord::EndSpan {
            span_id,
            timestamp: Utc::now(),
        });
    }
}
