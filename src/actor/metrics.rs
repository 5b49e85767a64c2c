//! `ActorMetrics`: lock-free counters plus a bounded processing-time window.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::message::MessagePriority;

/// Maximum number of processing durations retained; oldest is dropped.
const MAX_SAMPLES: usize = 1_000;

/// A serializable point-in-time summary of an [`ActorMetrics`], suitable
/// for embedding in an `ActorStateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total messages received across all ports.
    pub messages_received: u64,
    /// Total messages successfully processed.
    pub messages_processed: u64,
    /// Total messages that failed handling.
    pub messages_failed: u64,
    /// `processed / (processed + failed)`.
    pub success_rate: f64,
    /// Average processing duration, in milliseconds.
    pub average_duration_ms: Option<u64>,
    /// Shortest processing duration, in milliseconds.
    pub min_duration_ms: Option<u64>,
    /// Longest processing duration, in milliseconds.
    pub max_duration_ms: Option<u64>,
}

/// Per-actor counters and timing samples.
///
/// Counters are monotonically non-decreasing `AtomicU64`s so recording a
/// message never takes a lock; only the duration window and the
/// per-protocol/per-port tallies use synchronization, and only briefly.
/// Everything is cleared together by [`ActorMetrics::reset`].
#[derive(Debug, Default)]
pub struct ActorMetrics {
    messages_received: AtomicU64,
    messages_processed: AtomicU64,
    messages_failed: AtomicU64,
    per_protocol: DashMap<&'static str, u64>,
    per_priority: [AtomicU64; 4],
    per_port: DashMap<String, u64>,
    durations: Mutex<VecDeque<Duration>>,
}

impl ActorMetrics {
    /// A fresh, all-zero metrics set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message arriving on `port`, tagged with `priority`.
    pub fn record_received(&self, port: &str, priority: MessagePriority) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
        self.per_priority[priority as usize].fetch_add(1, Ordering::Relaxed);
        *self.per_port.entry(port.to_string()).or_insert(0) += 1;
    }

    /// Record a successfully processed message of type `protocol`
    /// (the port's element type name), and how long handling took.
    pub fn record_processed(&self, protocol: &'static str, duration: Duration) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
        *self.per_protocol.entry(protocol).or_insert(0) += 1;
        let mut samples = self.durations.lock();
        if samples.len() >= MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(duration);
    }

    /// Record a message that failed handling.
    pub fn record_failed(&self) {
        self.messages_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Total messages received across all ports.
    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    /// Total messages successfully processed.
    pub fn messages_processed(&self) -> u64 {
        self.messages_processed.load(Ordering::Relaxed)
    }

    /// Total messages that failed handling.
    pub fn messages_failed(&self) -> u64 {
        self.messages_failed.load(Ordering::Relaxed)
    }

    /// `processed / (processed + failed)`, `1.0` if nothing has been
    /// processed or failed yet.
    pub fn success_rate(&self) -> f64 {
        let processed = self.messages_processed() as f64;
        let failed = self.messages_failed() as f64;
        if processed + failed == 0.0 {
            1.0
        } else {
            processed / (processed + failed)
        }
    }

    /// Average processing duration over the current sample window.
    pub fn average_duration(&self) -> Option<Duration> {
        let samples = self.durations.lock();
        if samples.is_empty() {
            return None;
        }
        let total: Duration = samples.iter().sum();
        Some(total / samples.len() as u32)
    }

    /// Shortest processing duration in the current sample window.
    pub fn min_duration(&self) -> Option<Duration> {
        self.durations.lock().iter().min().copied()
    }

    /// Longest processing duration in the current sample window.
    pub fn max_duration(&self) -> Option<Duration> {
        self.durations.lock().iter().max().copied()
    }

    /// Messages received of a given priority.
    pub fn received_by_priority(&self, priority: MessagePriority) -> u64 {
        self.per_priority[priority as usize].load(Ordering::Relaxed)
    }

    /// Messages processed of a given element type name.
    pub fn processed_by_protocol(&self, protocol: &str) -> u64 {
        self.per_protocol.get(protocol).map(|v| *v).unwrap_or(0)
    }

    /// Messages received on a given port name.
    pub fn received_by_port(&self, port: &str) -> u64 {
        self.per_port.get(port).map(|v| *v).unwrap_or(0)
    }

    /// Capture a serializable summary of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received(),
            messages_processed: self.messages_processed(),
            messages_failed: self.messages_failed(),
            success_rate: self.success_rate(),
            average_duration_ms: self.average_duration().map(|d| d.as_millis() as u64),
            min_duration_ms: self.min_duration().map(|d| d.as_millis() as u64),
            max_duration_ms: self.max_duration().map(|d| d.as_millis() as u64),
        }
    }

    /// Clear every counter and the duration window.
    pub fn reset(&self) {
        self.messages_received.store(0, Ordering::Relaxed);
        self.messages_processed.store(0, Ordering::Relaxed);
        self.messages_failed.store(0, Ordering::Relaxed);
        for counter in &self.per_priority {
            counter.store(0, Ordering::Relaxed);
        }
        self.per_protocol.clear();
        self.per_port.clear();
        self.durations.lock().clear();
    }
}
