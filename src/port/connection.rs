//! `PortConnection`: routes messages from one actor's output port to
//! another's input port.

// Layer 1: Standard library imports
use std::any::{Any, TypeId};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
use super::adapter::ProtocolBridge;
use super::handler::MessageHandler;
use super::rule::ConversionRule;
use super::typed::Port;
use crate::error::{Result, RuntimeError};
use crate::message::{Envelope, PortValue};

/// A live or not-yet-started relay between a source port (`IN`) and a
/// target port (`OUT`).
///
/// Construction never fails; [`validate`](PortConnection::validate) checks
/// that a path from `IN` to `OUT` actually exists (identity, a bridge, or
/// an applicable rule), and [`start`](PortConnection::start) re-checks it
/// before spawning the routing task.
pub struct PortConnection<IN: PortValue, OUT: PortValue> {
    source: Port<IN>,
    target: Port<OUT>,
    handlers: Vec<Arc<dyn MessageHandler<IN>>>,
    bridge: Option<Arc<dyn ProtocolBridge<IN, OUT>>>,
    rules: Vec<Arc<dyn ConversionRule<IN, OUT>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl<IN: PortValue, OUT: PortValue> PortConnection<IN, OUT> {
    /// Build a connection from `source` to `target`. Not started.
    pub fn new(source: Port<IN>, target: Port<OUT>) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Self {
            source,
            target,
            handlers: Vec::new(),
            bridge: None,
            rules: Vec::new(),
            task: Mutex::new(None),
            cancel_tx,
            cancel_rx,
        }
    }

    /// Append a pre-processing handler, run on `IN` before conversion.
    pub fn add_handler(&mut self, handler: Arc<dyn MessageHandler<IN>>) {
        self.handlers.push(handler);
    }

    /// Install the cross-type bridge used when `IN` and `OUT` differ.
    pub fn set_bridge(&mut self, bridge: Arc<dyn ProtocolBridge<IN, OUT>>) {
        self.bridge = Some(bridge);
    }

    /// Append a candidate conversion rule to the chain.
    pub fn add_rule(&mut self, rule: Arc<dyn ConversionRule<IN, OUT>>) {
        self.rules.push(rule);
    }

    /// Whether a path from `IN` to `OUT` exists: same type, an applicable
    /// bridge, or an applicable rule.
    pub fn validate(&self) -> Result<()> {
        let same_type = TypeId::of::<IN>() == TypeId::of::<OUT>();
        let bridgeable = self.bridge.as_ref().is_some_and(|b| b.can_handle());
        let ruled = self.rules.iter().any(|r| r.can_handle());
        if same_type || bridgeable || ruled {
            Ok(())
        } else {
            Err(RuntimeError::port_connection(
                self.source.id().to_string(),
                self.target.id().to_string(),
                "no identity, bridge, or rule converts the source type to the target type",
            ))
        }
    }

    /// Validate, take ownership of the source port's receiver, and spawn
    /// the routing task.
    ///
    /// Errors if already started, or if the source port's receiver was
    /// already taken by something else.
    pub fn start(&self) -> Result<()> {
        let mut task_guard = self.task.lock();
        if task_guard.is_some() {
            return Err(RuntimeError::invalid_state(
                "PortConnection::start",
                "already running",
            ));
        }
        self.validate()?;
        let source_rx = self.source.take_receiver().ok_or_else(|| {
            RuntimeError::invalid_state(
                "PortConnection::start",
                "source port receiver already taken",
            )
        })?;

        let target = self.target.clone();
        let handlers = self.handlers.clone();
        let bridge = self.bridge.clone();
        let rules = self.rules.clone();
        let cancel_rx = self.cancel_rx.clone();
        let source_id = self.source.id().to_string();
        let target_id = self.target.id().to_string();

        let handle = tokio::spawn(Self::run(
            source_rx, target, handlers, bridge, rules, cancel_rx, source_id, target_id,
        ));
        *task_guard = Some(handle);
        Ok(())
    }

    /// Signal the routing task to stop and wait for it to exit.
    ///
    /// Idempotent: calling this when not running is a no-op. Callers that
    /// need strict shutdown ordering (connections join before any
    /// actor's ports are disposed) must await this before disposing either
    /// endpoint.
    pub async fn stop_and_join(&self) -> Result<()> {
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = self.cancel_tx.send(true);
            handle.await.map_err(|_| {
                RuntimeError::invalid_state("PortConnection::stop_and_join", "routing task panicked")
            })?;
        }
        Ok(())
    }

    /// Whether the routing task is currently spawned.
    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    async fn convert(
        value: IN,
        bridge: &Option<Arc<dyn ProtocolBridge<IN, OUT>>>,
        rules: &[Arc<dyn ConversionRule<IN, OUT>>],
        source_id: &str,
        target_id: &str,
    ) -> Result<OUT> {
        if TypeId::of::<IN>() == TypeId::of::<OUT>() {
            let boxed: Box<dyn Any> = Box::new(value);
            return boxed.downcast::<OUT>().map(|v| *v).map_err(|_| {
                RuntimeError::port_connection(
                    source_id.to_string(),
                    target_id.to_string(),
                    "identity path expected IN and OUT to be the same concrete type",
                )
            });
        }
        if let Some(bridge) = bridge.as_ref().filter(|b| b.can_handle()) {
            return bridge.bridge(value).await;
        }
        if let Some(rule) = rules.iter().find(|r| r.can_handle()) {
            return rule.convert(value).await;
        }
        Err(RuntimeError::port_connection(
            source_id.to_string(),
            target_id.to_string(),
            "no bridge or rule applicable at relay time",
        ))
    }

    #[allow(clippy::too_many_arguments)]
    async fn run(
        mut source_rx: mpsc::Receiver<Envelope<IN>>,
        target: Port<OUT>,
        handlers: Vec<Arc<dyn MessageHandler<IN>>>,
        bridge: Option<Arc<dyn ProtocolBridge<IN, OUT>>>,
        rules: Vec<Arc<dyn ConversionRule<IN, OUT>>>,
        mut cancel: watch::Receiver<bool>,
        source_id: String,
        target_id: String,
    ) {
        loop {
            let envelope = tokio::select! {
                biased;
                _ = cancel.changed() => break,
                maybe = source_rx.recv() => match maybe {
                    Some(envelope) => envelope,
                    None => break,
                },
            };

            let mut value = envelope.payload;
            let mut rejected = false;
            for handler in &handlers {
                match handler.handle(value).await {
                    Ok(v) => value = v,
                    Err(_) => {
                        rejected = true;
                        break;
                    }
                }
            }
            if rejected {
                continue;
            }

            let converted = Self::convert(value, &bridge, &rules, &source_id, &target_id).await;
            let Ok(converted) = converted else {
                continue;
            };

            if target.send_cancellable(converted, &mut cancel).await.is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortKind;

    #[tokio::test]
    async fn test_identity_passthrough() {
        let source = Port::<String>::create("out", PortKind::Output, 4);
        let target = Port::<String>::create("in", PortKind::Input, 4);
        let conn = PortConnection::new(source.clone(), target.clone());
        conn.validate().unwrap();
        conn.start().unwrap();

        source.send("hello".to_string()).await.unwrap();
        let mut rx = target.take_receiver().unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.payload, "hello");

        conn.stop_and_join().await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_fails_without_bridge_or_rule() {
        let source = Port::<String>::create("out", PortKind::Output, 4);
        let target = Port::<u32>::create("in", PortKind::Input, 4);
        let conn = PortConnection::new(source, target);
        assert!(conn.validate().is_err());
    }

    #[tokio::test]
    async fn test_rule_bridges_mismatched_types() {
        use crate::port::rule_fn;

        let source = Port::<String>::create("out", PortKind::Output, 4);
        let target = Port::<u32>::create("in", PortKind::Input, 4);
        let mut conn = PortConnection::new(source.clone(), target.clone());
        conn.add_rule(rule_fn(|s: String| {
            s.parse::<u32>()
                .map_err(|e| RuntimeError::Validation(e.to_string()))
        }));
        conn.validate().unwrap();
        conn.start().unwrap();

        source.send("42".to_string()).await.unwrap();
        let mut rx = target.take_receiver().unwrap();
        assert_eq!(rx.recv().await.unwrap().payload, 42);

        conn.stop_and_join().await.unwrap();
    }

    #[tokio::test]
    async fn test_start_twice_errors() {
        let source = Port::<u32>::create("out", PortKind::Output, 4);
        let target = Port::<u32>::create("in", PortKind::Input, 4);
        let conn = PortConnection::new(source, target);
        conn.start().unwrap();
        assert!(conn.start().is_err());
        conn.stop_and_join().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_and_join_idempotent_when_not_started() {
        let source = Port::<u32>::create("out", PortKind::Output, 4);
        let target = Port::<u32>::create("in", PortKind::Input, 4);
        let conn = PortConnection::new(source, target);
        conn.stop_and_join().await.unwrap();
    }
}
