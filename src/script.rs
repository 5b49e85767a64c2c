//! `ScriptEngine`: an opaque collaborator this crate consumes but does not
//! implement.
//!
//! No script-backed actor ships here — that's out of scope — but a
//! scripted actor built on top of this crate would hold a
//! `Arc<dyn ScriptEngine>` and call through it from a `MessageHandler`.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use serde_json::Value;

// Layer 3: Internal module imports
use crate::error::Result;

/// A script that has been compiled and is ready to execute.
///
/// Opaque: this crate never inspects a `CompiledScript`'s internals, only
/// passes it back to the engine that produced it.
#[derive(Debug, Clone)]
pub struct CompiledScript {
    name: String,
    source: String,
}

impl CompiledScript {
    /// Wrap a compiled script's name and original source.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// The name this script was compiled under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A pluggable scripting backend, consumed by handlers that need to run
/// user-supplied logic without recompiling the crate.
#[async_trait]
pub trait ScriptEngine: Send + Sync {
    /// Compile `source`, naming it `name` for later diagnostics.
    async fn compile(&self, source: &str, name: &str) -> Result<CompiledScript>;

    /// Run a previously compiled script with `params`.
    async fn execute(&self, script: &CompiledScript, params: Value) -> Result<Value>;

    /// Compile and immediately run `source`, without keeping the compiled
    /// form around.
    async fn eval(&self, source: &str, name: &str, params: Value) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoEngine;

    #[async_trait]
    impl ScriptEngine for EchoEngine {
        async fn compile(&self, source: &str, name: &str) -> Result<CompiledScript> {
            Ok(CompiledScript::new(name, source))
        }

        async fn execute(&self, script: &CompiledScript, params: Value) -> Result<Value> {
            Ok(serde_json::json!({"script": script.name(), "params": params}))
        }

        async fn eval(&self, source: &str, name: &str, params: Value) -> Result<Value> {
            let script = self.compile(source, name).await?;
            self.execute(&script, params).await
        }
    }

    #[tokio::test]
    async fn test_compile_then_execute() {
        let engine = EchoEngine;
        let script = engine.compile("return 1", "identity").await.unwrap();
        assert_eq!(script.name(), "identity");
        let result = engine
            .execute(&script, serde_json::json!({"x": 1}))
            .await
            .unwrap();
        assert_eq!(result["script"], "identity");
    }

    #[tokio::test]
    async fn test_eval_compiles_and_executes() {
        let engine = EchoEngine;
        let result = engine
            .eval("return 2", "double", serde_json::json!({"x": 2}))
            .await
            .unwrap();
        assert_eq!(result["params"]["x"], 2);
    }
}
