//! # Schema Provider
//!
//! Owns the compiled schema for the lifetime of the process and hands out
//! shared references to it.
//!
//! ## Lifecycle
//!
//! `Empty → Loading → Ready` on success, `Empty → Loading → Empty` on
//! failure. A failed load is not cached, so the next caller retries.
//!
//! ## Single Flight
//!
//! The first caller that finds the slot empty publishes a shared load
//! future tagged with a fresh generation number. Every caller that arrives
//! while it is pending awaits the same future, so the source is consulted
//! once no matter how many requests race. When the load settles, only the
//! slot still holding that generation is updated. The lock is never held
//! across an await point.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde_json::Value;

use crate::compiled::CompiledSchema;
use crate::error::SchemaError;
use crate::settings::SchemaSettings;
use crate::source::{DefaultSchemaSource, SchemaSource};

type LoadOutcome = Result<Arc<CompiledSchema>, SchemaError>;
type LoadFuture = Shared<BoxFuture<'static, LoadOutcome>>;

enum Slot {
    Empty,
    Loading { generation: u64, future: LoadFuture },
    Ready(Arc<CompiledSchema>),
}

struct State {
    slot: Slot,
    generation: u64,
}

/// Lazily loads, compiles, and caches the schema.
pub struct SchemaProvider {
    source: Arc<dyn SchemaSource>,
    state: Mutex<State>,
}

impl std::fmt::Debug for SchemaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaProvider")
            .field("source", &self.source)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl SchemaProvider {
    /// A provider that loads from `source` on first use.
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            state: Mutex::new(State {
                slot: Slot::Empty,
                generation: 0,
            }),
        }
    }

    /// A provider using the local-first, remote-fallback source.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::RemoteFetch`] if the HTTP client cannot be built.
    pub fn from_settings(settings: &SchemaSettings) -> Result<Self, SchemaError> {
        Ok(Self::new(Arc::new(DefaultSchemaSource::new(settings)?)))
    }

    /// A provider that is already `Ready` with `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if `schema` does not compile.
    pub fn preloaded(schema: Value) -> Result<Self, SchemaError> {
        let compiled = Arc::new(CompiledSchema::compile(&schema)?);
        Ok(Self {
            source: Arc::new(Preloaded(schema)),
            state: Mutex::new(State {
                slot: Slot::Ready(compiled),
                generation: 0,
            }),
        })
    }

    /// Whether a compiled schema is cached.
    pub fn is_ready(&self) -> bool {
        matches!(self.state.lock().slot, Slot::Ready(_))
    }

    /// Get the compiled schema, loading it if needed.
    ///
    /// # Errors
    ///
    /// Returns the load or compile failure. Every caller that joined the
    /// same load observes the same error.
    pub async fn get(&self) -> LoadOutcome {
        let (generation, future) = {
            let mut state = self.state.lock();
            match &state.slot {
                Slot::Ready(schema) => return Ok(Arc::clone(schema)),
                Slot::Loading { generation, future } => (*generation, future.clone()),
                Slot::Empty => {
                    state.generation += 1;
                    let generation = state.generation;
                    let future = load(Arc::clone(&self.source)).boxed().shared();
                    state.slot = Slot::Loading {
                        generation,
                        future: future.clone(),
                    };
                    (generation, future)
                }
            }
        };

        let outcome = future.await;

        let mut state = self.state.lock();
        if matches!(state.slot, Slot::Loading { generation: g, .. } if g == generation) {
            state.slot = match &outcome {
                Ok(schema) => Slot::Ready(Arc::clone(schema)),
                Err(_) => Slot::Empty,
            };
        }
        outcome
    }
}

async fn load(source: Arc<dyn SchemaSource>) -> LoadOutcome {
    let schema = source.load().await.map_err(|e| {
        tracing::warn!(error = %e, "schema load failed");
        e
    })?;
    let compiled = CompiledSchema::compile(&schema).map_err(|e| {
        tracing::warn!(error = %e, "schema compile failed");
        e
    })?;
    tracing::info!("schema compiled and cached");
    Ok(Arc::new(compiled))
}

/// Source behind a preloaded provider.
#[derive(Debug)]
struct Preloaded(Value);

#[async_trait]
impl SchemaSource for Preloaded {
    async fn load(&self) -> Result<Value, SchemaError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts loads; fails the first `failures` of them.
    #[derive(Debug)]
    struct CountingSource {
        calls: AtomicUsize,
        failures: usize,
        delay: Duration,
        schema: Value,
    }

    impl CountingSource {
        fn new(failures: usize, delay: Duration, schema: Value) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                failures,
                delay,
                schema,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SchemaSource for CountingSource {
        async fn load(&self) -> Result<Value, SchemaError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if n < self.failures {
                Err(SchemaError::Unavailable {
                    local: "missing".into(),
                    remote: "offline".into(),
                })
            } else {
                Ok(self.schema.clone())
            }
        }
    }

    fn object_schema() -> Value {
        json!({"type": "object"})
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let source = CountingSource::new(0, Duration::from_millis(50), object_schema());
        let provider = Arc::new(SchemaProvider::new(source.clone()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let provider = Arc::clone(&provider);
                tokio::spawn(async move { provider.get().await })
            })
            .collect();

        let mut compiled = Vec::new();
        for handle in handles {
            compiled.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(source.calls(), 1);
        assert!(compiled.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert!(provider.is_ready());
    }

    #[tokio::test]
    async fn ready_provider_does_not_reload() {
        let source = CountingSource::new(0, Duration::ZERO, object_schema());
        let provider = SchemaProvider::new(source.clone());
        let first = provider.get().await.unwrap();
        let second = provider.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_shared_then_retried() {
        let source = CountingSource::new(1, Duration::from_millis(30), object_schema());
        let provider = SchemaProvider::new(source.clone());

        let (a, b) = tokio::join!(provider.get(), provider.get());
        assert!(matches!(a, Err(SchemaError::Unavailable { .. })));
        assert_eq!(a.unwrap_err(), b.unwrap_err());
        assert_eq!(source.calls(), 1);
        assert!(!provider.is_ready());

        provider.get().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert!(provider.is_ready());
    }

    #[tokio::test]
    async fn compile_failure_is_not_cached() {
        let source = CountingSource::new(0, Duration::ZERO, json!({"type": 12}));
        let provider = SchemaProvider::new(source.clone());
        assert!(matches!(provider.get().await, Err(SchemaError::Compile { .. })));
        assert!(matches!(provider.get().await, Err(SchemaError::Compile { .. })));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn preloaded_is_ready_immediately() {
        let provider = SchemaProvider::preloaded(object_schema()).unwrap();
        assert!(provider.is_ready());
        assert!(provider.get().await.is_ok());
    }

    #[test]
    fn preloaded_rejects_invalid_schema() {
        assert!(SchemaProvider::preloaded(json!({"type": 12})).is_err());
    }
}
