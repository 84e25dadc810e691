//! # Larek Runtime
//!
//! Runtime implementation for the Web Larek storefront.
//!
//! This crate provides the [`Store`] that coordinates reducer execution,
//! notification dispatch and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the application state and is the single entry point for mutation
//! - **Effect Executor**: Publishes notifications and runs async effects, feeding
//!   their results back into the reducer
//! - **Effect Handle**: Lets callers wait until an action's effects (and the
//!   effects of the actions they feed back) have completed
//!
//! ## Example
//!
//! ```ignore
//! use larek_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Views subscribe before anything is sent
//! store.bus().subscribe(TopicPattern::exact("cart:changed"), |event| Ok(()));
//!
//! // Send an action and wait for its network effects
//! let mut handle = store.send(Action::LoadCatalog).await?;
//! handle.wait().await;
//!
//! // Read state
//! let count = store.state(|s| s.cart_len()).await;
//! ```

use larek_core::{effect::Effect, event::Event, event_bus::EventBus, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timeout waiting for effects to complete
        #[error("Timed out waiting for effects to complete")]
        Timeout,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for effects to complete.
/// Tracking is cascading: actions fed back by async effects run under the same
/// handle, so `wait()` returns only once the whole chain has settled.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::SubmitOrder).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The order request has resolved and its result has been reduced
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle together with its internal tracking context
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Number of async effects still running under this handle
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, DecrementGuard, Effect, EffectHandle, EffectTracking, Event, EventBus,
        Ordering, Reducer, RwLock, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; the only way to mutate it is `send`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Event bus (notifications published by the reducer)
    /// 5. Effect execution (with feedback loop)
    ///
    /// Cloning a Store yields another handle onto the same state and bus, which
    /// is how the store is injected into every consumer.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        bus: EventBus<A>,
        shutdown: Arc<AtomicBool>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Event + Send + Sync + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with its own event bus
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_bus(initial_state, reducer, environment, EventBus::new())
        }

        /// Create a store that publishes on an existing bus
        #[must_use]
        pub fn with_bus(initial_state: S, reducer: R, environment: E, bus: EventBus<A>) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                bus,
                shutdown: Arc::new(AtomicBool::new(false)),
            }
        }

        /// The bus this store publishes notifications on
        #[must_use]
        pub const fn bus(&self) -> &EventBus<A> {
            &self.bus
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock and calls the reducer
        /// 2. Releases the lock
        /// 3. Publishes `Effect::Publish` notifications synchronously, in order
        /// 4. Spawns `Effect::Future`s; their resulting actions are sent back
        ///
        /// Every subscriber has observed this action's notifications by the
        /// time `send` returns. Async effects may still be running; use the
        /// returned [`EffectHandle`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            let (handle, tracking) = EffectHandle::new();
            self.send_internal(action, tracking).await?;
            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let total = store.state(|s| s.cart_total()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Stop accepting actions and drop every bus subscription
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            self.shutdown.store(true, Ordering::Release);
            self.bus.unsubscribe_all();
        }

        /// Whether `shutdown` has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        async fn send_internal(&self, action: A, tracking: EffectTracking) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!(topic = %action.topic(), "Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut *state, action, &self.environment)
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(())
        }

        /// Execute an effect with tracking
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Publish`: Delivered on the bus before this call returns
        /// - `Future`: Spawned; a produced action is reduced under the same tracking
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Publish(event) => {
                    metrics::counter!("store.effects.executed", "type" => "publish").increment(1);
                    let report = self.bus.publish(&event);
                    if !report.is_clean() {
                        tracing::warn!(
                            topic = %report.topic,
                            failures = report.failures.len(),
                            "Notification delivered with handler failures"
                        );
                    }
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    let tracking = tracking.clone();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking.clone());

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            if let Err(error) = store.send_internal(action, tracking).await {
                                tracing::warn!(error = %error, "Dropped action produced by effect");
                            }
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                bus: self.bus.clone(),
                shutdown: Arc::clone(&self.shutdown),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
