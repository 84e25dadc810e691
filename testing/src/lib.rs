//! # Larek Testing
//!
//! Testing utilities and helpers for the Web Larek storefront.
//!
//! This crate provides:
//! - A deterministic [`Clock`] implementation
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - An [`EventRecorder`] that captures everything published on a bus
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use larek_testing::{EventRecorder, test_clock};
//! use larek_runtime::Store;
//!
//! #[tokio::test]
//! async fn adding_to_cart_notifies_views() {
//!     let store = Store::new(StorefrontState::default(), StorefrontReducer, test_env());
//!     let recorder = EventRecorder::attach(store.bus());
//!
//!     store.send(StorefrontAction::ToggleCart { id }).await?;
//!
//!     assert_eq!(recorder.topics(), vec!["cart:changed"]);
//! }
//! ```

use chrono::{DateTime, Utc};
use larek_core::environment::Clock;

/// Ergonomic testing utilities for reducers
pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making receipts reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use larek_testing::mocks::FixedClock;
    /// use larek_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

/// Capturing subscriber for event bus assertions
pub mod recorder {
    use larek_core::event::Event;
    use larek_core::event_bus::{EventBus, SubscriptionId, TopicPattern};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Records every event delivered on a bus, in delivery order
    ///
    /// Clones share the same log.
    #[derive(Debug)]
    pub struct EventRecorder<E> {
        log: Arc<Mutex<Vec<(String, E)>>>,
        subscription: SubscriptionId,
    }

    impl<E> EventRecorder<E>
    where
        E: Event + Clone + Send + Sync + 'static,
    {
        /// Subscribe to every topic on `bus`
        #[must_use]
        pub fn attach(bus: &EventBus<E>) -> Self {
            Self::attach_to(bus, TopicPattern::All)
        }

        /// Subscribe to topics matching `pattern` on `bus`
        #[must_use]
        pub fn attach_to(bus: &EventBus<E>, pattern: TopicPattern) -> Self {
            let log = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&log);
            let subscription = bus.subscribe(pattern, move |event: &E| {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((event.topic().into_owned(), event.clone()));
                Ok(())
            });
            Self { log, subscription }
        }

        /// The subscription backing this recorder
        #[must_use]
        pub const fn subscription(&self) -> SubscriptionId {
            self.subscription
        }

        /// Topics seen so far
        #[must_use]
        pub fn topics(&self) -> Vec<String> {
            self.lock().iter().map(|(topic, _)| topic.clone()).collect()
        }

        /// Events seen so far
        #[must_use]
        pub fn events(&self) -> Vec<E> {
            self.lock().iter().map(|(_, event)| event.clone()).collect()
        }

        /// Events seen on one topic
        #[must_use]
        pub fn on(&self, topic: &str) -> Vec<E> {
            self.lock()
                .iter()
                .filter(|(seen, _)| seen == topic)
                .map(|(_, event)| event.clone())
                .collect()
        }

        /// Most recent event on `topic`
        #[must_use]
        pub fn last_on(&self, topic: &str) -> Option<E> {
            self.lock()
                .iter()
                .rev()
                .find(|(seen, _)| seen == topic)
                .map(|(_, event)| event.clone())
        }

        /// Forget everything recorded so far
        pub fn clear(&self) {
            self.lock().clear();
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, E)>> {
            self.log.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl<E> Clone for EventRecorder<E> {
        fn clone(&self) -> Self {
            Self {
                log: Arc::clone(&self.log),
                subscription: self.subscription,
            }
        }
    }
}

/// Install a test-friendly tracing subscriber
///
/// Honors `RUST_LOG`; safe to call from many tests.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use recorder::EventRecorder;
