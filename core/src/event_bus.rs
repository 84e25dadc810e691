//! Synchronous publish/subscribe dispatcher.
//!
//! The [`EventBus`] decouples state mutation from view refresh. The store
//! publishes typed notifications; views subscribe to the topics they render.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Intent    │  (view → store.send)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────────┐
//! │    Reducer      │  mutate + validate
//! └────────┬────────┘
//!          │ Effect::Publish
//!          ▼
//! ┌─────────────────┐
//! │    EventBus     │  synchronous, in the sender's call stack
//! └────────┬────────┘
//!          │
//!     ┌────┴────┐
//!     │         │
//!     ▼         ▼
//! ┌───────┐ ┌───────┐
//! │ Page  │ │ Cart  │
//! │       │ │ Panel │
//! └───────┘ └───────┘
//! ```
//!
//! # Delivery Guarantees
//!
//! - **Synchronous**: every matching handler has run when `publish` returns
//! - **Ordered per topic**: handlers run in registration order
//! - **Re-entrant**: a handler may publish or subscribe during dispatch; nested
//!   publishes are fully delivered before the outer call continues
//! - **Isolated**: a handler that fails or panics never prevents its siblings
//!   from running; the failure is logged and reported in [`PublishReport`]
//!
//! # Example
//!
//! ```
//! use larek_core::event::Event;
//! use larek_core::event_bus::{EventBus, TopicPattern};
//! use std::borrow::Cow;
//!
//! #[derive(Debug)]
//! struct CartChanged(usize);
//!
//! impl Event for CartChanged {
//!     fn topic(&self) -> Cow<'static, str> {
//!         Cow::Borrowed("cart:changed")
//!     }
//! }
//!
//! let bus = EventBus::new();
//! bus.subscribe(TopicPattern::exact("cart:changed"), |event: &CartChanged| {
//!     assert_eq!(event.0, 2);
//!     Ok(())
//! });
//!
//! let report = bus.publish(&CartChanged(2));
//! assert_eq!(report.delivered, 1);
//! assert!(report.is_clean());
//! ```

use crate::event::Event;
use regex::Regex;
use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Errors that can occur during event bus operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// A subscription pattern failed to compile
    #[error("Invalid topic pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// A handler returned an error
    #[error("Handler {subscription} failed on topic '{topic}': {reason}")]
    HandlerFailed {
        /// The topic being dispatched
        topic: String,
        /// The failing subscription
        subscription: SubscriptionId,
        /// The handler's error message
        reason: String,
    },

    /// A handler panicked
    #[error("Handler {subscription} panicked on topic '{topic}': {message}")]
    HandlerPanicked {
        /// The topic being dispatched
        topic: String,
        /// The failing subscription
        subscription: SubscriptionId,
        /// The panic payload, if it was a string
        message: String,
    },
}

/// Error returned by a handler to signal that it could not process an event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    /// Create a handler error with a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type returned by subscription handlers
pub type HandlerResult = Result<(), HandlerError>;

/// Identifier of a registered subscription, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which topics a subscription receives.
#[derive(Debug, Clone)]
pub enum TopicPattern {
    /// Every topic
    All,
    /// Exactly one topic name
    Exact(String),
    /// Every topic matching a regular expression
    Regex(Regex),
}

impl TopicPattern {
    /// Match one topic name exactly
    #[must_use]
    pub fn exact(topic: impl Into<String>) -> Self {
        Self::Exact(topic.into())
    }

    /// Match topics against a regular expression
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::InvalidPattern`] if the expression does not compile.
    pub fn regex(pattern: &str) -> Result<Self, EventBusError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| EventBusError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether `topic` is delivered to this pattern
    #[must_use]
    pub fn matches(&self, topic: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(name) => name == topic,
            Self::Regex(re) => re.is_match(topic),
        }
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "*"),
            Self::Exact(name) => write!(f, "{name}"),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Outcome of a single [`EventBus::publish`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Topic that was dispatched
    pub topic: String,
    /// Number of handlers that ran successfully
    pub delivered: usize,
    /// Failures captured from individual handlers
    pub failures: Vec<EventBusError>,
}

impl PublishReport {
    /// True when every matching handler succeeded
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of handlers that matched the topic
    #[must_use]
    pub fn matched(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

type Handler<E> = Arc<dyn Fn(&E) -> HandlerResult + Send + Sync>;

struct Subscription<E> {
    id: SubscriptionId,
    pattern: TopicPattern,
    handler: Handler<E>,
}

/// In-process, synchronous event bus.
///
/// Cloning an `EventBus` yields another handle onto the same subscriber list.
///
/// # Thread Safety
///
/// The subscriber list sits behind a `RwLock` which is released before any
/// handler runs, so handlers are free to publish or subscribe re-entrantly.
pub struct EventBus<E> {
    subscriptions: Arc<RwLock<Vec<Subscription<E>>>>,
    next_id: Arc<AtomicU64>,
}

impl<E> EventBus<E> {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a handler for every topic matching `pattern`
    ///
    /// Handlers run in registration order relative to other handlers on the
    /// same topic.
    pub fn subscribe<F>(&self, pattern: TopicPattern, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> HandlerResult + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::trace!(subscription = %id, pattern = %pattern, "Subscribed");

        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                id,
                pattern,
                handler: Arc::new(handler),
            });
        id
    }

    /// Remove one subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        before != subscriptions.len()
    }

    /// Remove every subscription
    pub fn unsubscribe_all(&self) {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of registered subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<E: Event> EventBus<E> {
    /// Deliver `event` to every matching handler, synchronously
    ///
    /// Each handler invocation is isolated: errors and panics are captured,
    /// logged, and returned in the report while the remaining handlers still run.
    pub fn publish(&self, event: &E) -> PublishReport {
        let topic = event.topic();

        // Snapshot matching handlers so the lock is not held during dispatch
        let matching: Vec<(SubscriptionId, Handler<E>)> = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.pattern.matches(&topic))
            .map(|s| (s.id, Arc::clone(&s.handler)))
            .collect();

        tracing::trace!(topic = %topic, handlers = matching.len(), "Publishing event");

        let mut report = PublishReport {
            topic: topic.to_string(),
            delivered: 0,
            failures: Vec::new(),
        };

        for (subscription, handler) in matching {
            match catch_unwind(AssertUnwindSafe(|| (handler.as_ref())(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(error)) => {
                    tracing::error!(
                        topic = %topic,
                        subscription = %subscription,
                        error = %error,
                        "Event handler failed"
                    );
                    report.failures.push(EventBusError::HandlerFailed {
                        topic: topic.to_string(),
                        subscription,
                        reason: error.to_string(),
                    });
                },
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(
                        topic = %topic,
                        subscription = %subscription,
                        panic = %message,
                        "Event handler panicked"
                    );
                    report.failures.push(EventBusError::HandlerPanicked {
                        topic: topic.to_string(),
                        subscription,
                        message,
                    });
                },
            }
        }

        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            subscriptions: Arc::clone(&self.subscriptions),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        FieldChanged { form: &'static str, field: &'static str },
        CartChanged,
        Nested,
    }

    impl Event for TestEvent {
        fn topic(&self) -> Cow<'static, str> {
            match self {
                Self::FieldChanged { form, field } => Cow::Owned(format!("{form}.{field}:change")),
                Self::CartChanged => Cow::Borrowed("cart:changed"),
                Self::Nested => Cow::Borrowed("nested"),
            }
        }
    }

    #[test]
    fn exact_subscription_receives_only_its_topic() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        bus.subscribe(TopicPattern::exact("cart:changed"), move |e: &TestEvent| {
            sink.lock().unwrap().push(e.topic().to_string());
            Ok(())
        });

        bus.publish(&TestEvent::FieldChanged { form: "order", field: "address" });
        bus.publish(&TestEvent::CartChanged);

        assert_eq!(*log.lock().unwrap(), vec!["cart:changed".to_string()]);
    }

    #[test]
    fn regex_subscription_matches_field_changes() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        bus.subscribe(TopicPattern::regex(r"^order\..*:change$").unwrap(), move |e: &TestEvent| {
            sink.lock().unwrap().push(e.topic().to_string());
            Ok(())
        });

        bus.publish(&TestEvent::FieldChanged { form: "order", field: "address" });
        bus.publish(&TestEvent::FieldChanged { form: "contacts", field: "email" });
        bus.publish(&TestEvent::CartChanged);

        assert_eq!(*log.lock().unwrap(), vec!["order.address:change".to_string()]);
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = TopicPattern::regex("order(").unwrap_err();
        assert!(matches!(err, EventBusError::InvalidPattern { .. }));
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = Arc::clone(&order);
            bus.subscribe(TopicPattern::All, move |_: &TestEvent| {
                order.lock().unwrap().push(n);
                Ok(())
            });
        }

        let report = bus.publish(&TestEvent::CartChanged);

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(report.delivered, 3);
    }

    #[test]
    fn failing_handler_does_not_stop_siblings() {
        let bus = EventBus::new();
        let hits = Arc::new(Mutex::new(0));

        bus.subscribe(TopicPattern::All, |_: &TestEvent| Err(HandlerError::new("render failed")));
        bus.subscribe(TopicPattern::All, |_: &TestEvent| panic!("boom"));
        let counter = Arc::clone(&hits);
        bus.subscribe(TopicPattern::All, move |_: &TestEvent| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let report = bus.publish(&TestEvent::CartChanged);

        assert_eq!(*hits.lock().unwrap(), 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.matched(), 3);
        assert!(matches!(
            &report.failures[0],
            EventBusError::HandlerFailed { reason, .. } if reason == "render failed"
        ));
        assert!(matches!(
            &report.failures[1],
            EventBusError::HandlerPanicked { message, .. } if message == "boom"
        ));
    }

    #[test]
    fn nested_publish_is_delivered_before_outer_returns() {
        let bus: EventBus<TestEvent> = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_bus = bus.clone();
        let sink = Arc::clone(&log);
        bus.subscribe(TopicPattern::exact("cart:changed"), move |_| {
            sink.lock().unwrap().push("outer-start");
            inner_bus.publish(&TestEvent::Nested);
            sink.lock().unwrap().push("outer-end");
            Ok(())
        });
        let sink = Arc::clone(&log);
        bus.subscribe(TopicPattern::exact("nested"), move |_| {
            sink.lock().unwrap().push("nested");
            Ok(())
        });

        bus.publish(&TestEvent::CartChanged);

        assert_eq!(*log.lock().unwrap(), vec!["outer-start", "nested", "outer-end"]);
    }

    #[test]
    fn subscribing_during_dispatch_does_not_deadlock() {
        let bus: EventBus<TestEvent> = EventBus::new();
        let inner_bus = bus.clone();
        bus.subscribe(TopicPattern::All, move |_| {
            inner_bus.subscribe(TopicPattern::All, |_| Ok(()));
            Ok(())
        });

        let report = bus.publish(&TestEvent::CartChanged);

        assert_eq!(report.delivered, 1);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn unsubscribe_removes_handler() {
        let bus: EventBus<TestEvent> = EventBus::new();
        let id = bus.subscribe(TopicPattern::All, |_| Ok(()));
        bus.subscribe(TopicPattern::All, |_| Ok(()));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.publish(&TestEvent::CartChanged).delivered, 1);

        bus.unsubscribe_all();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&TestEvent::CartChanged).matched(), 0);
    }

    proptest::proptest! {
        #[test]
        fn exact_pattern_matches_only_identical_topic(a in "[a-z]{1,8}:[a-z]{1,8}", b in "[a-z]{1,8}:[a-z]{1,8}") {
            let pattern = TopicPattern::exact(a.clone());
            proptest::prop_assert!(pattern.matches(&a));
            proptest::prop_assert_eq!(pattern.matches(&b), a == b);
            proptest::prop_assert!(TopicPattern::All.matches(&b));
        }
    }
}
