//! Typed events and topic naming.
//!
//! Notifications on the [`EventBus`](crate::event_bus::EventBus) are strongly
//! typed values. Each value names the topic it is delivered on, so subscribers
//! can match either an exact topic or a pattern while publishers never build
//! topic strings by hand.
//!
//! # Topic Naming Convention
//!
//! Topics follow the pattern `{subject}:{verb}`, with a dotted field path for
//! field-level notifications:
//!
//! - `catalog:changed` - The catalog was (re)installed
//! - `cart:changed` - Cart membership changed
//! - `order.address:change` - The delivery address field was edited
//!
//! # Example
//!
//! ```
//! use larek_core::event::Event;
//! use std::borrow::Cow;
//!
//! #[derive(Clone, Debug)]
//! enum ModalEvent {
//!     Opened,
//!     Closed,
//! }
//!
//! impl Event for ModalEvent {
//!     fn topic(&self) -> Cow<'static, str> {
//!         match self {
//!             ModalEvent::Opened => Cow::Borrowed("modal:open"),
//!             ModalEvent::Closed => Cow::Borrowed("modal:close"),
//!         }
//!     }
//! }
//!
//! assert_eq!(ModalEvent::Closed.topic(), "modal:close");
//! ```

use std::borrow::Cow;

/// A value that can be published on an event bus.
///
/// Implementations must return a stable topic for every variant. The topic is
/// used only for routing: handlers always receive the typed value.
pub trait Event {
    /// The topic this event is delivered on
    fn topic(&self) -> Cow<'static, str>;
}
