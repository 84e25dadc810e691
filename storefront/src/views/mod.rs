//! Headless view models.
//!
//! Each view subscribes to the notifications it renders and keeps a plain-data
//! model that a UI layer (or a test) can read with `snapshot()`. Views never
//! touch the store's state; user intent is turned into a [`StorefrontAction`]
//! for the caller to send.
//!
//! [`StorefrontAction`]: crate::actions::StorefrontAction

mod cart;
mod form;
mod modal;
mod page;

pub use cart::{CartLineView, CartPanel, CartPanelModel, EMPTY_CART};
pub use form::{FormKind, FormModel, FormPanel};
pub use modal::{Modal, ModalModel, ModalView, PreviewCard};
pub use page::{CardView, Page, PageModel};

use crate::actions::StorefrontAction;
use larek_core::event_bus::{EventBus, SubscriptionId};
use std::sync::{Arc, Mutex, PoisonError};

/// Bus type every view attaches to
pub type StorefrontBus = EventBus<StorefrontAction>;

/// Model shared between a view and its subscriptions
#[derive(Debug)]
struct Shared<T>(Arc<Mutex<T>>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Clone> Shared<T> {
    fn new(model: T) -> Self {
        Self(Arc::new(Mutex::new(model)))
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn get(&self) -> T {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Remove a view's subscriptions
fn detach(bus: &StorefrontBus, subscriptions: &[SubscriptionId]) {
    for id in subscriptions {
        bus.unsubscribe(*id);
    }
}

/// Every view of the storefront, attached to one bus
#[derive(Debug)]
pub struct Views {
    /// Page shell
    pub page: Page,
    /// Cart panel
    pub cart: CartPanel,
    /// Delivery form
    pub delivery: FormPanel,
    /// Contacts form
    pub contacts: FormPanel,
    /// Modal container
    pub modal: Modal,
}

impl Views {
    /// Attach every view to `bus`
    #[must_use]
    pub fn attach(bus: &StorefrontBus) -> Self {
        Self {
            page: Page::attach(bus),
            cart: CartPanel::attach(bus),
            delivery: FormPanel::attach(bus, FormKind::Delivery),
            contacts: FormPanel::attach(bus, FormKind::Contacts),
            modal: Modal::attach(bus),
        }
    }

    /// Detach every view from `bus`
    pub fn detach(&self, bus: &StorefrontBus) {
        self.page.detach(bus);
        self.cart.detach(bus);
        self.delivery.detach(bus);
        self.contacts.detach(bus);
        self.modal.detach(bus);
    }
}
