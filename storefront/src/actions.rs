//! Storefront actions.
//!
//! One enum carries three kinds of values:
//!
//! - **Intents** sent by views (`ToggleCart`, `SubmitDelivery`, ...)
//! - **Results** fed back by network effects (`CatalogLoaded`, `OrderSubmitted`, ...)
//! - **Notifications** published on the bus for views (`CartChanged`, `ModalOpened`, ...)
//!
//! `CatalogLoadFailed`, `OrderFailed` and `CloseModal` are both reduced and
//! republished as-is, so views see exactly what the store received.

use crate::types::{
    CartSnapshot, CatalogEntry, ContactErrors, ContactUpdate, DeliveryErrors, DeliveryUpdate,
    OrderConfirmation, OrderDraft, ProductId, ProductRecord, Receipt,
};
use larek_core::event::Event;
use std::borrow::Cow;

/// What the modal is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalContent {
    /// Product preview card
    Preview(CatalogEntry),
    /// Cart panel
    Cart,
    /// Payment and address form
    DeliveryForm,
    /// E-mail and phone form
    ContactsForm,
    /// Order accepted
    Success {
        /// Amount charged
        total: u64,
    },
}

/// All storefront actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontAction {
    // Intents
    /// Fetch the catalog from the shop API
    LoadCatalog,
    /// Open a product preview
    SelectProduct {
        /// Product to preview
        id: ProductId,
    },
    /// Add or remove a product
    ToggleCart {
        /// Product to toggle
        id: ProductId,
    },
    /// Show the cart panel
    OpenCart,
    /// Start checkout with the delivery form
    OpenDelivery,
    /// Edit a delivery field
    UpdateDelivery(DeliveryUpdate),
    /// Confirm the delivery stage
    SubmitDelivery,
    /// Edit a contact field
    UpdateContacts(ContactUpdate),
    /// Send the order
    SubmitOrder,
    /// Dismiss the modal (also published as the close notification)
    CloseModal,

    // Results
    /// Catalog fetched
    CatalogLoaded {
        /// Records with absolute image URLs
        records: Vec<ProductRecord>,
    },
    /// Catalog fetch failed (also published)
    CatalogLoadFailed {
        /// Error text
        reason: String,
    },
    /// Order accepted by the API
    OrderSubmitted {
        /// Server response
        confirmation: OrderConfirmation,
    },
    /// Order rejected or not delivered (also published)
    OrderFailed {
        /// Error text
        reason: String,
    },

    // Notifications
    /// The catalog was installed
    CatalogChanged {
        /// Every product with its status
        entries: Vec<CatalogEntry>,
    },
    /// Cart membership changed
    CartChanged(CartSnapshot),
    /// The cart panel was opened
    CartOpened(CartSnapshot),
    /// A product was selected for preview
    ProductSelected(CatalogEntry),
    /// The modal now shows `content`
    ModalOpened(ModalContent),
    /// Delivery errors were recomputed
    DeliveryErrorsChanged(DeliveryErrors),
    /// The delivery stage is valid
    DeliveryReady(OrderDraft),
    /// Contact errors were recomputed
    ContactErrorsChanged(ContactErrors),
    /// The contacts stage is valid
    ContactsReady(OrderDraft),
    /// The order went through
    OrderCompleted(Receipt),
}

impl Event for StorefrontAction {
    fn topic(&self) -> Cow<'static, str> {
        match self {
            Self::UpdateDelivery(update) => {
                Cow::Owned(format!("order.{}:change", update.field().as_str()))
            },
            Self::UpdateContacts(update) => {
                Cow::Owned(format!("contacts.{}:change", update.field().as_str()))
            },
            other => Cow::Borrowed(other.static_topic()),
        }
    }
}

impl StorefrontAction {
    const fn static_topic(&self) -> &'static str {
        match self {
            Self::LoadCatalog => "catalog:load",
            Self::SelectProduct { .. } => "card:select",
            Self::ToggleCart { .. } => "item:toggle",
            Self::OpenCart => "cart:open",
            Self::OpenDelivery => "order:open",
            Self::UpdateDelivery(_) => "order:change",
            Self::SubmitDelivery => "order:submit",
            Self::UpdateContacts(_) => "contacts:change",
            Self::SubmitOrder => "contacts:submit",
            Self::CloseModal => topics::MODAL_CLOSE,
            Self::CatalogLoaded { .. } => "catalog:loaded",
            Self::CatalogLoadFailed { .. } => topics::CATALOG_FAILED,
            Self::OrderSubmitted { .. } => "order:submitted",
            Self::OrderFailed { .. } => topics::ORDER_FAILED,
            Self::CatalogChanged { .. } => topics::CATALOG_CHANGED,
            Self::CartChanged(_) => topics::CART_CHANGED,
            Self::CartOpened(_) => topics::CART_OPENED,
            Self::ProductSelected(_) => topics::PRODUCT_SELECTED,
            Self::ModalOpened(_) => topics::MODAL_OPEN,
            Self::DeliveryErrorsChanged(_) => topics::DELIVERY_ERRORS,
            Self::DeliveryReady(_) => topics::DELIVERY_READY,
            Self::ContactErrorsChanged(_) => topics::CONTACT_ERRORS,
            Self::ContactsReady(_) => topics::CONTACTS_READY,
            Self::OrderCompleted(_) => topics::ORDER_COMPLETED,
        }
    }
}

/// Topics of the notifications views subscribe to
pub mod topics {
    /// [`CatalogChanged`](super::StorefrontAction::CatalogChanged)
    pub const CATALOG_CHANGED: &str = "catalog:changed";
    /// [`CatalogLoadFailed`](super::StorefrontAction::CatalogLoadFailed)
    pub const CATALOG_FAILED: &str = "catalog:failed";
    /// [`CartChanged`](super::StorefrontAction::CartChanged)
    pub const CART_CHANGED: &str = "cart:changed";
    /// [`CartOpened`](super::StorefrontAction::CartOpened)
    pub const CART_OPENED: &str = "cart:opened";
    /// [`ProductSelected`](super::StorefrontAction::ProductSelected)
    pub const PRODUCT_SELECTED: &str = "product:selected";
    /// [`ModalOpened`](super::StorefrontAction::ModalOpened)
    pub const MODAL_OPEN: &str = "modal:open";
    /// [`CloseModal`](super::StorefrontAction::CloseModal)
    pub const MODAL_CLOSE: &str = "modal:close";
    /// [`DeliveryErrorsChanged`](super::StorefrontAction::DeliveryErrorsChanged)
    pub const DELIVERY_ERRORS: &str = "formErrorsDelivery:change";
    /// [`DeliveryReady`](super::StorefrontAction::DeliveryReady)
    pub const DELIVERY_READY: &str = "order:ready";
    /// [`ContactErrorsChanged`](super::StorefrontAction::ContactErrorsChanged)
    pub const CONTACT_ERRORS: &str = "formErrorsContacts:change";
    /// [`ContactsReady`](super::StorefrontAction::ContactsReady)
    pub const CONTACTS_READY: &str = "contacts:ready";
    /// [`OrderCompleted`](super::StorefrontAction::OrderCompleted)
    pub const ORDER_COMPLETED: &str = "order:completed";
    /// [`OrderFailed`](super::StorefrontAction::OrderFailed)
    pub const ORDER_FAILED: &str = "order:failed";
}
