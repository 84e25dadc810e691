//! Application state: catalog, cart, order draft and form errors.
//!
//! The state never publishes anything itself. Mutating operations report what
//! happened and the reducer turns those outcomes into notifications.
//!
//! Cart membership is the single source of truth for a product's status: the
//! cart is an insertion-ordered id set and [`StorefrontState::status`] is a
//! lookup in it, so "in cart" and "status is in-cart" cannot disagree.

use crate::types::{
    CartLine, CartSnapshot, CatalogEntry, CheckoutStage, ContactErrors, ContactField,
    ContactUpdate, DeliveryErrors, DeliveryField, DeliveryUpdate, OrderConfirmation, OrderDraft,
    OrderRequest, Product, ProductId, ProductRecord, ProductStatus, Receipt,
};
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

/// Message for an empty address
pub const ADDRESS_REQUIRED: &str = "Необходимо указать адрес";
/// Message for an empty e-mail
pub const EMAIL_REQUIRED: &str = "Необходимо указать email";
/// Message for an empty phone
pub const PHONE_REQUIRED: &str = "Необходимо указать телефон";

/// Outcome of [`StorefrontState::toggle_cart_membership`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartToggle {
    /// Appended to the end of the cart
    Added,
    /// Removed; remaining lines keep their relative order
    Removed,
    /// Product has no price
    NotPurchasable,
    /// Id is not in the catalog
    UnknownProduct,
}

impl CartToggle {
    /// Whether cart membership changed
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

/// The storefront aggregate
#[derive(Debug, Clone, Default)]
pub struct StorefrontState {
    catalog: IndexMap<ProductId, Product>,
    cart: IndexSet<ProductId>,
    draft: OrderDraft,
    delivery_errors: DeliveryErrors,
    contact_errors: ContactErrors,
    stage: CheckoutStage,
    receipt: Option<Receipt>,
}

impl StorefrontState {
    /// Empty state: no catalog, empty cart, blank draft
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Catalog ────────────────────────────────────────────────────────────

    /// Replace the catalog. The cart is cleared since membership is not carried over.
    ///
    /// Returns `true` if the cart held anything before.
    pub fn install_catalog(&mut self, records: Vec<ProductRecord>) -> bool {
        self.catalog = records
            .into_iter()
            .map(|record| (record.id.clone(), Product::from(record)))
            .collect();
        let had_items = !self.cart.is_empty();
        self.cart.clear();
        had_items
    }

    /// Look up a product
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Products in catalog order
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.catalog.values()
    }

    /// Number of catalog products
    #[must_use]
    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    /// Snapshot of one product with its status
    #[must_use]
    pub fn entry(&self, id: &ProductId) -> Option<CatalogEntry> {
        self.catalog.get(id).map(|product| CatalogEntry {
            product: product.clone(),
            status: self.status_of(id),
        })
    }

    /// Snapshot of the whole catalog
    #[must_use]
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.catalog
            .iter()
            .map(|(id, product)| CatalogEntry {
                product: product.clone(),
                status: self.status_of(id),
            })
            .collect()
    }

    // ── Cart ───────────────────────────────────────────────────────────────

    /// Add a priced, available product or remove an in-cart one
    pub fn toggle_cart_membership(&mut self, id: &ProductId) -> CartToggle {
        let Some(product) = self.catalog.get(id) else {
            return CartToggle::UnknownProduct;
        };

        if self.cart.shift_remove(id) {
            CartToggle::Removed
        } else if product.is_purchasable() {
            self.cart.insert(id.clone());
            CartToggle::Added
        } else {
            CartToggle::NotPurchasable
        }
    }

    /// Status of a catalog product, `None` if the id is unknown
    #[must_use]
    pub fn status(&self, id: &ProductId) -> Option<ProductStatus> {
        self.catalog.contains_key(id).then(|| self.status_of(id))
    }

    fn status_of(&self, id: &ProductId) -> ProductStatus {
        if self.cart.contains(id) {
            ProductStatus::InCart
        } else {
            ProductStatus::Available
        }
    }

    /// 1-based cart position, `None` when not in the cart
    #[must_use]
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.cart.get_index_of(id).map(|index| index + 1)
    }

    /// Cart ids in insertion order
    pub fn cart_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.cart.iter()
    }

    /// Number of products in the cart
    #[must_use]
    pub fn cart_len(&self) -> usize {
        self.cart.len()
    }

    /// Sum of prices in the cart; 0 when empty
    #[must_use]
    pub fn cart_total(&self) -> u64 {
        self.cart
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .filter_map(|product| product.price)
            .fold(0, u64::saturating_add)
    }

    /// Numbered cart lines and total
    #[must_use]
    pub fn cart_snapshot(&self) -> CartSnapshot {
        let lines = self
            .cart
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let product = self.catalog.get(id)?;
                Some(CartLine {
                    position: index + 1,
                    id: id.clone(),
                    title: product.title.clone(),
                    price: product.price?,
                })
            })
            .collect();

        CartSnapshot {
            lines,
            total: self.cart_total(),
        }
    }

    /// Clear the cart
    pub fn empty_cart(&mut self) {
        self.cart.clear();
    }

    // ── Order draft ────────────────────────────────────────────────────────

    /// Current draft
    #[must_use]
    pub const fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Capture cart ids and total into the draft
    ///
    /// The only writer of `items` and `total`, so the two always describe the
    /// same cart.
    pub fn capture_cart_into_draft(&mut self) {
        self.draft.items = self.cart.iter().cloned().collect();
        self.draft.total = self.cart_total();
    }

    /// Write one delivery field and revalidate the stage. Returns `true` when valid.
    pub fn set_delivery_field(&mut self, update: DeliveryUpdate) -> bool {
        match update {
            DeliveryUpdate::Address(address) => self.draft.address = address,
            DeliveryUpdate::Payment(method) => self.draft.payment = Some(method),
        }
        self.validate_delivery()
    }

    /// Write one contact field and revalidate the stage. Returns `true` when valid.
    pub fn set_contact_field(&mut self, update: ContactUpdate) -> bool {
        match update {
            ContactUpdate::Email(email) => self.draft.email = email,
            ContactUpdate::Phone(phone) => self.draft.phone = phone,
        }
        self.validate_contacts()
    }

    /// Recompute the delivery error map from the draft
    pub fn validate_delivery(&mut self) -> bool {
        let mut errors = DeliveryErrors::new();
        if self.draft.address.is_empty() {
            errors.insert(DeliveryField::Address, ADDRESS_REQUIRED.to_string());
        }
        self.delivery_errors = errors;
        self.delivery_errors.is_empty()
    }

    /// Recompute the contacts error map from the draft
    pub fn validate_contacts(&mut self) -> bool {
        let mut errors = ContactErrors::new();
        if self.draft.email.is_empty() {
            errors.insert(ContactField::Email, EMAIL_REQUIRED.to_string());
        }
        if self.draft.phone.is_empty() {
            errors.insert(ContactField::Phone, PHONE_REQUIRED.to_string());
        }
        self.contact_errors = errors;
        self.contact_errors.is_empty()
    }

    /// Delivery-stage errors from the last validation
    #[must_use]
    pub const fn delivery_errors(&self) -> &DeliveryErrors {
        &self.delivery_errors
    }

    /// Contacts-stage errors from the last validation
    #[must_use]
    pub const fn contact_errors(&self) -> &ContactErrors {
        &self.contact_errors
    }

    /// Request body built from the draft
    #[must_use]
    pub fn order_request(&self) -> OrderRequest {
        OrderRequest::from(&self.draft)
    }

    // ── Checkout ───────────────────────────────────────────────────────────

    /// Current checkout stage
    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// Move to `stage`
    pub fn set_stage(&mut self, stage: CheckoutStage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "Checkout stage changed");
        self.stage = stage;
    }

    /// Apply a successful submission: empty cart, fresh draft, store receipt
    ///
    /// Both error maps are recomputed against the blank draft.
    pub fn complete_order(
        &mut self,
        confirmation: OrderConfirmation,
        placed_at: DateTime<Utc>,
    ) -> Receipt {
        self.empty_cart();
        self.draft = OrderDraft::default();
        self.validate_delivery();
        self.validate_contacts();
        self.set_stage(CheckoutStage::Completed);

        let receipt = Receipt {
            id: confirmation.id,
            total: confirmation.total,
            placed_at,
        };
        self.receipt = Some(receipt.clone());
        receipt
    }

    /// Last successful order, if any
    #[must_use]
    pub const fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }
}
