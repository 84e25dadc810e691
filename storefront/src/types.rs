//! Domain and wire types for the storefront.
//!
//! Wire types (`ProductRecord`, `OrderRequest`, `OrderConfirmation`) mirror
//! the shop API's JSON. Everything else is an owned snapshot that travels
//! inside notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier of a catalog product
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Raw product record as returned by the shop API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product id
    pub id: ProductId,
    /// Display title
    pub title: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Image URL (absolute once the client has applied the CDN prefix)
    pub image: String,
    /// Category tag
    pub category: String,
    /// Price in synapses; `None` means not purchasable
    pub price: Option<u64>,
}

/// Envelope of the catalog listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    /// Number of items reported by the server
    pub total: usize,
    /// The records
    pub items: Vec<ProductRecord>,
}

/// A catalog item. Content never changes after the catalog is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,
    /// Display title
    pub title: String,
    /// Long description
    pub description: String,
    /// Absolute image URL
    pub image: String,
    /// Category tag
    pub category: String,
    /// Price in synapses; `None` means not purchasable
    pub price: Option<u64>,
}

impl Product {
    /// Whether the product may enter the cart
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.price.is_some()
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            image: record.image,
            category: record.category,
            price: record.price,
        }
    }
}

/// Cart status of a product, derived from cart membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    /// Not in the cart
    Available,
    /// In the cart
    InCart,
}

/// A product together with its current cart status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// The product
    pub product: Product,
    /// Status at the time the snapshot was taken
    pub status: ProductStatus,
}

/// One numbered line of the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// 1-based display position
    pub position: usize,
    /// Product id
    pub id: ProductId,
    /// Product title
    pub title: String,
    /// Product price
    pub price: u64,
}

/// Snapshot of the whole cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    /// Lines in insertion order
    pub lines: Vec<CartLine>,
    /// Sum of line prices
    pub total: u64,
}

impl CartSnapshot {
    /// Whether `id` is one of the lines
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.lines.iter().any(|line| &line.id == id)
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment online
    Online,
    /// Cash on delivery
    Cash,
}

/// Fields of the delivery stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryField {
    /// Payment method
    Payment,
    /// Delivery address
    Address,
}

impl DeliveryField {
    /// Field name as used in topics and payloads
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Address => "address",
        }
    }
}

/// Fields of the contacts stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    /// E-mail address
    Email,
    /// Phone number
    Phone,
}

impl ContactField {
    /// Field name as used in topics and payloads
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

/// A typed write to one delivery-stage field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryUpdate {
    /// New address text
    Address(String),
    /// Selected payment method
    Payment(PaymentMethod),
}

impl DeliveryUpdate {
    /// The field this update targets
    #[must_use]
    pub const fn field(&self) -> DeliveryField {
        match self {
            Self::Address(_) => DeliveryField::Address,
            Self::Payment(_) => DeliveryField::Payment,
        }
    }
}

/// A typed write to one contacts-stage field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactUpdate {
    /// New e-mail text
    Email(String),
    /// New phone text
    Phone(String),
}

impl ContactUpdate {
    /// The field this update targets
    #[must_use]
    pub const fn field(&self) -> ContactField {
        match self {
            Self::Email(_) => ContactField::Email,
            Self::Phone(_) => ContactField::Phone,
        }
    }
}

/// Field-level messages for the delivery stage; only invalid fields are present
pub type DeliveryErrors = BTreeMap<DeliveryField, String>;

/// Field-level messages for the contacts stage; only invalid fields are present
pub type ContactErrors = BTreeMap<ContactField, String>;

/// In-progress order, assembled across both checkout stages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    /// Payment method, unset until the customer picks one
    pub payment: Option<PaymentMethod>,
    /// Delivery address
    pub address: String,
    /// Contact e-mail
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Cart ids captured when the delivery stage was submitted
    pub items: Vec<ProductId>,
    /// Cart total captured alongside `items`
    pub total: u64,
}

/// Body of `POST /order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Payment method (`null` when never selected)
    pub payment: Option<PaymentMethod>,
    /// Delivery address
    pub address: String,
    /// Contact e-mail
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Ordered product ids
    pub items: Vec<ProductId>,
    /// Order total
    pub total: u64,
}

impl From<&OrderDraft> for OrderRequest {
    fn from(draft: &OrderDraft) -> Self {
        Self {
            payment: draft.payment,
            address: draft.address.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            items: draft.items.clone(),
            total: draft.total,
        }
    }
}

/// Successful response of `POST /order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Server-assigned order id
    pub id: String,
    /// Amount charged
    pub total: u64,
}

/// Record of the last successful order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// Server-assigned order id
    pub id: String,
    /// Amount charged
    pub total: u64,
    /// When the confirmation was received
    pub placed_at: DateTime<Utc>,
}

/// Where the customer is in the checkout flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutStage {
    /// Looking at the catalog or cart
    #[default]
    Browsing,
    /// Filling in payment and address
    DeliveryForm,
    /// Filling in e-mail and phone
    ContactsForm,
    /// Order request in flight
    Submitting,
    /// Order accepted
    Completed,
    /// Order rejected; the contacts form may be submitted again
    Failed,
}

/// Text shown for a price
#[must_use]
pub fn price_label(price: Option<u64>) -> String {
    price.map_or_else(|| "Бесценно".to_string(), |value| format!("{value} синапсов"))
}

/// CSS modifier for a category tag
#[must_use]
pub fn category_modifier(category: &str) -> &'static str {
    match category {
        "софт-скилл" => "soft",
        "хард-скилл" => "hard",
        "дополнительное" => "additional",
        "кнопка" => "button",
        _ => "other",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn price_labels() {
        assert_eq!(price_label(Some(750)), "750 синапсов");
        assert_eq!(price_label(None), "Бесценно");
    }

    #[test]
    fn record_accepts_null_price() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"id":"854cef69","title":"HEX-леденец","description":"","image":"/Shell.svg","category":"другое","price":null}"#,
        )
        .unwrap();

        assert_eq!(record.id, ProductId::from("854cef69"));
        assert_eq!(record.price, None);
        assert!(!Product::from(record).is_purchasable());
    }

    #[test]
    fn order_request_wire_format() {
        let draft = OrderDraft {
            payment: Some(PaymentMethod::Cash),
            address: "Main St 1".into(),
            email: "a@b.com".into(),
            phone: "555".into(),
            items: vec![ProductId::from("1")],
            total: 100,
        };

        let json = serde_json::to_value(OrderRequest::from(&draft)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "payment": "cash",
                "address": "Main St 1",
                "email": "a@b.com",
                "phone": "555",
                "items": ["1"],
                "total": 100
            })
        );
    }

    #[test]
    fn unset_payment_serializes_as_null() {
        let json = serde_json::to_value(OrderRequest::from(&OrderDraft::default())).unwrap();
        assert!(json["payment"].is_null());
    }

    #[test]
    fn updates_name_their_field() {
        assert_eq!(DeliveryUpdate::Address(String::new()).field(), DeliveryField::Address);
        assert_eq!(DeliveryUpdate::Payment(PaymentMethod::Online).field().as_str(), "payment");
        assert_eq!(ContactUpdate::Phone("1".into()).field(), ContactField::Phone);
        assert_eq!(category_modifier("хард-скилл"), "hard");
        assert_eq!(category_modifier("unknown"), "other");
    }
}
