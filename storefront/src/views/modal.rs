use super::{Shared, StorefrontBus, detach};
use crate::actions::{ModalContent, StorefrontAction, topics};
use crate::types::{CatalogEntry, ProductId, ProductStatus, category_modifier, price_label};
use larek_core::event_bus::{SubscriptionId, TopicPattern};

/// Product preview shown in the modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCard {
    /// Product id
    pub id: ProductId,
    /// Title
    pub title: String,
    /// Long description
    pub description: String,
    /// Image URL
    pub image: String,
    /// Category tag
    pub category: String,
    /// CSS modifier derived from the category
    pub category_class: &'static str,
    /// Formatted price
    pub price: String,
    /// Buy button label
    pub button_label: &'static str,
    /// Buy button state; unpriced products cannot be bought
    pub button_enabled: bool,
}

impl PreviewCard {
    fn new(entry: &CatalogEntry) -> Self {
        let product = &entry.product;
        let mut card = Self {
            id: product.id.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            category_class: category_modifier(&product.category),
            price: price_label(product.price),
            button_label: "",
            button_enabled: product.is_purchasable(),
        };
        card.set_status(entry.status);
        card
    }

    fn set_status(&mut self, status: ProductStatus) {
        self.button_label = match status {
            ProductStatus::Available => "В корзину",
            ProductStatus::InCart => "Удалить",
        };
    }
}

/// What the modal renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    /// Product preview
    Preview(PreviewCard),
    /// Cart panel
    Cart,
    /// Delivery form
    DeliveryForm,
    /// Contacts form
    ContactsForm,
    /// Order accepted
    Success {
        /// Amount charged
        total: u64,
        /// Text under the heading
        description: String,
    },
}

impl From<&ModalContent> for ModalView {
    fn from(content: &ModalContent) -> Self {
        match content {
            ModalContent::Preview(entry) => Self::Preview(PreviewCard::new(entry)),
            ModalContent::Cart => Self::Cart,
            ModalContent::DeliveryForm => Self::DeliveryForm,
            ModalContent::ContactsForm => Self::ContactsForm,
            ModalContent::Success { total } => Self::Success {
                total: *total,
                description: format!("Списано {total} синапсов"),
            },
        }
    }
}

/// Modal state; `content` is `None` while closed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalModel {
    /// Current content
    pub content: Option<ModalView>,
}

/// Modal container
#[derive(Debug)]
pub struct Modal {
    model: Shared<ModalModel>,
    subscriptions: Vec<SubscriptionId>,
}

impl Modal {
    /// Subscribe to modal and cart notifications
    #[must_use]
    pub fn attach(bus: &StorefrontBus) -> Self {
        let model = Shared::new(ModalModel::default());

        let target = model.clone();
        let on_open = bus.subscribe(TopicPattern::exact(topics::MODAL_OPEN), move |event| {
            if let StorefrontAction::ModalOpened(content) = event {
                target.update(|modal| modal.content = Some(ModalView::from(content)));
            }
            Ok(())
        });

        let target = model.clone();
        let on_close = bus.subscribe(TopicPattern::exact(topics::MODAL_CLOSE), move |_| {
            target.update(|modal| modal.content = None);
            Ok(())
        });

        // An open preview follows cart changes made from its own buy button
        let target = model.clone();
        let on_cart = bus.subscribe(TopicPattern::exact(topics::CART_CHANGED), move |event| {
            if let StorefrontAction::CartChanged(snapshot) = event {
                target.update(|modal| {
                    if let Some(ModalView::Preview(card)) = &mut modal.content {
                        let status = if snapshot.contains(&card.id) {
                            ProductStatus::InCart
                        } else {
                            ProductStatus::Available
                        };
                        card.set_status(status);
                    }
                });
            }
            Ok(())
        });

        Self {
            model,
            subscriptions: vec![on_open, on_close, on_cart],
        }
    }

    /// Current model
    #[must_use]
    pub fn snapshot(&self) -> ModalModel {
        self.model.get()
    }

    /// Whether anything is shown
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.model.get().content.is_some()
    }

    /// Intent for the preview's buy button; `None` unless a purchasable preview is shown
    #[must_use]
    pub fn buy(&self) -> Option<StorefrontAction> {
        match self.model.get().content {
            Some(ModalView::Preview(card)) if card.button_enabled => {
                Some(StorefrontAction::ToggleCart { id: card.id })
            },
            _ => None,
        }
    }

    /// Intent for the close button, the overlay, or the success panel's button
    #[must_use]
    pub const fn close(&self) -> StorefrontAction {
        StorefrontAction::CloseModal
    }

    /// Unsubscribe from `bus`
    pub fn detach(&self, bus: &StorefrontBus) {
        detach(bus, &self.subscriptions);
    }
}
