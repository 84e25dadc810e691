use super::{Shared, StorefrontBus, detach};
use crate::actions::{StorefrontAction, topics};
use crate::types::{ProductId, category_modifier, price_label};
use larek_core::event_bus::{SubscriptionId, TopicPattern};

/// A catalog card in the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Product id
    pub id: ProductId,
    /// Title
    pub title: String,
    /// Category tag
    pub category: String,
    /// CSS modifier derived from the category
    pub category_class: &'static str,
    /// Image URL
    pub image: String,
    /// Formatted price
    pub price: String,
}

/// Page shell state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageModel {
    /// Gallery cards in catalog order
    pub catalog: Vec<CardView>,
    /// Cart badge
    pub counter: usize,
    /// Scroll lock, set while the modal is open
    pub locked: bool,
}

/// Page shell: gallery, cart counter and scroll lock
#[derive(Debug)]
pub struct Page {
    model: Shared<PageModel>,
    subscriptions: Vec<SubscriptionId>,
}

impl Page {
    /// Subscribe to catalog, cart and modal notifications
    #[must_use]
    pub fn attach(bus: &StorefrontBus) -> Self {
        let model = Shared::new(PageModel::default());

        let catalog = model.clone();
        let on_catalog = bus.subscribe(TopicPattern::exact(topics::CATALOG_CHANGED), move |event| {
            if let StorefrontAction::CatalogChanged { entries } = event {
                catalog.update(|page| {
                    page.catalog = entries
                        .iter()
                        .map(|entry| CardView {
                            id: entry.product.id.clone(),
                            title: entry.product.title.clone(),
                            category: entry.product.category.clone(),
                            category_class: category_modifier(&entry.product.category),
                            image: entry.product.image.clone(),
                            price: price_label(entry.product.price),
                        })
                        .collect();
                });
            }
            Ok(())
        });

        let counter = model.clone();
        let on_cart = bus.subscribe(TopicPattern::exact(topics::CART_CHANGED), move |event| {
            if let StorefrontAction::CartChanged(snapshot) = event {
                counter.update(|page| page.counter = snapshot.lines.len());
            }
            Ok(())
        });

        let lock = model.clone();
        let on_open = bus.subscribe(TopicPattern::exact(topics::MODAL_OPEN), move |_| {
            lock.update(|page| page.locked = true);
            Ok(())
        });

        let unlock = model.clone();
        let on_close = bus.subscribe(TopicPattern::exact(topics::MODAL_CLOSE), move |_| {
            unlock.update(|page| page.locked = false);
            Ok(())
        });

        Self {
            model,
            subscriptions: vec![on_catalog, on_cart, on_open, on_close],
        }
    }

    /// Current model
    #[must_use]
    pub fn snapshot(&self) -> PageModel {
        self.model.get()
    }

    /// Intent for a click on gallery card `index`
    #[must_use]
    pub fn click_card(&self, index: usize) -> Option<StorefrontAction> {
        self.model
            .get()
            .catalog
            .get(index)
            .map(|card| StorefrontAction::SelectProduct { id: card.id.clone() })
    }

    /// Intent for a click on the cart icon
    #[must_use]
    pub const fn click_cart(&self) -> StorefrontAction {
        StorefrontAction::OpenCart
    }

    /// Unsubscribe from `bus`
    pub fn detach(&self, bus: &StorefrontBus) {
        detach(bus, &self.subscriptions);
    }
}
