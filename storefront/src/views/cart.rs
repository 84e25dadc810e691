use super::{Shared, StorefrontBus, detach};
use crate::actions::{StorefrontAction, topics};
use crate::types::{CartSnapshot, ProductId, price_label};
use larek_core::event_bus::{SubscriptionId, TopicPattern};

/// Text shown when the cart is empty
pub const EMPTY_CART: &str = "Товары еще не добавлены в корзину";

/// One numbered cart row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// 1-based index as displayed
    pub index: String,
    /// Product id
    pub id: ProductId,
    /// Title
    pub title: String,
    /// Formatted price
    pub price: String,
}

/// Cart panel state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanelModel {
    /// Rows in cart order
    pub lines: Vec<CartLineView>,
    /// Formatted total
    pub total: String,
    /// Placeholder shown instead of rows
    pub placeholder: Option<&'static str>,
    /// Checkout button state
    pub checkout_enabled: bool,
}

impl Default for CartPanelModel {
    fn default() -> Self {
        Self::from(&CartSnapshot::default())
    }
}

impl From<&CartSnapshot> for CartPanelModel {
    fn from(snapshot: &CartSnapshot) -> Self {
        let lines: Vec<CartLineView> = snapshot
            .lines
            .iter()
            .map(|line| CartLineView {
                index: line.position.to_string(),
                id: line.id.clone(),
                title: line.title.clone(),
                price: price_label(Some(line.price)),
            })
            .collect();

        Self {
            placeholder: lines.is_empty().then_some(EMPTY_CART),
            checkout_enabled: !lines.is_empty(),
            total: price_label(Some(snapshot.total)),
            lines,
        }
    }
}

/// Cart panel: numbered lines, total, checkout button
#[derive(Debug)]
pub struct CartPanel {
    model: Shared<CartPanelModel>,
    subscriptions: Vec<SubscriptionId>,
}

impl CartPanel {
    /// Subscribe to cart notifications
    #[must_use]
    pub fn attach(bus: &StorefrontBus) -> Self {
        let model = Shared::new(CartPanelModel::default());

        let target = model.clone();
        let subscription = bus.subscribe(
            TopicPattern::exact(topics::CART_CHANGED),
            move |event| {
                if let StorefrontAction::CartChanged(snapshot) = event {
                    target.update(|panel| *panel = CartPanelModel::from(snapshot));
                }
                Ok(())
            },
        );

        let target = model.clone();
        let opened = bus.subscribe(TopicPattern::exact(topics::CART_OPENED), move |event| {
            if let StorefrontAction::CartOpened(snapshot) = event {
                target.update(|panel| *panel = CartPanelModel::from(snapshot));
            }
            Ok(())
        });

        Self {
            model,
            subscriptions: vec![subscription, opened],
        }
    }

    /// Current model
    #[must_use]
    pub fn snapshot(&self) -> CartPanelModel {
        self.model.get()
    }

    /// Intent for the delete button on row `index` (0-based)
    #[must_use]
    pub fn remove_line(&self, index: usize) -> Option<StorefrontAction> {
        self.model
            .get()
            .lines
            .get(index)
            .map(|line| StorefrontAction::ToggleCart { id: line.id.clone() })
    }

    /// Intent for the checkout button; `None` while it is disabled
    #[must_use]
    pub fn checkout(&self) -> Option<StorefrontAction> {
        self.model
            .get()
            .checkout_enabled
            .then_some(StorefrontAction::OpenDelivery)
    }

    /// Unsubscribe from `bus`
    pub fn detach(&self, bus: &StorefrontBus) {
        detach(bus, &self.subscriptions);
    }
}
