//! Storefront reducer.
//!
//! # Flow
//!
//! 1. `LoadCatalog` fetches records; `CatalogLoaded` installs them
//! 2. `ToggleCart` adds or removes products
//! 3. `OpenDelivery` → field updates → `SubmitDelivery` captures the cart into the draft
//! 4. Contact field updates → `SubmitOrder` re-captures the cart and sends the draft
//! 5. `OrderSubmitted` empties cart and draft and revalidates both forms;
//!    `OrderFailed` leaves cart and draft untouched
//!
//! Every state change is reported with `Effect::Publish`; views never read
//! the state directly.

use crate::actions::{ModalContent, StorefrontAction};
use crate::environment::StorefrontEnvironment;
use crate::state::{CartToggle, StorefrontState};
use crate::types::CheckoutStage;
use larek_core::effect::Effect;
use larek_core::reducer::Reducer;
use larek_core::{SmallVec, async_effect, publish, smallvec};
use std::sync::Arc;

/// Storefront reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct StorefrontReducer;

impl StorefrontReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for StorefrontReducer {
    type State = StorefrontState;
    type Action = StorefrontAction;
    type Environment = StorefrontEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Catalog
            // ═══════════════════════════════════════════════════════════════
            StorefrontAction::LoadCatalog => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.product_list().await {
                        Ok(records) => Some(StorefrontAction::CatalogLoaded { records }),
                        Err(error) => {
                            tracing::error!(error = %error, "Catalog fetch failed");
                            Some(StorefrontAction::CatalogLoadFailed { reason: error.to_string() })
                        },
                    }
                }]
            },

            StorefrontAction::CatalogLoaded { records } => {
                let cart_was_filled = state.install_catalog(records);
                tracing::debug!(products = state.catalog_len(), "Catalog installed");

                let mut effects: SmallVec<[Effect<StorefrontAction>; 4]> =
                    publish![StorefrontAction::CatalogChanged {
                        entries: state.entries()
                    }];
                if cart_was_filled {
                    effects.push(Effect::Publish(StorefrontAction::CartChanged(
                        state.cart_snapshot(),
                    )));
                }
                effects
            },

            StorefrontAction::CatalogLoadFailed { reason } => {
                publish![StorefrontAction::CatalogLoadFailed { reason }]
            },

            StorefrontAction::SelectProduct { id } => {
                let Some(entry) = state.entry(&id) else {
                    tracing::debug!(id = %id, "Ignoring selection of unknown product");
                    return SmallVec::new();
                };
                publish![
                    StorefrontAction::ProductSelected(entry.clone()),
                    StorefrontAction::ModalOpened(ModalContent::Preview(entry)),
                ]
            },

            // ═══════════════════════════════════════════════════════════════
            // Cart
            // ═══════════════════════════════════════════════════════════════
            StorefrontAction::ToggleCart { id } => {
                let outcome = state.toggle_cart_membership(&id);
                if !outcome.changed() {
                    match outcome {
                        CartToggle::NotPurchasable => {
                            tracing::debug!(id = %id, "Ignoring toggle of unpriced product");
                        },
                        _ => tracing::debug!(id = %id, "Ignoring toggle of unknown product"),
                    }
                    return SmallVec::new();
                }

                tracing::debug!(id = %id, ?outcome, items = state.cart_len(), "Cart changed");
                publish![StorefrontAction::CartChanged(state.cart_snapshot())]
            },

            StorefrontAction::OpenCart => {
                state.capture_cart_into_draft();
                publish![
                    StorefrontAction::CartOpened(state.cart_snapshot()),
                    StorefrontAction::ModalOpened(ModalContent::Cart),
                ]
            },

            // ═══════════════════════════════════════════════════════════════
            // Delivery stage
            // ═══════════════════════════════════════════════════════════════
            StorefrontAction::OpenDelivery => {
                state.set_stage(CheckoutStage::DeliveryForm);
                publish![StorefrontAction::ModalOpened(ModalContent::DeliveryForm)]
            },

            StorefrontAction::UpdateDelivery(update) => {
                let valid = state.set_delivery_field(update);
                let mut effects: SmallVec<[Effect<StorefrontAction>; 4]> =
                    publish![StorefrontAction::DeliveryErrorsChanged(
                        state.delivery_errors().clone()
                    )];
                if valid {
                    effects.push(Effect::Publish(StorefrontAction::DeliveryReady(
                        state.draft().clone(),
                    )));
                }
                effects
            },

            StorefrontAction::SubmitDelivery => {
                state.capture_cart_into_draft();
                state.set_stage(CheckoutStage::ContactsForm);
                publish![StorefrontAction::ModalOpened(ModalContent::ContactsForm)]
            },

            // ═══════════════════════════════════════════════════════════════
            // Contacts stage and submission
            // ═══════════════════════════════════════════════════════════════
            StorefrontAction::UpdateContacts(update) => {
                let valid = state.set_contact_field(update);
                let mut effects: SmallVec<[Effect<StorefrontAction>; 4]> =
                    publish![StorefrontAction::ContactErrorsChanged(
                        state.contact_errors().clone()
                    )];
                if valid {
                    effects.push(Effect::Publish(StorefrontAction::ContactsReady(
                        state.draft().clone(),
                    )));
                }
                effects
            },

            StorefrontAction::SubmitOrder => {
                if state.stage() == CheckoutStage::Submitting {
                    tracing::warn!("Ignoring order submission: another one is in flight");
                    return SmallVec::new();
                }
                if state.stage() == CheckoutStage::Completed {
                    tracing::warn!("Ignoring order submission: order already completed");
                    return SmallVec::new();
                }

                state.capture_cart_into_draft();
                if state.draft().items.is_empty() {
                    tracing::warn!("Ignoring order submission: cart is empty");
                    return SmallVec::new();
                }

                state.set_stage(CheckoutStage::Submitting);
                let request = state.order_request();
                tracing::debug!(items = request.items.len(), total = request.total, "Submitting order");

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.submit_order(request).await {
                        Ok(confirmation) => Some(StorefrontAction::OrderSubmitted { confirmation }),
                        Err(error) => {
                            tracing::error!(error = %error, "Order submission failed");
                            Some(StorefrontAction::OrderFailed { reason: error.to_string() })
                        },
                    }
                }]
            },

            StorefrontAction::OrderSubmitted { confirmation } => {
                let receipt = state.complete_order(confirmation, env.clock.now());
                metrics::counter!("storefront.orders.completed").increment(1);
                tracing::info!(order = %receipt.id, total = receipt.total, "Order completed");

                publish![
                    StorefrontAction::CartChanged(state.cart_snapshot()),
                    StorefrontAction::DeliveryErrorsChanged(state.delivery_errors().clone()),
                    StorefrontAction::ContactErrorsChanged(state.contact_errors().clone()),
                    StorefrontAction::ModalOpened(ModalContent::Success {
                        total: receipt.total
                    }),
                    StorefrontAction::OrderCompleted(receipt),
                ]
            },

            StorefrontAction::OrderFailed { reason } => {
                state.set_stage(CheckoutStage::Failed);
                metrics::counter!("storefront.orders.failed").increment(1);
                publish![StorefrontAction::OrderFailed { reason }]
            },

            // ═══════════════════════════════════════════════════════════════
            // Modal
            // ═══════════════════════════════════════════════════════════════
            StorefrontAction::CloseModal => {
                if matches!(
                    state.stage(),
                    CheckoutStage::DeliveryForm | CheckoutStage::ContactsForm | CheckoutStage::Completed
                ) {
                    state.set_stage(CheckoutStage::Browsing);
                }
                publish![StorefrontAction::CloseModal]
            },

            // Notifications are published, never reduced
            StorefrontAction::CatalogChanged { .. }
            | StorefrontAction::CartChanged(_)
            | StorefrontAction::CartOpened(_)
            | StorefrontAction::ProductSelected(_)
            | StorefrontAction::ModalOpened(_)
            | StorefrontAction::DeliveryErrorsChanged(_)
            | StorefrontAction::DeliveryReady(_)
            | StorefrontAction::ContactErrorsChanged(_)
            | StorefrontAction::ContactsReady(_)
            | StorefrontAction::OrderCompleted(_) => {
                tracing::warn!("Notification sent to the store as an action; ignoring");
                SmallVec::new()
            },
        }
    }
}
