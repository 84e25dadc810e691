//! # Larek Storefront
//!
//! The Web Larek storefront: a product catalog, a cart, and a two-stage
//! checkout (delivery and payment, then contact details) that ends in an order
//! submitted to the shop API.
//!
//! ## Architecture
//!
//! - [`state::StorefrontState`] owns catalog, cart, order draft and form errors
//! - [`reducer::StorefrontReducer`] validates intents, mutates state and
//!   returns notifications plus network effects
//! - [`api::ShopApi`] is the remote shop; [`api::HttpShopApi`] talks to it over HTTP.
//!   The reducer uses `product_list` and `submit_order`; `product` (single
//!   item lookup) is client-only and not wired to any action, since previews
//!   render from the already loaded catalog
//! - [`views`] are headless view models fed by bus notifications
//!
//! ## Example
//!
//! ```ignore
//! use larek_storefront::{StorefrontStore, actions::StorefrontAction, views::Views};
//!
//! let store = larek_storefront::store(environment);
//! let views = Views::attach(store.bus());
//!
//! store.send(StorefrontAction::LoadCatalog).await?.wait().await;
//! if let Some(select) = views.page.click_card(0) {
//!     store.send(select).await?;
//! }
//! ```

pub mod actions;
pub mod api;
pub mod config;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod reducer;
pub mod state;
pub mod types;
pub mod views;

use actions::StorefrontAction;
use environment::StorefrontEnvironment;
use larek_runtime::Store;
use reducer::StorefrontReducer;
use state::StorefrontState;

/// Store type for the storefront
pub type StorefrontStore =
    Store<StorefrontState, StorefrontAction, StorefrontEnvironment, StorefrontReducer>;

/// Store with empty state
#[must_use]
pub fn store(environment: StorefrontEnvironment) -> StorefrontStore {
    Store::new(StorefrontState::new(), StorefrontReducer::new(), environment)
}
