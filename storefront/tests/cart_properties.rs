//! Property tests for cart membership and totals.

#![allow(clippy::unwrap_used)]

use larek_storefront::state::{CartToggle, StorefrontState};
use larek_storefront::types::{ProductId, ProductRecord, ProductStatus};
use proptest::prelude::*;
use std::collections::HashSet;

fn records(prices: &[Option<u64>]) -> Vec<ProductRecord> {
    prices
        .iter()
        .enumerate()
        .map(|(index, price)| ProductRecord {
            id: ProductId::new(format!("p{index}")),
            title: format!("Product {index}"),
            description: String::new(),
            image: String::new(),
            category: "другое".into(),
            price: *price,
        })
        .collect()
}

fn installed(prices: &[Option<u64>]) -> StorefrontState {
    let mut state = StorefrontState::new();
    state.install_catalog(records(prices));
    state
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Option<u64>>> {
    prop::collection::vec(prop::option::of(1u64..10_000), 1..12)
}

proptest! {
    #[test]
    fn in_cart_status_matches_cart_set(
        prices in catalog_strategy(),
        toggles in prop::collection::vec(0usize..16, 0..40),
    ) {
        let mut state = installed(&prices);
        for index in toggles {
            state.toggle_cart_membership(&ProductId::new(format!("p{index}")));
        }

        let cart: Vec<ProductId> = state.cart_ids().cloned().collect();
        let cart_set: HashSet<ProductId> = cart.iter().cloned().collect();
        prop_assert_eq!(cart.len(), cart_set.len());

        let in_cart: HashSet<ProductId> = state
            .products()
            .filter(|p| state.status(&p.id) == Some(ProductStatus::InCart))
            .map(|p| p.id.clone())
            .collect();
        prop_assert_eq!(in_cart, cart_set);

        for (offset, id) in cart.iter().enumerate() {
            prop_assert_eq!(state.position(id), Some(offset + 1));
        }
    }

    #[test]
    fn total_is_sum_of_cart_prices(
        prices in catalog_strategy(),
        toggles in prop::collection::vec(0usize..12, 0..30),
    ) {
        let mut state = installed(&prices);
        for index in toggles {
            state.toggle_cart_membership(&ProductId::new(format!("p{index}")));
        }

        let expected: u64 = state
            .cart_ids()
            .map(|id| state.product(id).unwrap().price.unwrap())
            .sum();
        prop_assert_eq!(state.cart_total(), expected);
        prop_assert_eq!(state.cart_snapshot().total, expected);
    }

    #[test]
    fn unpriced_products_never_enter_cart(
        prices in catalog_strategy(),
        index in 0usize..12,
    ) {
        let mut state = installed(&prices);
        let id = ProductId::new(format!("p{index}"));
        let before: Vec<ProductId> = state.cart_ids().cloned().collect();

        let outcome = state.toggle_cart_membership(&id);

        if prices.get(index).is_some_and(Option::is_none) {
            prop_assert_eq!(outcome, CartToggle::NotPurchasable);
            prop_assert_eq!(state.status(&id), Some(ProductStatus::Available));
            prop_assert_eq!(state.cart_ids().cloned().collect::<Vec<_>>(), before);
        }
    }

    #[test]
    fn double_toggle_restores_cart(
        prices in prop::collection::vec(1u64..10_000, 2..10),
        prefix in prop::collection::vec(0usize..10, 0..10),
        target in 0usize..10,
    ) {
        let priced: Vec<Option<u64>> = prices.iter().copied().map(Some).collect();
        let mut state = installed(&priced);
        for index in prefix {
            state.toggle_cart_membership(&ProductId::new(format!("p{index}")));
        }
        let id = ProductId::new(format!("p{}", target % priced.len()));
        if state.status(&id) == Some(ProductStatus::InCart) {
            state.toggle_cart_membership(&id);
        }
        let before: Vec<ProductId> = state.cart_ids().cloned().collect();

        prop_assert_eq!(state.toggle_cart_membership(&id), CartToggle::Added);
        prop_assert_eq!(state.toggle_cart_membership(&id), CartToggle::Removed);

        prop_assert_eq!(state.status(&id), Some(ProductStatus::Available));
        prop_assert_eq!(state.cart_ids().cloned().collect::<Vec<_>>(), before);
    }
}

#[test]
fn empty_cart_totals_zero() {
    let state = installed(&[Some(100), None]);
    assert_eq!(state.cart_total(), 0);
    assert!(state.cart_snapshot().lines.is_empty());
}
