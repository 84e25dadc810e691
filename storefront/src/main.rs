//! Loads the Web Larek catalog and prints the gallery.
//!
//! ```text
//! API_ORIGIN=https://larek-api.nomoreparties.co cargo run -p larek-storefront
//! ```

use anyhow::{Context, Result, bail};
use larek_core::event_bus::TopicPattern;
use larek_storefront::actions::{StorefrontAction, topics};
use larek_storefront::api::HttpShopApi;
use larek_storefront::config::Config;
use larek_storefront::environment::StorefrontEnvironment;
use larek_storefront::views::Views;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("reading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(api = %config.api_url(), cdn = %config.cdn_url(), "Starting storefront");

    let api = Arc::new(HttpShopApi::from_config(&config));
    let store = larek_storefront::store(StorefrontEnvironment::with_system_clock(api));
    let views = Views::attach(store.bus());

    let failed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&failed);
    store.bus().subscribe(TopicPattern::exact(topics::CATALOG_FAILED), move |_| {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    store
        .send(StorefrontAction::LoadCatalog)
        .await
        .context("sending catalog request")?
        .wait()
        .await;

    if failed.load(Ordering::SeqCst) {
        bail!("catalog could not be loaded");
    }

    let page = views.page.snapshot();
    for card in &page.catalog {
        println!("{:<40} {:<16} {}", card.title, card.category, card.price);
    }
    tracing::info!(products = page.catalog.len(), "Catalog loaded");

    views.detach(store.bus());
    store.shutdown();
    Ok(())
}
