//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use larek_core::async_effect;
///
/// async_effect! {
///     match api.product_list().await {
///         Ok(records) => Some(StorefrontAction::CatalogLoaded { records }),
///         Err(error) => Some(StorefrontAction::CatalogLoadFailed { reason: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Publish` for each notification, preserving order
///
/// # Example
///
/// ```rust,ignore
/// use larek_core::publish;
///
/// let effects = publish![
///     StorefrontAction::CartChanged { lines, total },
///     StorefrontAction::ModalClosed,
/// ];
/// ```
#[macro_export]
macro_rules! publish {
    ($($event:expr),* $(,)?) => {
        $crate::smallvec![$($crate::effect::Effect::Publish($event)),*]
    };
}
