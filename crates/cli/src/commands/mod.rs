//! Command implementations. Each returns whether it succeeded.

pub mod catalog;
pub mod order;

use std::future::Future;

use quickshop_storefront::error::Notice;
use quickshop_storefront::page::PageScope;

/// Drive a page load until it finishes or the shopper presses Ctrl-C.
///
/// Returns `None` if the page was left.
async fn until_interrupted<F>(scope: &PageScope, load: F) -> Option<Option<Notice>>
where
    F: Future<Output = Option<Notice>>,
{
    tokio::select! {
        notice = load => Some(notice),
        _ = tokio::signal::ctrl_c() => {
            scope.leave();
            tracing::info!("Interrupted, leaving page");
            None
        }
    }
}
