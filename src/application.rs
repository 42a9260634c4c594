//! Application layer - crawl workflows
//!
//! [`ListingWalker`] turns one brand into records; [`CrawlOrchestrator`] runs
//! the walker over every brand and persists the results.

pub mod listing_walker;
pub mod orchestrator;

pub use listing_walker::ListingWalker;
pub use orchestrator::{CrawlOrchestrator, RunSummary};

use crate::infrastructure::DelayRange;
use tracing::debug;

/// Sleep a random duration from `range`; a zero draw returns immediately
pub(crate) async fn courtesy_pause(range: DelayRange) {
    let delay = range.sample();
    if delay.is_zero() {
        return;
    }
    debug!("Pausing {:?}", delay);
    tokio::time::sleep(delay).await;
}
