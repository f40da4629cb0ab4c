//! Processing of a single URL
//!
//! One call maps the URL to its local path, obtains the body (disk first,
//! network otherwise), queues the in-prefix links it has not seen before and
//! finally persists the page.

use crate::crawler::parser::extract_links;
use crate::output::CrawlStats;
use crate::state::{Frontier, VisitedSet};
use crate::storage::{PageSource, PageStore};
use crate::url::{defrag, map_url_to_path, resolve, Seed};
use crate::MirrorError;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Everything a page needs from the run it belongs to
///
/// One context is created per run and shared by all concurrently processed
/// pages; the visited set, the frontier and the counters are the only parts
/// that are mutated.
#[derive(Debug)]
pub struct PageContext {
    pub seed: Seed,
    pub out_dir: PathBuf,
    pub store: PageStore,
    pub visited: VisitedSet,
    pub frontier: Frontier,
    pub stats: CrawlStats,
    pub cancel: CancellationToken,
}

impl PageContext {
    /// Creates the context for a run, with the seed already visited and queued
    pub fn new(
        seed: Seed,
        out_dir: impl Into<PathBuf>,
        store: PageStore,
        cancel: CancellationToken,
    ) -> Self {
        let visited = VisitedSet::new();
        let frontier = Frontier::new();
        visited.add(seed.as_str());
        frontier.push(seed.as_str());

        Self {
            seed,
            out_dir: out_dir.into(),
            store,
            visited,
            frontier,
            stats: CrawlStats::new(),
            cancel,
        }
    }
}

/// Processes one URL
///
/// # Steps
///
/// 1. Map the URL to its local path
/// 2. Read the page from disk, or fetch it
/// 3. Extract every anchor href
/// 4. Resolve each href against the seed and queue it if it is new and inside
///    the seed prefix; unparsable links are logged and skipped
/// 5. Write the page unless it is already on disk
///
/// # Errors
///
/// Any failure other than a bad individual link is returned, and the run treats
/// it as fatal.
pub async fn process_page(context: &PageContext, url: &str) -> Result<(), MirrorError> {
    let local_path = map_url_to_path(url, context.seed.as_str(), &context.out_dir)?;

    let page = context
        .store
        .fetch_or_read(url, &local_path, &context.cancel)
        .await?;

    match page.source {
        PageSource::Disk => context.stats.page_read_from_disk(),
        PageSource::Network => context.stats.page_fetched(),
    }

    let hrefs = extract_links(&page.body).map_err(|message| MirrorError::HtmlParse {
        url: url.to_string(),
        message,
    })?;

    tracing::trace!("{} links found on {}", hrefs.len(), url);
    for href in &hrefs {
        context.stats.link_seen();
        consider_link(context, href);
    }

    if context.store.write(&page.body, &local_path).await? {
        context.stats.page_written();
        tracing::debug!("wrote {} to {}", url, local_path.display());
    }

    Ok(())
}

/// Canonicalizes one href and queues it if it is new and in scope
///
/// Relative links are resolved against the seed, not against the page they
/// were found on. Out-of-prefix links are still marked visited so they are
/// only evaluated once.
fn consider_link(context: &PageContext, href: &str) {
    let defragged = match defrag(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("malformed url {:?}: {}", href, e);
            context.stats.link_malformed();
            return;
        }
    };

    let resolved = match resolve(context.seed.url(), &defragged) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("error joining url {:?}: {}", href, e);
            context.stats.link_malformed();
            return;
        }
    };

    let candidate = resolved.as_str();
    if !context.visited.insert(candidate) {
        return;
    }

    if context.seed.contains(candidate) {
        tracing::debug!("queued {}", candidate);
        context.frontier.push(candidate);
        context.stats.link_enqueued();
    } else {
        tracing::debug!("{} is outside {}, not following", candidate, context.seed);
        context.stats.link_out_of_scope();
    }
}
