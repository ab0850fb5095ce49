//! Crawler module for the two-stage listing pipeline
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited HTTP fetching with domain allow-listing
//! - The index stage (paginated envelope decode) and detail stage
//!   (per-listing HTML extraction)
//! - Context correlation between the two stages
//! - Overall crawl coordination and progress reporting

mod client;
mod context;
mod coordinator;
mod detail;
mod dispatch;
mod index;
mod progress;

pub use client::{FetchClient, FetchedPage};
pub use context::{ContextRegistry, ContextToken};
pub use coordinator::Coordinator;
pub use detail::DetailStage;
pub use dispatch::{FetchJob, JobSender};
pub use index::IndexStage;
pub use progress::ProgressReporter;

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::config::Config;
use crate::listing::Listing;
use crate::sites::{self, SiteProfile};
use crate::{CrawlError, Result};

/// The run-scoped result collection. The index stage appends, the detail
/// stage mutates single slots, the progress reporter reads the length.
pub type SharedListings = Arc<Mutex<Vec<Listing>>>;

/// The closed set of supported crawlers, selected by name at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crawler {
    Century21Pt,
}

impl FromStr for Crawler {
    type Err = CrawlError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            sites::century21::CRAWLER_NAME => Ok(Crawler::Century21Pt),
            other => Err(CrawlError::UnknownCrawler(other.to_string())),
        }
    }
}

impl Crawler {
    /// Stable crawler name, used for output artifacts and destination
    /// templates.
    pub fn name(&self) -> &'static str {
        match self {
            Crawler::Century21Pt => sites::century21::CRAWLER_NAME,
        }
    }

    /// The site profile this crawler runs against.
    pub fn profile(&self) -> SiteProfile {
        match self {
            Crawler::Century21Pt => sites::century21::profile(),
        }
    }

    /// Runs a complete crawl and returns the crawler name together with
    /// everything that was accumulated.
    ///
    /// Faults inside the crawl never escape: the coordinator converts them
    /// into an early drain, so the returned collection may be partial. The
    /// error path here only covers setup (client or selector construction).
    pub async fn crawl(
        &self,
        run_date: NaiveDate,
        config: &Config,
    ) -> Result<(&'static str, Vec<Listing>)> {
        tracing::info!(crawler = self.name(), %run_date, "starting crawl");

        let coordinator = Coordinator::new(self.profile(), config)?;
        let listings = coordinator.run().await;

        tracing::info!(
            crawler = self.name(),
            listings = listings.len(),
            "crawl finished"
        );

        Ok((self.name(), listings))
    }
}
