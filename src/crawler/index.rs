//! Index stage
//!
//! Consumes one page of the paginated listing index per invocation. Each
//! decoded record is stamped, has its administrative fields derived, and is
//! appended to the result collection before its detail fetch is scheduled
//! with a freshly registered context. Paging metadata is decoded separately
//! from the same body and drives exactly one fetch of the next page.

use std::sync::Arc;

use chrono::Utc;

use super::client::FetchedPage;
use super::context::ContextRegistry;
use super::dispatch::{FetchJob, JobSender};
use super::SharedListings;
use crate::listing::{PagingInfo, SearchEnvelope};
use crate::sites::SiteProfile;

pub struct IndexStage {
    profile: Arc<SiteProfile>,
    listings: SharedListings,
    contexts: Arc<ContextRegistry>,
    jobs: JobSender,
}

impl IndexStage {
    pub fn new(
        profile: Arc<SiteProfile>,
        listings: SharedListings,
        contexts: Arc<ContextRegistry>,
        jobs: JobSender,
    ) -> Self {
        Self {
            profile,
            listings,
            contexts,
            jobs,
        }
    }

    /// Index URL for a page number, from the site profile.
    pub fn page_url(&self, page: u32) -> String {
        self.profile.index_url(page)
    }

    /// Handles one index response.
    ///
    /// Non-JSON or empty responses are discarded without affecting the run;
    /// so are bodies that fail to decode. Everything else grows the result
    /// collection and schedules follow-up work.
    pub fn handle(&self, page: &FetchedPage) {
        if !page.content_type.contains("json") {
            tracing::debug!(url = %page.url, content_type = %page.content_type,
                "discarding non-JSON index response");
            return;
        }

        if page.body.is_empty() {
            tracing::debug!(url = %page.url, "discarding empty index response");
            return;
        }

        let envelope: SearchEnvelope = match serde_json::from_str(&page.body) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(url = %page.url, %err, "discarding undecodable index page");
                return;
            }
        };

        tracing::debug!(
            url = %page.url,
            records = envelope.properties.len(),
            page = envelope.current_page,
            of = envelope.total_pages,
            "decoded index page"
        );

        for mut listing in envelope.properties {
            listing.crawled_at = Some(Utc::now());
            // Administrative fields are derived before the listing becomes
            // visible in the collection; the detail stage never touches them.
            listing.derive_administrative();

            let detail_url = self.profile.detail_url(&listing.url);

            let slot = {
                let mut listings = self.listings.lock().unwrap();
                listings.push(listing);
                listings.len() - 1
            };

            let token = self.contexts.register(slot);
            self.jobs.schedule(FetchJob::Detail {
                url: detail_url,
                token,
            });
        }

        // Paging is decoded on its own rather than reusing the envelope, and
        // the next page is scheduled once per response, after all records.
        if let Ok(paging) = serde_json::from_str::<PagingInfo>(&page.body) {
            if paging.current_page < paging.total_pages {
                self.jobs.schedule(FetchJob::Index {
                    page: paging.current_page + 1,
                });
            }
        }
    }
}
