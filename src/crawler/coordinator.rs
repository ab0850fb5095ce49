//! Crawl coordinator - main crawl orchestration logic
//!
//! Wires the fetch client and both stages over the shared result
//! collection, runs the drain loop, and owns the run's failure policy:
//! transport and decode problems only cost the affected response, while a
//! fatal correlation error or a panicked worker stops further scheduling
//! and the run returns whatever was accumulated. Partial results are an
//! expected outcome of this pipeline, not a failure to surface upward.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;

use super::client::FetchClient;
use super::context::ContextRegistry;
use super::detail::DetailStage;
use super::dispatch::{FetchJob, JobSender};
use super::index::IndexStage;
use super::progress::ProgressReporter;
use super::SharedListings;
use crate::config::Config;
use crate::listing::Listing;
use crate::sites::SiteProfile;
use crate::Result;

/// Index pages are roots of a request chain; detail fetches hang off them.
const INDEX_DEPTH: u32 = 1;
const DETAIL_DEPTH: u32 = 2;

pub struct Coordinator {
    client: Arc<FetchClient>,
    index: Arc<IndexStage>,
    detail: Arc<DetailStage>,
    listings: SharedListings,
    jobs: JobSender,
    job_rx: UnboundedReceiver<FetchJob>,
    report_period: Duration,
}

impl Coordinator {
    /// Builds the full pipeline for one site profile.
    pub fn new(profile: SiteProfile, config: &Config) -> Result<Self> {
        let profile = Arc::new(profile);

        let client = Arc::new(FetchClient::new(
            profile.allowed_domains.clone(),
            config.fetch.clone(),
        )?);

        let listings: SharedListings = Arc::new(Mutex::new(Vec::new()));
        let contexts = Arc::new(ContextRegistry::new());
        let (jobs, job_rx) = JobSender::channel();

        let index = Arc::new(IndexStage::new(
            profile.clone(),
            listings.clone(),
            contexts.clone(),
            jobs.clone(),
        ));
        let detail = Arc::new(DetailStage::new(profile, listings.clone(), contexts)?);

        Ok(Self {
            client,
            index,
            detail,
            listings,
            jobs,
            job_rx,
            report_period: Duration::from_secs(config.report.interval_secs),
        })
    }

    /// Runs the crawl to convergence and returns the result collection.
    ///
    /// The loop schedules page 1 of the index and then drains: received
    /// jobs are spawned as workers, completed workers decrement the
    /// outstanding counter, and the run is over when it reaches zero. After
    /// a fatal error or a worker panic the remaining queued jobs are
    /// discarded while in-flight fetches finish.
    pub async fn run(self) -> Vec<Listing> {
        let Coordinator {
            client,
            index,
            detail,
            listings,
            jobs,
            mut job_rx,
            report_period,
        } = self;

        let mut reporter = ProgressReporter::new();
        let reported = listings.clone();
        reporter
            .start(report_period, move || {
                let count = reported.lock().unwrap().len();
                tracing::info!("Scraped listings: {}", count);
            })
            .await;

        jobs.schedule(FetchJob::Index { page: 1 });

        let mut workers: JoinSet<Result<()>> = JoinSet::new();
        let mut aborted = false;

        while jobs.outstanding() > 0 {
            tokio::select! {
                Some(job) = job_rx.recv() => {
                    if aborted {
                        if let FetchJob::Detail { token, .. } = &job {
                            detail.abandon(*token);
                        }
                        jobs.complete_one();
                        continue;
                    }

                    workers.spawn(run_job(
                        client.clone(),
                        index.clone(),
                        detail.clone(),
                        job,
                    ));
                }

                Some(joined) = workers.join_next() => {
                    jobs.complete_one();

                    match joined {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) if err.is_fatal() => {
                            tracing::error!(%err, "fatal crawl error, halting response processing");
                            aborted = true;
                        }
                        Ok(Err(err)) => {
                            tracing::warn!(%err, "crawl worker failed");
                        }
                        Err(join_err) => {
                            tracing::error!(%join_err,
                                "crawl worker panicked, finishing with partial results");
                            aborted = true;
                        }
                    }
                }
            }
        }

        reporter.stop().await;

        // Release the stages so the coordinator holds the only live
        // reference to the collection.
        drop(index);
        drop(detail);

        match Arc::try_unwrap(listings) {
            Ok(collection) => collection.into_inner().unwrap(),
            Err(shared) => shared.lock().unwrap().clone(),
        }
    }
}

/// Executes one fetch job on a worker.
///
/// Transport failures are reported here and consume only this job; the
/// detail stage's correlation failure is the one error propagated upward.
async fn run_job(
    client: Arc<FetchClient>,
    index: Arc<IndexStage>,
    detail: Arc<DetailStage>,
    job: FetchJob,
) -> Result<()> {
    match job {
        FetchJob::Index { page } => {
            let url = index.page_url(page);
            match client.fetch(&url, INDEX_DEPTH).await {
                Ok(response) => {
                    index.handle(&response);
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!(%url, %err, "index fetch failed");
                    Ok(())
                }
            }
        }

        FetchJob::Detail { url, token } => match client.fetch(&url, DETAIL_DEPTH).await {
            Ok(response) => detail.handle(&response, token),
            Err(err) => {
                tracing::warn!(%url, %err, "detail fetch failed");
                detail.abandon(token);
                Ok(())
            }
        },
    }
}
