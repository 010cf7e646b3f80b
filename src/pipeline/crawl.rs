// src/pipeline/crawl.rs

//! Crawl cycle for one registry variant.

use chrono::Utc;

use crate::config::{Config, CrawlerConfig};
use crate::error::Result;
use crate::models::{CompletedCrawl, RunState, Variant};
use crate::services::VariantPager;
use crate::storage::{DebtorStore, RecordSink};
use crate::utils::http::Fetcher;

/// Crawl every page of a variant into the given table.
///
/// Returns the run counters together with a [`CompletedCrawl`] proof; the
/// proof exists only on this success path, which is what gates the reaper
/// on crawl completion.
pub async fn crawl_variant(
    fetcher: &Fetcher,
    sink: &dyn RecordSink,
    table: &str,
    variant: Variant,
    config: &CrawlerConfig,
) -> Result<(CompletedCrawl, RunState)> {
    let started_at = Utc::now();
    log::info!(
        "type_id {} ({}): crawl starting at {}",
        variant.id(),
        variant.title(),
        started_at
    );

    let mut pager = VariantPager::new(fetcher, variant, config)?;
    let mut run = RunState::new();

    if let Err(err) = pager.start().await {
        log::error!("type_id {}: sizing request failed: {err}", variant.id());
        return Err(err);
    }
    run.total_rows = pager.total_rows();
    run.total_pages = pager.total_pages();

    loop {
        let batch = match pager.next_batch().await {
            Ok(Some(batch)) => batch,
            Ok(None) => break,
            Err(err) => {
                log::error!(
                    "type_id {}: aborted on page {} ({})",
                    variant.id(),
                    pager.current_page(),
                    run.state_line()
                );
                return Err(err);
            }
        };

        if let Err(err) = sink.upsert_batch(table, &batch.records).await {
            log::error!(
                "type_id {}: upsert failed on page {} ({})",
                variant.id(),
                batch.page,
                run.state_line()
            );
            return Err(err);
        }
        run.record_batch(&batch);
        run.total_pages = pager.total_pages();
        log::info!("state: {}", run.state_line());
    }

    run.total_pages = pager.total_pages();
    Ok((CompletedCrawl::new(variant, started_at), run))
}

/// Incremental run: crawl the base table, then reap rows of this variant
/// that the run did not touch.
pub async fn run_crawl(
    config: &Config,
    store: &DebtorStore,
    fetcher: &Fetcher,
    variant: Variant,
) -> Result<RunState> {
    let table = &config.database.table;
    let (completed, mut run) =
        crawl_variant(fetcher, store, table, variant, &config.crawler).await?;

    log::info!(
        "deleting rows older than {} with type_id {}",
        completed.started_at(),
        variant.id()
    );
    run.deleted = store.reap(table, &completed).await?;
    log::info!("cleanup completed, deleted {} rows", run.deleted);

    Ok(run)
}
