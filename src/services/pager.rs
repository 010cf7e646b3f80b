// src/services/pager.rs

//! Pagination driver for one registry variant.
//!
//! Performs a sizing request to estimate the page count, then walks result
//! pages sequentially, re-parsing the header defensively on every page and
//! yielding one batch of hashed records per page. A page whose body is the
//! "no records" sentinel terminates pagination early and corrects the page
//! estimate. Between pages the driver pauses for a short randomized delay
//! to bound request rate against the source.

use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::CrawlerConfig;
use crate::error::{AppError, Result};
use crate::models::{DebtorRecord, PageBatch, Variant};
use crate::services::hasher::hash_record;
use crate::services::mapper::{build_column_map, extract_record};
use crate::utils::http::Fetcher;

/// Sentinel row text marking an empty result page.
const NO_RECORDS: &str = "Нет записей";

/// Marker preceding the total record count in the page body.
const TOTAL_MARKER: &str = "Всего записей</small>";

/// Outcome of parsing one listing page.
#[derive(Debug)]
pub(crate) enum ParsedPage {
    Records(Vec<DebtorRecord>),
    NoRecords,
}

/// Walks the result pages of one variant until exhaustion.
pub struct VariantPager<'a> {
    fetcher: &'a Fetcher,
    variant: Variant,
    url: Url,
    page_size: u64,
    delay_min_ms: u64,
    delay_max_ms: u64,
    next_page: u64,
    total_rows: u64,
    total_pages: u64,
}

impl<'a> VariantPager<'a> {
    pub fn new(fetcher: &'a Fetcher, variant: Variant, config: &CrawlerConfig) -> Result<Self> {
        let url = Url::parse(&config.base_url)?.join(variant.path_suffix())?;
        Ok(Self {
            fetcher,
            variant,
            url,
            page_size: config.page_size,
            delay_min_ms: config.delay_min_ms,
            delay_max_ms: config.delay_max_ms,
            next_page: 1,
            total_rows: 0,
            total_pages: 0,
        })
    }

    /// Issue the sizing request and compute the page estimate.
    pub async fn start(&mut self) -> Result<()> {
        let body = self
            .fetcher
            .fetch_text(&self.url, &[("p", "1".to_string())])
            .await?;
        self.total_rows = extract_total_rows(&body)?;
        self.total_pages = page_count(self.total_rows, self.page_size);
        log::info!(
            "type_id {}: sizing reported {} records across {} pages",
            self.variant.id(),
            self.total_rows,
            self.total_pages
        );
        Ok(())
    }

    /// Fetch and parse the next page, or `None` once pagination is done.
    pub async fn next_batch(&mut self) -> Result<Option<PageBatch>> {
        if self.next_page > self.total_pages {
            return Ok(None);
        }
        if self.next_page > 1 {
            self.politeness_pause().await;
        }

        let page = self.next_page;
        let body = self
            .fetcher
            .fetch_text(&self.url, &[("p", page.to_string())])
            .await?;
        Ok(self.apply_parsed(page, parse_listing(&body, self.variant)?))
    }

    /// Advance the driver state with one parsed page.
    ///
    /// The sentinel corrects the page estimate down to the page it was
    /// seen on; an empty page stops pagination without correcting it.
    fn apply_parsed(&mut self, page: u64, parsed: ParsedPage) -> Option<PageBatch> {
        match parsed {
            ParsedPage::NoRecords => {
                log::info!(
                    "type_id {}: no records on page {}, truncating page estimate",
                    self.variant.id(),
                    page
                );
                self.total_pages = page;
                None
            }
            ParsedPage::Records(records) if records.is_empty() => None,
            ParsedPage::Records(records) => {
                self.next_page += 1;
                Some(PageBatch { page, records })
            }
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Page the driver is currently positioned at, for abort context.
    pub fn current_page(&self) -> u64 {
        self.next_page
    }

    async fn politeness_pause(&self) {
        let ms = if self.delay_max_ms > self.delay_min_ms {
            fastrand::u64(self.delay_min_ms..=self.delay_max_ms)
        } else {
            self.delay_min_ms
        };
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

/// Total pages for a record count at the given page size (ceiling).
pub(crate) fn page_count(total_rows: u64, page_size: u64) -> u64 {
    total_rows.div_ceil(page_size)
}

/// Pull the total record count out of a sizing response body.
pub(crate) fn extract_total_rows(body: &str) -> Result<u64> {
    let after = body.split(TOTAL_MARKER).nth(1).ok_or_else(|| {
        AppError::layout("total records", "count marker not found in sizing response")
    })?;
    let run = after.split('<').next().unwrap_or("");
    let digits: String = run.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().map_err(|_| {
        AppError::layout(
            "total records",
            format!("no digits after count marker: '{}'", run.trim()),
        )
    })
}

/// Parse one listing page into hashed records or the sentinel.
pub(crate) fn parse_listing(body: &str, variant: Variant) -> Result<ParsedPage> {
    let document = Html::parse_document(body);
    let context = format!("type {} listing", variant.id());

    let header_sel = parse_selector("thead th")?;
    let headers: Vec<String> = document
        .select(&header_sel)
        .map(|th| collect_text(&th))
        .collect();
    if headers.is_empty() {
        return Err(AppError::layout(context, "missing table header"));
    }

    let column_map = build_column_map(&headers, variant);
    if column_map.is_empty() {
        return Err(AppError::layout(
            context,
            "no recognized header labels; the page structure likely changed",
        ));
    }

    let body_sel = parse_selector("tbody")?;
    if document.select(&body_sel).next().is_none() {
        return Err(AppError::layout(context, "missing table body"));
    }

    let row_sel = parse_selector("tbody tr")?;
    let cell_sel = parse_selector("td")?;
    let rows: Vec<ElementRef> = document.select(&row_sel).collect();

    if rows.len() == 1 && collect_text(&rows[0]).trim() == NO_RECORDS {
        return Ok(ParsedPage::NoRecords);
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let cells: Vec<String> = row.select(&cell_sel).map(|td| collect_text(&td)).collect();
        let mut record = extract_record(&cells, &column_map, variant)?;
        record.hash_value = hash_record(&record)?;
        records.push(record);
    }
    Ok(ParsedPage::Records(records))
}

fn collect_text(element: &ElementRef) -> String {
    element.text().collect()
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::layout(selector, format!("{e:?}")))
}
