use crate::config::RunConfig;
use crate::fetch::{PageFetcher, page_url};
use crate::model::{ListingRecord, RunOutcome, ScrapeRun};
use crate::parser::{ListingSelectors, PageParse};
use std::time::Duration;
use tracing::{error, info};

pub fn scrape_listings(
    config: &RunConfig,
    selectors: &ListingSelectors,
    fetcher: &dyn PageFetcher,
) -> ScrapeRun {
    let max_records = config.scrape.max_records;
    let delay = Duration::try_from_secs_f64(config.scrape.delay_secs).unwrap_or_default();
    let mut records: Vec<ListingRecord> = Vec::new();
    let mut page = 1usize;
    let mut pages_fetched = 0usize;

    info!(max_records, "starting listing scrape");

    let outcome = loop {
        if records.len() >= max_records {
            break RunOutcome::Completed;
        }

        let url = match page_url(&config.scrape.base_url, &config.scrape.page_param, page) {
            Ok(url) => url,
            Err(err) => {
                let message = format!("{err:#}");
                error!(page, error = %message, "failed to build page url");
                break RunOutcome::StoppedError { page, message };
            }
        };
        info!(page, %url, "processing page");

        let body = match fetcher.fetch(&url) {
            Ok(body) => body,
            Err(err) => {
                let message = format!("{err:#}");
                error!(page, %url, error = %message, "error fetching page");
                break RunOutcome::StoppedError { page, message };
            }
        };
        pages_fetched += 1;

        let budget = max_records - records.len();
        match selectors.parse_page(&body, budget) {
            Ok(PageParse::NoCards) => {
                info!(page, "no more listings found; stopping");
                break RunOutcome::StoppedEmpty { page };
            }
            Ok(PageParse::Records(page_records)) => {
                for record in page_records {
                    info!(
                        collected = records.len() + 1,
                        max_records,
                        title = %record.title,
                        "processed listing"
                    );
                    records.push(record);
                }
            }
            Err(err) => {
                let message = format!("{err:#}");
                error!(page, error = %message, "error processing page");
                break RunOutcome::StoppedError { page, message };
            }
        }

        if records.len() >= max_records {
            break RunOutcome::Completed;
        }

        page += 1;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    };

    info!(
        records = records.len(),
        pages = pages_fetched,
        %outcome,
        "scrape finished"
    );

    ScrapeRun {
        records,
        pages_fetched,
        outcome,
    }
}
