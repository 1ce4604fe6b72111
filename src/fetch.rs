use crate::config::ScrapeConfig;
use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(scrape: &ScrapeConfig) -> Result<Self> {
        let mut headers = scrape
            .headers
            .iter()
            .map(|(name, value)| {
                let header = HeaderName::try_from(name.as_str())
                    .with_context(|| format!("invalid header name {name}"))?;
                let value = HeaderValue::try_from(value.as_str())
                    .with_context(|| format!("invalid header value for {name}"))?;
                Ok((header, value))
            })
            .collect::<Result<HeaderMap>>()?;
        headers.insert(
            USER_AGENT,
            HeaderValue::try_from(scrape.user_agent.as_str()).context("invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(scrape.timeout_secs))
            .default_headers(headers)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("request to {url} failed with status {status}");
        }

        let bytes = resp
            .bytes()
            .with_context(|| format!("failed to read body from {url}"))?;
        debug!(%url, bytes = bytes.len(), "fetched page body");
        Ok(bytes.to_vec())
    }
}

// Page 1 is the base URL untouched; later pages replace or append `param`.
pub fn page_url(base_url: &str, param: &str, page: usize) -> Result<String> {
    if page <= 1 {
        return Ok(base_url.to_string());
    }

    let mut url = Url::parse(base_url).with_context(|| format!("invalid base_url {base_url}"))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k.as_ref() != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(param, &page.to_string());

    Ok(url.to_string())
}
