#![allow(dead_code)]

use anyhow::{Result, anyhow};
use camp_scrape::config::RunConfig;
use camp_scrape::fetch::PageFetcher;
use camp_scrape::model::ListingRecord;
use std::cell::RefCell;

pub const BASE_URL: &str = "https://camps.example/list";

pub fn test_config(max_records: usize) -> RunConfig {
    let mut config = RunConfig::default();
    config.scrape.base_url = BASE_URL.to_string();
    config.scrape.max_records = max_records;
    config.scrape.delay_secs = 0.0;
    config
}

pub struct Card<'a> {
    pub title: Option<&'a str>,
    pub organizer: Option<&'a str>,
    pub age_group: Option<&'a str>,
    pub price: Option<&'a str>,
    pub href: Option<&'a str>,
}

impl<'a> Card<'a> {
    pub fn full(title: &'a str, organizer: &'a str, age_group: &'a str, price: &'a str) -> Self {
        Self {
            title: Some(title),
            organizer: Some(organizer),
            age_group: Some(age_group),
            price: Some(price),
            href: Some("/stovykla"),
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::from(r#"<div class="bg-white rounded-b-2.5xl p-4">"#);
        if let Some(title) = self.title {
            html.push_str(&format!("<h3>{title}</h3>"));
        }
        for (label, value) in [
            ("Organizatorius", self.organizer),
            ("Amžiaus grupė", self.age_group),
            ("Kaina", self.price),
        ] {
            if let Some(value) = value {
                html.push_str(&format!("<h6>{label}</h6>\n  <p>{value}</p>"));
            }
        }
        if let Some(href) = self.href {
            html.push_str(&format!(r#"<a href="{href}">Plačiau</a>"#));
        }
        html.push_str("</div>");
        html
    }
}

pub fn page(cards: &[Card<'_>]) -> String {
    let body: String = cards.iter().map(Card::render).collect();
    format!("<html><head><title>Stovyklos</title></head><body><main>{body}</main></body></html>")
}

pub fn empty_page() -> String {
    page(&[])
}

/// Serves canned pages in request order; `None` entries fail like a dropped
/// connection. Once the list runs out, `repeat` is served if set.
pub struct FakeSite {
    pages: Vec<Option<String>>,
    repeat: Option<String>,
    requested: RefCell<Vec<String>>,
}

impl FakeSite {
    pub fn new(pages: Vec<Option<String>>) -> Self {
        Self {
            pages,
            repeat: None,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn endless(page: String) -> Self {
        Self {
            pages: Vec::new(),
            repeat: Some(page),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl PageFetcher for FakeSite {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let index = self.requested.borrow().len();
        self.requested.borrow_mut().push(url.to_string());

        match self.pages.get(index) {
            Some(Some(body)) => Ok(body.clone().into_bytes()),
            Some(None) => Err(anyhow!("connection reset fetching {url}")),
            None => self
                .repeat
                .clone()
                .map(String::into_bytes)
                .ok_or_else(|| anyhow!("request to {url} failed with status 404 Not Found")),
        }
    }
}

pub fn record(title: &str, organizer: &str, age_group: &str, price: &str) -> ListingRecord {
    ListingRecord {
        title: title.to_string(),
        organizer: organizer.to_string(),
        age_group: age_group.to_string(),
        price: price.to_string(),
        link: format!("{BASE_URL}/{}", title.to_lowercase().replace(' ', "-")),
    }
}
