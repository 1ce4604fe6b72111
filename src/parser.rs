use crate::config::{LinkMode, RunConfig};
use crate::extract::labeled_field_in;
use crate::model::{ListingRecord, PLACEHOLDER};
use anyhow::{Context, Result, anyhow, bail};
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageParse {
    NoCards,
    Records(Vec<ListingRecord>),
}

#[derive(Debug)]
struct LabelSelector {
    selector: Selector,
    contains: String,
}

#[derive(Debug)]
pub struct ListingSelectors {
    card: Selector,
    title: Selector,
    organizer: LabelSelector,
    age_group: LabelSelector,
    price: LabelSelector,
    link: Selector,
    link_attr: String,
    base_url: String,
    link_mode: LinkMode,
}

impl ListingSelectors {
    pub fn compile(config: &RunConfig) -> Result<Self> {
        let selectors = &config.selectors;
        Ok(Self {
            card: compile_selector("card", &selectors.card)?,
            title: compile_selector("title", &selectors.title)?,
            organizer: LabelSelector {
                selector: compile_selector("organizer", &selectors.organizer.selector)?,
                contains: selectors.organizer.contains.clone(),
            },
            age_group: LabelSelector {
                selector: compile_selector("age_group", &selectors.age_group.selector)?,
                contains: selectors.age_group.contains.clone(),
            },
            price: LabelSelector {
                selector: compile_selector("price", &selectors.price.selector)?,
                contains: selectors.price.contains.clone(),
            },
            link: compile_selector("link", &selectors.link)?,
            link_attr: selectors.link_attr.clone(),
            base_url: config.scrape.base_url.clone(),
            link_mode: config.scrape.link_mode,
        })
    }

    pub fn parse_page(&self, body: &[u8], budget: usize) -> Result<PageParse> {
        let html_text = String::from_utf8_lossy(body);
        if html_text.trim().is_empty() {
            bail!("page body is empty");
        }
        let parsed = Html::parse_document(&html_text);

        let cards: Vec<ElementRef<'_>> = parsed.select(&self.card).collect();
        if cards.is_empty() {
            return Ok(PageParse::NoCards);
        }

        let mut records = Vec::new();
        for (index, card) in cards.into_iter().enumerate() {
            if records.len() >= budget {
                break;
            }
            match self.parse_card(card) {
                Ok(record) => records.push(record),
                Err(err) => warn!(card = index, error = %err, "skipping listing card"),
            }
        }

        Ok(PageParse::Records(records))
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<ListingRecord> {
        let title = card
            .select(&self.title)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let organizer = self.labeled(card, &self.organizer);
        let age_group = self.labeled(card, &self.age_group);
        let price = self.labeled(card, &self.price);

        let link = match card
            .select(&self.link)
            .find_map(|el| el.value().attr(&self.link_attr))
        {
            Some(raw) => self.build_link(raw)?,
            None => PLACEHOLDER.to_string(),
        };

        info!(
            %title,
            %organizer,
            %age_group,
            %price,
            %link,
            "extracted listing fields"
        );

        Ok(ListingRecord {
            title,
            organizer,
            age_group,
            price,
            link,
        })
    }

    fn labeled(&self, card: ElementRef<'_>, rule: &LabelSelector) -> String {
        labeled_field_in(card, &rule.selector, &rule.contains)
    }

    fn build_link(&self, raw: &str) -> Result<String> {
        match self.link_mode {
            LinkMode::Concat => Ok(format!("{}{}", self.base_url, raw)),
            LinkMode::Resolve => {
                let base = Url::parse(&self.base_url)
                    .with_context(|| format!("invalid base_url {}", self.base_url))?;
                let resolved = base
                    .join(raw)
                    .with_context(|| format!("cannot resolve link {raw}"))?;
                Ok(resolved.to_string())
            }
        }
    }
}

fn compile_selector(name: &str, expression: &str) -> Result<Selector> {
    Selector::parse(expression)
        .map_err(|err| anyhow!("invalid {name} selector {expression}: {err:?}"))
}
