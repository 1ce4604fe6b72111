use crate::model::Field;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunConfig {
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scrape.base_url.trim().is_empty() {
            bail!("scrape.base_url must not be empty");
        }
        Url::parse(&self.scrape.base_url)
            .with_context(|| format!("invalid scrape.base_url {}", self.scrape.base_url))?;
        if self.scrape.page_param.trim().is_empty() {
            bail!("scrape.page_param must not be empty");
        }
        if self.scrape.timeout_secs == 0 {
            bail!("scrape.timeout_secs must be positive");
        }
        if !(self.scrape.delay_secs.is_finite() && self.scrape.delay_secs >= 0.0) {
            bail!("scrape.delay_secs must be a non-negative number");
        }
        if self.selectors.card.trim().is_empty() {
            bail!("selectors.card must not be empty");
        }
        for field in Field::ALL {
            if self.columns.name(field).trim().is_empty() {
                bail!("columns.{} must not be empty", field.key());
            }
        }
        if self.output.free_marker.trim().is_empty() {
            bail!("output.free_marker must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    #[default]
    Concat,
    Resolve,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_param")]
    pub page_param: String,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub link_mode: LinkMode,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_param: default_page_param(),
            max_records: default_max_records(),
            timeout_secs: default_timeout_secs(),
            delay_secs: default_delay_secs(),
            user_agent: default_user_agent(),
            headers: BTreeMap::new(),
            link_mode: LinkMode::Concat,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LabelRule {
    #[serde(default = "default_label_selector")]
    pub selector: String,
    pub contains: String,
}

impl LabelRule {
    pub fn new(selector: &str, contains: &str) -> Self {
        Self {
            selector: selector.to_string(),
            contains: contains.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_card_selector")]
    pub card: String,
    #[serde(default = "default_title_selector")]
    pub title: String,
    #[serde(default = "default_organizer_rule")]
    pub organizer: LabelRule,
    #[serde(default = "default_age_group_rule")]
    pub age_group: LabelRule,
    #[serde(default = "default_price_rule")]
    pub price: LabelRule,
    #[serde(default = "default_link_selector")]
    pub link: String,
    #[serde(default = "default_link_attr")]
    pub link_attr: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            title: default_title_selector(),
            organizer: default_organizer_rule(),
            age_group: default_age_group_rule(),
            price: default_price_rule(),
            link: default_link_selector(),
            link_attr: default_link_attr(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_title_column")]
    pub title: String,
    #[serde(default = "default_organizer_column")]
    pub organizer: String,
    #[serde(default = "default_age_group_column")]
    pub age_group: String,
    #[serde(default = "default_price_column")]
    pub price: String,
    #[serde(default = "default_link_column")]
    pub link: String,
}

impl ColumnConfig {
    pub fn name(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Organizer => &self.organizer,
            Field::AgeGroup => &self.age_group,
            Field::Price => &self.price,
            Field::Link => &self.link,
        }
    }

    pub fn header_row(&self) -> Vec<&str> {
        Field::ALL.iter().map(|field| self.name(*field)).collect()
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            title: default_title_column(),
            organizer: default_organizer_column(),
            age_group: default_age_group_column(),
            price: default_price_column(),
            link: default_link_column(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_free_marker")]
    pub free_marker: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_true")]
    pub extended_stats: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            file_name: None,
            log_file: default_log_file(),
            free_marker: default_free_marker(),
            currency: default_currency(),
            extended_stats: true,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read run config: {}", path.display()))?;
            toml::from_str::<RunConfig>(&text)
                .with_context(|| format!("failed to parse toml in {}", path.display()))?
        }
        None => RunConfig::default(),
    };

    config.validate().with_context(|| match path {
        Some(path) => format!("invalid run config {}", path.display()),
        None => "invalid default run config".to_string(),
    })?;
    Ok(config)
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://vilnius.lt/savivaldybe/vasaros-stovyklos".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_max_records() -> usize {
    20
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_delay_secs() -> f64 {
    2.0
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.60 Safari/537.36".to_string()
}

fn default_card_selector() -> String {
    r#"div[class*="rounded-b-2.5xl"]"#.to_string()
}

fn default_title_selector() -> String {
    "h3".to_string()
}

fn default_label_selector() -> String {
    "h6".to_string()
}

fn default_organizer_rule() -> LabelRule {
    LabelRule::new("h6", "Organizatorius")
}

fn default_age_group_rule() -> LabelRule {
    LabelRule::new("h6", "Amžiaus grupė")
}

fn default_price_rule() -> LabelRule {
    LabelRule::new("h6", "Kaina")
}

fn default_link_selector() -> String {
    "a".to_string()
}

fn default_link_attr() -> String {
    "href".to_string()
}

fn default_title_column() -> String {
    "Stovyklos pavadinimas".to_string()
}

fn default_organizer_column() -> String {
    "Organizatorius".to_string()
}

fn default_age_group_column() -> String {
    "Amžiaus grupė".to_string()
}

fn default_price_column() -> String {
    "Kaina".to_string()
}

fn default_link_column() -> String {
    "Nuoroda".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_file_prefix() -> String {
    "vasaros_stovyklos".to_string()
}

fn default_log_file() -> String {
    "scraper.log".to_string()
}

fn default_free_marker() -> String {
    "nemokama".to_string()
}

fn default_currency() -> String {
    "€".to_string()
}
