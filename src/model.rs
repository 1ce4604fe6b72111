use std::fmt;

pub const PLACEHOLDER: &str = "–";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Organizer,
    AgeGroup,
    Price,
    Link,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Organizer,
        Field::AgeGroup,
        Field::Price,
        Field::Link,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Organizer => "organizer",
            Field::AgeGroup => "age_group",
            Field::Price => "price",
            Field::Link => "link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub title: String,
    pub organizer: String,
    pub age_group: String,
    pub price: String,
    pub link: String,
}

impl ListingRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Organizer => &self.organizer,
            Field::AgeGroup => &self.age_group,
            Field::Price => &self.price,
            Field::Link => &self.link,
        }
    }

    pub fn values(&self) -> [&str; 5] {
        Field::ALL.map(|field| self.get(field))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    StoppedEmpty { page: usize },
    StoppedError { page: usize, message: String },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::StoppedEmpty { page } => write!(f, "stopped on empty page {page}"),
            RunOutcome::StoppedError { page, message } => {
                write!(f, "stopped on error at page {page}: {message}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeRun {
    pub records: Vec<ListingRecord>,
    pub pages_fetched: usize,
    pub outcome: RunOutcome,
}
