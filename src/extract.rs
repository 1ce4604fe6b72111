use crate::model::PLACEHOLDER;
use scraper::{ElementRef, Selector};

pub trait FieldNode: Sized {
    fn tag_name(&self) -> &str;
    fn text_content(&self) -> String;
    // text and comment nodes are skipped
    fn next_element_sibling(&self) -> Option<Self>;
}

impl FieldNode for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn next_element_sibling(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }
}

pub fn find_labeled_text<N, I, P>(candidates: I, is_label: P) -> Option<String>
where
    N: FieldNode,
    I: IntoIterator<Item = N>,
    P: Fn(&N) -> bool,
{
    let label = candidates.into_iter().find(|node| is_label(node))?;
    let sibling = label.next_element_sibling()?;
    if !sibling.tag_name().eq_ignore_ascii_case("p") {
        return None;
    }
    Some(sibling.text_content().trim().to_string())
}

pub fn extract_labeled_field<N, I, P>(candidates: I, is_label: P) -> String
where
    N: FieldNode,
    I: IntoIterator<Item = N>,
    P: Fn(&N) -> bool,
{
    find_labeled_text(candidates, is_label).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn labeled_field_in(card: ElementRef<'_>, selector: &Selector, contains: &str) -> String {
    extract_labeled_field(card.select(selector), |heading| {
        heading.text_content().contains(contains)
    })
}
