// src/services/detail.rs

//! Detail page body extraction.
//!
//! Each board variant gets its own extraction strategy, selected once
//! per run. The QnA board separates question and answer regions by
//! selector; the FAQ board renders a single content block, so its
//! answer field is always empty.
//!
//! Body separation is best-effort: when the site's markup drifts, the
//! question field may carry the whole thread and the answer stays
//! empty. That is a normal outcome, not an error.

use scraper::{ElementRef, Html, Selector};

use crate::services::listing::parse_selector;
use crate::utils::text_lines;

/// Question region candidates, tried in order. The board software puts
/// the post body in `#bo_v_con`; older skins fall back to the generic
/// content containers.
const QUESTION_SELECTORS: &[&str] = &[
    "#bo_v_con",
    "#contents .board_view",
    "#contents table",
    "#contents",
];

/// Answer region candidates (the answer is posted as a comment).
const ANSWER_SELECTORS: &[&str] = &["#bo_vc article .cmt_contents", "#bo_vc article"];

/// Date marker next to the answer region.
const ANSWER_DATE_SELECTOR: &str = "#bo_vc article time";

/// Extracted long-form fields for one detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyText {
    pub question: String,
    pub answer: String,
}

/// Variant-specific body extraction from fetched detail markup.
pub trait ExtractStrategy: Send + Sync {
    fn extract_body(&self, html: &str) -> BodyText;
}

/// QnA board: separate question and answer regions.
pub struct QnaStrategy;

impl ExtractStrategy for QnaStrategy {
    fn extract_body(&self, html: &str) -> BodyText {
        let document = Html::parse_document(html);

        let question = select_first_text(&document, QUESTION_SELECTORS).unwrap_or_default();

        let answer = match select_first(&document, ANSWER_SELECTORS) {
            Some(region) => {
                let text = text_lines(&region);
                match answer_date(&document) {
                    Some(date) => format!("[answer-date: {date}]\n{text}"),
                    None => text,
                }
            }
            // Unanswered question; empty is the normal case here.
            None => String::new(),
        };

        BodyText { question, answer }
    }
}

/// FAQ board: one content block, never a separate answer.
pub struct FaqStrategy;

impl ExtractStrategy for FaqStrategy {
    fn extract_body(&self, html: &str) -> BodyText {
        let document = Html::parse_document(html);
        BodyText {
            question: select_first_text(&document, QUESTION_SELECTORS).unwrap_or_default(),
            answer: String::new(),
        }
    }
}

fn select_first<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for &raw in selectors {
        // Fixed literals; parse failure would be a programming error.
        let sel = parse_selector(raw).ok()?;
        if let Some(element) = document.select(&sel).next() {
            return Some(element);
        }
    }
    None
}

fn select_first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    select_first(document, selectors).map(|el| text_lines(&el))
}

fn answer_date(document: &Html) -> Option<String> {
    let sel: Selector = parse_selector(ANSWER_DATE_SELECTOR).ok()?;
    let text = document
        .select(&sel)
        .next()
        .map(|el| text_lines(&el))
        .unwrap_or_default();
    if text.is_empty() { None } else { Some(text) }
}
