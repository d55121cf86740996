//! Board record data structures.

use serde::{Deserialize, Serialize};

use crate::services::detail::{ExtractStrategy, FaqStrategy, QnaStrategy};

/// Which board a run targets. The two boards have disjoint id spaces
/// and sync to separate sheet tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardVariant {
    Qna,
    Faq,
}

impl BoardVariant {
    /// Sheet tab this board syncs into.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            BoardVariant::Qna => "QnA",
            BoardVariant::Faq => "FAQ",
        }
    }

    /// Board page file under the site's menu path.
    pub fn page_file(&self) -> &'static str {
        match self {
            BoardVariant::Qna => "qna.asp",
            BoardVariant::Faq => "faq.asp",
        }
    }

    /// Build the listing URL for a 1-indexed page number.
    ///
    /// The site paginates through ASP query parameters, e.g.
    /// `qna.asp?rWork=TblList&rType=0&rGotoPage=2`.
    pub fn listing_url(&self, base_url: &str, page: u32) -> String {
        format!(
            "{}{}?rWork=TblList&rType=0&rGotoPage={}",
            base_url,
            self.page_file(),
            page
        )
    }

    /// Detail-page extraction strategy for this board, chosen once per run.
    pub fn strategy(&self) -> &'static dyn ExtractStrategy {
        match self {
            BoardVariant::Qna => &QnaStrategy,
            BoardVariant::Faq => &FaqStrategy,
        }
    }
}

impl std::fmt::Display for BoardVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// One row parsed from a listing page. Transient: either promoted to a
/// [`Record`] after detail extraction or discarded as a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCandidate {
    /// Board-local entry number (positive; notice rows never produce one)
    pub id: u64,

    /// Entry title from the subject cell
    pub title: String,

    /// Absolute URL of the detail page
    pub link: String,

    /// Posted date, as formatted by the site
    pub date: String,

    /// Category label (empty if the board has no category column)
    pub category: String,

    /// Author name (empty if absent)
    pub author: String,

    /// Processing-state label, e.g. answered/pending (empty if absent)
    pub status: String,
}

/// A fully harvested board entry, ready for the store.
///
/// Immutable once built; the sync layer only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Board-local entry number
    pub id: u64,

    /// Category label
    pub category: String,

    /// Entry title
    pub title: String,

    /// Posted date, source-formatted
    pub published_date: String,

    /// Author name
    pub author: String,

    /// Long-form question body
    pub question_body: String,

    /// Long-form answer body (empty when unanswered or not separable)
    pub answer_body: String,

    /// Processing-state label
    pub status: String,

    /// Detail page URL this record was harvested from
    pub source_url: String,
}

impl Record {
    /// Merge a listing candidate with extracted body text.
    pub fn from_candidate(candidate: ListingCandidate, question: String, answer: String) -> Self {
        Self {
            id: candidate.id,
            category: candidate.category,
            title: candidate.title,
            published_date: candidate.date,
            author: candidate.author,
            question_body: question,
            answer_body: answer,
            status: candidate.status,
            source_url: candidate.link,
        }
    }

    /// Store column order:
    /// id, category, title, publishedDate, author, questionBody,
    /// answerBody, status, sourceUrl.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.category.clone(),
            self.title.clone(),
            self.published_date.clone(),
            self.author.clone(),
            self.question_body.clone(),
            self.answer_body.clone(),
            self.status.clone(),
            self.source_url.clone(),
        ]
    }
}
