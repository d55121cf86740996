// src/services/listing.rs

//! Listing page parsing.
//!
//! Extracts row-level candidates from a board's paginated list view.
//! Both boards render the same ASP table markup, so one parser covers
//! the QnA and FAQ variants.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::ListingCandidate;
use crate::utils::resolve_url;

/// Parse result for one listing page.
///
/// `rows_seen` counts every table row, including pinned notice rows
/// that never become candidates. The orchestrator needs the raw count
/// to tell "end of board" apart from "page full of notices".
#[derive(Debug, Default)]
pub struct ListingPage {
    pub rows_seen: usize,
    pub candidates: Vec<ListingCandidate>,
}

/// Parser for board listing pages.
pub struct ListingParser {
    row_sel: Selector,
    num_sel: Selector,
    subject_sel: Selector,
    date_sel: Selector,
    category_sel: Selector,
    name_sel: Selector,
    condition_sel: Selector,
}

impl ListingParser {
    /// Create a parser with the board table's fixed selectors.
    pub fn new() -> Result<Self> {
        Ok(Self {
            row_sel: parse_selector("table.board_list tbody tr")?,
            num_sel: parse_selector("td.num")?,
            subject_sel: parse_selector("td.subject a")?,
            date_sel: parse_selector("td.date")?,
            category_sel: parse_selector("td.category")?,
            name_sel: parse_selector("td.name")?,
            condition_sel: parse_selector("td.condition")?,
        })
    }

    /// Extract candidates from listing markup.
    ///
    /// Detail links are resolved against `page_url`. Candidates keep
    /// source order (newest first); callers must not re-sort.
    pub fn parse(&self, html: &str, page_url: &str) -> Result<ListingPage> {
        let document = Html::parse_document(html);
        let base_url = url::Url::parse(page_url)?;

        let mut page = ListingPage::default();
        for row in document.select(&self.row_sel) {
            page.rows_seen += 1;
            if let Some(candidate) = self.parse_row(&row, &base_url, page.rows_seen) {
                page.candidates.push(candidate);
            }
        }
        Ok(page)
    }

    fn parse_row(
        &self,
        row: &ElementRef<'_>,
        base_url: &url::Url,
        row_index: usize,
    ) -> Option<ListingCandidate> {
        // Pinned/announcement rows carry a label instead of a number.
        // Skipping them is intentional and silent.
        let id = self.parse_row_id(row)?;

        match self.parse_required(row, base_url, id) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                log::warn!("Dropping listing row {row_index} (id {id}): {e}");
                None
            }
        }
    }

    fn parse_row_id(&self, row: &ElementRef<'_>) -> Option<u64> {
        let num = cell_text(row, &self.num_sel)?;
        match num.parse::<u64>() {
            Ok(id) if id > 0 => Some(id),
            _ => None,
        }
    }

    fn parse_required(
        &self,
        row: &ElementRef<'_>,
        base_url: &url::Url,
        id: u64,
    ) -> Result<ListingCandidate> {
        let subject = row
            .select(&self.subject_sel)
            .next()
            .ok_or_else(|| AppError::crawl("listing-row", "subject cell missing"))?;
        let title = element_text(&subject);
        if title.is_empty() {
            return Err(AppError::crawl("listing-row", "title is empty"));
        }

        let href = subject
            .value()
            .attr("href")
            .ok_or_else(|| AppError::crawl("listing-row", "subject link has no href"))?;
        let link = resolve_url(base_url, href);

        let date = cell_text(row, &self.date_sel)
            .ok_or_else(|| AppError::crawl("listing-row", "date cell missing"))?;

        // Optional cells are best-effort and independent of each other;
        // a board without the column just yields empty strings.
        Ok(ListingCandidate {
            id,
            title,
            link,
            date,
            category: cell_text(row, &self.category_sel).unwrap_or_default(),
            author: cell_text(row, &self.name_sel).unwrap_or_default(),
            status: cell_text(row, &self.condition_sel).unwrap_or_default(),
        })
    }
}

/// Text of the first cell matching `sel`, trimmed. `None` when absent.
fn cell_text(row: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    row.select(sel).next().map(|el| element_text(&el))
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://www.k-icfr.org/sub/menu/qna.asp?rWork=TblList&rGotoPage=1";

    fn listing(rows: &str) -> String {
        format!("<html><body><table class=\"board_list\"><tbody>{rows}</tbody></table></body></html>")
    }

    fn parser() -> ListingParser {
        ListingParser::new().unwrap()
    }

    #[test]
    fn test_parses_full_row() {
        let html = listing(
            r#"<tr>
                <td class="num">105</td>
                <td class="category">일반</td>
                <td class="subject"><a href="qna.asp?rWork=TblView&rSeq=105">문의합니다</a></td>
                <td class="name">김철수</td>
                <td class="date">2026-08-01</td>
                <td class="condition">답변완료</td>
            </tr>"#,
        );

        let page = parser().parse(&html, PAGE_URL).unwrap();
        assert_eq!(page.rows_seen, 1);
        assert_eq!(page.candidates.len(), 1);

        let c = &page.candidates[0];
        assert_eq!(c.id, 105);
        assert_eq!(c.title, "문의합니다");
        assert_eq!(
            c.link,
            "https://www.k-icfr.org/sub/menu/qna.asp?rWork=TblView&rSeq=105"
        );
        assert_eq!(c.date, "2026-08-01");
        assert_eq!(c.category, "일반");
        assert_eq!(c.author, "김철수");
        assert_eq!(c.status, "답변완료");
    }

    #[test]
    fn test_skips_notice_rows_silently() {
        let html = listing(
            r#"<tr>
                <td class="num">공지</td>
                <td class="subject"><a href="qna.asp?rSeq=999">공지사항</a></td>
                <td class="date">2026-01-01</td>
            </tr>
            <tr>
                <td class="num">42</td>
                <td class="subject"><a href="qna.asp?rSeq=42">실제 질문</a></td>
                <td class="date">2026-07-30</td>
            </tr>"#,
        );

        let page = parser().parse(&html, PAGE_URL).unwrap();
        assert_eq!(page.rows_seen, 2);
        assert_eq!(page.candidates.len(), 1);
        assert_eq!(page.candidates[0].id, 42);
    }

    #[test]
    fn test_drops_row_with_missing_date() {
        let html = listing(
            r#"<tr>
                <td class="num">42</td>
                <td class="subject"><a href="qna.asp?rSeq=42">날짜 없음</a></td>
            </tr>"#,
        );

        let page = parser().parse(&html, PAGE_URL).unwrap();
        assert_eq!(page.rows_seen, 1);
        assert!(page.candidates.is_empty());
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let html = listing(
            r#"<tr>
                <td class="num">7</td>
                <td class="subject"><a href="faq.asp?rSeq=7">FAQ 항목</a></td>
                <td class="date">2026-05-05</td>
            </tr>"#,
        );

        let page = parser().parse(&html, PAGE_URL).unwrap();
        let c = &page.candidates[0];
        assert_eq!(c.category, "");
        assert_eq!(c.author, "");
        assert_eq!(c.status, "");
    }

    #[test]
    fn test_empty_page_reports_zero_rows() {
        let page = parser().parse(&listing(""), PAGE_URL).unwrap();
        assert_eq!(page.rows_seen, 0);
        assert!(page.candidates.is_empty());
    }

    #[test]
    fn test_preserves_source_order() {
        let html = listing(
            r#"<tr><td class="num">105</td><td class="subject"><a href="q?rSeq=105">a</a></td><td class="date">d</td></tr>
               <tr><td class="num">104</td><td class="subject"><a href="q?rSeq=104">b</a></td><td class="date">d</td></tr>
               <tr><td class="num">103</td><td class="subject"><a href="q?rSeq=103">c</a></td><td class="date">d</td></tr>"#,
        );

        let page = parser().parse(&html, PAGE_URL).unwrap();
        let ids: Vec<u64> = page.candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![105, 104, 103]);
    }
}
