//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::record::BoardVariant;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and pacing behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Target spreadsheet settings
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Per-board settings
    #[serde(default)]
    pub boards: BoardsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        for board in [&self.boards.qna, &self.boards.faq] {
            if board.max_pages == 0 {
                return Err(AppError::config("boards.*.max_pages must be > 0"));
            }
            if !board.base_url.starts_with("http") {
                return Err(AppError::config(format!(
                    "boards.*.base_url is not an http(s) URL: {}",
                    board.base_url
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client and pacing behavior settings.
///
/// The listing delay is longer than the detail delay: the site re-renders
/// the full board table on every listing navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay after each listing-page fetch, in milliseconds
    #[serde(default = "defaults::listing_delay")]
    pub listing_delay_ms: u64,

    /// Delay after each detail-page fetch, in milliseconds
    #[serde(default = "defaults::detail_delay")]
    pub detail_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            listing_delay_ms: defaults::listing_delay(),
            detail_delay_ms: defaults::detail_delay(),
        }
    }
}

/// Target spreadsheet settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SheetsConfig {
    /// Spreadsheet id (overridable via SHEETS_SPREADSHEET_ID)
    #[serde(default)]
    pub spreadsheet_id: String,
}

impl SheetsConfig {
    /// Resolve the spreadsheet id, preferring the environment variable.
    pub fn resolve_spreadsheet_id(&self) -> Result<String> {
        if let Ok(id) = std::env::var("SHEETS_SPREADSHEET_ID") {
            if !id.trim().is_empty() {
                return Ok(id);
            }
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(AppError::config(
                "No spreadsheet id: set sheets.spreadsheet_id or SHEETS_SPREADSHEET_ID",
            ));
        }
        Ok(self.spreadsheet_id.clone())
    }
}

/// Per-board settings for the two boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardsConfig {
    #[serde(default = "defaults::qna_board")]
    pub qna: BoardConfig,

    #[serde(default = "defaults::faq_board")]
    pub faq: BoardConfig,
}

impl BoardsConfig {
    /// Settings for one board variant.
    pub fn for_variant(&self, variant: BoardVariant) -> &BoardConfig {
        match variant {
            BoardVariant::Qna => &self.qna,
            BoardVariant::Faq => &self.faq,
        }
    }
}

impl Default for BoardsConfig {
    fn default() -> Self {
        Self {
            qna: defaults::qna_board(),
            faq: defaults::faq_board(),
        }
    }
}

/// Settings for a single board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Base URL of the site's menu path (trailing slash included)
    pub base_url: String,

    /// Upper bound on listing pages per run; the crawl usually stops
    /// earlier once a fully known page is reached
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,
}

mod defaults {
    use super::BoardConfig;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn listing_delay() -> u64 {
        2000
    }
    pub fn detail_delay() -> u64 {
        1500
    }

    // Board defaults
    pub fn max_pages() -> u32 {
        3
    }
    pub fn base_url() -> String {
        "https://www.k-icfr.org/sub/menu/".into()
    }
    pub fn qna_board() -> BoardConfig {
        BoardConfig {
            base_url: base_url(),
            max_pages: max_pages(),
        }
    }
    pub fn faq_board() -> BoardConfig {
        BoardConfig {
            base_url: base_url(),
            max_pages: max_pages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_max_pages() {
        let mut config = Config::default();
        config.boards.faq.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.boards.qna.base_url = "ftp://example.com/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[crawler]
listing_delay_ms = 500

[boards.qna]
base_url = "https://www.k-icfr.org/sub/menu/"
max_pages = 7
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.crawler.listing_delay_ms, 500);
        // Unset fields fall back to defaults
        assert_eq!(config.crawler.detail_delay_ms, 1500);
        assert_eq!(config.boards.qna.max_pages, 7);
        assert_eq!(config.boards.faq.max_pages, 3);
    }

    #[test]
    fn for_variant_selects_board() {
        let mut config = Config::default();
        config.boards.qna.max_pages = 10;
        assert_eq!(config.boards.for_variant(BoardVariant::Qna).max_pages, 10);
        assert_eq!(config.boards.for_variant(BoardVariant::Faq).max_pages, 3);
    }
}
