//! Store credential loading.
//!
//! Token acquisition and refresh happen outside this process; the
//! harvester only consumes an already-valid OAuth bearer token. A
//! missing token is a fatal precondition: nothing is crawled without a
//! writable store.

use std::fs;

use crate::error::{AppError, Result};

/// Environment variable carrying the token itself.
const TOKEN_ENV: &str = "SHEETS_ACCESS_TOKEN";

/// Environment variable naming a file that holds the token.
const TOKEN_FILE_ENV: &str = "SHEETS_TOKEN_FILE";

/// An authenticated handle to the spreadsheet API.
#[derive(Debug, Clone)]
pub struct SheetsAuth {
    token: String,
}

impl SheetsAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Load the bearer token from the environment.
    ///
    /// `SHEETS_ACCESS_TOKEN` wins; otherwise `SHEETS_TOKEN_FILE` names
    /// a file containing the token.
    pub fn from_env() -> Result<Self> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Ok(Self::new(token.trim()));
            }
        }

        if let Ok(path) = std::env::var(TOKEN_FILE_ENV) {
            let token = fs::read_to_string(&path).map_err(|e| {
                AppError::credential(format!("Failed to read token file {path}: {e}"))
            })?;
            if token.trim().is_empty() {
                return Err(AppError::credential(format!("Token file {path} is empty")));
            }
            return Ok(Self::new(token.trim()));
        }

        Err(AppError::credential(format!(
            "No store credential: set {TOKEN_ENV} or {TOKEN_FILE_ENV}"
        )))
    }

    /// Token value for the Authorization header.
    pub fn bearer(&self) -> &str {
        &self.token
    }
}
