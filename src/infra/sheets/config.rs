use anyhow::{Context, Result};

/// OAuth client credentials for the spreadsheet service, read from the
/// environment (or a `.env` file loaded at start-up).
pub struct SheetsCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl SheetsCredentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: var("SHEETS_CLIENT_ID")?,
            client_secret: var("SHEETS_CLIENT_SECRET")?,
            refresh_token: var("SHEETS_REFRESH_TOKEN")?,
        })
    }
}

fn var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}
