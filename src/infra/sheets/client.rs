use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use super::config::SheetsCredentials;
use crate::services::export_sink::ExportSink;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v2/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct FileList {
    files: Vec<RemoteFile>,
}

#[derive(Deserialize)]
struct RemoteFile {
    id: String,
}

/// Imports CSV files into existing hosted spreadsheets, replacing the first
/// sheet's contents. Spreadsheets are looked up by name.
pub struct SheetsClient {
    http: reqwest::Client,
    access_token: String,
}

impl SheetsClient {
    /// Authenticates with the refresh token. Failing here is fatal for the
    /// sync: no upload is attempted without an access token.
    pub async fn new(credentials: &SheetsCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let access_token = Self::exchange_token(&http, credentials).await?;
        info!("Spreadsheet service authenticated");

        Ok(Self { http, access_token })
    }

    async fn exchange_token(http: &reqwest::Client, credentials: &SheetsCredentials) -> Result<String> {
        let response = http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send token request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Token exchange failed with status {}: {}", status, body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse token response: {}", e))?;

        Ok(token.access_token)
    }

    async fn find_spreadsheet(&self, name: &str) -> Result<String> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\'', "\\'"),
            SPREADSHEET_MIME
        );

        let response = self
            .http
            .get(FILES_URL)
            .bearer_auth(&self.access_token)
            .query(&[("q", query.as_str()), ("fields", "files(id)")])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("File lookup returned status {}: {}", status, body));
        }

        let list: FileList = response.json().await?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| anyhow::anyhow!("No spreadsheet named '{name}'"))
    }
}

#[async_trait]
impl ExportSink for SheetsClient {
    fn label(&self) -> &str {
        "sheets"
    }

    async fn publish(&self, name: &str, path: &Path) -> Result<()> {
        let content = Bytes::from(
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?,
        );
        let id = self.find_spreadsheet(name).await?;
        debug!(spreadsheet = %name, id = %id, bytes = content.len(), "Importing CSV");

        let response = self
            .http
            .put(format!("{UPLOAD_URL}/{id}"))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "media"), ("convert", "true")])
            .header("Content-Type", "text/csv")
            .body(content)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send import request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Import into '{}' failed with status {}: {}", name, status, body));
        }

        info!(spreadsheet = %name, "CSV imported");
        Ok(())
    }
}
