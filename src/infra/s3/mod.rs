//! Object-store archive of the exported tables.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::info;

use crate::services::export_sink::ExportSink;

const KEY_PREFIX: &str = "turtle_survey";

/// Uploads each artifact to `s3://<bucket>/turtle_survey/<name>.csv`,
/// optionally gzip-compressed.
pub struct S3Archive {
    client: aws_sdk_s3::Client,
    bucket: String,
    gzip: bool,
}

impl S3Archive {
    /// Uses the ambient AWS configuration (env vars, profile, instance role).
    pub async fn from_env(bucket: String, gzip: bool) -> Self {
        let config = aws_config::load_from_env().await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket,
            gzip,
        }
    }
}

/// Object key and body for `content` published as `name`.
fn prepare(name: &str, content: Vec<u8>, gzip: bool) -> Result<(String, Vec<u8>)> {
    if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content)?;
        Ok((format!("{KEY_PREFIX}/{name}.csv.gz"), encoder.finish()?))
    } else {
        Ok((format!("{KEY_PREFIX}/{name}.csv"), content))
    }
}

#[async_trait]
impl ExportSink for S3Archive {
    fn label(&self) -> &str {
        "s3"
    }

    async fn publish(&self, name: &str, path: &Path) -> Result<()> {
        let content =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let (key, body) = prepare(name, content, self.gzip)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("text/csv")
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| format!("S3 PutObject failed for '{key}'"))?;

        info!(bucket = %self.bucket, key = %key, "Artifact archived");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_prepare_plain() {
        let (key, body) = prepare("sites", b"a,b\n".to_vec(), false).unwrap();
        assert_eq!(key, "turtle_survey/sites.csv");
        assert_eq!(body, b"a,b\n");
    }

    #[test]
    fn test_prepare_gzip() {
        let (key, body) = prepare("sites", b"a,b\n".to_vec(), true).unwrap();
        assert_eq!(key, "turtle_survey/sites.csv.gz");

        let mut decoded = String::new();
        GzDecoder::new(body.as_slice())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "a,b\n");
    }
}
