//! Loading raw vendor exports from disk or over HTTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::{Request, Response};
use std::io::Read;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);
    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Inflates gzip-compressed exports; anything else is returned unchanged.
pub fn maybe_gunzip(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }
    let mut inflated = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut inflated)
        .context("failed to inflate gzip export")?;
    debug!(
        compressed = bytes.len(),
        inflated = inflated.len(),
        "Export was gzip-compressed"
    );
    Ok(inflated)
}

/// Loads an export from a local path or an `http(s)://` URL.
#[tracing::instrument(skip(client))]
pub async fn load_export<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read export {}", source))?
    };
    maybe_gunzip(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    const CSV: &str = "a,b,c\n1,2,3\n";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        assert_eq!(maybe_gunzip(CSV.as_bytes().to_vec()).unwrap(), CSV.as_bytes());
    }

    #[test]
    fn test_gzip_is_inflated() {
        assert_eq!(maybe_gunzip(gzip(CSV.as_bytes())).unwrap(), CSV.as_bytes());
    }

    #[test]
    fn test_truncated_gzip_fails() {
        let mut compressed = gzip(CSV.as_bytes());
        compressed.truncate(6);
        assert!(maybe_gunzip(compressed).is_err());
    }

    #[tokio::test]
    async fn test_load_export_from_file() {
        let path = format!("{}/swing_grader_test_export.csv.gz", env::temp_dir().display());
        fs::write(&path, gzip(CSV.as_bytes())).unwrap();

        let bytes = load_export(&BasicClient::new(), &path).await.unwrap();
        assert_eq!(bytes, CSV.as_bytes());

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_export_missing_file() {
        let result = load_export(&BasicClient::new(), "/nonexistent/export.csv").await;
        assert!(result.is_err());
    }
}
