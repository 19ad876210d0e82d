// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::ContentFetcher;

/// Tracing target for content fetches.
pub const TRACING_TARGET: &str = "flowstudio::fetch";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Json,
    Yaml,
}

impl ContentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    pub content: String,
    pub format: ContentFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no URI given")]
    EmptyUri,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{uri} answered with HTTP {status}")]
    Status { uri: String, status: u16 },
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

static YAML_KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*["']?[A-Za-z0-9_.\-/$]+["']?\s*:(\s|$)"#).expect("yaml key regex")
});
static YAML_LIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*-\s+\S").expect("yaml list regex"));

/// Infers the format of fetched content.
///
/// A content type naming json or yaml wins. Otherwise the body is sniffed: a leading `{` or `[`
/// means JSON, `key:` lines or `- item` lines mean YAML. Anything else is treated as JSON.
pub fn detect_format(content_type: Option<&str>, body: &str) -> ContentFormat {
    if let Some(content_type) = content_type.map(str::to_ascii_lowercase) {
        if content_type.contains("json") {
            return ContentFormat::Json;
        }
        if content_type.contains("yaml") || content_type.contains("yml") {
            return ContentFormat::Yaml;
        }
    }

    let trimmed = body.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return ContentFormat::Json;
    }
    if trimmed.starts_with("---") || YAML_KEY_LINE.is_match(trimmed) || YAML_LIST_LINE.is_match(trimmed) {
        return ContentFormat::Yaml;
    }
    ContentFormat::Json
}

fn content_type_from_extension(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "json" => Some("application/json"),
        "yaml" | "yml" => Some("application/yaml"),
        _ => None,
    }
}

/// Fetches `http(s)://` URIs with reqwest; `file://` URIs and plain paths come from disk.
#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    http: Client,
}

impl HttpContentFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flowstudio/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    async fn fetch_http(&self, uri: &str) -> Result<FetchedContent, FetchError> {
        let response = self.http.get(uri).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                uri: uri.to_owned(),
                status: status.as_u16(),
            });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let content = response.text().await?;
        let format = detect_format(content_type.as_deref(), &content);
        Ok(FetchedContent { content, format })
    }

    async fn fetch_file(&self, path: &Path) -> Result<FetchedContent, FetchError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let format = detect_format(content_type_from_extension(path), &content);
        Ok(FetchedContent { content, format })
    }
}

#[async_trait::async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedContent, FetchError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(FetchError::EmptyUri);
        }

        let started_at = Instant::now();
        let result = if uri.starts_with("http://") || uri.starts_with("https://") {
            self.fetch_http(uri).await
        } else {
            let path = Path::new(uri.strip_prefix("file://").unwrap_or(uri));
            self.fetch_file(path).await
        };

        match &result {
            Ok(fetched) => tracing::info!(
                target: TRACING_TARGET,
                uri,
                format = %fetched.format,
                bytes = fetched.content.len(),
                elapsed_ms = started_at.elapsed().as_millis(),
                "content fetched"
            ),
            Err(error) => tracing::warn!(
                target: TRACING_TARGET,
                uri,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis(),
                "content fetch failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::{detect_format, ContentFormat, FetchError, HttpContentFetcher};
    use crate::collab::ContentFetcher;

    #[rstest]
    #[case::json_header(Some("application/json; charset=utf-8"), "openapi: 3.0.0", ContentFormat::Json)]
    #[case::yaml_header(Some("application/x-yaml"), "{}", ContentFormat::Yaml)]
    #[case::text_yml_header(Some("text/yml"), "{}", ContentFormat::Yaml)]
    #[case::object_body(None, "  {\"openapi\": \"3.0.0\"}", ContentFormat::Json)]
    #[case::array_body(Some("text/plain"), "[1, 2]", ContentFormat::Json)]
    #[case::yaml_keys(None, "openapi: 3.0.0\ninfo:\n  title: Pets\n", ContentFormat::Yaml)]
    #[case::yaml_list(None, "- get\n- post\n", ContentFormat::Yaml)]
    #[case::yaml_document_marker(None, "---\n", ContentFormat::Yaml)]
    #[case::url_is_not_a_key(None, "https://example.com/spec", ContentFormat::Json)]
    #[case::plain_text(None, "hello world", ContentFormat::Json)]
    fn detects_format(
        #[case] content_type: Option<&str>,
        #[case] body: &str,
        #[case] expected: ContentFormat,
    ) {
        assert_eq!(detect_format(content_type, body), expected);
    }

    #[tokio::test]
    async fn reads_plain_paths_and_file_uris() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "{{\"looks\": \"like json\"}}").expect("write");

        let fetcher = HttpContentFetcher::new().expect("fetcher");
        let path = file.path().to_string_lossy().into_owned();

        let plain = fetcher.fetch(&path).await.expect("plain path");
        assert_eq!(plain.format, ContentFormat::Yaml, "extension wins over sniffing");

        let uri = format!("file://{path}");
        let via_uri = fetcher.fetch(&uri).await.expect("file uri");
        assert_eq!(via_uri.content, plain.content);
    }

    #[tokio::test]
    async fn rejects_blank_and_missing_sources() {
        let fetcher = HttpContentFetcher::new().expect("fetcher");
        assert!(matches!(fetcher.fetch("   ").await, Err(FetchError::EmptyUri)));
        assert!(matches!(
            fetcher.fetch("/definitely/not/here.json").await,
            Err(FetchError::Io { .. })
        ));
    }
}
