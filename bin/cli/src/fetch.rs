//! Reads input documents from disk or over HTTP.

use std::env;
use std::fs;
use std::io::Read;

use importer::github::parse_github_url;
use importer::sources::ContentSource;
use importer::{ImporterError, ImporterResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::{debug, warn};

use crate::errors::CliResult;

const USER_AGENT: &str = concat!("catalog-importer/", env!("CARGO_PKG_VERSION"));

const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Location meaning standard input.
pub(crate) const STDIN: &str = "-";

pub(crate) fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub(crate) fn http_client() -> CliResult<Client> {
    let mut headers = HeaderMap::new();
    match env::var(GITHUB_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        _ => debug!("{GITHUB_TOKEN_ENV} not set, using unauthenticated requests"),
    }

    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?)
}

fn get(client: &Client, url: &str) -> reqwest::Result<String> {
    debug!("fetching {url}");
    client.get(url).send()?.error_for_status()?.text()
}

/// Reads a document from a URL, from standard input for `-`, or from a file.
pub(crate) fn load_location(client: &Client, location: &str) -> CliResult<String> {
    if is_remote(location) {
        return Ok(get(client, location)?);
    }

    if location == STDIN {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    Ok(fs::read_to_string(location)?)
}

/// Fetches files over HTTP, reading GitHub file URLs from their raw content host.
pub(crate) struct HttpContentSource {
    client: Client,
}

impl HttpContentSource {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }
}

/// The URL to download `url` from.
pub(crate) fn download_url(url: &str) -> String {
    match parse_github_url(url) {
        Ok(location) => location.raw_url(),
        Err(e) => {
            warn!("{e}, fetching as is");
            url.to_string()
        }
    }
}

impl ContentSource for HttpContentSource {
    fn fetch(&self, url: &str) -> ImporterResult<String> {
        get(&self.client, &download_url(url))
            .map_err(|e| ImporterError::Upstream(format!("fetching {url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use test_case::test_case;

    use crate::fetch::{download_url, http_client, is_remote, load_location};

    #[test_case("https://example.com/index.yaml" => true; "https")]
    #[test_case("http://example.com/index.yaml" => true; "http")]
    #[test_case("./index.yaml" => false; "relative path")]
    #[test_case("-" => false; "stdin")]
    fn should_detect_remote_locations(location: &str) -> bool {
        is_remote(location)
    }

    #[test]
    fn blob_urls_should_be_downloaded_raw() {
        assert_eq!(
            "https://raw.githubusercontent.com/giantswarm/foo/main/crd.yaml",
            download_url("https://github.com/giantswarm/foo/blob/main/crd.yaml")
        );
        assert_eq!(
            "https://example.com/crd.yaml",
            download_url("https://example.com/crd.yaml")
        );
    }

    #[test]
    fn should_read_local_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.yaml");
        fs::write(&path, "apiVersion: v1\n").unwrap();

        let content = load_location(&http_client().unwrap(), path.to_str().unwrap()).unwrap();
        assert_eq!("apiVersion: v1\n", content);
    }
}
