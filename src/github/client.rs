use crate::error::ListingError;
use crate::models::{ContentEntry, RepoLocation};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Unauthenticated client for the repository contents endpoint
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base_url: String,
    location: RepoLocation,
}

impl GitHubClient {
    pub fn new(api_base_url: &str, location: RepoLocation) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("repo-chores/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            location,
        })
    }

    /// `{api}/repos/{owner}/{repo}/contents/{path}`, without the `ref` query
    pub fn contents_url(&self, path: &str) -> String {
        let encoded = encode_repo_path(path);
        let base = format!(
            "{}/repos/{}/{}/contents",
            self.api_base_url, self.location.owner, self.location.repo
        );

        if encoded.is_empty() {
            base
        } else {
            format!("{}/{}", base, encoded)
        }
    }

    /// Fetch the listing of one directory at the configured branch
    pub async fn fetch_directory_contents(
        &self,
        path: &str,
    ) -> Result<Vec<ContentEntry>, ListingError> {
        let url = self.contents_url(path);
        debug!("GET {}?ref={}", url, self.location.branch);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(&[("ref", self.location.branch.as_str())])
            .send()
            .await
            .map_err(|source| ListingError::Transport {
                url: url.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(ListingError::NotFound {
                    path: path.to_string(),
                })
            }
            status => return Err(ListingError::UnexpectedStatus { url, status }),
        }

        let body = response
            .text()
            .await
            .map_err(|source| ListingError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| ListingError::Decode { url, source })
    }
}

/// Percent-encode each segment, dropping empty ones
fn encode_repo_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::new(&server.uri(), RepoLocation::new("octo", "demo", "main")).unwrap()
    }

    #[test]
    fn test_encode_repo_path() {
        assert_eq!(encode_repo_path(""), "");
        assert_eq!(encode_repo_path("/src//lib/"), "src/lib");
        assert_eq!(encode_repo_path("docs/read me"), "docs/read%20me");
    }

    #[test]
    fn test_contents_url() {
        let client =
            GitHubClient::new("https://api.github.com/", RepoLocation::new("o", "r", "b")).unwrap();
        assert_eq!(client.contents_url(""), "https://api.github.com/repos/o/r/contents");
        assert_eq!(
            client.contents_url("src/lib"),
            "https://api.github.com/repos/o/r/contents/src/lib"
        );
    }

    #[tokio::test]
    async fn test_fetch_directory_contents_parses_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/src"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"type": "file", "name": "index.js", "path": "src/index.js"},
                {"type": "dir", "name": "lib", "path": "src/lib"}
            ])))
            .mount(&server)
            .await;

        let entries = client_for(&server).fetch_directory_contents("src").await.unwrap();
        assert_eq!(
            entries,
            vec![
                ContentEntry::file("index.js", "src/index.js"),
                ContentEntry::dir("lib", "src/lib"),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_directory_contents_not_found() {
        let server = MockServer::start().await;

        let err = client_for(&server)
            .fetch_directory_contents("missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_directory_contents_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_directory_contents("").await.unwrap_err();
        match err {
            ListingError::UnexpectedStatus { url, status } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert!(url.ends_with("/repos/octo/demo/contents"));
            }
            other => panic!("expected unexpected status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_file_path_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/demo/contents/readme.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                {"type": "file", "name": "readme.md", "path": "readme.md"}
            )))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_directory_contents("readme.md")
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::Decode { .. }));
    }
}
