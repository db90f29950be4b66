//! Latest-version lookup on the upstream download page

use crate::error::FetchError;
use crate::remote::RemoteSource;
use regex::Regex;

/// Return the first capture group of the first match of `pattern` in `body`
pub fn match_version(body: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fetch `url` and extract the latest version with `pattern`
///
/// Network failures and a pattern that finds nothing are reported as
/// distinct errors; the caller decides whether either is fatal.
pub async fn fetch_latest_version(
    remote: &dyn RemoteSource,
    url: &str,
    pattern: &Regex,
) -> Result<String, FetchError> {
    let body = remote.fetch_text(url).await?;
    match_version(&body, pattern).ok_or_else(|| FetchError::PatternMismatch {
        url: url.to_string(),
        pattern: pattern.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::HttpClient;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn build_pattern() -> Regex {
        Regex::new(r"Build\s+(\d{4})").unwrap()
    }

    #[test]
    fn test_match_version_first_match() {
        let body = "<p>Build 4200</p><p>Build 4199</p>";
        assert_eq!(
            match_version(body, &build_pattern()),
            Some("4200".to_string())
        );
    }

    #[test]
    fn test_match_version_none() {
        assert_eq!(match_version("nothing here", &build_pattern()), None);
    }

    #[test]
    fn test_match_version_optional_group_unmatched() {
        let pattern = Regex::new(r"version(?: (\d+))?").unwrap();
        assert_eq!(match_version("version", &pattern), None);
    }

    #[tokio::test]
    async fn test_fetch_latest_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Latest: Build 4200"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let version = fetch_latest_version(
            &client,
            &format!("{}/download", server.uri()),
            &build_pattern(),
        )
        .await
        .unwrap();
        assert_eq!(version, "4200");
    }

    #[tokio::test]
    async fn test_fetch_latest_version_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = fetch_latest_version(&client, &server.uri(), &build_pattern())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::PatternMismatch { .. }));
    }

    #[tokio::test]
    async fn test_fetch_latest_version_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = fetch_latest_version(&client, &server.uri(), &build_pattern())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }
}
