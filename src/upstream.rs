//! Plumbing shared by the prober and the provider adapters.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::RequestBuilder;

use crate::config::USER_AGENT;
use crate::error::SourceError;

/// Build the outbound HTTP client.
///
/// Idle connections are not kept, so nothing opened for one report is reused by the next.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(0)
        .build()
}

/// Ask every cache between us and the upstream to stay out of the way.
pub fn bypass_caches(request: RequestBuilder) -> RequestBuilder {
    request
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
}

/// Run `fut` under `budget`. Expiry drops the in-flight request and reads as [`SourceError::Timeout`].
pub async fn with_deadline<T, F>(budget: Duration, fut: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout),
    }
}

/// Providers sometimes send `""` where they mean "no value". Treat it as absent.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Join `path` onto an API root, tolerating a trailing slash on the root.
pub fn api_url(base: &str, path: &str) -> Result<url::Url, SourceError> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    Ok(url::Url::parse(&joined)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_expires() {
        let result: Result<(), SourceError> = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(SourceError::Timeout));
    }

    #[tokio::test]
    async fn test_deadline_passes_through_inner_result() {
        let ok: Result<u8, SourceError> =
            with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u8, SourceError> = with_deadline(Duration::from_secs(1), async {
            Err(SourceError::Empty("nothing"))
        })
        .await;
        assert_eq!(err, Err(SourceError::Empty("nothing")));
    }

    #[test]
    fn test_present_drops_empty_strings() {
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(None), None);
        assert_eq!(present(Some("READY".into())).as_deref(), Some("READY"));
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let url = api_url("https://api.example.com/", "/v6/deployments").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v6/deployments");
    }

    #[test]
    fn test_api_url_rejects_garbage_base() {
        assert!(matches!(
            api_url("not a url", "/x"),
            Err(SourceError::InvalidUrl(_))
        ));
    }
}
