//! HTTP implementation of the remote fetcher.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::models::{ApiSettings, FeedSettings, PhotosEnvelope, TagsEnvelope};
use crate::services::fetcher::{BoxFuture, FetchResponse, RemoteFetcher, HTTP_OK};
use crate::services::query_builder::{RequestDescriptor, RequestKind};
use crate::utils::error::{AppError, AppResult};

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("flickrer/", env!("CARGO_PKG_VERSION"));

/// Fetcher talking to the REST endpoint configured in [`ApiSettings`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    api: ApiSettings,
}

impl HttpFetcher {
    /// Create a fetcher with the configured connect and read timeouts.
    pub fn new(settings: &FeedSettings) -> AppResult<Self> {
        if settings.api.api_key.trim().is_empty() {
            return Err(AppError::Config("API key is not set".to_string()));
        }
        // Fail early on a bad endpoint rather than on the first request.
        Url::parse(&settings.api.endpoint)
            .map_err(|e| AppError::Config(format!("invalid endpoint: {e}")))?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.network.connect_timeout_secs))
            .read_timeout(Duration::from_secs(settings.network.read_timeout_secs))
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| AppError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api: settings.api.clone(),
        })
    }

    async fn execute<E: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> AppResult<FetchResponse<E>> {
        let url = build_url(&self.api, request)?;
        tracing::debug!(
            method = method_for(&self.api, request.kind),
            query = %request.query_string(),
            "Sending request"
        );

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        if status != HTTP_OK {
            return Ok(FetchResponse::status(status));
        }

        let body = response.text().await?;
        decode(status, &body)
    }
}

impl RemoteFetcher for HttpFetcher {
    fn fetch_photos<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, AppResult<FetchResponse<PhotosEnvelope>>> {
        Box::pin(self.execute(request))
    }

    fn fetch_tags<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, AppResult<FetchResponse<TagsEnvelope>>> {
        Box::pin(self.execute(request))
    }
}

fn method_for(api: &ApiSettings, kind: RequestKind) -> &str {
    match kind {
        RequestKind::Recent => &api.recent_method,
        RequestKind::Search => &api.search_method,
        RequestKind::Tags => &api.tags_method,
    }
}

/// Full request URL: endpoint, method, descriptor parameters, then the
/// fixed JSON response parameters.
pub fn build_url(api: &ApiSettings, request: &RequestDescriptor) -> AppResult<Url> {
    let mut url = Url::parse(&api.endpoint)
        .map_err(|e| AppError::Config(format!("invalid endpoint: {e}")))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("method", method_for(api, request.kind));
        for (key, value) in &request.params {
            query.append_pair(key, value);
        }
        query
            .append_pair("api_key", &api.api_key)
            .append_pair("format", "json")
            .append_pair("nojsoncallback", "1");
    }

    Ok(url)
}

/// Decode a response body. Non-OK statuses are never decoded.
pub fn decode<E: DeserializeOwned>(status: u16, body: &str) -> AppResult<FetchResponse<E>> {
    if status != HTTP_OK {
        return Ok(FetchResponse::status(status));
    }
    let envelope = serde_json::from_str(body)?;
    Ok(FetchResponse {
        status,
        body: Some(envelope),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Filters, Stat};
    use crate::services::query_builder;

    fn api() -> ApiSettings {
        ApiSettings {
            api_key: "KEY".to_string(),
            ..ApiSettings::default()
        }
    }

    #[test]
    fn test_build_url_recent() {
        let request = query_builder::build(&Filters::default(), 0);
        let url = build_url(&api(), &request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.flickr.com/services/rest/?method=flickr.photos.getRecent&api_key=KEY&format=json&nojsoncallback=1"
        );
    }

    #[test]
    fn test_build_url_encodes_search_text() {
        let filters = Filters {
            search_text: Some("red & blue".to_string()),
            selected_tags: Vec::new(),
        };
        let request = query_builder::build(&filters, 2);
        let url = build_url(&api(), &request).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("method".into(), "flickr.photos.search".into()));
        assert_eq!(pairs[1], ("text".into(), "red & blue".into()));
        assert_eq!(pairs[2], ("page".into(), "2".into()));
        assert!(!url.as_str().contains("red & blue"));
    }

    #[test]
    fn test_build_url_tags() {
        let url = build_url(&api(), &query_builder::build_tags("42")).unwrap();
        assert!(url.as_str().contains("method=flickr.tags.getListPhoto&photo_id=42"));
    }

    #[test]
    fn test_build_url_rejects_bad_endpoint() {
        let api = ApiSettings {
            endpoint: "not a url".to_string(),
            ..api()
        };
        let err = build_url(&api, &query_builder::build_tags("1")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_decode_ok_body() {
        let response: FetchResponse<PhotosEnvelope> =
            decode(200, r#"{"stat":"ok","photos":{"page":1,"pages":1,"photo":[]}}"#).unwrap();
        assert_eq!(response.body.unwrap().stat, Stat::Ok);
    }

    #[test]
    fn test_decode_skips_body_on_error_status() {
        let response: FetchResponse<PhotosEnvelope> = decode(500, "<html>oops</html>").unwrap();
        assert_eq!(response.status, 500);
        assert!(response.body.is_none());
    }

    #[test]
    fn test_decode_malformed_is_transport_failure() {
        let err = decode::<TagsEnvelope>(200, "jsonFlickrApi({})").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = HttpFetcher::new(&FeedSettings::default()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
