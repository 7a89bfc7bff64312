use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::cache::ResponseCache;
use crate::client::response::{ApiErrorBody, ArchiveResponse};
use crate::client::retry::RetryPolicy;
use crate::error::{ArchiveError, Result};
use crate::models::{DailyStatistic, Location};
use crate::settings::Settings;
use crate::utils::constants::{DATE_FORMAT, DEFAULT_TIMEZONE, TIME_FORMAT_UNIX};

/// Client for the historical weather archive with response caching and retries.
pub struct ArchiveClient {
    client: Client,
    endpoint: Url,
    cache: Option<ResponseCache>,
    retry: RetryPolicy,
}

impl ArchiveClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let cache = if settings.cache.enabled {
            let cache = ResponseCache::open(&settings.cache.path, settings.cache_expiry())?;
            let purged = cache.purge_expired()?;
            if purged > 0 {
                debug!("Purged {} expired cache entries", purged);
            }
            Some(cache)
        } else {
            None
        };

        Self::with_parts(
            &settings.api.endpoint,
            cache,
            settings.retry_policy(),
            settings.timeout(),
        )
    }

    pub fn with_parts(
        endpoint: &str,
        cache: Option<ResponseCache>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ArchiveError::Config(format!("Invalid archive endpoint '{}': {}", endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            cache,
            retry,
        })
    }

    /// Full request URL for one location and period. Doubles as cache key.
    pub fn request_url(&self, location: &Location, start: NaiveDate, end: NaiveDate) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &location.latitude.to_string())
            .append_pair("longitude", &location.longitude.to_string())
            .append_pair("start_date", &start.format(DATE_FORMAT).to_string())
            .append_pair("end_date", &end.format(DATE_FORMAT).to_string())
            .append_pair("daily", &DailyStatistic::query_value())
            .append_pair("timeformat", TIME_FORMAT_UNIX)
            .append_pair("timezone", DEFAULT_TIMEZONE);
        url
    }

    /// Fetch daily temperature statistics for a location, inclusive of both dates.
    pub async fn fetch_daily(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ArchiveResponse> {
        let url = self.request_url(location, start, end);
        debug!("Requesting {}", url);

        if let Some(response) = self.cached_response(&url)? {
            return Ok(response);
        }

        let body = self.fetch_body(&url).await?;
        let response: ArchiveResponse = serde_json::from_str(&body)?;

        // Store only bodies that parse
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(url.as_str(), StatusCode::OK.as_u16(), &body) {
                warn!("Could not cache response for {}: {}", url, e);
            }
        }

        Ok(response)
    }

    fn cached_response(&self, url: &Url) -> Result<Option<ArchiveResponse>> {
        let Some(cache) = &self.cache else {
            return Ok(None);
        };
        let Some(hit) = cache.get(url.as_str())? else {
            return Ok(None);
        };

        if !hit.is_success() {
            debug!("Ignoring cached {} response for {}", hit.status, url);
            return Ok(None);
        }

        match serde_json::from_str(&hit.body) {
            Ok(response) => {
                debug!("Cache hit for {}", url);
                Ok(Some(response))
            }
            Err(e) => {
                warn!("Ignoring unreadable cache entry for {}: {}", url, e);
                Ok(None)
            }
        }
    }

    async fn fetch_body(&self, url: &Url) -> Result<String> {
        let response = self
            .retry
            .execute(|| self.client.get(url.clone()).send())
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .filter(|b| b.error && !b.reason.is_empty())
                .map(|b| b.reason)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

            return Err(ArchiveError::Api {
                status: status.as_u16(),
                reason,
            });
        }

        Ok(body)
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }
}
