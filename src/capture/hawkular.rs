// Hawkular-style metrics backend over HTTP

use std::time::Duration;

use anyhow::Context as _;
use chrono::Utc;
use serde::Deserialize;
use url::Url;

use super::context::CaptureContext;
use crate::config::BackendConfig;
use crate::models::RawSample;

/// Wire bucket; the backend marks windows with no data as `empty`.
#[derive(Debug, Deserialize)]
struct Bucket {
    start: i64,
    end: i64,
    min: Option<f64>,
    #[serde(default)]
    empty: bool,
}

/// HTTP-backed sample fetcher. Queries bucketed data for the trailing
/// lookback window; no retries, errors propagate to the caller.
pub struct HawkularContext {
    client: reqwest::Client,
    endpoint: Url,
    tenant: Option<String>,
    bucket_secs: u64,
    lookback_secs: u64,
}

impl HawkularContext {
    pub fn new(config: &BackendConfig, bucket_secs: u64) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("invalid backend.endpoint {:?}", config.endpoint))?;
        if endpoint.cannot_be_a_base() {
            anyhow::bail!("backend.endpoint {:?} cannot be a base URL", config.endpoint);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            tenant: config.tenant.clone(),
            bucket_secs,
            lookback_secs: config.lookback_secs,
        })
    }

    /// GET {endpoint}/{kind}/{metric id}/data. The metric id contains
    /// slashes and is pushed as a single percent-encoded path segment.
    async fn fetch(&self, kind: &str, metric_id: &str) -> anyhow::Result<Vec<RawSample>> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("backend.endpoint cannot be a base URL"))?
            .push(kind)
            .push(metric_id)
            .push("data");

        let end_ms = Utc::now().timestamp_millis();
        let start_ms = end_ms - (self.lookback_secs as i64) * 1000;
        url.query_pairs_mut()
            .append_pair("bucketDuration", &format!("{}s", self.bucket_secs))
            .append_pair("start", &start_ms.to_string())
            .append_pair("end", &end_ms.to_string());

        let mut request = self.client.get(url.clone());
        if let Some(tenant) = &self.tenant {
            request = request.header("Hawkular-Tenant", tenant);
        }

        let buckets: Vec<Bucket> = request
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?
            .json()
            .await
            .with_context(|| format!("decode buckets for {metric_id}"))?;

        Ok(buckets
            .into_iter()
            .filter(|b| !b.empty)
            .filter_map(|b| b.min.map(|min| RawSample::new(b.start, b.end, min)))
            .collect())
    }
}

impl CaptureContext for HawkularContext {
    async fn fetch_counters_data(&self, metric_id: &str) -> anyhow::Result<Vec<RawSample>> {
        self.fetch("counters", metric_id).await
    }

    async fn fetch_gauges_data(&self, metric_id: &str) -> anyhow::Result<Vec<RawSample>> {
        self.fetch("gauges", metric_id).await
    }
}
