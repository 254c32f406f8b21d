//! Blocking JSON-over-HTTP client behind the `json_request` template global.

use std::time::Duration;

use ureq::Agent;

use crate::error::SiteError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Issues GET requests and parses JSON responses. No retries.
#[derive(Clone)]
pub struct JsonClient {
    agent: Agent,
}

impl Default for JsonClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT))
    }
}

impl JsonClient {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    /// GET `url` with `params` as the query string and parse the body.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::HttpRequest`] on transport or JSON errors and
    /// [`SiteError::HttpResponse`] on a 4xx/5xx status.
    pub fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, SiteError> {
        tracing::debug!(url, params = params.len(), "Fetching JSON");

        let mut request = self.agent.get(url);
        for (key, value) in params {
            request = request.query(key, value);
        }
        let response = request.call()?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        if status >= 400 {
            let body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(SiteError::HttpResponse { status, body });
        }

        Ok(body.read_json()?)
    }
}
