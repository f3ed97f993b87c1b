use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// --- Search configuration ---

pub const DEFAULT_SITE: &str = "indeed";
pub const DEFAULT_LOCATION: &str = "United States";
pub const DEFAULT_COUNTRY: &str = "USA";
pub const DEFAULT_RESULTS_WANTED: u32 = 50;
pub const DEFAULT_HOURS_OLD: u32 = 24;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// One search, fully spelled out. The site, result cap, and country are part
/// of the request so nothing about a search is implicit, but the defaults are
/// the only supported configuration.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    /// Job board to scrape. Only "indeed" is exercised.
    pub site: String,
    /// Free-text search term, e.g. "software engineer".
    pub search_term: String,
    /// Location to search around.
    pub location: String,
    /// Cap on the number of rows the service should return.
    pub results_wanted: u32,
    /// Only include postings at most this many hours old.
    pub hours_old: u32,
    /// Country code the site-specific scraper runs under.
    pub country: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            search_term: String::new(),
            location: DEFAULT_LOCATION.to_string(),
            results_wanted: DEFAULT_RESULTS_WANTED,
            hours_old: DEFAULT_HOURS_OLD,
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.search_term.trim().is_empty() {
            return Err(SearchError::InvalidRequest(
                "search term must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

// --- Errors ---

#[derive(Debug, Error)]
pub enum SearchError {
    /// Rejected before any request was made.
    #[error("{0}")]
    InvalidRequest(String),
    /// The request could not be sent or the response body not read.
    #[error("failed to reach job search service: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with an error of its own.
    #[error("{0}")]
    Upstream(String),
    /// The response did not match the expected shape.
    #[error("unexpected response from job search service: {0}")]
    Decode(#[from] serde_json::Error),
}

// --- Result rows ---

/// One row of the service's tabular result set. Columns are whatever the
/// scraper produced; consumers pull named fields out with [`JobRow::text`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct JobRow(serde_json::Map<String, Value>);

impl JobRow {
    /// The named column rendered as text. Missing and null both come back as
    /// the empty string; non-string values keep their JSON rendering.
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

// --- Source trait and JobSpy client ---

/// The external search capability. The production implementation talks to a
/// JobSpy-compatible HTTP service; tests substitute a stub.
pub trait JobSource {
    fn search(&self, request: &SearchRequest) -> Result<Vec<JobRow>, SearchError>;
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    site_name: Vec<&'a str>,
    search_term: &'a str,
    location: &'a str,
    results_wanted: u32,
    hours_old: u32,
    country_indeed: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    jobs: Vec<JobRow>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(alias = "detail")]
    error: String,
}

/// Blocking client for a JobSpy-compatible search service.
pub struct JobSpyClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl JobSpyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl JobSource for JobSpyClient {
    fn search(&self, request: &SearchRequest) -> Result<Vec<JobRow>, SearchError> {
        request.validate()?;

        let body = ApiRequest {
            site_name: vec![&request.site],
            search_term: &request.search_term,
            location: &request.location,
            results_wanted: request.results_wanted,
            hours_old: request.hours_old,
            country_indeed: &request.country,
        };

        let url = format!("{}/api/v1/search_jobs", self.base_url.trim_end_matches('/'));
        let response = self.client.post(&url).json(&body).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            // Prefer the service's own message when the body carries one.
            let message = match serde_json::from_str::<ApiError>(&text) {
                Ok(err) => err.error,
                Err(_) if !text.trim().is_empty() => text.trim().to_string(),
                Err(_) => format!("job search service returned status {status}"),
            };
            return Err(SearchError::Upstream(message));
        }

        let api_response: ApiResponse = serde_json::from_str(&response.text()?)?;
        Ok(api_response.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_the_fixed_configuration() {
        let request = SearchRequest::default();
        assert_eq!(request.site, "indeed");
        assert_eq!(request.location, "United States");
        assert_eq!(request.results_wanted, 50);
        assert_eq!(request.hours_old, 24);
        assert_eq!(request.country, "USA");
    }

    #[test]
    fn blank_search_term_is_rejected() {
        let request = SearchRequest {
            search_term: "   ".to_string(),
            ..SearchRequest::default()
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, SearchError::InvalidRequest(_)));
        assert_eq!(err.to_string(), "search term must not be blank");
    }

    #[test]
    fn row_text_coerces_every_value_to_a_string() {
        let row: JobRow = serde_json::from_value(json!({
            "title": "Engineer",
            "posted_ts": 1704067200,
            "remote": true,
            "city": null,
        }))
        .unwrap();

        assert_eq!(row.text("title"), "Engineer");
        assert_eq!(row.text("posted_ts"), "1704067200");
        assert_eq!(row.text("remote"), "true");
        assert_eq!(row.text("city"), "");
        assert_eq!(row.text("no_such_column"), "");
    }

    #[test]
    fn api_request_body_mirrors_the_search_request() {
        let request = SearchRequest {
            search_term: "rust developer".to_string(),
            hours_old: 48,
            ..SearchRequest::default()
        };
        let body = ApiRequest {
            site_name: vec![&request.site],
            search_term: &request.search_term,
            location: &request.location,
            results_wanted: request.results_wanted,
            hours_old: request.hours_old,
            country_indeed: &request.country,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "site_name": ["indeed"],
                "search_term": "rust developer",
                "location": "United States",
                "results_wanted": 50,
                "hours_old": 48,
                "country_indeed": "USA",
            })
        );
    }

    #[test]
    fn api_error_reads_both_message_keys() {
        let err: ApiError = serde_json::from_str(r#"{"detail": "rate limited"}"#).unwrap();
        assert_eq!(err.error, "rate limited");
        let err: ApiError = serde_json::from_str(r#"{"error": "rate limited"}"#).unwrap();
        assert_eq!(err.error, "rate limited");
    }

    #[test]
    #[ignore] // Requires a JobSpy API server listening on the default port
    fn live_search_returns_rows() {
        let client = JobSpyClient::new(DEFAULT_API_URL);
        let request = SearchRequest {
            search_term: "software engineer".to_string(),
            ..SearchRequest::default()
        };
        let rows = client.search(&request).expect("search failed");
        assert!(rows.len() <= DEFAULT_RESULTS_WANTED as usize);
    }
}
