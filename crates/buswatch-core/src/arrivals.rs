// SPDX-License-Identifier: AGPL-3.0
// Buswatch Core - Arrival lookup client
//
// One GET per shortcut against the remote lookup endpoint. The response body
// is treated as raw JSON and mapped onto the three arrival slots; transport
// and status failures surface as errors for the coordinator to degrade.

use crate::types::{AppError, AppSettings, Arrivals, UNKNOWN_ARRIVALS};
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the arrival lookup endpoint
pub struct ArrivalsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArrivalsClient {
    pub fn new(settings: &AppSettings) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch arrivals for one (stop, service) pair.
    ///
    /// A well-formed response maps through [`interpret_arrivals`]; transport
    /// failures, non-success statuses and unparsable bodies are errors.
    pub async fn fetch(&self, stop_number: &str, service: &str) -> Result<Arrivals, AppError> {
        let url = format!("{}/api/v1/busArrival", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("BusStopCode", stop_number), ("ServiceNo", service)])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "API request failed with status {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Malformed response body: {}", e)))?;

        Ok(interpret_arrivals(&body))
    }
}

/// Map a raw lookup response onto the three arrival slots.
///
/// An array of at least three elements supplies slots 0..3 (excess ignored),
/// each through a lenient numeric conversion where non-numeric values become
/// unknown. Any other shape is wholly unknown.
pub fn interpret_arrivals(body: &Value) -> Arrivals {
    match body.as_array() {
        Some(items) if items.len() >= 3 => {
            let mut arrivals = UNKNOWN_ARRIVALS;
            for (slot, item) in arrivals.iter_mut().zip(items) {
                *slot = item.as_u64().and_then(|minutes| u32::try_from(minutes).ok());
            }
            arrivals
        }
        _ => UNKNOWN_ARRIVALS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interpret_well_formed_array() {
        let arrivals = interpret_arrivals(&json!([4, 9, 17]));
        assert_eq!(arrivals, [Some(4), Some(9), Some(17)]);
    }

    #[test]
    fn test_interpret_ignores_excess_elements() {
        let arrivals = interpret_arrivals(&json!([4, 9, 17, 99, 120]));
        assert_eq!(arrivals, [Some(4), Some(9), Some(17)]);
    }

    #[test]
    fn test_interpret_short_array_is_unknown() {
        assert_eq!(interpret_arrivals(&json!([4, 9])), UNKNOWN_ARRIVALS);
    }

    #[test]
    fn test_interpret_non_array_is_unknown() {
        assert_eq!(interpret_arrivals(&json!({"foo": "bar"})), UNKNOWN_ARRIVALS);
        assert_eq!(interpret_arrivals(&json!("soon")), UNKNOWN_ARRIVALS);
    }

    #[test]
    fn test_interpret_non_numeric_slots_become_unknown() {
        let arrivals = interpret_arrivals(&json!([4, "soon", 17]));
        assert_eq!(arrivals, [Some(4), None, Some(17)]);

        let arrivals = interpret_arrivals(&json!([-2, 3.5, 17]));
        assert_eq!(arrivals, [None, None, Some(17)]);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let settings = AppSettings {
            api_base_url: "http://nonexistent.invalid".to_string(),
            request_timeout_secs: 2,
            ..AppSettings::default()
        };
        let client = ArrivalsClient::new(&settings);

        let err = client.fetch("12345", "196").await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }
}
