//! Query engine response contract
//!
//! Every engine endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true,  "data": { "results": [ ... ] } }
//! { "success": false, "error": "Failed to fetch news results" }
//! ```

use serde::Deserialize;
use snaxel_application::ProviderError;
use snaxel_domain::ResultItem;

#[derive(Debug, Deserialize)]
struct EngineResponse {
    success: bool,
    #[serde(default)]
    data: Option<EngineData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EngineData {
    results: Vec<ResultItem>,
}

/// Parse an engine response body into result items.
///
/// `success: false` becomes [`ProviderError::RequestFailed`] carrying the
/// engine's message; a body that does not follow the contract becomes
/// [`ProviderError::InvalidResponse`].
pub fn parse_engine_response(body: &str) -> Result<Vec<ResultItem>, ProviderError> {
    let response: EngineResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    if !response.success {
        return Err(ProviderError::RequestFailed(
            response
                .error
                .unwrap_or_else(|| "engine reported failure".to_string()),
        ));
    }

    response
        .data
        .map(|data| data.results)
        .ok_or_else(|| ProviderError::InvalidResponse("missing data.results".to_string()))
}
