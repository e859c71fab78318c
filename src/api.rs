//! JSON endpoint: `POST /api/pubs`

use axum::{Router, body::Bytes, extract::State, response::Json, routing::post};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::finder::SearchQuery;
use crate::models::{Location, RankedPub, VibeMatchResult, location::parse_coordinate};
use crate::web::AppState;
use crate::{Result, VibeFinderError};

/// A coordinate given either as a JSON number or as numeric text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Number(f64),
    Text(String),
}

impl CoordinateInput {
    fn resolve(&self, field: &str) -> Result<f64> {
        match self {
            CoordinateInput::Number(value) => Ok(*value),
            CoordinateInput::Text(raw) => parse_coordinate(field, raw),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PubsRequest {
    pub latitude: Option<CoordinateInput>,
    pub longitude: Option<CoordinateInput>,
    #[serde(default)]
    pub vibe: Option<String>,
}

impl PubsRequest {
    pub fn into_query(self) -> Result<SearchQuery> {
        let latitude = required(self.latitude.as_ref(), "latitude")?;
        let longitude = required(self.longitude.as_ref(), "longitude")?;
        let location = Location::validated(latitude, longitude)?;
        Ok(SearchQuery::new(location, self.vibe.unwrap_or_default()))
    }
}

fn required(input: Option<&CoordinateInput>, field: &str) -> Result<f64> {
    input
        .ok_or_else(|| VibeFinderError::validation(format!("{field} is required")))?
        .resolve(field)
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PubsResponse {
    Found {
        pubs: Vec<RankedPub>,
        vibe_match: VibeMatchResult,
    },
    Failed {
        error: String,
    },
}

pub fn router() -> Router<AppState> {
    Router::new().route("/pubs", post(find_pubs))
}

/// Failures are reported in the body with a 200 status
async fn find_pubs(State(state): State<AppState>, body: Bytes) -> Json<PubsResponse> {
    match search(&state, &body).await {
        Ok(response) => Json(response),
        Err(e) => {
            warn!("API search failed: {}", e);
            Json(PubsResponse::Failed {
                error: e.to_string(),
            })
        }
    }
}

async fn search(state: &AppState, body: &[u8]) -> Result<PubsResponse> {
    let request: PubsRequest = serde_json::from_slice(body)
        .map_err(|e| VibeFinderError::validation(format!("Invalid JSON body: {e}")))?;
    let query = request.into_query()?;

    let recommendation = state.finder.recommend(&query).await?;
    Ok(PubsResponse::Found {
        pubs: recommendation.pubs,
        vibe_match: recommendation.vibe_match,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn request(value: serde_json::Value) -> PubsRequest {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case(json!({"latitude": 51.2271, "longitude": 4.4132, "vibe": "cozy"}))]
    #[case(json!({"latitude": "51.2271", "longitude": " 4.4132 ", "vibe": "cozy"}))]
    fn test_numbers_and_numeric_strings(#[case] body: serde_json::Value) {
        let query = request(body).into_query().unwrap();
        assert_eq!(query.location, Location::new(51.2271, 4.4132));
        assert_eq!(query.vibe, "cozy");
    }

    #[test]
    fn test_vibe_is_optional() {
        let query = request(json!({"latitude": 51.0, "longitude": 4.0}))
            .into_query()
            .unwrap();
        assert_eq!(query.vibe, "");
    }

    #[rstest]
    #[case(json!({"latitude": "north", "longitude": 4.4}), "latitude must be a number")]
    #[case(json!({"longitude": 4.4}), "latitude is required")]
    #[case(json!({"latitude": 51.2, "longitude": 200.0}), "Longitude must be between")]
    fn test_invalid_coordinates(#[case] body: serde_json::Value, #[case] expected: &str) {
        let err = request(body).into_query().unwrap_err();
        assert!(matches!(err, VibeFinderError::Validation { .. }));
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[test]
    fn test_failed_response_has_only_error_key() {
        let value = serde_json::to_value(PubsResponse::Failed {
            error: "No pubs found in this area.".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"error": "No pubs found in this area."}));
    }
}
