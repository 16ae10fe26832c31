use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{ApiRequest, ApiResponse, HandlerError};
use crate::{Travote, auth::TokenVerifier};

const VOTE_ALLOW_METHODS: &str = "OPTIONS,POST";

/// Body of a vote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "fb_id")]
    pub user_id: String,
    #[serde(rename = "fb_access_token")]
    pub access_token: String,
    pub place_id: String,
    pub place_abbr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub success: bool,
}

/// `POST` a vote for a place.
///
/// Answers `200 {"success": bool}` once the body parses; a rejected token, an
/// unknown place or a failed verification call all report `success: false`.
/// A failing place lookup is a 500.
#[instrument(name = "Handle vote request", level = "info", skip_all, fields(method = %request.http_method))]
pub fn handle_vote(
    travote: &Travote,
    verifier: &dyn TokenVerifier,
    request: &ApiRequest,
) -> ApiResponse {
    match vote(travote, verifier, request) {
        Ok(success) => {
            ApiResponse::json(&VoteResponse { success }).with_allowed_methods(VOTE_ALLOW_METHODS)
        }
        Err(e) => e.into_response(),
    }
}

fn vote(
    travote: &Travote,
    verifier: &dyn TokenVerifier,
    request: &ApiRequest,
) -> Result<bool, HandlerError> {
    request.require_method("POST")?;

    let body = request.body.as_deref().unwrap_or_default();
    let vote: VoteRequest = serde_json::from_str(body)
        .map_err(|e| HandlerError::BadRequest(format!("Invalid vote body: {e}")))?;

    match verifier.verify(&vote.user_id, &vote.access_token) {
        Ok(true) => {}
        Ok(false) => return Ok(false),
        Err(e) => {
            warn!(error = %e, user_id = %vote.user_id, "Token verification failed");
            return Ok(false);
        }
    }

    let exists = travote.place_exists(&vote.place_id, &vote.place_abbr)?;
    if exists {
        info!(place_id = %vote.place_id, place_abbr = %vote.place_abbr, "Vote accepted");
    } else {
        warn!(place_id = %vote.place_id, place_abbr = %vote.place_abbr, "Vote for unknown place");
    }
    Ok(exists)
}
