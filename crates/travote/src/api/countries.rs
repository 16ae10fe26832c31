use tracing::{debug, instrument};

use super::{ApiRequest, ApiResponse, HandlerError, request_limit};
use crate::{Travote, query::CountryFilter, store::Country};

/// `GET` countries, filtered by `abbr` or else `name`, or all of them.
#[instrument(name = "Handle countries request", level = "info", skip_all, fields(method = %request.http_method))]
pub fn handle_countries(travote: &Travote, request: &ApiRequest) -> ApiResponse {
    match get_countries(travote, request) {
        Ok(countries) => ApiResponse::json(&countries),
        Err(e) => e.into_response(),
    }
}

fn get_countries(travote: &Travote, request: &ApiRequest) -> Result<Vec<Country>, HandlerError> {
    request.require_method("GET")?;

    let config = travote.config();
    let limit = request_limit(request, config.countries_default_limit, config)?;
    let filter = CountryFilter::from_params(&request.query_string_parameters);
    debug!(?filter, limit, "Countries");

    Ok(travote.countries(&filter, limit)?)
}
