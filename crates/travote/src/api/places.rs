use tracing::{debug, instrument};

use super::{ApiRequest, ApiResponse, HandlerError, request_limit};
use crate::{
    Travote,
    geo::{BoundingBoxFilterBuilder, Point},
    query::PlaceFilter,
    store::Place,
};

const COORDINATE_PARAMS: [&str; 3] = ["lat", "long", "distance"];

/// `GET` places.
///
/// With `lat`, `long` and `distance` (degrees) all present, returns places in
/// the surrounding box, optionally narrowed by `abbr`, `category` or `id`.
/// Otherwise one of those filters is required.
#[instrument(name = "Handle places request", level = "info", skip_all, fields(method = %request.http_method))]
pub fn handle_places(travote: &Travote, request: &ApiRequest) -> ApiResponse {
    match get_places(travote, request) {
        Ok(places) => ApiResponse::json(&places),
        Err(e) => e.into_response(),
    }
}

fn get_places(travote: &Travote, request: &ApiRequest) -> Result<Vec<Place>, HandlerError> {
    request.require_method("GET")?;

    let config = travote.config();
    let limit = request_limit(request, config.places_default_limit, config)?;
    let filter = PlaceFilter::from_params(&request.query_string_parameters);

    if request.has_params(&COORDINATE_PARAMS) {
        let center = Point::new(
            request.required_param("lat")?,
            request.required_param("long")?,
        );
        let distance: f64 = request.required_param("distance")?;
        debug!(?filter, %center, distance, limit, "Places by coordinates");

        let query = BoundingBoxFilterBuilder::new(center, distance)
            .filter(filter)
            .limit(limit)
            .build()?;
        return Ok(travote.places_near(&query)?);
    }

    if filter.is_any() {
        return Err(HandlerError::BadRequest("Please specify abbr".to_string()));
    }
    debug!(?filter, limit, "Places by filter");
    Ok(travote.places(&filter, limit)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::travote;

    fn place_ids(response: &ApiResponse) -> Vec<String> {
        let mut ids: Vec<String> = serde_json::from_str::<Vec<Place>>(&response.body)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_places_by_abbr() {
        let response = handle_places(&travote(), &ApiRequest::get(&[("abbr", "FJ")]));

        assert_eq!(response.status_code, 200);
        assert_eq!(place_ids(&response), vec!["fj-001", "fj-002", "fj-003"]);
        assert!(response.body.contains(r#""long":"-179.77""#));
    }

    #[test]
    fn test_places_by_coordinates_across_antimeridian() {
        let request = ApiRequest::get(&[("lat", "-16.8"), ("long", "179.5"), ("distance", "1")]);
        let response = handle_places(&travote(), &request);

        assert_eq!(response.status_code, 200);
        assert_eq!(place_ids(&response), vec!["fj-001", "fj-002"]);
    }

    #[test]
    fn test_places_by_coordinates_with_filter() {
        let request = ApiRequest::get(&[
            ("lat", "1.3"),
            ("long", "103.85"),
            ("distance", "0.2"),
            ("category", "attraction"),
        ]);
        let response = handle_places(&travote(), &request);

        assert_eq!(place_ids(&response), vec!["sg-001", "sg-003", "sg-005"]);
    }

    #[test]
    fn test_places_limit() {
        let request = ApiRequest::get(&[("abbr", "SG"), ("limit", "2")]);
        let response = handle_places(&travote(), &request);
        assert_eq!(place_ids(&response).len(), 2);
    }

    #[test]
    fn test_partial_coordinates_fall_back_to_filter() {
        let request = ApiRequest::get(&[("abbr", "GB"), ("lat", "51.5")]);
        let response = handle_places(&travote(), &request);
        assert_eq!(place_ids(&response), vec!["gb-001", "gb-002"]);
    }

    #[test]
    fn test_missing_filter_is_rejected() {
        let response = handle_places(&travote(), &ApiRequest::get(&[]));

        assert_eq!(response.status_code, 400);
        assert_eq!(response.error_message().as_deref(), Some("Please specify abbr"));
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let travote = travote();
        for params in [
            vec![("lat", "north"), ("long", "0"), ("distance", "1")],
            vec![("lat", "0"), ("long", "0"), ("distance", "-1")],
            vec![("lat", "95"), ("long", "0"), ("distance", "1")],
            vec![("abbr", "SG"), ("limit", "0")],
            vec![("abbr", "SG"), ("limit", "lots")],
        ] {
            let response = handle_places(&travote, &ApiRequest::get(&params));
            assert_eq!(response.status_code, 400, "{params:?}");
        }
    }

    #[test]
    fn test_wrong_method() {
        let response = handle_places(&travote(), &ApiRequest::post("{}"));

        assert_eq!(response.status_code, 405);
        assert_eq!(response.error_message().as_deref(), Some("Method not allowed"));
    }
}
