use super::response::{DirectionsResponse, DistanceMatrixResponse, TextValue};
use crate::routing::{LatLng, MapServiceError, RouteBounds, RouteDetails, RouteStep, RouteSummary};

/// Map a provider status string onto a typed failure.
pub(super) fn check_status(status: &str, message: Option<&str>) -> Result<(), MapServiceError> {
    let message = message.unwrap_or_default().to_string();
    match status {
        "OK" => Ok(()),
        "ZERO_RESULTS" | "NOT_FOUND" | "MAX_ROUTE_LENGTH_EXCEEDED" => {
            Err(MapServiceError::NoRoute(status.to_string()))
        }
        "REQUEST_DENIED" | "INVALID_REQUEST" | "OVER_DAILY_LIMIT" => {
            Err(MapServiceError::RequestDenied {
                status: status.to_string(),
                message,
            })
        }
        "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR" => Err(MapServiceError::Unavailable {
            status: status.to_string(),
            message,
        }),
        other => Err(MapServiceError::Decode(format!(
            "unexpected status '{other}'"
        ))),
    }
}

pub(super) fn parse_directions_response(
    resp: DirectionsResponse,
) -> Result<RouteDetails, MapServiceError> {
    check_status(&resp.status, resp.error_message.as_deref())?;

    let route = resp
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| MapServiceError::NoRoute("empty route list".to_string()))?;
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or_else(|| MapServiceError::Decode("route has no legs".to_string()))?;

    let steps = leg
        .steps
        .into_iter()
        .map(|step| RouteStep {
            distance: step.distance.text,
            duration: step.duration.text,
            instruction: step.html_instructions,
        })
        .collect();

    Ok(RouteDetails {
        distance_m: leg.distance.value,
        distance_text: leg.distance.text,
        duration_secs: leg.duration.value,
        duration_text: leg.duration.text,
        polyline: route
            .overview_polyline
            .map(|polyline| polyline.points)
            .filter(|points| !points.is_empty()),
        bounds: route.bounds.map(|bounds| RouteBounds {
            northeast: LatLng {
                lat: bounds.northeast.lat,
                lng: bounds.northeast.lng,
            },
            southwest: LatLng {
                lat: bounds.southwest.lat,
                lng: bounds.southwest.lng,
            },
        }),
        start_address: leg.start_address.filter(|address| !address.trim().is_empty()),
        end_address: leg.end_address.filter(|address| !address.trim().is_empty()),
        steps,
    })
}

pub(super) fn parse_distance_matrix_response(
    resp: DistanceMatrixResponse,
) -> Result<RouteSummary, MapServiceError> {
    check_status(&resp.status, resp.error_message.as_deref())?;

    let element = resp
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| MapServiceError::Decode("matrix has no elements".to_string()))?;

    // Per-element status: the request succeeded but this pair may be unroutable.
    check_status(&element.status, None)?;

    let distance: TextValue = element
        .distance
        .ok_or_else(|| MapServiceError::Decode("element without distance".to_string()))?;
    let duration: TextValue = element
        .duration
        .ok_or_else(|| MapServiceError::Decode("element without duration".to_string()))?;

    Ok(RouteSummary {
        distance_m: distance.value,
        distance_text: distance.text,
        duration_secs: duration.value,
        duration_text: duration.text,
    })
}
