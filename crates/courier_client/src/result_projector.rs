use crate::{lat_lng::LatLng, optimization_result::OptimizationResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteStop {
    /// 1-based
    position: usize,
    location: LatLng,
}

impl RouteStop {
    pub fn new(position: usize, location: LatLng) -> Self {
        Self { position, location }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn location(&self) -> LatLng {
        self.location
    }
}

/// Stops of the first route of `result`, or nothing when any part of the
/// chain (result, routes, first route, its coordinates) is missing.
///
/// A route with any malformed coordinate pair is decoded as missing, so it
/// projects to no stops rather than a partial route.
pub fn project_route(result: Option<&OptimizationResult>) -> Vec<RouteStop> {
    result
        .and_then(|result| result.routes())
        .and_then(|routes| routes.first())
        .and_then(|route| route.route())
        .map(|coordinates| {
            coordinates
                .iter()
                .enumerate()
                .map(|(index, &location)| RouteStop::new(index + 1, location))
                .collect()
        })
        .unwrap_or_default()
}
