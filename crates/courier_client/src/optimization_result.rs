use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::lat_lng::LatLng;

/// Response of `POST /optimize`.
///
/// The optimizer only loosely guarantees its shape, so the raw document is
/// kept for display and the parts we rely on are decoded leniently: anything
/// that does not have the expected shape is treated as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    raw: Value,
    routes: Option<Vec<ResultRoute>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRoute {
    route: Option<Vec<LatLng>>,
    vehicle: Option<u64>,
    distance: Option<f64>,
}

impl ResultRoute {
    pub fn route(&self) -> Option<&[LatLng]> {
        self.route.as_deref()
    }

    pub fn vehicle(&self) -> Option<u64> {
        self.vehicle
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    fn from_value(value: &Value) -> Self {
        Self {
            route: value.get("route").and_then(decode_coordinates),
            vehicle: value.get("vehicle").and_then(Value::as_u64),
            distance: value.get("distance").and_then(Value::as_f64),
        }
    }
}

impl OptimizationResult {
    pub fn from_value(raw: Value) -> Self {
        let routes = payload(&raw)
            .get("routes")
            .and_then(Value::as_array)
            .map(|routes| routes.iter().map(ResultRoute::from_value).collect());

        Self { raw, routes }
    }

    pub fn routes(&self) -> Option<&[ResultRoute]> {
        self.routes.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        payload(&self.raw).get("message").and_then(Value::as_str)
    }

    /// Message of an error document such as `{ "error": "No solution found!" }`
    pub fn error(&self) -> Option<&str> {
        self.raw.get("error").and_then(Value::as_str)
    }

    pub fn total_distance(&self) -> Option<f64> {
        payload(&self.raw)
            .get("total_distance")
            .and_then(Value::as_f64)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.raw)
    }
}

impl<'de> Deserialize<'de> for OptimizationResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(OptimizationResult::from_value)
    }
}

// Some deployments answer `{ "result": { "routes": ... } }`
fn payload(raw: &Value) -> &Value {
    match (raw.get("routes"), raw.get("result")) {
        (None, Some(inner)) if inner.is_object() => inner,
        _ => raw,
    }
}

/// All or nothing: one malformed pair drops the whole route.
fn decode_coordinates(value: &Value) -> Option<Vec<LatLng>> {
    value.as_array()?.iter().map(decode_coordinate).collect()
}

fn decode_coordinate(value: &Value) -> Option<LatLng> {
    match value.as_array()?.as_slice() {
        [lat, lng, ..] => Some(LatLng::new(lat.as_f64()?, lng.as_f64()?)),
        _ => None,
    }
}
