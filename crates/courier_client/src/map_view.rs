use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use serde_json::json;

use crate::{lat_lng::LatLng, result_projector::RouteStop};

/// Approximate center of the contiguous US
pub const DEFAULT_VIEW_CENTER: LatLng = LatLng::new(39.8283, -98.5795);
pub const DEFAULT_VIEW_ZOOM: u8 = 4;

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://openstreetmap.org\">OpenStreetMap</a> contributors";
pub const PATH_COLOR: &str = "blue";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_VIEW_CENTER,
            zoom: DEFAULT_VIEW_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapMarker {
    position: usize,
    location: LatLng,
}

impl MapMarker {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn location(&self) -> LatLng {
        self.location
    }

    pub fn label(&self) -> String {
        format!("Stop {}: {}", self.position, self.location)
    }
}

#[derive(Debug, Default)]
pub struct MapView {
    viewport: MapViewport,
}

impl MapView {
    pub fn new(viewport: MapViewport) -> Self {
        Self { viewport }
    }

    /// One marker per stop and, when there is at least one stop, a path
    /// through them in order. The viewport never moves: `fallback_center` is
    /// only carried along on the rendered map.
    pub fn render(&self, stops: &[RouteStop], fallback_center: LatLng) -> RenderedMap {
        let markers: Vec<MapMarker> = stops
            .iter()
            .map(|stop| MapMarker {
                position: stop.position(),
                location: stop.location(),
            })
            .collect();

        let path = (!markers.is_empty()).then(|| {
            markers
                .iter()
                .map(|marker| geo_types::Coord::from(&marker.location))
                .collect::<geo_types::LineString<f64>>()
        });

        RenderedMap {
            viewport: self.viewport,
            fallback_center,
            markers,
            path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedMap {
    viewport: MapViewport,
    fallback_center: LatLng,
    markers: Vec<MapMarker>,
    path: Option<geo_types::LineString<f64>>,
}

impl RenderedMap {
    pub fn viewport(&self) -> MapViewport {
        self.viewport
    }

    pub fn fallback_center(&self) -> LatLng {
        self.fallback_center
    }

    /// Where the map would be centered: the first stop, else the fallback.
    pub fn focus(&self) -> LatLng {
        self.markers
            .first()
            .map(|marker| marker.location)
            .unwrap_or(self.fallback_center)
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    pub fn path(&self) -> Option<&geo_types::LineString<f64>> {
        self.path.as_ref()
    }

    pub fn to_geojson(&self) -> GeoJson {
        let mut features: Vec<Feature> = self
            .markers
            .iter()
            .map(|marker| {
                let point: geo_types::Point = (&marker.location).into();
                let mut properties = JsonObject::new();
                properties.insert(String::from("kind"), json!("stop"));
                properties.insert(String::from("position"), json!(marker.position));
                properties.insert(String::from("label"), json!(marker.label()));

                Feature {
                    geometry: Some(Geometry::from(&point)),
                    properties: Some(properties),
                    ..Default::default()
                }
            })
            .collect();

        if let Some(path) = &self.path {
            let mut properties = JsonObject::new();
            properties.insert(String::from("kind"), json!("path"));
            properties.insert(String::from("stroke"), json!(PATH_COLOR));

            features.push(Feature {
                geometry: Some(Geometry::from(path)),
                properties: Some(properties),
                ..Default::default()
            });
        }

        let mut foreign_members = JsonObject::new();
        foreign_members.insert(
            String::from("viewport"),
            json!({ "center": self.viewport.center, "zoom": self.viewport.zoom }),
        );
        foreign_members.insert(
            String::from("fallback_center"),
            json!(self.fallback_center),
        );
        foreign_members.insert(
            String::from("tiles"),
            json!({ "url": TILE_URL_TEMPLATE, "attribution": TILE_ATTRIBUTION }),
        );

        GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<RouteStop> {
        vec![
            RouteStop::new(1, LatLng::new(50.0, 4.0)),
            RouteStop::new(2, LatLng::new(51.0, 5.0)),
            RouteStop::new(3, LatLng::new(50.0, 4.0)),
        ]
    }

    #[test]
    fn test_empty_route_renders_base_map_only() {
        let map = MapView::default().render(&[], LatLng::new(10.0, 20.0));

        assert!(map.markers().is_empty());
        assert!(map.path().is_none());
        assert_eq!(map.viewport(), MapViewport::default());
        assert_eq!(map.focus(), LatLng::new(10.0, 20.0));
    }

    #[test]
    fn test_viewport_ignores_route_and_fallback() {
        let map = MapView::default().render(&stops(), LatLng::new(10.0, 20.0));

        assert_eq!(map.viewport().center, DEFAULT_VIEW_CENTER);
        assert_eq!(map.viewport().zoom, DEFAULT_VIEW_ZOOM);
        assert_eq!(map.fallback_center(), LatLng::new(10.0, 20.0));
        assert_eq!(map.focus(), LatLng::new(50.0, 4.0));
    }

    #[test]
    fn test_markers_and_path_follow_stop_order() {
        let map = MapView::default().render(&stops(), LatLng::new(0.0, 0.0));

        let positions: Vec<usize> = map.markers().iter().map(MapMarker::position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(map.markers()[1].label(), "Stop 2: [ 51, 5 ]");

        let path = map.path().unwrap();
        let coords: Vec<(f64, f64)> = path.coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(4.0, 50.0), (5.0, 51.0), (4.0, 50.0)]);
    }

    #[test]
    fn test_single_stop_still_draws_path() {
        let map = MapView::default().render(
            &[RouteStop::new(1, LatLng::new(1.0, 2.0))],
            LatLng::new(0.0, 0.0),
        );

        assert_eq!(map.markers().len(), 1);
        assert_eq!(map.path().unwrap().0.len(), 1);
    }

    #[test]
    fn test_geojson_export() {
        let map = MapView::default().render(&stops(), LatLng::new(9.0, 8.0));

        let value = serde_json::to_value(map.to_geojson()).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);

        assert_eq!(features[0]["geometry"]["type"], "Point");
        assert_eq!(features[0]["geometry"]["coordinates"], json!([4.0, 50.0]));
        assert_eq!(features[0]["properties"]["label"], "Stop 1: [ 50, 4 ]");

        assert_eq!(features[3]["geometry"]["type"], "LineString");
        assert_eq!(features[3]["properties"]["stroke"], PATH_COLOR);

        assert_eq!(value["viewport"]["zoom"], 4);
        assert_eq!(value["viewport"]["center"], json!([39.8283, -98.5795]));
        assert_eq!(value["fallback_center"], json!([9.0, 8.0]));
    }

    #[test]
    fn test_geojson_export_without_route() {
        let map = MapView::default().render(&[], LatLng::new(0.0, 0.0));

        let value = serde_json::to_value(map.to_geojson()).unwrap();
        assert_eq!(value["features"].as_array().unwrap().len(), 0);
        assert_eq!(value["tiles"]["url"], TILE_URL_TEMPLATE);
    }
}
