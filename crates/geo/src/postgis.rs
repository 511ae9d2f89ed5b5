//! PostGIS POINT parsing for record-store rows.
//!
//! Listing locations come out of the store as either a GeoJSON object
//! (`{"type": "Point", "coordinates": [lng, lat]}`) or a WKT string
//! (`POINT(lng lat)`), depending on how the column was selected. Both are
//! accepted; out-of-range coordinates are rejected rather than passed
//! through to the query pipeline.

use crate::{Coordinate, GeoError, Result};
use serde_json::Value;

/// Parses a listing location from a store row value.
///
/// Returns `None` for null, unrecognized, or out-of-range payloads; a
/// record without a usable location simply cannot be discovered.
///
/// # Example
/// ```
/// use foodshare_geo::parse_location;
/// use serde_json::json;
///
/// let geojson = json!({"type": "Point", "coordinates": [-114.0719, 51.0447]});
/// let coord = parse_location(&geojson).unwrap();
/// assert!((coord.latitude - 51.0447).abs() < 1e-9);
///
/// let wkt = json!("POINT(-114.0719 51.0447)");
/// assert!(parse_location(&wkt).is_some());
/// ```
pub fn parse_location(value: &Value) -> Option<Coordinate> {
    let coord = match value {
        Value::Object(map) => {
            let coords = map.get("coordinates")?.as_array()?;
            // GeoJSON order is [longitude, latitude]
            let lng = coords.first()?.as_f64()?;
            let lat = coords.get(1)?.as_f64()?;
            Coordinate::new(lat, lng)
        }
        Value::String(wkt) => parse_wkt_point(wkt).ok()?,
        _ => return None,
    };

    coord.is_valid().then_some(coord)
}

/// Parses a WKT `POINT(lng lat)` string.
///
/// # Errors
/// `InvalidWkt` for anything that is not a two-value POINT;
/// `InvalidGeometry` for values outside coordinate range.
pub fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let trimmed = wkt.trim();

    let rest = trimmed
        .strip_prefix("POINT")
        .ok_or_else(|| GeoError::InvalidWkt(format!("expected POINT, got: {trimmed}")))?
        .trim_start();

    let body = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| GeoError::InvalidWkt("malformed parentheses".into()))?;

    let mut parts = body.split_whitespace();
    let (lng_str, lat_str) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lng), Some(lat), None) => (lng, lat),
        _ => {
            return Err(GeoError::InvalidWkt(format!(
                "expected 2 coordinates in: {body}"
            )));
        }
    };

    let lng: f64 = lng_str
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("invalid longitude: {lng_str}")))?;
    let lat: f64 = lat_str
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("invalid latitude: {lat_str}")))?;

    let coord = Coordinate::new(lat, lng);
    coord.validate()?;
    Ok(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_geojson_point() {
        let value = json!({
            "type": "Point",
            "coordinates": [-114.0719, 51.0447]
        });

        let coord = parse_location(&value).unwrap();
        assert!((coord.latitude - 51.0447).abs() < 1e-9);
        assert!((coord.longitude - (-114.0719)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_geojson_without_type() {
        let value = json!({"coordinates": [-114.0719, 51.0447]});
        assert!(parse_location(&value).is_some());
    }

    #[test]
    fn test_parse_wkt_point() {
        let coord = parse_location(&json!("POINT(-114.0719 51.0447)")).unwrap();
        assert!((coord.latitude - 51.0447).abs() < 1e-9);
    }

    #[test]
    fn test_parse_wkt_with_space() {
        assert!(parse_location(&json!("POINT (-114.0719 51.0447)")).is_some());
    }

    #[test]
    fn test_parse_null_returns_none() {
        assert!(parse_location(&json!(null)).is_none());
        assert!(parse_location(&json!(42)).is_none());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        // latitude 91 is not a usable location
        assert!(parse_location(&json!("POINT(0.0 91.0)")).is_none());
        assert!(parse_location(&json!({"coordinates": [181.0, 0.0]})).is_none());
    }

    #[test]
    fn test_parse_invalid_wkt() {
        assert!(parse_wkt_point("POLYGON((0 0, 1 1, 1 0, 0 0))").is_err());
        assert!(parse_wkt_point("POINT(1.0)").is_err());
        assert!(parse_wkt_point("POINT(1.0 2.0 3.0)").is_err());
        assert!(parse_wkt_point("POINT(a b)").is_err());
    }
}
