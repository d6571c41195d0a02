use crate::{Assets, Band, Bbox, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single scene from the catalog.
///
/// Parsing is lenient: every nesting level (the item itself, its geometry,
/// properties, assets, and each asset) whitelists the recognized fields and
/// silently discards anything else, so schema additions on the catalog side
/// never break deserialization. Nested raw mappings are coerced into the
/// typed sub-records recursively.
///
/// # Examples
///
/// ```
/// use cbers4a::Item;
/// use serde_json::json;
///
/// let item: Item = serde_json::from_value(json!({
///     "type": "Feature",
///     "id": "CBERS4A_WPM22912420210830",
///     "collection": "CBERS4A_WPM_L4_DN",
///     "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]},
///     "bbox": [0.0, 0.0, 1.0, 1.0],
///     "properties": {
///         "datetime": "2021-08-30T14:01:21",
///         "path": 229,
///         "row": 124,
///         "satellite": "CBERS4A",
///         "sensor": "WPM",
///         "cloud_cover": 10.5,
///     },
///     "assets": {"thumbnail": {"href": "http://a.b/t.png", "type": "image/png"}},
///     "a_key_nobody_expected": true,
/// })).unwrap();
/// assert_eq!(item.id, "CBERS4A_WPM22912420210830");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// The GeoJSON type discriminator, `"Feature"` for catalog items.
    pub r#type: String,

    /// The scene identifier, unique within a collection.
    pub id: String,

    /// The identifier of the collection this item belongs to.
    pub collection: String,

    /// The scene's footprint geometry.
    pub geometry: Geometry,

    /// The scene's bounding box.
    pub bbox: Bbox,

    /// The recognized scene properties.
    pub properties: Properties,

    /// The scene's downloadable assets.
    pub assets: Assets,
}

/// A GeoJSON-like geometry.
///
/// Coordinates are kept as raw JSON so any geometry type the catalog emits
/// round-trips without interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// The geometry type, e.g. `"Polygon"`.
    pub r#type: String,

    /// The nested coordinate arrays.
    pub coordinates: Value,
}

/// The recognized properties of a catalog item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// The acquisition datetime as an ISO-8601 string.
    pub datetime: String,

    /// The path component of the scene's grid cell.
    pub path: u32,

    /// The row component of the scene's grid cell.
    pub row: u32,

    /// The satellite that acquired the scene.
    pub satellite: String,

    /// The sensor that acquired the scene.
    pub sensor: String,

    /// The scene's cloud cover percentage, 0 to 100.
    pub cloud_cover: f64,
}

impl Item {
    /// Returns true if this item carries the named band asset.
    ///
    /// Items fresh from a bulk search only carry a thumbnail; use
    /// [Client::resolve_assets](crate::Client::resolve_assets) to fill in the
    /// band assets.
    pub fn has_band(&self, band: Band) -> bool {
        self.assets.band(band).is_some()
    }

    /// Returns the url of the named band asset.
    ///
    /// # Examples
    ///
    /// ```
    /// use cbers4a::{Band, Item};
    /// # let item: Item = serde_json::from_value(serde_json::json!({
    /// #     "type": "Feature", "id": "x", "collection": "y",
    /// #     "geometry": {"type": "Polygon", "coordinates": []},
    /// #     "bbox": [0.0, 0.0, 1.0, 1.0],
    /// #     "properties": {"datetime": "X", "path": 1, "row": 1, "satellite": "W", "sensor": "S", "cloud_cover": 0},
    /// #     "assets": {"thumbnail": {"href": "http://a.b/t.png", "type": "X"}},
    /// # })).unwrap();
    /// item.band_url(Band::Pan).unwrap_err();
    /// ```
    pub fn band_url(&self, band: Band) -> Result<&str> {
        self.assets
            .band(band)
            .map(|asset| asset.href.as_str())
            .ok_or_else(|| Error::BandNotFound {
                band,
                id: self.id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Item;
    use crate::Band;
    use serde_json::json;

    fn feature(assets: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "Feature",
            "id": "ABC123",
            "collection": "y",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-48.3106, -15.3637],
                    [-48.3106, -16.4178],
                    [-47.2492, -16.4178],
                    [-47.2492, -15.3637],
                    [-48.3106, -15.3637],
                ]],
            },
            "bbox": [-48.3106, -16.4178, -47.2492, -15.3637],
            "properties": {
                "datetime": "X",
                "path": 1,
                "row": 1,
                "satellite": "W",
                "sensor": "S",
                "cloud_cover": 0,
            },
            "assets": assets,
        })
    }

    #[test]
    fn parses_a_catalog_feature() {
        let item: Item = serde_json::from_value(feature(json!({
            "thumbnail": {"type": "X", "href": "http://a.b/t.png"},
        })))
        .unwrap();
        assert_eq!(item.id, "ABC123");
        assert_eq!(item.collection, "y");
        assert_eq!(item.properties.path, 1);
        assert_eq!(item.assets.thumbnail.href, "http://a.b/t.png");
    }

    #[test]
    fn discards_extra_keys_at_every_level() {
        let mut value = feature(json!({
            "thumbnail": {"type": "X", "href": "http://a.b/t.png", "roles": ["thumbnail"]},
        }));
        let object = value.as_object_mut().unwrap();
        object.insert("links".to_string(), json!([{"rel": "self"}]));
        object.get_mut("geometry").unwrap().as_object_mut().unwrap().insert(
            "crs".to_string(),
            json!("EPSG:4326"),
        );
        object.get_mut("properties").unwrap().as_object_mut().unwrap().insert(
            "sun_elevation".to_string(),
            json!(55.2),
        );

        let item: Item = serde_json::from_value(value).unwrap();
        let round_trip = serde_json::to_value(&item).unwrap();
        assert!(round_trip.get("links").is_none());
        assert!(round_trip["geometry"].get("crs").is_none());
        assert!(round_trip["properties"].get("sun_elevation").is_none());
        assert!(round_trip["assets"]["thumbnail"].get("roles").is_none());
    }

    #[test]
    fn band_url() {
        let item: Item = serde_json::from_value(feature(json!({
            "thumbnail": {"type": "X", "href": "http://a.b/t.png"},
            "blue": {"type": "X", "href": "http://test.dev/image.tif"},
        })))
        .unwrap();
        assert!(item.has_band(Band::Blue));
        assert!(!item.has_band(Band::Red));
        assert_eq!(item.band_url(Band::Blue).unwrap(), "http://test.dev/image.tif");
        item.band_url(Band::Red).unwrap_err();
    }
}
