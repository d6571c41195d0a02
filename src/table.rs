use crate::{Bbox, Geometry, ItemCollection};
use serde::Serialize;

/// A flat, order-preserving projection of an [ItemCollection].
///
/// This is the crate's `to_geodataframe` analogue: one row per item, with the
/// nested properties hoisted to columns, ready to hand off to a dataframe or
/// geospatial analysis layer. The download facade also accepts a table back,
/// consulting only the `id` and `collection` columns.
///
/// # Examples
///
/// ```
/// use cbers4a::{ItemCollection, ItemTable};
///
/// let table = ItemTable::from(&ItemCollection::new(Vec::new()));
/// assert!(table.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemTable {
    /// The rows, in item order.
    pub rows: Vec<ItemRow>,
}

/// One row of an [ItemTable].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemRow {
    /// The scene identifier.
    pub id: String,

    /// The collection identifier.
    pub collection: String,

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

    /// The scene's cloud cover percentage.
    pub cloud_cover: f64,

    /// The scene's bounding box.
    pub bbox: Bbox,

    /// The scene's footprint geometry.
    pub geometry: Geometry,

    /// The thumbnail url.
    pub thumbnail: String,
}

impl ItemTable {
    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows, in item order.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemRow> {
        self.rows.iter()
    }
}

impl From<&ItemCollection> for ItemTable {
    fn from(item_collection: &ItemCollection) -> ItemTable {
        let rows = item_collection
            .iter()
            .map(|item| ItemRow {
                id: item.id.clone(),
                collection: item.collection.clone(),
                datetime: item.properties.datetime.clone(),
                path: item.properties.path,
                row: item.properties.row,
                satellite: item.properties.satellite.clone(),
                sensor: item.properties.sensor.clone(),
                cloud_cover: item.properties.cloud_cover,
                bbox: item.bbox,
                geometry: item.geometry.clone(),
                thumbnail: item.assets.thumbnail.href.clone(),
            })
            .collect();
        ItemTable { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::ItemTable;
    use crate::ItemCollection;
    use serde_json::json;

    #[test]
    fn flattens_items_into_rows() {
        let item_collection = ItemCollection::try_from(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": "ABC123",
                "collection": "y",
                "geometry": {"type": "Polygon", "coordinates": []},
                "bbox": [-48.3106, -16.4178, -47.2492, -15.3637],
                "properties": {
                    "datetime": "2021-08-30T14:01:21",
                    "path": 229,
                    "row": 124,
                    "satellite": "CBERS4A",
                    "sensor": "WPM",
                    "cloud_cover": 10.5,
                },
                "assets": {"thumbnail": {"type": "image/png", "href": "http://a.b/t.png"}},
            }],
        }))
        .unwrap();

        let table = ItemTable::from(&item_collection);
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.id, "ABC123");
        assert_eq!(row.collection, "y");
        assert_eq!(row.path, 229);
        assert_eq!(row.cloud_cover, 10.5);
        assert_eq!(row.thumbnail, "http://a.b/t.png");
    }
}
