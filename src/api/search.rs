use super::request::{CloudCover, CollectionName, Equals, Provider, ProviderQuery, RequestBody};
use crate::{Bbox, Error, Result};
use chrono::NaiveDate;
use geo::BoundingRect;

/// Search parameters for a bulk catalog query.
///
/// A search is built up through chained setter calls and consumed exactly
/// once by [Client::search](crate::Client::search), which appends the fixed
/// provider descriptor before serialization.
///
/// Exactly one geographic filter is carried per search: setting a bounding
/// box replaces an earlier path/row cell and vice versa.
///
/// # Examples
///
/// ```
/// use cbers4a::Search;
/// use chrono::NaiveDate;
///
/// let search = Search::new()
///     .bbox(vec![-63.9, -8.8, -63.7, -8.7])
///     .unwrap()
///     .date_interval(
///         NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
///     )
///     .unwrap()
///     .cloud_cover(70)
///     .unwrap()
///     .limit(10)
///     .unwrap()
///     .collections(["CBERS4A_WPM_L4_DN"])
///     .unwrap();
/// # let _ = search;
/// ```
#[derive(Clone, Debug, Default)]
pub struct Search {
    geo: Option<GeoFilter>,
    datetime: Option<String>,
    limit: Option<u64>,
    collections: Vec<String>,
    cloud_cover: CloudCover,
}

/// The geographic filter of a search, one of two alternatives.
#[derive(Clone, Copy, Debug, PartialEq)]
enum GeoFilter {
    Bbox(Bbox),
    PathRow { path: u32, row: u32 },
}

/// Where a facade query should look: a bounding box, a polygon, or a
/// path/row grid cell.
///
/// A polygon is reduced to its bounding rectangle before serialization. Any
/// other location shape is unrepresentable.
#[derive(Clone, Debug)]
pub enum Location {
    /// A four-float bounding box.
    Bbox(Bbox),

    /// A polygon whose bounding rectangle becomes the search bbox.
    Polygon(geo::Polygon<f64>),

    /// A path/row grid cell.
    PathRow(u32, u32),
}

impl From<[f64; 4]> for Location {
    fn from(bbox: [f64; 4]) -> Location {
        Location::Bbox(bbox.into())
    }
}

impl From<Bbox> for Location {
    fn from(bbox: Bbox) -> Location {
        Location::Bbox(bbox)
    }
}

impl From<geo::Polygon<f64>> for Location {
    fn from(polygon: geo::Polygon<f64>) -> Location {
        Location::Polygon(polygon)
    }
}

impl From<(u32, u32)> for Location {
    fn from((path, row): (u32, u32)) -> Location {
        Location::PathRow(path, row)
    }
}

impl Location {
    /// Resolves this location into a search's geographic filter.
    pub(crate) fn apply(self, search: Search) -> Result<Search> {
        match self {
            Location::Bbox(bbox) => search.bbox(bbox.to_vec()),
            Location::Polygon(polygon) => {
                let rect = polygon.bounding_rect().ok_or(Error::EmptyPolygon)?;
                search.bbox(vec![
                    rect.min().x,
                    rect.min().y,
                    rect.max().x,
                    rect.max().y,
                ])
            }
            Location::PathRow(path, row) => search.path_row(path, row),
        }
    }
}

impl Search {
    /// Creates a new, empty search.
    pub fn new() -> Search {
        Search::default()
    }

    /// Selects only features whose geometry intersects the bounding box.
    ///
    /// The vector must hold exactly four floats: minimum longitude, minimum
    /// latitude, maximum longitude, maximum latitude.
    pub fn bbox(mut self, bbox: Vec<f64>) -> Result<Search> {
        self.geo = Some(GeoFilter::Bbox(bbox.try_into()?));
        Ok(self)
    }

    /// Selects only features acquired inside the closed date interval.
    ///
    /// Fails if `start` is after `end`. The interval covers `start` at
    /// midnight through `end` at 23:59.
    pub fn date_interval(mut self, start: NaiveDate, end: NaiveDate) -> Result<Search> {
        if start > end {
            return Err(Error::StartIsAfterEnd { start, end });
        }
        self.datetime = Some(format!("{start}T00:00:00/{end}T23:59:00"));
        Ok(self)
    }

    /// Sets the target collections; the list cannot be empty.
    ///
    /// Anything that displays as a collection identifier is accepted, e.g.
    /// strings or entries of [Collection::all](crate::Collection::all).
    pub fn collections<I, S>(mut self, collections: I) -> Result<Search>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let collections: Vec<_> = collections
            .into_iter()
            .map(|collection| collection.to_string())
            .collect();
        if collections.is_empty() {
            return Err(Error::EmptyCollections);
        }
        self.collections = collections;
        Ok(self)
    }

    /// Caps the number of returned features; must be positive.
    pub fn limit(mut self, limit: u64) -> Result<Search> {
        if limit == 0 {
            return Err(Error::InvalidLimit(limit));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Selects only features from one path/row grid cell.
    ///
    /// Both components must be nonzero. Serialized as equality constraints
    /// on the provider query's `path` and `row` fields.
    pub fn path_row(mut self, path: u32, row: u32) -> Result<Search> {
        if path == 0 || row == 0 {
            return Err(Error::InvalidPathRow { path, row });
        }
        self.geo = Some(GeoFilter::PathRow { path, row });
        Ok(self)
    }

    /// Selects only features with cloud cover at or below the ceiling.
    ///
    /// The ceiling must be between 0 and 100 inclusive. Later calls
    /// overwrite the ceiling in place; the constraint object itself is
    /// persistent and always serialized.
    pub fn cloud_cover(mut self, cloud_cover: u8) -> Result<Search> {
        if cloud_cover > 100 {
            return Err(Error::InvalidCloudCover(cloud_cover));
        }
        self.cloud_cover.lte = cloud_cover;
        Ok(self)
    }

    /// Consumes this search into the wire body, appending the provider
    /// descriptor.
    pub(crate) fn into_request_body(self) -> RequestBody {
        let mut query = ProviderQuery {
            cloud_cover: self.cloud_cover,
            path: None,
            row: None,
        };
        let mut bbox = None;
        match self.geo {
            Some(GeoFilter::Bbox(value)) => bbox = Some(value),
            Some(GeoFilter::PathRow { path, row }) => {
                query.path = Some(Equals { eq: path });
                query.row = Some(Equals { eq: row });
            }
            None => {}
        }
        let collections = self
            .collections
            .into_iter()
            .map(|name| CollectionName { name })
            .collect();
        let mut body = RequestBody::new(vec![Provider::new(collections, query)]);
        body.bbox = bbox;
        body.datetime = self.datetime;
        if let Some(limit) = self.limit {
            body.limit = limit;
        }
        body
    }
}

/// An id-scoped search: one collection, one or more item ids.
///
/// # Examples
///
/// ```
/// use cbers4a::IdSearch;
///
/// let search = IdSearch::new(["CBERS4A_WPM22912420210830"], "CBERS4A_WPM_L4_DN").unwrap();
/// assert_eq!(search.ids().len(), 1);
/// IdSearch::new(Vec::<String>::new(), "CBERS4A_WPM_L4_DN").unwrap_err();
/// ```
#[derive(Clone, Debug)]
pub struct IdSearch {
    ids: Vec<String>,
    collection: String,
}

impl IdSearch {
    /// Creates a new id-scoped search.
    ///
    /// Fails if the id list or the collection identifier is empty.
    pub fn new<I, S>(ids: I, collection: impl ToString) -> Result<IdSearch>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids: Vec<_> = ids.into_iter().map(|id| id.to_string()).collect();
        if ids.is_empty() {
            return Err(Error::EmptyIds);
        }
        let collection = collection.to_string();
        if collection.is_empty() {
            return Err(Error::MissingCollection);
        }
        Ok(IdSearch { ids, collection })
    }

    /// Returns the ids to look up, in order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Returns the collection the ids belong to.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::{Location, Search};
    use crate::api::request::strip_nulls;
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn body(search: Search) -> serde_json::Value {
        let mut value = serde_json::to_value(search.into_request_body()).unwrap();
        strip_nulls(&mut value);
        value
    }

    #[test]
    fn bbox_round_trips() {
        let corners = vec![-63.93905639648438, -9.00445156167208, -63.44879150390626, -8.733077421211563];
        let search = Search::new().bbox(corners.clone()).unwrap();
        assert_eq!(body(search)["bbox"], json!(corners));
    }

    #[test]
    fn bbox_requires_four_floats() {
        Search::new().bbox(vec![1.0, 2.0, 3.0]).unwrap_err();
        Search::new().bbox(Vec::new()).unwrap_err();
    }

    #[test]
    fn date_interval_formats_the_closed_interval() {
        let search = Search::new()
            .date_interval(date(2021, 1, 1), date(2021, 2, 1))
            .unwrap();
        assert_eq!(
            body(search)["datetime"],
            "2021-01-01T00:00:00/2021-02-01T23:59:00"
        );
    }

    #[test]
    fn date_interval_rejects_backwards_intervals() {
        Search::new()
            .date_interval(date(2021, 2, 1), date(2021, 1, 1))
            .unwrap_err();
    }

    #[test]
    fn date_interval_accepts_a_single_day() {
        let search = Search::new()
            .date_interval(date(2021, 1, 1), date(2021, 1, 1))
            .unwrap();
        assert_eq!(
            body(search)["datetime"],
            "2021-01-01T00:00:00/2021-01-01T23:59:00"
        );
    }

    #[test]
    fn collections_cannot_be_empty() {
        Search::new().collections(Vec::<String>::new()).unwrap_err();
    }

    #[test]
    fn limit_must_be_positive() {
        Search::new().limit(0).unwrap_err();
        let search = Search::new().limit(1).unwrap();
        assert_eq!(body(search)["limit"], 1);
    }

    #[test]
    fn limit_defaults_to_one_hundred() {
        assert_eq!(body(Search::new())["limit"], 100);
    }

    #[test]
    fn path_row_requires_nonzero_components() {
        Search::new().path_row(0, 133).unwrap_err();
        Search::new().path_row(206, 0).unwrap_err();
    }

    #[test]
    fn path_row_serializes_as_equality_constraints() {
        let search = Search::new().path_row(206, 133).unwrap();
        let value = body(search);
        let query = &value["providers"][0]["query"];
        assert_eq!(query["path"], json!({"eq": 206}));
        assert_eq!(query["row"], json!({"eq": 133}));
        assert!(value.get("bbox").is_none());
    }

    #[test]
    fn cloud_cover_rejects_out_of_range_ceilings() {
        Search::new().cloud_cover(101).unwrap_err();
    }

    #[test]
    fn cloud_cover_overwrites_the_ceiling_in_place() {
        let search = Search::new().cloud_cover(70).unwrap().cloud_cover(30).unwrap();
        let value = body(search);
        assert_eq!(
            value["providers"][0]["query"]["cloud_cover"],
            json!({"lte": 30})
        );
    }

    #[test]
    fn cloud_cover_defaults_to_one_hundred() {
        assert_eq!(
            body(Search::new())["providers"][0]["query"]["cloud_cover"],
            json!({"lte": 100})
        );
    }

    #[test]
    fn produces_the_documented_body_shape() {
        let search = Search::new()
            .bbox(vec![-63.9, -8.8, -63.7, -8.7])
            .unwrap()
            .date_interval(date(2021, 1, 1), date(2021, 2, 1))
            .unwrap()
            .limit(1)
            .unwrap()
            .collections(["CBERS4A_WPM_L4_DN"])
            .unwrap();
        assert_eq!(
            body(search),
            json!({
                "bbox": [-63.9, -8.8, -63.7, -8.7],
                "datetime": "2021-01-01T00:00:00/2021-02-01T23:59:00",
                "limit": 1,
                "fromCatalog": "yes",
                "providers": [{
                    "name": "LGI-CDSR",
                    "method": "POST",
                    "collections": [{"name": "CBERS4A_WPM_L4_DN"}],
                    "query": {"cloud_cover": {"lte": 100}},
                }],
            })
        );
    }

    #[test]
    fn later_geographic_filters_replace_earlier_ones() {
        let search = Search::new()
            .bbox(vec![-63.9, -8.8, -63.7, -8.7])
            .unwrap()
            .path_row(206, 133)
            .unwrap();
        let value = body(search);
        assert!(value.get("bbox").is_none());
        assert_eq!(value["providers"][0]["query"]["path"], json!({"eq": 206}));
    }

    #[test]
    fn polygon_location_uses_its_bounding_rectangle() {
        let polygon = geo::Polygon::new(
            geo::LineString::from(vec![
                (-63.911934, -8.738337),
                (-63.912621, -8.805859),
                (-63.798294, -8.738337),
            ]),
            vec![],
        );
        let search = Location::from(polygon).apply(Search::new()).unwrap();
        assert_eq!(
            body(search)["bbox"],
            json!([-63.912621, -8.805859, -63.798294, -8.738337])
        );
    }

    #[test]
    fn path_row_location() {
        let search = Location::from((206, 133)).apply(Search::new()).unwrap();
        let value = body(search);
        assert_eq!(value["providers"][0]["query"]["row"], json!({"eq": 133}));
    }
}
