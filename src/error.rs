use crate::Band;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A band asset is not present on an item.
    #[error("band \"{band}\" does not exist on item {id}")]
    BandNotFound {
        /// The requested band.
        band: Band,

        /// The id of the item that is missing the band.
        id: String,
    },

    /// A download failed with a terminal (or retry-exhausted) status.
    #[error("download failed with {status}: {url}")]
    Download {
        /// The final HTTP status.
        status: reqwest::StatusCode,

        /// The asset url.
        url: Url,
    },

    /// The target collection list is empty.
    #[error("collections cannot be empty")]
    EmptyCollections,

    /// The id list of a by-id search is empty.
    #[error("ids cannot be empty")]
    EmptyIds,

    /// A polygon location has no bounding rectangle.
    #[error("polygon has no bounding rectangle")]
    EmptyPolygon,

    /// Returned when an object has the wrong type field.
    #[error("incorrect type: expected={expected}, actual={actual}")]
    IncorrectType {
        /// The actual type field on the object.
        actual: String,

        /// The expected value.
        expected: String,
    },

    /// This vector is not a valid bounding box.
    #[error("invalid bbox: {0:?}")]
    InvalidBbox(Vec<f64>),

    /// The cloud cover ceiling is outside `[0, 100]`.
    #[error("invalid cloud cover ceiling: {0}")]
    InvalidCloudCover(u8),

    /// The result limit is not a positive integer.
    #[error("invalid limit: {0}")]
    InvalidLimit(u64),

    /// A path/row grid cell with a zero component.
    #[error("invalid path/row: ({path}, {row})")]
    InvalidPathRow {
        /// The path component.
        path: u32,

        /// The row component.
        row: u32,
    },

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A by-id lookup returned no feature for this id.
    #[error("no item with id \"{id}\" in collection \"{collection}\"")]
    ItemNotFound {
        /// The requested item id.
        id: String,

        /// The collection that was searched.
        collection: String,
    },

    /// The by-id collection identifier is empty.
    #[error("collection cannot be empty")]
    MissingCollection,

    /// No credential was configured for an operation that requires one.
    #[error("credentials not provided")]
    MissingCredential,

    /// Returned when there is not a required field on a JSON object.
    #[error("no \"{0}\" field in the JSON object")]
    MissingField(&'static str),

    /// The band list of a download is empty.
    #[error("no bands to download")]
    NoBands,

    /// An asset href has no final path segment to name the output file after.
    #[error("no filename in href: {0}")]
    NoFilename(String),

    /// There are no products, when products are required.
    #[error("no products to download")]
    NoProducts,

    /// This is not a JSON object.
    #[error("json value is not an object")]
    NotAnObject(serde_json::Value),

    /// The download output path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// [reqwest::Error]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// A bulk search request failed.
    #[error("search failed with {status}: {url}")]
    Search {
        /// The HTTP status of the response.
        status: reqwest::StatusCode,

        /// The search endpoint url.
        url: Url,
    },

    /// A by-id item request failed.
    #[error("searching \"{id}\" failed with {status}: {url}")]
    SearchItem {
        /// The id that was being looked up.
        id: String,

        /// The HTTP status of the response.
        status: reqwest::StatusCode,

        /// The items endpoint url.
        url: Url,
    },

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// A date interval that ends before it starts.
    #[error("the start date {start} is after the end date {end}")]
    StartIsAfterEnd {
        /// The interval start.
        start: NaiveDate,

        /// The interval end.
        end: NaiveDate,
    },

    /// [tokio::task::JoinError]
    #[error(transparent)]
    TokioJoin(#[from] tokio::task::JoinError),

    /// This string is not a known band name.
    #[error("unknown band: {0}")]
    UnknownBand(String),

    /// [url::ParseError]
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}
