//! The provider-specific wire body for the bulk search endpoint.
//!
//! The catalog's compose endpoint takes a request of this shape:
//!
//! ```json
//! {
//!   "providers": [
//!     {
//!       "name": "LGI-CDSR",
//!       "collections": [{"name": "CBERS4A_WPM_L4_DN"}],
//!       "method": "POST",
//!       "query": {"cloud_cover": {"lte": 100}}
//!     }
//!   ],
//!   "datetime": "2024-12-18T00:00:00/2025-01-18T23:59:00",
//!   "limit": 100,
//!   "bbox": [-63.93, -9.0, -63.44, -8.73],
//!   "fromCatalog": "yes"
//! }
//! ```

use crate::Bbox;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The name of the only provider this client supports.
pub const PROVIDER_NAME: &str = "LGI-CDSR";

const PROVIDER_METHOD: &str = "POST";
const FROM_CATALOG: &str = "yes";

/// The POST body of a bulk search request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    pub limit: u64,

    #[serde(rename = "fromCatalog")]
    pub from_catalog: String,

    pub providers: Vec<Provider>,
}

/// The provider descriptor appended to every bulk search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Provider {
    pub name: String,
    pub method: String,
    pub collections: Vec<CollectionName>,
    pub query: ProviderQuery,
}

/// A target collection, by name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CollectionName {
    pub name: String,
}

/// The per-provider query constraints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ProviderQuery {
    pub cloud_cover: CloudCover,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Equals>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<Equals>,
}

/// The cloud cover constraint.
///
/// The constraint object is persistent: setting a new ceiling overwrites
/// `lte` in place, it never replaces the object.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct CloudCover {
    pub lte: u8,
}

impl Default for CloudCover {
    fn default() -> CloudCover {
        CloudCover { lte: 100 }
    }
}

/// An equality constraint on a grid field.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct Equals {
    pub eq: u32,
}

impl RequestBody {
    pub(crate) fn new(providers: Vec<Provider>) -> RequestBody {
        RequestBody {
            bbox: None,
            datetime: None,
            limit: 100,
            from_catalog: FROM_CATALOG.to_string(),
            providers,
        }
    }
}

impl Provider {
    pub(crate) fn new(collections: Vec<CollectionName>, query: ProviderQuery) -> Provider {
        Provider {
            name: PROVIDER_NAME.to_string(),
            method: PROVIDER_METHOD.to_string(),
            collections,
            query,
        }
    }
}

/// Removes null values from a JSON value, recursively.
///
/// Serialization already skips absent optional fields; this pass guarantees
/// the outgoing body carries no nulls at any depth, including inside nested
/// lists and mappings.
pub(crate) fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(object) => {
            object.retain(|_, value| !value.is_null());
            for value in object.values_mut() {
                strip_nulls(value);
            }
        }
        Value::Array(array) => {
            array.retain(|value| !value.is_null());
            for value in array.iter_mut() {
                strip_nulls(value);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::strip_nulls;
    use serde_json::json;

    #[test]
    fn strips_nulls_deeply() {
        let mut value = json!({
            "a": null,
            "b": {"c": null, "d": 1},
            "e": [null, {"f": null, "g": 2}, [null, 3]],
        });
        strip_nulls(&mut value);
        assert_eq!(
            value,
            json!({"b": {"d": 1}, "e": [{"g": 2}, [3]]})
        );
    }

    #[test]
    fn leaves_scalars_alone() {
        let mut value = json!({"a": 0, "b": "", "c": false});
        strip_nulls(&mut value);
        assert_eq!(value, json!({"a": 0, "b": "", "c": false}));
    }
}
