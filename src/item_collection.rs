use crate::{Error, Item, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FEATURE_COLLECTION: &str = "FeatureCollection";

/// An ordered collection of [Items](Item).
///
/// The order is significant: it is the order features arrived from the
/// catalog, not sorted. The `type` discriminator is fixed to
/// `"FeatureCollection"`.
///
/// # Examples
///
/// ```
/// use cbers4a::ItemCollection;
///
/// let item_collection = ItemCollection::new(Vec::new());
/// assert!(item_collection.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemCollection {
    /// The GeoJSON type discriminator, always `"FeatureCollection"`.
    pub r#type: String,

    /// The items, in the order they arrived from the catalog.
    #[serde(rename = "features")]
    pub items: Vec<Item>,
}

impl ItemCollection {
    /// Creates a new item collection from a vector of items.
    pub fn new(items: Vec<Item>) -> ItemCollection {
        ItemCollection {
            r#type: FEATURE_COLLECTION.to_string(),
            items,
        }
    }

    /// Returns the number of items in this collection.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this collection has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an iterator over the items, in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl From<Vec<Item>> for ItemCollection {
    fn from(items: Vec<Item>) -> ItemCollection {
        ItemCollection::new(items)
    }
}

impl TryFrom<Value> for ItemCollection {
    type Error = Error;

    /// Normalizes a raw GeoJSON-like mapping into a typed collection.
    ///
    /// Every element of `features` must be a mapping that parses as an
    /// [Item]; anything else is a construction error. A `type` field other
    /// than `"FeatureCollection"` is rejected.
    fn try_from(value: Value) -> Result<ItemCollection> {
        let Value::Object(mut object) = value else {
            return Err(Error::NotAnObject(value));
        };
        if let Some(r#type) = object.get("type").and_then(Value::as_str) {
            if r#type != FEATURE_COLLECTION {
                return Err(Error::IncorrectType {
                    actual: r#type.to_string(),
                    expected: FEATURE_COLLECTION.to_string(),
                });
            }
        }
        let Some(Value::Array(features)) = object.remove("features") else {
            return Err(Error::MissingField("features"));
        };
        let mut items = Vec::with_capacity(features.len());
        for feature in features {
            if !feature.is_object() {
                return Err(Error::NotAnObject(feature));
            }
            items.push(serde_json::from_value(feature)?);
        }
        Ok(ItemCollection::new(items))
    }
}

impl IntoIterator for ItemCollection {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
