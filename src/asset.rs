use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One downloadable raster layer attached to an item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// The asset url.
    pub href: String,

    /// The media type of the asset.
    pub r#type: String,
}

/// The fixed set of named assets a catalog item can carry.
///
/// Items returned from a bulk search only carry a thumbnail; the band assets
/// show up after the item's assets are resolved with a by-id lookup (see
/// [Client::resolve_assets](crate::Client::resolve_assets)). Unrecognized
/// asset names in the raw JSON are discarded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    /// The scene preview, always present on items returned by search.
    pub thumbnail: Asset,

    /// The red band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub red: Option<Asset>,

    /// The green band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub green: Option<Asset>,

    /// The blue band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blue: Option<Asset>,

    /// The near-infrared band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nir: Option<Asset>,

    /// The panchromatic band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<Asset>,
}

impl Assets {
    /// Returns a named band asset, if present.
    pub fn band(&self, band: Band) -> Option<&Asset> {
        match band {
            Band::Red => self.red.as_ref(),
            Band::Green => self.green.as_ref(),
            Band::Blue => self.blue.as_ref(),
            Band::Nir => self.nir.as_ref(),
            Band::Pan => self.pan.as_ref(),
        }
    }

    /// Returns true if any band asset is present.
    pub fn has_bands(&self) -> bool {
        self.red.is_some()
            || self.green.is_some()
            || self.blue.is_some()
            || self.nir.is_some()
            || self.pan.is_some()
    }
}

/// A named image band.
///
/// # Examples
///
/// ```
/// use cbers4a::Band;
///
/// let band: Band = "nir".parse().unwrap();
/// assert_eq!(band, Band::Nir);
/// assert_eq!(band.to_string(), "nir");
/// "swir".parse::<Band>().unwrap_err();
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// The red band.
    Red,

    /// The green band.
    Green,

    /// The blue band.
    Blue,

    /// The near-infrared band.
    Nir,

    /// The panchromatic band.
    Pan,
}

impl Band {
    /// Returns this band's lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Red => "red",
            Band::Green => "green",
            Band::Blue => "blue",
            Band::Nir => "nir",
            Band::Pan => "pan",
        }
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = Error;

    fn from_str(s: &str) -> Result<Band, Error> {
        match s {
            "red" => Ok(Band::Red),
            "green" => Ok(Band::Green),
            "blue" => Ok(Band::Blue),
            "nir" => Ok(Band::Nir),
            "pan" => Ok(Band::Pan),
            _ => Err(Error::UnknownBand(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Assets, Band};
    use serde_json::json;

    #[test]
    fn ignores_unrecognized_assets() {
        let assets: Assets = serde_json::from_value(json!({
            "thumbnail": {"href": "http://a.b/t.png", "type": "image/png"},
            "blue": {"href": "http://a.b/b.tif", "type": "image/tiff"},
            "ndvi": {"href": "http://a.b/n.tif", "type": "image/tiff"},
        }))
        .unwrap();
        assert!(assets.band(Band::Blue).is_some());
        assert!(assets.band(Band::Red).is_none());
        let value = serde_json::to_value(assets).unwrap();
        assert!(value.get("ndvi").is_none());
    }

    #[test]
    fn absent_bands_are_not_serialized() {
        let assets: Assets = serde_json::from_value(json!({
            "thumbnail": {"href": "http://a.b/t.png", "type": "image/png"},
        }))
        .unwrap();
        assert!(!assets.has_bands());
        let value = serde_json::to_value(assets).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
    }
}
