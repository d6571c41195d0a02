use crate::Bbox;
use std::fmt::{Display, Formatter};

/// The catalog's overall spatial coverage.
const COVERAGE: Bbox = Bbox::new(-81.0, -37.0, -30.0, 11.0);

const CBERS4A_OPERATIONAL_SINCE: &str = "2019-12-20T00:00:00Z";
const AMAZONIA1_OPERATIONAL_SINCE: &str = "2021-02-28T00:00:00Z";

/// A known catalog collection and its metadata.
///
/// The catalog does not serve a collection listing that this client consumes;
/// the supported identifiers are a fixed, known set, used to enumerate and
/// validate query targets.
///
/// # Examples
///
/// ```
/// use cbers4a::Collection;
///
/// let collection = Collection::get("CBERS4A_WPM_L4_DN").unwrap();
/// assert_eq!(collection.sensor, "WPM");
/// assert!(Collection::get("LANDSAT_8_OLI").is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collection {
    /// The collection identifier, as the catalog spells it.
    pub id: &'static str,

    /// A short human-readable description.
    pub description: &'static str,

    /// The satellite this collection's scenes come from.
    pub satellite: &'static str,

    /// The sensor this collection's scenes come from.
    pub sensor: &'static str,

    /// The collection's spatial and temporal extent.
    pub extent: Extent,
}

/// A collection's spatial and temporal extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// The spatial extent.
    pub spatial: SpatialExtent,

    /// The temporal extent.
    pub temporal: TemporalExtent,
}

/// The bounding box a collection's scenes fall inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialExtent {
    /// The coverage bounding box.
    pub bbox: Bbox,
}

/// The closed-or-open interval a collection's scenes fall inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemporalExtent {
    /// Start and end of the interval; `None` means open-ended.
    pub interval: [Option<&'static str>; 2],
}

const fn collection(
    id: &'static str,
    description: &'static str,
    satellite: &'static str,
    sensor: &'static str,
    since: &'static str,
) -> Collection {
    Collection {
        id,
        description,
        satellite,
        sensor,
        extent: Extent {
            spatial: SpatialExtent { bbox: COVERAGE },
            temporal: TemporalExtent {
                interval: [Some(since), None],
            },
        },
    }
}

/// Every collection this client knows how to query.
pub static COLLECTIONS: [Collection; 8] = [
    collection(
        "CBERS4A_MUX_L2_DN",
        "CBERS-4A multispectral camera, level 2 digital numbers",
        "CBERS4A",
        "MUX",
        CBERS4A_OPERATIONAL_SINCE,
    ),
    collection(
        "CBERS4A_MUX_L4_DN",
        "CBERS-4A multispectral camera, level 4 digital numbers",
        "CBERS4A",
        "MUX",
        CBERS4A_OPERATIONAL_SINCE,
    ),
    collection(
        "CBERS4A_WFI_L2_DN",
        "CBERS-4A wide field imager, level 2 digital numbers",
        "CBERS4A",
        "WFI",
        CBERS4A_OPERATIONAL_SINCE,
    ),
    collection(
        "CBERS4A_WFI_L4_DN",
        "CBERS-4A wide field imager, level 4 digital numbers",
        "CBERS4A",
        "WFI",
        CBERS4A_OPERATIONAL_SINCE,
    ),
    collection(
        "CBERS4A_WPM_L2_DN",
        "CBERS-4A panchromatic and multispectral camera, level 2 digital numbers",
        "CBERS4A",
        "WPM",
        CBERS4A_OPERATIONAL_SINCE,
    ),
    collection(
        "CBERS4A_WPM_L4_DN",
        "CBERS-4A panchromatic and multispectral camera, level 4 digital numbers",
        "CBERS4A",
        "WPM",
        CBERS4A_OPERATIONAL_SINCE,
    ),
    collection(
        "AMAZONIA1_WFI_L2_DN",
        "AMAZONIA-1 wide field imager, level 2 digital numbers",
        "AMAZONIA1",
        "WFI",
        AMAZONIA1_OPERATIONAL_SINCE,
    ),
    collection(
        "AMAZONIA1_WFI_L4_DN",
        "AMAZONIA-1 wide field imager, level 4 digital numbers",
        "AMAZONIA1",
        "WFI",
        AMAZONIA1_OPERATIONAL_SINCE,
    ),
];

impl Collection {
    /// Looks up a known collection by its identifier.
    pub fn get(id: &str) -> Option<&'static Collection> {
        COLLECTIONS.iter().find(|collection| collection.id == id)
    }

    /// Returns every collection this client knows how to query.
    pub fn all() -> &'static [Collection] {
        &COLLECTIONS
    }

    /// Returns this collection's spatial extent.
    pub fn spatial_extent(&self) -> &SpatialExtent {
        &self.extent.spatial
    }

    /// Returns this collection's temporal extent.
    pub fn temporal_extent(&self) -> &TemporalExtent {
        &self.extent.temporal
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;

    #[test]
    fn get() {
        let collection = Collection::get("AMAZONIA1_WFI_L2_DN").unwrap();
        assert_eq!(collection.satellite, "AMAZONIA1");
        assert_eq!(
            collection.temporal_extent().interval[0],
            Some("2021-02-28T00:00:00Z")
        );
        assert!(collection.temporal_extent().interval[1].is_none());
    }

    #[test]
    fn unknown_id() {
        assert!(Collection::get("SENTINEL2_MSI_L2A").is_none());
    }

    #[test]
    fn enumerates_all() {
        assert_eq!(Collection::all().len(), 8);
        assert!(
            Collection::all()
                .iter()
                .all(|collection| collection.spatial_extent().bbox.xmin() == -81.0)
        );
    }

    #[test]
    fn displays_as_its_id() {
        let collection = Collection::get("CBERS4A_MUX_L2_DN").unwrap();
        assert_eq!(collection.to_string(), "CBERS4A_MUX_L2_DN");
    }
}
