use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A four-element bounding box: minimum longitude, minimum latitude, maximum
/// longitude, maximum latitude.
///
/// The catalog only understands 2D boxes, so this is a fixed four-float
/// structure rather than the more general 2D-or-3D STAC bbox. Ordering of the
/// corners is the caller's responsibility.
///
/// # Examples
///
/// ```
/// use cbers4a::Bbox;
///
/// let bbox = Bbox::try_from(vec![-63.9, -8.8, -63.7, -8.7]).unwrap();
/// assert_eq!(bbox.xmin(), -63.9);
/// Bbox::try_from(vec![-63.9, -8.8]).unwrap_err();
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bbox([f64; 4]);

impl Bbox {
    /// Creates a new bounding box from its four corners.
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Bbox {
        Bbox([xmin, ymin, xmax, ymax])
    }

    /// Returns the minimum longitude.
    pub fn xmin(&self) -> f64 {
        self.0[0]
    }

    /// Returns the minimum latitude.
    pub fn ymin(&self) -> f64 {
        self.0[1]
    }

    /// Returns the maximum longitude.
    pub fn xmax(&self) -> f64 {
        self.0[2]
    }

    /// Returns the maximum latitude.
    pub fn ymax(&self) -> f64 {
        self.0[3]
    }

    /// Returns this bounding box as a four-element vector.
    pub fn to_vec(self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl From<[f64; 4]> for Bbox {
    fn from(bbox: [f64; 4]) -> Bbox {
        Bbox(bbox)
    }
}

impl TryFrom<Vec<f64>> for Bbox {
    type Error = Error;

    fn try_from(bbox: Vec<f64>) -> Result<Bbox> {
        match <[f64; 4]>::try_from(bbox) {
            Ok(corners) => Ok(Bbox(corners)),
            Err(bbox) => Err(Error::InvalidBbox(bbox)),
        }
    }
}

impl From<Bbox> for Vec<f64> {
    fn from(bbox: Bbox) -> Vec<f64> {
        bbox.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::Bbox;

    #[test]
    fn try_from_vec() {
        let bbox = Bbox::try_from(vec![-63.9, -8.8, -63.7, -8.7]).unwrap();
        assert_eq!(bbox, Bbox::new(-63.9, -8.8, -63.7, -8.7));
    }

    #[test]
    fn try_from_wrong_lengths() {
        Bbox::try_from(Vec::new()).unwrap_err();
        Bbox::try_from(vec![0.0, 1.0, 2.0]).unwrap_err();
        Bbox::try_from(vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap_err();
    }

    #[test]
    fn serializes_as_an_array() {
        let bbox = Bbox::new(-63.9, -8.8, -63.7, -8.7);
        assert_eq!(
            serde_json::to_value(bbox).unwrap(),
            serde_json::json!([-63.9, -8.8, -63.7, -8.7])
        );
    }

    #[test]
    fn round_trips_the_exact_floats() {
        let corners = vec![-63.93905639648438, -9.00445156167208, -63.44879150390626, -8.733077421211563];
        let bbox = Bbox::try_from(corners.clone()).unwrap();
        assert_eq!(bbox.to_vec(), corners);
    }
}
