//! Query and download CBERS-4A and AMAZONIA-1 imagery from INPE's public
//! catalog.
//!
//! This crate **is**:
//!
//! - A typed model of the catalog's items, assets, and collections
//! - A search builder and executor for the catalog's compose endpoint
//! - A bounded-concurrency downloader for scene bands
//!
//! This crate **is not**:
//!
//! - A catalog server
//! - A raster processing library
//!
//! # Examples
//!
//! Search by bounding box, then download the blue band of every scene:
//!
//! ```no_run
//! use cbers4a::{Band, Client, DownloadOptions, Location, Products};
//! use chrono::NaiveDate;
//!
//! # tokio_test::block_on(async {
//! let client = Client::new().email("user@example.com");
//! let items = client
//!     .query(
//!         Location::from([-63.9, -8.8, -63.7, -8.7]),
//!         NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
//!         70,
//!         25,
//!         vec!["CBERS4A_WPM_L4_DN"],
//!     )
//!     .await
//!     .unwrap();
//! client
//!     .download(
//!         Products::from(items),
//!         &[Band::Blue],
//!         "./downloads",
//!         DownloadOptions::new().with_folder(true),
//!     )
//!     .await
//!     .unwrap();
//! # })
//! ```

#![warn(missing_docs, unused_qualifications)]

pub mod api;
mod asset;
mod bbox;
mod collection;
mod download;
mod error;
mod item;
mod item_collection;
mod table;

pub use api::{Client, IdSearch, Location, Search};
pub use asset::{Asset, Assets, Band};
pub use bbox::Bbox;
pub use collection::{COLLECTIONS, Collection, Extent, SpatialExtent, TemporalExtent};
pub use download::{DownloadOptions, Products};
pub use error::Error;
pub use item::{Geometry, Item, Properties};
pub use item_collection::ItemCollection;
pub use table::{ItemRow, ItemTable};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Return this crate's version.
///
/// # Examples
///
/// ```
/// println!("{}", cbers4a::version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
use tokio_test as _;
