//! The request-building and search layer of the catalog client.
//!
//! The compose endpoint the catalog exposes is almost-but-not-quite STAC: the
//! search body nests per-provider constraints, and the response comes back
//! partitioned by provider and collection instead of as one feature
//! collection. This module owns that translation: [Search] and [IdSearch]
//! accumulate constraints, [Client] serializes them into the provider wire
//! body and normalizes whatever comes back into an
//! [ItemCollection](crate::ItemCollection).

mod client;
mod request;
mod search;

pub use client::{Client, DEFAULT_COLLECTIONS_URL, DEFAULT_SEARCH_URL};
pub use request::PROVIDER_NAME;
pub use search::{IdSearch, Location, Search};

#[cfg(test)]
pub(crate) use client::tests::{feature_with_bands, feature_without_bands, test_client};
