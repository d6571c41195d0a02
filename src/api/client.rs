use super::request::{PROVIDER_NAME, strip_nulls};
use super::search::{IdSearch, Location, Search};
use crate::{Error, Item, ItemCollection, Result};
use chrono::NaiveDate;
use serde_json::Value;
use url::Url;

/// The catalog's bulk search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://www.dgi.inpe.br/stac-compose/stac/search/";

/// The catalog's collections endpoint, used for by-id item lookups.
pub const DEFAULT_COLLECTIONS_URL: &str = "https://www.dgi.inpe.br/lgi-stac/collections";

/// A client for INPE's imagery catalog.
///
/// The client owns the HTTP connection pool, the endpoint urls, and the
/// credential (the e-mail registered with the catalog's explorer, required
/// for downloads only).
///
/// # Examples
///
/// ```no_run
/// use cbers4a::{Client, Location};
/// use chrono::NaiveDate;
///
/// # tokio_test::block_on(async {
/// let client = Client::new().email("user@example.com");
/// let items = client
///     .query(
///         Location::from([-63.9, -8.8, -63.7, -8.7]),
///         NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
///         100,
///         10,
///         vec!["CBERS4A_WPM_L4_DN"],
///     )
///     .await
///     .unwrap();
/// println!("{} scenes", items.len());
/// # })
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) client: reqwest::Client,
    search_url: Url,
    collections_url: Url,
    pub(crate) email: Option<String>,
}

impl Client {
    /// Creates a new client against the catalog's default endpoints.
    pub fn new() -> Client {
        Client::with_urls(
            Url::parse(DEFAULT_SEARCH_URL).expect("the default search url is valid"),
            Url::parse(DEFAULT_COLLECTIONS_URL).expect("the default collections url is valid"),
        )
    }

    /// Creates a new client against custom endpoints.
    ///
    /// Useful for catalog mirrors and for tests.
    pub fn with_urls(search_url: Url, collections_url: Url) -> Client {
        Client {
            client: reqwest::Client::new(),
            search_url,
            collections_url,
            email: None,
        }
    }

    /// Sets the credential used for downloads.
    pub fn email(mut self, email: impl ToString) -> Client {
        self.email = Some(email.to_string());
        self
    }

    /// Runs a bulk search against the catalog.
    ///
    /// The compose endpoint partitions its response first by provider, then
    /// by collection. Only the supported provider's bucket is read; every
    /// collection's features are flattened into one collection, in response
    /// order. A response without the provider key yields an empty
    /// collection, not an error.
    pub async fn search(&self, search: Search) -> Result<ItemCollection> {
        let mut body = serde_json::to_value(search.into_request_body())?;
        strip_nulls(&mut body);
        tracing::debug!("searching {}: {}", self.search_url, body);
        let response = self
            .client
            .post(self.search_url.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Search {
                status,
                url: self.search_url.clone(),
            });
        }
        let value: Value = response.json().await?;
        let mut items = Vec::new();
        if let Some(collections) = value.get(PROVIDER_NAME).and_then(Value::as_object) {
            for content in collections.values() {
                let Some(features) = content.get("features").and_then(Value::as_array) else {
                    continue;
                };
                for feature in features {
                    items.push(serde_json::from_value(feature.clone())?);
                }
            }
        }
        Ok(ItemCollection::new(items))
    }

    /// Looks up every id of an id-scoped search, one GET per id.
    ///
    /// Responses whose `type` is `"Feature"` are accumulated in input-id
    /// order; any other response shape is silently skipped. A transport
    /// failure on any id aborts the whole operation.
    pub async fn search_by_id(&self, search: IdSearch) -> Result<ItemCollection> {
        let mut items = Vec::new();
        for id in search.ids() {
            let url = self.item_url(search.collection(), id)?;
            tracing::debug!("getting {}", url);
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::SearchItem {
                    id: id.clone(),
                    status,
                    url,
                });
            }
            let value: Value = response.json().await?;
            if value.get("type").and_then(Value::as_str) == Some("Feature") {
                items.push(serde_json::from_value(value)?);
            }
        }
        Ok(ItemCollection::new(items))
    }

    /// Returns a single fully-resolved item from a collection.
    ///
    /// Unlike [Client::search_by_id], a missing item is an error here.
    pub async fn item(&self, id: &str, collection: &str) -> Result<Item> {
        let mut item_collection = self
            .search_by_id(IdSearch::new([id], collection)?)
            .await?;
        item_collection.items.pop().ok_or_else(|| Error::ItemNotFound {
            id: id.to_string(),
            collection: collection.to_string(),
        })
    }

    /// Replaces an item's assets with the result of a fresh by-id lookup.
    ///
    /// This is how a thumbnail-only search result becomes a downloadable
    /// item: the by-id endpoint returns the full asset set, band hrefs
    /// included.
    pub async fn resolve_assets(&self, item: &mut Item) -> Result<()> {
        let resolved = self.item(&item.id, &item.collection).await?;
        item.assets = resolved.assets;
        Ok(())
    }

    /// Resolves assets for every item that is still missing its bands.
    ///
    /// Resolution is sequential, in item order; items already carrying band
    /// assets are left alone.
    pub async fn resolve_collection_assets(
        &self,
        item_collection: &mut ItemCollection,
    ) -> Result<()> {
        for item in &mut item_collection.items {
            if item.assets.has_bands() {
                continue;
            }
            self.resolve_assets(item).await?;
        }
        Ok(())
    }

    /// Queries the catalog for scenes matching a location, date interval,
    /// cloud cover ceiling, and target collections.
    ///
    /// This is the facade over [Search]: the location resolves into either a
    /// bounding box or a path/row constraint, the remaining arguments fill
    /// in the rest of the builder, and the search is dispatched.
    pub async fn query<I, S>(
        &self,
        location: impl Into<Location>,
        start: NaiveDate,
        end: NaiveDate,
        cloud_cover: u8,
        limit: u64,
        collections: I,
    ) -> Result<ItemCollection>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let search = location
            .into()
            .apply(Search::new())?
            .date_interval(start, end)?
            .cloud_cover(cloud_cover)?
            .limit(limit)?
            .collections(collections)?;
        self.search(search).await
    }

    /// Queries the catalog for one or more scenes by id.
    pub async fn query_by_id<I, S>(
        &self,
        ids: I,
        collection: impl ToString,
    ) -> Result<ItemCollection>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.search_by_id(IdSearch::new(ids, collection)?).await
    }

    fn item_url(&self, collection: &str, id: &str) -> Result<Url> {
        Url::parse(&format!(
            "{}/{}/items/{}",
            self.collections_url.as_str().trim_end_matches('/'),
            collection,
            id
        ))
        .map_err(Error::from)
    }
}

impl Default for Client {
    fn default() -> Client {
        Client::new()
    }
}
