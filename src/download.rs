//! Concurrent asset downloads.
//!
//! Downloads fan out over a bounded worker pool: one task per requested
//! (item, band) pair, plus one per sidecar metadata file when asked for.
//! Tasks are submitted in item-then-band order, run under a semaphore sized
//! to the worker ceiling, and stream each response body straight to disk.
//!
//! There is no cancellation: once submitted, a task runs to completion or
//! retry exhaustion even if a sibling has already failed, so a failed
//! download can leave other bands on disk. The first observed failure is
//! returned to the caller after the pool drains.

use crate::{Band, Client, Error, Item, ItemCollection, ItemTable, Result};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

const MAX_ATTEMPTS: u32 = 3;

/// The products to download: a typed item collection or a tabular
/// projection of one.
///
/// Raw GeoJSON-like JSON converts through `TryFrom<serde_json::Value>`; a
/// table only needs its `id` and `collection` columns, each row is
/// re-fetched from the catalog to recover the band hrefs.
#[derive(Clone, Debug)]
pub enum Products {
    /// A feature collection, possibly still thumbnail-only.
    Collection(ItemCollection),

    /// A tabular projection with `id` and `collection` columns.
    Table(ItemTable),
}

impl Products {
    fn is_empty(&self) -> bool {
        match self {
            Products::Collection(item_collection) => item_collection.is_empty(),
            Products::Table(table) => table.is_empty(),
        }
    }
}

impl From<ItemCollection> for Products {
    fn from(item_collection: ItemCollection) -> Products {
        Products::Collection(item_collection)
    }
}

impl From<ItemTable> for Products {
    fn from(table: ItemTable) -> Products {
        Products::Table(table)
    }
}

impl TryFrom<serde_json::Value> for Products {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Products> {
        ItemCollection::try_from(value).map(Products::Collection)
    }
}

/// Options for a download run.
///
/// # Examples
///
/// ```
/// use cbers4a::DownloadOptions;
///
/// let options = DownloadOptions::new().workers(4).with_folder(true);
/// assert!(options.with_folder);
/// ```
#[derive(Clone, Debug)]
pub struct DownloadOptions {
    /// The worker pool size. Defaults to the host's available parallelism.
    pub workers: usize,

    /// Nest each scene's files under a `{outdir}/{item.id}` subdirectory.
    pub with_folder: bool,

    /// Also fetch each band's sidecar `.xml` metadata.
    pub with_metadata: bool,

    /// The linear backoff unit between retries of a failed request.
    pub backoff: Duration,
}

impl DownloadOptions {
    /// Creates options with the defaults.
    pub fn new() -> DownloadOptions {
        DownloadOptions::default()
    }

    /// Sets the worker pool size.
    pub fn workers(mut self, workers: usize) -> DownloadOptions {
        self.workers = workers;
        self
    }

    /// Sets whether each scene gets its own subdirectory.
    pub fn with_folder(mut self, with_folder: bool) -> DownloadOptions {
        self.with_folder = with_folder;
        self
    }

    /// Sets whether sidecar metadata is fetched alongside each band.
    pub fn with_metadata(mut self, with_metadata: bool) -> DownloadOptions {
        self.with_metadata = with_metadata;
        self
    }

    /// Sets the retry backoff unit.
    pub fn backoff(mut self, backoff: Duration) -> DownloadOptions {
        self.backoff = backoff;
        self
    }
}

impl Default for DownloadOptions {
    fn default() -> DownloadOptions {
        DownloadOptions {
            workers: std::thread::available_parallelism()
                .map(|workers| workers.get())
                .unwrap_or(1),
            with_folder: false,
            with_metadata: false,
            backoff: Duration::from_secs(1),
        }
    }
}

impl Client {
    /// Downloads the named bands of every product into a directory.
    ///
    /// Products still missing their band assets are resolved first: feature
    /// collections through per-item by-id lookups, tables through a by-id
    /// lookup per row. One download task is built per (item, band) pair, in
    /// that order, plus a sidecar metadata task per pair when
    /// [DownloadOptions::with_metadata] is set, and all tasks run on a
    /// bounded worker pool. Each task GETs the asset with the client's
    /// e-mail as a query parameter, retrying server errors (500-504) up to
    /// three attempts with linear backoff, and streams the body to
    /// `{outdir}/{filename}` (or `{outdir}/{item.id}/{filename}` with
    /// [DownloadOptions::with_folder]), where `filename` is the href's final
    /// path segment. Existing files are overwritten.
    ///
    /// A failing task does not cancel its siblings; they run to completion
    /// and the first failure is then returned, so a partial set of bands may
    /// be on disk after an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cbers4a::{Band, Client, DownloadOptions, Products};
    ///
    /// # tokio_test::block_on(async {
    /// let client = Client::new().email("user@example.com");
    /// let items = client.query_by_id(["CBERS4A_WPM22912420210830"], "CBERS4A_WPM_L4_DN")
    ///     .await
    ///     .unwrap();
    /// client
    ///     .download(
    ///         Products::from(items),
    ///         &[Band::Red, Band::Green, Band::Blue],
    ///         "./downloads",
    ///         DownloadOptions::new().with_folder(true),
    ///     )
    ///     .await
    ///     .unwrap();
    /// # })
    /// ```
    pub async fn download(
        &self,
        products: Products,
        bands: &[Band],
        outdir: impl AsRef<Path>,
        options: DownloadOptions,
    ) -> Result<()> {
        let outdir = outdir.as_ref();
        if bands.is_empty() {
            return Err(Error::NoBands);
        }
        if !outdir.is_dir() {
            return Err(Error::NotADirectory(outdir.to_path_buf()));
        }
        let email = self
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .ok_or(Error::MissingCredential)?
            .to_string();
        if products.is_empty() {
            return Err(Error::NoProducts);
        }

        let item_collection = self.resolve_products(products).await?;
        let mut tasks = Vec::new();
        for item in &item_collection {
            let dir = if options.with_folder {
                outdir.join(&item.id)
            } else {
                outdir.to_path_buf()
            };
            for band in bands {
                let href = item.band_url(*band)?;
                tasks.push(Task::new(href, &email, &dir)?);
                if options.with_metadata {
                    tasks.push(Task::new(&sidecar_href(href), &email, &dir)?);
                }
            }
        }
        tracing::debug!(
            "downloading {} assets with {} workers into {}",
            tasks.len(),
            options.workers,
            outdir.display()
        );

        let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
        let mut join_set: JoinSet<Result<()>> = JoinSet::new();
        for task in tasks {
            let client = self.client.clone();
            let semaphore = semaphore.clone();
            let backoff = options.backoff;
            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("the semaphore is never closed");
                task.run(&client, backoff).await
            });
        }

        // Drain the whole pool before reporting, so siblings of a failed
        // task still run to completion.
        let mut first_error = None;
        while let Some(result) = join_set.join_next().await {
            let result = result.map_err(Error::from).and_then(|result| result);
            if let Err(error) = result {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn resolve_products(&self, products: Products) -> Result<ItemCollection> {
        match products {
            Products::Collection(mut item_collection) => {
                self.resolve_collection_assets(&mut item_collection).await?;
                Ok(item_collection)
            }
            Products::Table(table) => {
                let mut items: Vec<Item> = Vec::with_capacity(table.len());
                for row in table.iter() {
                    items.push(self.item(&row.id, &row.collection).await?);
                }
                Ok(ItemCollection::new(items))
            }
        }
    }
}

#[derive(Debug)]
struct Task {
    url: Url,
    dir: PathBuf,
    outfile: PathBuf,
}

impl Task {
    fn new(href: &str, email: &str, dir: &Path) -> Result<Task> {
        let mut url = Url::parse(href)?;
        let name = filename(&url)?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(Task {
            url,
            outfile: dir.join(name),
            dir: dir.to_path_buf(),
        })
    }

    async fn run(&self, client: &reqwest::Client, backoff: Duration) -> Result<()> {
        // create_dir_all is idempotent, so concurrent tasks can race on the
        // same scene directory.
        tokio::fs::create_dir_all(&self.dir).await?;
        let mut attempt = 1;
        let response = loop {
            let response = client.get(self.url.clone()).send().await?;
            let status = response.status();
            if status.is_success() {
                break response;
            }
            if attempt < MAX_ATTEMPTS && is_retryable(status) {
                tracing::warn!(
                    "attempt {} of {} failed with {}, retrying: {}",
                    attempt,
                    MAX_ATTEMPTS,
                    status,
                    self.url
                );
                tokio::time::sleep(backoff * attempt).await;
                attempt += 1;
            } else {
                return Err(Error::Download {
                    status,
                    url: self.url.clone(),
                });
            }
        };
        let mut file = File::create(&self.outfile).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 500..=504)
}

fn filename(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .ok_or_else(|| Error::NoFilename(url.to_string()))
}

/// Swaps an asset href's extension for the `.xml` sidecar's.
fn sidecar_href(href: &str) -> String {
    if let Some(stem) = href.strip_suffix(".tif") {
        return format!("{stem}.xml");
    }
    let name_starts = href.rfind('/').map(|slash| slash + 1).unwrap_or(0);
    match href[name_starts..].rfind('.') {
        Some(dot) => format!("{}.xml", &href[..name_starts + dot]),
        None => format!("{href}.xml"),
    }
}
