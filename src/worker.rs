//! The install and fetch handlers sharing one named cache store.

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};

use crate::assets::Manifest;
use crate::config::WorkerConfig;
use crate::disk::DiskStore;
use crate::error::{Error, Result};
use crate::network::{HttpNetwork, Network};
use crate::snapshot::{RequestKey, ResponseSnapshot};
use crate::store::CacheStore;

/// The offline worker: precaches the manifest at install time, then serves
/// requests network-first with cache fallback.
///
/// Both seams are injected: the network behind [`Network`] and the store
/// behind [`CacheStore`], with the reqwest- and disk-backed implementations
/// as defaults.
pub struct OfflineWorker<N: Network = HttpNetwork, S: CacheStore = DiskStore> {
    network: N,
    store: S,
    manifest: Manifest,
    config: WorkerConfig,
}

impl OfflineWorker {
    /// Opens a worker with the default network and disk store for
    /// `manifest`, using the store named by the manifest's cache name.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the cache
    /// directory cannot be created.
    pub async fn open(manifest: Manifest, config: WorkerConfig) -> Result<Self> {
        let network = HttpNetwork::new(&config)?;
        let store = DiskStore::open(&manifest.cache_name).await?;
        Ok(Self {
            network,
            store,
            manifest,
            config,
        })
    }
}

impl<N: Network, S: CacheStore> OfflineWorker<N, S> {
    /// Creates a worker from explicit network and store handles.
    pub fn new(network: N, store: S, manifest: Manifest) -> Self {
        Self {
            network,
            store,
            manifest,
            config: WorkerConfig::default(),
        }
    }

    /// Replaces the worker configuration.
    #[must_use]
    pub fn with_config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns a reference to the network handle.
    #[must_use]
    pub const fn network(&self) -> &N {
        &self.network
    }

    /// Returns a reference to the cache store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the asset manifest.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Precaches every manifest asset into the store, all-or-nothing.
    ///
    /// Assets are fetched with bounded concurrency and written in manifest
    /// order only after every fetch has succeeded, so a failed fetch
    /// populates nothing. The first failure aborts the install and names
    /// the asset that caused it. A non-success HTTP status for an asset
    /// counts as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Install`] or [`Error::InstallStatus`] identifying
    /// the failing asset.
    pub async fn install(&self) -> Result<()> {
        debug!(
            "install: precaching {} assets into '{}'",
            self.manifest.assets.len(),
            self.store.name()
        );

        let fetched: Vec<(String, ResponseSnapshot)> =
            stream::iter(self.manifest.assets.iter())
                .map(|path| async move {
                    let key = RequestKey::get(path.as_str());
                    let snapshot =
                        self.network
                            .fetch(&key)
                            .await
                            .map_err(|e| Error::Install {
                                path: path.clone(),
                                source: Box::new(e),
                            })?;
                    if !snapshot.is_success() {
                        return Err(Error::InstallStatus {
                            path: path.clone(),
                            status: snapshot.status,
                        });
                    }
                    Ok((path.clone(), snapshot))
                })
                .buffered(self.config.concurrent_prefetch.max(1))
                .try_collect()
                .await?;

        for (path, snapshot) in fetched {
            let key = RequestKey::get(path.as_str());
            self.store
                .put(&key, snapshot)
                .await
                .map_err(|e| Error::Install {
                    path,
                    source: Box::new(e),
                })?;
        }

        debug!("install: '{}' populated", self.store.name());
        Ok(())
    }

    /// Serves `key` network-first, falling back to the cache only when the
    /// network attempt itself fails.
    ///
    /// A live response is returned unmodified whatever its status; HTTP
    /// errors never trigger the fallback. A successful response is not
    /// written back to the cache either. On a transport
    /// failure, a stored snapshot is served if one matches exactly; a miss
    /// propagates the original network error. Cache read errors during
    /// fallback are treated as misses.
    ///
    /// # Errors
    ///
    /// Returns the network error when the transport fails and no cached
    /// entry matches.
    pub async fn fetch(&self, key: &RequestKey) -> Result<ResponseSnapshot> {
        match self.network.fetch(key).await {
            Ok(response) => Ok(response),
            Err(net_err) => {
                warn!(
                    "fetch: network failed for {key}, trying cache '{}': {net_err}",
                    self.store.name()
                );
                let fallback = match self.store.get(key).await {
                    Ok(hit) => hit,
                    Err(store_err) => {
                        debug!("fetch: cache read for {key} failed, treating as miss: {store_err}");
                        None
                    }
                };
                match fallback {
                    Some(snapshot) => {
                        debug!("fetch: serving {key} from cache '{}'", self.store.name());
                        Ok(snapshot)
                    }
                    None => Err(net_err),
                }
            }
        }
    }
}
