//! Read-through cache for fetched months: an in-memory map in front of an optional
//! directory of bincode files.
//!
//! Archive history never changes, so entries live until invalidated. The exception is
//! any volatile request (current year, or a month cut short by the archive lag): those
//! stay in memory only and expire after a TTL.

pub mod error;
pub mod key;

use crate::cache::error::CacheError;
use crate::cache::key::CacheKey;
use crate::types::selection::MonthRequest;
use crate::types::wind_records::WindRecords;
use crate::weather_data::fetcher::MonthFetcher;
use crate::WindroseError;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

struct MemoryEntry {
    records: WindRecords,
    inserted: Instant,
    volatile: bool,
}

impl MemoryEntry {
    fn is_fresh(&self, volatile_ttl: Duration) -> bool {
        !self.volatile || self.inserted.elapsed() < volatile_ttl
    }
}

#[derive(Serialize, Deserialize)]
struct DiskEntry {
    key: CacheKey,
    records: WindRecords,
}

pub struct FetchCache {
    memory: Mutex<HashMap<CacheKey, MemoryEntry>>,
    disk_dir: Option<PathBuf>,
    volatile_ttl: Duration,
}

impl FetchCache {
    /// `disk_dir` must already exist; `None` keeps the cache in memory only.
    pub fn new(disk_dir: Option<PathBuf>, volatile_ttl: Duration) -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            disk_dir,
            volatile_ttl,
        }
    }

    /// Returns the cached records for `request`, fetching and storing them on a miss.
    pub async fn get_or_fetch(
        &self,
        request: &MonthRequest,
        fetcher: &MonthFetcher,
    ) -> Result<WindRecords, WindroseError> {
        let key = request.cache_key();
        let volatile = request.is_volatile();

        {
            let mut cache = self.memory.lock().await;
            if let Some(entry) = cache.get(&key) {
                if entry.is_fresh(self.volatile_ttl) {
                    info!("Memory cache hit for {:?}", key);
                    return Ok(entry.records.clone());
                }
                info!("Memory cache entry for {:?} expired", key);
                cache.remove(&key);
            }
        }

        if !volatile {
            if let Some(records) = self.read_disk(&key).await? {
                info!("Disk cache hit for {:?}", key);
                self.insert_memory(key, records.clone(), volatile).await;
                return Ok(records);
            }
        }

        warn!("Cache miss for {:?}. Fetching from archive.", key);
        let records = fetcher.fetch(request).await?;

        if !volatile {
            self.write_disk(&key, &records).await?;
        }
        Ok(self.insert_memory(key, records, volatile).await)
    }

    /// Drops expired entries, then stores `records` unless a fresh entry was inserted
    /// meanwhile. Returns whichever is kept.
    async fn insert_memory(
        &self,
        key: CacheKey,
        records: WindRecords,
        volatile: bool,
    ) -> WindRecords {
        let mut cache = self.memory.lock().await;
        let before = cache.len();
        cache.retain(|_, entry| entry.is_fresh(self.volatile_ttl));
        if cache.len() < before {
            info!("Dropped {} expired memory cache entries", before - cache.len());
        }

        match cache.entry(key) {
            Entry::Occupied(entry) => entry.get().records.clone(),
            Entry::Vacant(entry) => {
                entry
                    .insert(MemoryEntry {
                        records,
                        inserted: Instant::now(),
                        volatile,
                    })
                    .records
                    .clone()
            }
        }
    }

    /// Drops one entry from memory and disk. Returns whether anything was removed.
    pub async fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        let in_memory = self.memory.lock().await.remove(key).is_some();
        let on_disk = match &self.disk_dir {
            Some(dir) => remove_file_if_exists(&dir.join(key.file_name())).await?,
            None => false,
        };
        Ok(in_memory || on_disk)
    }

    /// Drops every entry from memory and every cache file from disk.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.memory.lock().await.clear();
        let Some(dir) = &self.disk_dir else {
            return Ok(());
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(CacheError::CacheRead(dir.clone(), e)),
        };
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::CacheRead(dir.clone(), e))?
        {
            if entry
                .file_name()
                .to_str()
                .is_some_and(CacheKey::is_cache_file)
            {
                remove_file_if_exists(&entry.path()).await?;
            }
        }
        info!("Cleared cache directory {}", dir.display());
        Ok(())
    }

    async fn read_disk(&self, key: &CacheKey) -> Result<Option<WindRecords>, CacheError> {
        let Some(dir) = &self.disk_dir else {
            return Ok(None);
        };
        let path = dir.join(key.file_name());
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::CacheRead(path, e)),
        };

        let decode_path = path.clone();
        let decoded = tokio::task::spawn_blocking(move || {
            bincode::serde::decode_from_slice::<DiskEntry, _>(&bytes, BINCODE_CONFIG)
                .map(|(entry, _)| entry)
                .map_err(|e| CacheError::CacheDecode(decode_path, Box::new(e)))
        })
        .await?;

        match decoded {
            Ok(entry) if entry.key == *key => Ok(Some(entry.records)),
            Ok(_) => {
                warn!("Cache file {} belongs to another request", path.display());
                Ok(None)
            }
            Err(e) => {
                warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn write_disk(&self, key: &CacheKey, records: &WindRecords) -> Result<(), CacheError> {
        let Some(dir) = &self.disk_dir else {
            return Ok(());
        };
        let path = dir.join(key.file_name());
        let entry = DiskEntry {
            key: key.clone(),
            records: records.clone(),
        };
        let bytes = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(entry, BINCODE_CONFIG)
                .map_err(|e| CacheError::CacheEncode(Box::new(e)))
        })
        .await??;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CacheError::CacheWrite(path.clone(), e))?;
        info!("Wrote {} bytes to cache {}", bytes.len(), path.display());
        Ok(())
    }
}

async fn remove_file_if_exists(path: &Path) -> Result<bool, CacheError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::CacheDeletion(path.to_path_buf(), e)),
    }
}
