#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::PERSISTENCE;
use crate::utils::time_utils::how_many_seconds_ago;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::Path;

use crate::data::timeseries::{PriceSource, cache_file::CacheFile};
use crate::domain::TickerRequest;
use crate::models::DailySeries;

/// Checks a loaded cache against the request it is supposed to answer.
pub fn validate_cache(
    cache: &CacheFile,
    request: &TickerRequest,
    recency_required_secs: i64,
    version_required: f64,
) -> Result<()> {
    // Check version
    if cache.version != version_required {
        bail!(
            "Cache version mismatch: file v{} vs required v{}",
            cache.version,
            version_required
        );
    }

    // Check the cache answers the same question
    if &cache.request != request {
        bail!(
            "Cache request mismatch: file holds {}, expected {}",
            cache.request,
            request
        );
    }

    // Check recency
    let seconds_ago = how_many_seconds_ago(cache.timestamp_ms);
    if seconds_ago > recency_required_secs {
        bail!(
            "Cache too old: created {} seconds ago (limit: {} seconds)",
            seconds_ago,
            recency_required_secs
        );
    }

    cache.data.validate()
}

pub fn check_local_data_validity(
    request: &TickerRequest,
    recency_required_secs: i64,
    version_required: f64,
) -> Result<()> {
    let full_path = CacheFile::default_cache_path(request);

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!("Checking validity of local cache at {:?}...", full_path);
    }
    let cache = CacheFile::load_from_path(&full_path)?;
    validate_cache(&cache, request, recency_required_secs, version_required)?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_serde {
        log::info!(
            "✅ Cache valid: v{}, {} rows from {}",
            cache.version,
            cache.data.len(),
            cache.source
        );
    }

    Ok(())
}

/// Write price history to a binary cache file
/// Uses bincode for a compact, fast on-disk format
pub fn write_daily_series_locally(
    path: &Path,
    source_signature: &str,
    request: &TickerRequest,
    series: &DailySeries,
) -> Result<()> {
    #[cfg(debug_assertions)]
    let start_time = DEBUG_FLAGS.print_serde.then(|| {
        log::info!("Writing cache to disk: {:?}...", path);
        std::time::Instant::now()
    });

    let cache = CacheFile::new(
        request.clone(),
        source_signature,
        series.clone(),
        PERSISTENCE.version,
    );
    cache.save_to_path(path)?;

    #[cfg(debug_assertions)]
    if let Some(start) = start_time {
        log::info!(
            "✅ Cache written: {} rows in {:.3}s",
            series.len(),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Async wrapper for write_daily_series_locally
/// Spawns blocking task so the runtime threads stay free
pub async fn write_daily_series_async(
    source_signature: &'static str,
    request: TickerRequest,
    series: DailySeries,
) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let path = CacheFile::default_cache_path(&request);
        write_daily_series_locally(&path, source_signature, &request, &series)
    })
    .await
    .context("Cache write task panicked")?
}

pub struct SerdeVersion;

#[async_trait]
impl PriceSource for SerdeVersion {
    fn signature(&self) -> &'static str {
        "Local Cache"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn fetch(&self, request: &TickerRequest) -> Result<DailySeries> {
        let full_path = CacheFile::default_cache_path(request);

        #[cfg(debug_assertions)]
        let start_time = DEBUG_FLAGS.print_serde.then(|| {
            log::info!("Reading cache from: {:?}...", full_path);
            std::time::Instant::now()
        });

        let cache = tokio::task::spawn_blocking(move || CacheFile::load_from_path(&full_path))
            .await
            .context("Deserialization task panicked")?
            .context("Failed to load cache file")?;

        if &cache.request != request {
            bail!("Cache holds {}, not {}", cache.request, request);
        }
        cache.data.validate()?;

        #[cfg(debug_assertions)]
        if let Some(start) = start_time {
            log::info!(
                "✅ Cache loaded: {} rows (originally from {}) in {:.3}s",
                cache.data.len(),
                cache.source,
                start.elapsed().as_secs_f64()
            );
        }

        Ok(cache.data)
    }
}
