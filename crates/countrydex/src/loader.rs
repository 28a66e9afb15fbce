//! Loading and normalizing the country collection.

use tracing::{debug, info, warn};

use crate::country::{normalize, sort_by_name, CountryRecord};
use crate::error::Result;
use crate::source::CountrySource;

/// Fetch, normalize and sort the full country list.
///
/// All or nothing: any fetch or decode error is returned as-is and no
/// partial list is produced. There is no retry.
///
/// # Errors
///
/// Returns the source's error if fetching or decoding fails.
pub async fn load(source: &dyn CountrySource) -> Result<Vec<CountryRecord>> {
    debug!("Loading countries from {}", source.name());

    let raw = source.fetch().await.map_err(|e| {
        warn!("Failed to load countries from {}: {e}", source.name());
        e
    })?;

    let mut countries: Vec<CountryRecord> = raw.into_iter().map(normalize).collect();
    sort_by_name(&mut countries);

    info!("Loaded {} countries", countries.len());
    Ok(countries)
}
