//! Sources of raw country data.
//!
//! [`CountrySource`] is the seam between the loader and the network: the
//! production implementation talks to the REST Countries API, tests plug in
//! a canned list.

mod rest_countries;

use async_trait::async_trait;

use crate::country::RawCountry;
use crate::error::Result;

pub use rest_countries::RestCountriesSource;

/// Something that can produce the full upstream country list.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Name of this source, for logging.
    fn name(&self) -> &str;

    /// Fetch every upstream record.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be retrieved or decoded.
    async fn fetch(&self) -> Result<Vec<RawCountry>>;
}

/// A fixed list of records, served from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RawCountry>,
}

impl StaticSource {
    /// Serve `records` on every fetch.
    #[must_use]
    pub fn new(records: Vec<RawCountry>) -> Self {
        Self { records }
    }

    /// Parse a JSON array in the upstream format.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an array of country records.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl CountrySource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<RawCountry>> {
        Ok(self.records.clone())
    }
}
