//! Persisted favourite countries.
//!
//! Favourites are a side table mapping a country code to `true`, kept apart
//! from the country collection and written to the key-value store as JSON
//! (`{"FI":true,"SE":true}`). Reading never fails: missing or corrupt data
//! reads as an empty mapping.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::storage::Storage;

/// The set of favourited country codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, bool>")]
pub struct Favourites(BTreeMap<String, bool>);

impl From<BTreeMap<String, Value>> for Favourites {
    fn from(map: BTreeMap<String, Value>) -> Self {
        map.into_iter()
            .filter_map(|(code, value)| is_truthy(&value).then_some(code))
            .collect()
    }
}

/// Whether a stored value marks a favourite. `false`, `null`, `0` and `""`
/// mean the same as an absent key.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<Favourites> for BTreeMap<String, bool> {
    fn from(favourites: Favourites) -> Self {
        favourites.0
    }
}

impl<S: Into<String>> FromIterator<S> for Favourites {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|code| (code.into(), true)).collect())
    }
}

impl Favourites {
    /// An empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `code` is a favourite.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.0.get(code).copied().unwrap_or(false)
    }

    /// Flip the favourite status of `code`.
    ///
    /// Returns `true` if `code` is a favourite afterwards.
    pub fn toggle(&mut self, code: &str) -> bool {
        if self.0.remove(code).is_some() {
            false
        } else {
            self.0.insert(code.to_string(), true);
            true
        }
    }

    /// Number of favourites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no favourites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Favourited codes in lexical order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Parse a persisted value, falling back to an empty mapping.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::new();
        };
        match serde_json::from_str::<Self>(raw) {
            Ok(favourites) => favourites,
            Err(e) => {
                warn!("Ignoring unreadable favourites ({e}); starting empty");
                Self::new()
            }
        }
    }

    /// Serialize to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Normalize user input into a two-letter country code.
///
/// # Errors
///
/// Returns [`Error::InvalidCode`] unless the trimmed input is exactly two
/// ASCII letters.
pub fn parse_code(input: &str) -> Result<String> {
    let code = input.trim();
    if code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(Error::InvalidCode(input.to_string()))
    }
}

/// Where favourites are loaded from and saved to.
pub trait FavouriteStore {
    /// Load the stored favourites, or an empty mapping if none can be read.
    fn load(&self) -> Favourites;

    /// Persist `favourites`. Best effort: failures are logged, not returned.
    fn save(&self, favourites: &Favourites);
}

/// Favourites kept under one key of the `SQLite` key-value store.
#[derive(Debug)]
pub struct SqliteFavouriteStore {
    storage: Storage,
    key: String,
}

impl SqliteFavouriteStore {
    /// Create a store writing to `key` in `storage`.
    #[must_use]
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The underlying key-value store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The key favourites are stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Delete the stored mapping.
    ///
    /// Returns `true` if a mapping was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<bool> {
        let removed = self.storage.remove(&self.key)?;
        debug!("Cleared favourites under key {}", self.key);
        Ok(removed)
    }
}

impl FavouriteStore for SqliteFavouriteStore {
    fn load(&self) -> Favourites {
        match self.storage.get(&self.key) {
            Ok(raw) => Favourites::parse_or_default(raw.as_deref()),
            Err(e) => {
                warn!("Failed to read favourites: {e}");
                Favourites::new()
            }
        }
    }

    fn save(&self, favourites: &Favourites) {
        let result = favourites
            .to_json()
            .and_then(|json| self.storage.set(&self.key, &json));
        match result {
            Ok(()) => debug!("Saved {} favourites", favourites.len()),
            Err(e) => warn!("Failed to save favourites: {e}"),
        }
    }
}

/// In-memory favourites store holding the raw persisted string.
#[derive(Debug, Default)]
pub struct MemoryFavouriteStore {
    raw: RefCell<Option<String>>,
}

impl MemoryFavouriteStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a raw persisted value, which may be corrupt.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    /// The raw persisted value, if anything has been stored.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl FavouriteStore for MemoryFavouriteStore {
    fn load(&self) -> Favourites {
        Favourites::parse_or_default(self.raw.borrow().as_deref())
    }

    fn save(&self, favourites: &Favourites) {
        match favourites.to_json() {
            Ok(json) => *self.raw.borrow_mut() = Some(json),
            Err(e) => warn!("Failed to save favourites: {e}"),
        }
    }
}
