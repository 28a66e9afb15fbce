//! `countrydex` - Browse, filter and favourite the world's countries
//!
//! This library loads the country list from a REST source, normalizes it into
//! fixed-shape records, filters it, renders it, and persists favourites to a
//! local key-value store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod country;
pub mod error;
pub mod favourites;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod render;
pub mod source;
pub mod storage;
pub mod view;

pub use config::Config;
pub use country::{CountryRecord, RawCountry};
pub use error::{Error, Result};
pub use favourites::{FavouriteStore, Favourites, SqliteFavouriteStore};
pub use filter::Filter;
pub use logging::init_logging;
pub use source::{CountrySource, RestCountriesSource};
pub use storage::Storage;
pub use view::{AppState, Browser, Status};
