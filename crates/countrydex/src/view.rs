//! Application state and the event handlers that drive it.
//!
//! [`Browser`] owns the state explicitly and talks to the outside world only
//! through its injected [`FavouriteStore`] and [`Renderer`]. Every event
//! recomputes the visible list and hands it to the renderer in full.

use std::fmt;

use tracing::{debug, info};

use crate::country::CountryRecord;
use crate::error::Result;
use crate::favourites::{FavouriteStore, Favourites};
use crate::filter::{self, Filter};
use crate::loader;
use crate::render::Renderer;
use crate::source::CountrySource;

/// Load status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The collection holds this many countries.
    Loaded(usize),
    /// The last fetch failed.
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Loading => write!(f, "Loading country data..."),
            Self::Loaded(n) => write!(f, "Loaded {n} countries"),
            Self::Failed => write!(f, "Failed to load countries. Please try again."),
        }
    }
}

/// Everything the view derives its output from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// The full, sorted collection.
    pub countries: Vec<CountryRecord>,
    /// Favourited codes.
    pub favourites: Favourites,
    /// Current filter inputs.
    pub filter: Filter,
    /// Load status.
    pub status: Status,
}

impl AppState {
    /// State with the given favourites and nothing loaded.
    #[must_use]
    pub fn with_favourites(favourites: Favourites) -> Self {
        Self {
            favourites,
            ..Self::default()
        }
    }

    /// The countries that currently pass the filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&CountryRecord> {
        filter::apply(&self.countries, &self.filter, &self.favourites)
    }

    /// Look up a loaded country by code, ignoring case.
    #[must_use]
    pub fn country(&self, code: &str) -> Option<&CountryRecord> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

/// The interactive country browser.
#[derive(Debug)]
pub struct Browser<S, R> {
    state: AppState,
    store: S,
    renderer: R,
}

impl<S: FavouriteStore, R: Renderer> Browser<S, R> {
    /// Create a browser, reading persisted favourites from `store`.
    pub fn new(store: S, renderer: R) -> Self {
        let favourites = store.load();
        debug!("Restored {} favourites", favourites.len());
        Self {
            state: AppState::with_favourites(favourites),
            store,
            renderer,
        }
    }

    /// Start from `filter` instead of an empty filter. Nothing is rendered.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.state.filter = filter;
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The favourites store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consume the browser and return its renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Fetch the collection from `source` and render it.
    ///
    /// On failure the previous collection is kept, the status becomes
    /// [`Status::Failed`] and nothing is rendered. The upstream error is
    /// logged by the loader rather than returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if rendering fails.
    pub async fn load(&mut self, source: &dyn CountrySource) -> Result<()> {
        self.set_status(Status::Loading)?;

        match loader::load(source).await {
            Ok(countries) => {
                let count = countries.len();
                self.state.countries = countries;
                self.set_status(Status::Loaded(count))?;
                self.render()
            }
            Err(_) => self.set_status(Status::Failed),
        }
    }

    /// Replace the collection without fetching and render it.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn set_countries(&mut self, countries: Vec<CountryRecord>) -> Result<()> {
        self.state.status = Status::Loaded(countries.len());
        self.state.countries = countries;
        self.render()
    }

    /// Text query changed.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn set_query(&mut self, query: impl Into<String>) -> Result<()> {
        self.state.filter.query = query.into();
        self.render()
    }

    /// Region selection changed; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn set_region(&mut self, region: Option<String>) -> Result<()> {
        self.state.filter.region = region;
        self.render()
    }

    /// Flip the favourites-only switch.
    ///
    /// Returns the new value of the switch.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn toggle_favourites_only(&mut self) -> Result<bool> {
        self.state.filter.favourites_only = !self.state.filter.favourites_only;
        self.render()?;
        Ok(self.state.filter.favourites_only)
    }

    /// Flip the favourite status of `code`, persist it and re-render.
    ///
    /// Returns `true` if `code` is a favourite afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails. Persistence is best effort.
    pub fn toggle_favourite(&mut self, code: &str) -> Result<bool> {
        let liked = self.state.favourites.toggle(code);
        info!(
            "{} {code}",
            if liked {
                "Added favourite"
            } else {
                "Removed favourite"
            }
        );
        self.store.save(&self.state.favourites);
        self.render()?;
        Ok(liked)
    }

    /// Recompute the visible list and hand it to the renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&mut self) -> Result<()> {
        let visible = self.state.visible();
        debug!(
            "Rendering {} of {} countries",
            visible.len(),
            self.state.countries.len()
        );
        self.renderer.render(&visible, &self.state.favourites)
    }

    fn set_status(&mut self, status: Status) -> Result<()> {
        self.state.status = status;
        self.renderer.status(&status)
    }
}
