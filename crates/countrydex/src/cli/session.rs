//! Line-driven interactive session.
//!
//! Each input line is one event; the browser re-renders after every event.

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::debug;

use crate::country::REGIONS;
use crate::error::Result;
use crate::favourites::{parse_code, FavouriteStore};
use crate::render::Renderer;
use crate::view::Browser;

const HELP: &str = "\
Commands:
  / TEXT        search names (a bare / clears the search)
  region NAME   only show NAME (no NAME clears the region)
  only          toggle favourites-only
  fav CODE      add or remove a favourite (e.g. fav FI)
  show          redraw the current list
  help          show this help
  quit          leave";

/// One user input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Set the search text.
    Search(String),
    /// Set or clear the region.
    Region(Option<String>),
    /// Flip the favourites-only switch.
    FavouritesOnly,
    /// Flip a favourite.
    Favourite(String),
    /// Redraw.
    Show,
    /// Print help.
    Help,
    /// End the session.
    Quit,
}

impl FromStr for Event {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(text) = line.strip_prefix('/') {
            return Ok(Self::Search(text.trim().to_string()));
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "region" if rest.is_empty() => Ok(Self::Region(None)),
            "region" => Ok(Self::Region(Some(canonical_region(rest)))),
            "only" => Ok(Self::FavouritesOnly),
            "fav" => parse_code(rest)
                .map(Self::Favourite)
                .map_err(|e| e.to_string()),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(format!("unknown command '{word}' (try 'help')")),
        }
    }
}

/// Match a typed region against the known ones, ignoring case.
fn canonical_region(input: &str) -> String {
    REGIONS
        .iter()
        .find(|r| r.eq_ignore_ascii_case(input))
        .map_or_else(|| input.to_string(), |r| (*r).to_string())
}

/// Run events read from `input` until it ends or the user quits.
///
/// Messages that are not part of the rendered list go to `out`.
///
/// # Errors
///
/// Returns an error if reading input, writing output or rendering fails.
pub fn run<S, R>(
    browser: &mut Browser<S, R>,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()>
where
    S: FavouriteStore,
    R: Renderer,
{
    writeln!(out, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event = match line.parse::<Event>() {
            Ok(event) => event,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        debug!("Event: {event:?}");

        match event {
            Event::Search(text) => browser.set_query(text)?,
            Event::Region(region) => browser.set_region(region)?,
            Event::FavouritesOnly => {
                let only = browser.toggle_favourites_only()?;
                writeln!(
                    out,
                    "{}",
                    if only {
                        "Showing favourites only"
                    } else {
                        "Showing all countries"
                    }
                )?;
            }
            Event::Favourite(code) => {
                let state = browser.state();
                let name = match state.country(&code) {
                    Some(country) => country.name.clone(),
                    // A stale favourite can still be removed.
                    None if state.favourites.contains(&code) => code.clone(),
                    None => {
                        writeln!(out, "No country with code {code}")?;
                        continue;
                    }
                };
                let liked = browser.toggle_favourite(&code)?;
                writeln!(
                    out,
                    "{name} {}",
                    if liked {
                        "added to favourites"
                    } else {
                        "removed from favourites"
                    }
                )?;
            }
            Event::Show => browser.render()?,
            Event::Help => writeln!(out, "{HELP}")?,
            Event::Quit => break,
        }
    }

    Ok(())
}
