//! Rendering of the visible country list.
//!
//! The view hands every renderer the complete visible list on each update;
//! renderers redraw from scratch rather than diffing.

use std::io::Write;

use serde::Serialize;

use crate::config::FlagConfig;
use crate::country::{flag_url, CountryRecord};
use crate::error::Result;
use crate::favourites::Favourites;
use crate::view::Status;

/// Shown when no country passes the filter.
pub const NO_MATCHES: &str = "No matches found.";

/// Output format for rendered lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One card per country.
    #[default]
    Cards,
    /// One row per country.
    Table,
    /// A JSON array of cards.
    Json,
}

/// Receives the visible list and status changes.
pub trait Renderer {
    /// Redraw the visible list.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    fn render(&mut self, countries: &[&CountryRecord], favourites: &Favourites) -> Result<()>;

    /// Report a status change.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    fn status(&mut self, status: &Status) -> Result<()>;
}

/// Everything shown for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Country name.
    pub name: String,
    /// Two-letter code.
    pub code: String,
    /// Flag image URL.
    pub flag_url: String,
    /// Region.
    pub region: String,
    /// Capital(s).
    pub capital: String,
    /// Population count.
    pub population: u64,
    /// Whether the country is a favourite.
    pub favourite: bool,
}

impl Card {
    /// Build the card for `country`.
    #[must_use]
    pub fn new(country: &CountryRecord, favourites: &Favourites, flags: &FlagConfig) -> Self {
        Self {
            name: country.name.clone(),
            code: country.code.clone(),
            flag_url: flag_url(flags, &country.code),
            region: country.region.clone(),
            capital: country.capital.clone(),
            population: country.population,
            favourite: favourites.contains(&country.code),
        }
    }

    /// Label of the favourite toggle.
    #[must_use]
    pub fn action_label(&self) -> &'static str {
        if self.favourite {
            "Remove favourite"
        } else {
            "Add favourite"
        }
    }

    /// Badge shown next to the toggle.
    #[must_use]
    pub fn badge(&self) -> &'static str {
        if self.favourite {
            "Favourite"
        } else {
            "Country"
        }
    }
}

/// Format a count with thousands separators (`1234567` -> `1,234,567`).
#[must_use]
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Renders to any [`Write`] in one of the supported [`Format`]s.
#[derive(Debug)]
pub struct WriterRenderer<W> {
    out: W,
    format: Format,
    flags: FlagConfig,
}

impl<W: Write> WriterRenderer<W> {
    /// Render to `out`.
    pub fn new(out: W, format: Format, flags: FlagConfig) -> Self {
        Self { out, format, flags }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_cards(&mut self, cards: &[Card]) -> Result<()> {
        for card in cards {
            writeln!(self.out, "{} [{}]  ({})", card.name, card.code, card.badge())?;
            writeln!(self.out, "  Flag:       {}", card.flag_url)?;
            writeln!(self.out, "  Region:     {}", card.region)?;
            writeln!(self.out, "  Capital:    {}", card.capital)?;
            writeln!(
                self.out,
                "  Population: {}",
                format_population(card.population)
            )?;
            writeln!(self.out, "  [{}]", card.action_label())?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn write_table(&mut self, cards: &[Card]) -> Result<()> {
        let width = |header: &str, cell: fn(&Card) -> usize| {
            cards.iter().map(cell).max().unwrap_or(0).max(header.len())
        };
        let name_w = width("NAME", |c| c.name.chars().count());
        let region_w = width("REGION", |c| c.region.chars().count());
        let capital_w = width("CAPITAL", |c| c.capital.chars().count());
        let pop_w = width("POPULATION", |c| format_population(c.population).len());

        writeln!(
            self.out,
            "CODE  {:<name_w$}  {:<region_w$}  {:<capital_w$}  {:>pop_w$}  FAV",
            "NAME", "REGION", "CAPITAL", "POPULATION"
        )?;
        for card in cards {
            writeln!(
                self.out,
                "{:<4}  {:<name_w$}  {:<region_w$}  {:<capital_w$}  {:>pop_w$}  {}",
                card.code,
                card.name,
                card.region,
                card.capital,
                format_population(card.population),
                if card.favourite { "*" } else { "" }
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for WriterRenderer<W> {
    fn render(&mut self, countries: &[&CountryRecord], favourites: &Favourites) -> Result<()> {
        let cards: Vec<Card> = countries
            .iter()
            .map(|c| Card::new(c, favourites, &self.flags))
            .collect();

        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut self.out, &cards)?;
                writeln!(self.out)?;
            }
            _ if cards.is_empty() => writeln!(self.out, "{NO_MATCHES}")?,
            Format::Cards => self.write_cards(&cards)?,
            Format::Table => self.write_table(&cards)?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn status(&mut self, status: &Status) -> Result<()> {
        // JSON output stays machine-readable; status goes to the log instead.
        if self.format != Format::Json {
            writeln!(self.out, "{status}")?;
        }
        Ok(())
    }
}
