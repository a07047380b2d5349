//! Country reference list used by country-select questions.
//!
//! The host fetches the list asynchronously; until it resolves the directory is
//! `Pending` and offers no options while still rendering the fallback glyph.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryOption {
    pub name: String,
    pub glyph: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DirectoryState {
    Pending,
    Loaded(Vec<Country>),
}

#[derive(Debug, Clone)]
pub struct CountryDirectory {
    state: DirectoryState,
    fallback_glyph: String,
}

impl CountryDirectory {
    pub fn pending(fallback_glyph: impl Into<String>) -> Self {
        Self {
            state: DirectoryState::Pending,
            fallback_glyph: fallback_glyph.into(),
        }
    }

    pub fn loaded(countries: Vec<Country>, fallback_glyph: impl Into<String>) -> Self {
        let mut directory = Self::pending(fallback_glyph);
        directory.resolve(countries);
        directory
    }

    pub fn from_json_str(data: &str, fallback_glyph: impl Into<String>) -> Result<Self> {
        let countries: Vec<Country> =
            serde_json::from_str(data).context("Failed to parse country list")?;
        Ok(Self::loaded(countries, fallback_glyph))
    }

    pub fn load<P: AsRef<Path>>(path: P, fallback_glyph: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read country list {:?}", path))?;
        Self::from_json_str(&data, fallback_glyph)
    }

    /// Completes the pending fetch. Sorted by name for display.
    pub fn resolve(&mut self, mut countries: Vec<Country>) {
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        if countries.is_empty() {
            tracing::warn!("country reference list resolved empty");
        }
        self.state = DirectoryState::Loaded(countries);
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DirectoryState::Pending)
    }

    pub fn countries(&self) -> &[Country] {
        match &self.state {
            DirectoryState::Pending => &[],
            DirectoryState::Loaded(countries) => countries,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.countries().iter().any(|country| country.name == name)
    }

    pub fn options(&self) -> Vec<CountryOption> {
        self.countries()
            .iter()
            .map(|country| CountryOption {
                name: country.name.clone(),
                glyph: self.glyph_for(country),
            })
            .collect()
    }

    /// Flag for the named country, or the fallback glyph.
    pub fn glyph(&self, name: &str) -> String {
        self.countries()
            .iter()
            .find(|country| country.name == name)
            .map(|country| self.glyph_for(country))
            .unwrap_or_else(|| self.fallback_glyph.clone())
    }

    fn glyph_for(&self, country: &Country) -> String {
        country
            .code
            .as_deref()
            .and_then(flag_from_code)
            .unwrap_or_else(|| self.fallback_glyph.clone())
    }
}

/// Regional-indicator pair for an alpha-2 code.
fn flag_from_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}
