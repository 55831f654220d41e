//! Domain models shared by both storage backends.
//!
//! These serialize to the exact JSON shapes returned by the HTTP API, so the
//! durable and ephemeral stores cannot drift apart in what clients see.

pub mod auth;
pub mod recipe;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input rejected before it reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Dietary category shared by user preferences and recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Diet {
    #[default]
    None,
    Vegan,
    Vegetarian,
    GlutenFree,
    Keto,
    Paleo,
}

impl Diet {
    pub const ALL: [Diet; 6] = [
        Diet::None,
        Diet::Vegan,
        Diet::Vegetarian,
        Diet::GlutenFree,
        Diet::Keto,
        Diet::Paleo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Diet::None => "none",
            Diet::Vegan => "vegan",
            Diet::Vegetarian => "vegetarian",
            Diet::GlutenFree => "gluten-free",
            Diet::Keto => "keto",
            Diet::Paleo => "paleo",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Diet {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Diet::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ValidationError(format!("Unknown diet '{s}'")))
    }
}

/// Trim entries, drop blanks, and remove duplicates keeping the first occurrence.
pub(crate) fn normalize_set(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        let v = v.trim();
        if !v.is_empty() && !out.iter().any(|existing| existing == v) {
            out.push(v.to_string());
        }
    }
    out
}

/// Trim entries and drop blanks, keeping order and duplicates.
pub(crate) fn normalize_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diet_round_trips_through_str() {
        for diet in Diet::ALL {
            assert_eq!(diet.as_str().parse::<Diet>(), Ok(diet));
        }
    }

    #[test]
    fn diet_serializes_kebab_case() {
        let json = serde_json::to_string(&Diet::GlutenFree).unwrap();
        assert_eq!(json, "\"gluten-free\"");
    }

    #[test]
    fn unknown_diet_is_rejected() {
        assert!("carnivore".parse::<Diet>().is_err());
        assert!("Vegan".parse::<Diet>().is_err());
    }

    #[test]
    fn normalize_set_drops_blanks_and_duplicates() {
        let out = normalize_set(vec![
            " nuts ".into(),
            "".into(),
            "dairy".into(),
            "nuts".into(),
        ]);
        assert_eq!(out, vec!["nuts", "dairy"]);
    }

    #[test]
    fn normalize_list_keeps_duplicates() {
        let out = normalize_list(vec!["Stir".into(), "  ".into(), "Stir".into()]);
        assert_eq!(out, vec!["Stir", "Stir"]);
    }
}
