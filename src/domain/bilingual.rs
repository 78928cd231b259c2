use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[display("fr")]
    Fr,
    #[display("ar")]
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::Ar];
}

/// A user-facing string in both site languages.
///
/// A missing locale deserializes to an empty string rather than failing, so
/// partially translated documents still load; `is_complete` reports the gap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    #[serde(default)]
    pub fr: String,
    #[serde(default)]
    pub ar: String,
}

impl BilingualText {
    pub fn new(fr: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            fr: fr.into(),
            ar: ar.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fr => &self.fr,
            Locale::Ar => &self.ar,
        }
    }

    pub fn set(&mut self, locale: Locale, value: impl Into<String>) {
        match locale {
            Locale::Fr => self.fr = value.into(),
            Locale::Ar => self.ar = value.into(),
        }
    }

    /// Returns the text for `locale`, or `fallback` when that locale is blank.
    pub fn get_or<'a>(&'a self, locale: Locale, fallback: &'a str) -> &'a str {
        let value = self.get(locale);
        if value.trim().is_empty() {
            fallback
        } else {
            value
        }
    }

    pub fn missing_locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|locale| self.get(*locale).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_locales().is_empty()
    }
}
