//! UI locale handling for `Accept-Language`.

use serde::Serialize;

use crate::config::env::EnvSource;

/// A language tag such as `en-US`. The empty tag is the invariant locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// The invariant locale: no UI language configured.
    pub const fn invariant() -> Self {
        Self(String::new())
    }

    /// Create a locale from a BCP 47 style tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into().trim().to_string())
    }

    /// Convert a POSIX locale (`en_US.UTF-8@euro`) into a tag (`en-US`).
    ///
    /// `C`, `POSIX` and empty values map to the invariant locale.
    pub fn from_posix(value: &str) -> Self {
        let base = value
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();
        match base {
            "" | "C" | "POSIX" => Self::invariant(),
            tag => Self(tag.replace('_', "-")),
        }
    }

    /// The current UI locale, taken from `LC_ALL`, `LC_MESSAGES` then `LANG`.
    pub fn current_ui(env: &dyn EnvSource) -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| env.var(key))
            .find(|value| !value.trim().is_empty())
            .map(|value| Self::from_posix(&value))
            .unwrap_or_else(Self::invariant)
    }

    pub fn is_invariant(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
