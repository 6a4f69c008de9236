#![forbid(unsafe_code)]

//! Session configuration.
//!
//! Defaults match the reference page: gridlines on, links relative to the
//! current page, picture carried under `?picture=`.
//!
//! [`SessionConfig::from_env`] lets native hosts override the defaults:
//!
//! | Variable             | Effect                                     |
//! |----------------------|--------------------------------------------|
//! | `BITPAINT_SHOW_GRID` | `0`, `false`, `off`, `no` hide gridlines   |
//! | `BITPAINT_LINK_BASE` | base address for shareable links           |
//! | `BITPAINT_PARAM`     | query key carrying the picture             |

use crate::link::DEFAULT_PARAM_KEY;

/// Configuration for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Draw gridlines initially (default: true).
    pub show_grid: bool,
    /// Address links are built on (default: empty, giving `?picture=N`).
    pub link_base: String,
    /// Query key for the picture (default: `picture`).
    pub param_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            link_base: String::new(),
            param_key: DEFAULT_PARAM_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    /// Set the initial gridline visibility.
    #[must_use]
    pub fn with_show_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    /// Set the address links are built on.
    #[must_use]
    pub fn with_link_base(mut self, base: impl Into<String>) -> Self {
        self.link_base = base.into();
        self
    }

    /// Set the query key carrying the picture.
    #[must_use]
    pub fn with_param_key(mut self, key: impl Into<String>) -> Self {
        self.param_key = key.into();
        self
    }

    /// Defaults overridden by `BITPAINT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup("BITPAINT_SHOW_GRID") {
            config.show_grid = !is_falsy(&value);
        }
        if let Some(base) = lookup("BITPAINT_LINK_BASE") {
            config.link_base = base;
        }
        if let Some(key) = lookup("BITPAINT_PARAM").filter(|k| !k.trim().is_empty()) {
            config.param_key = key.trim().to_string();
        }
        config
    }
}

fn is_falsy(value: &str) -> bool {
    let value = value.trim();
    value == "0"
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("off")
        || value.eq_ignore_ascii_case("no")
}
