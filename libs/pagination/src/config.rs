//! Page size limits.

use crate::error::{ConfigError, RequestError};

/// Page size used when a request does not ask for one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Largest page size a request may ask for.
pub const MAX_LIMIT: u32 = 100;

const DEFAULT_LIMIT_VAR: &str = "NIMBLE_PAGE_DEFAULT_LIMIT";
const MAX_LIMIT_VAR: &str = "NIMBLE_PAGE_MAX_LIMIT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl PaginationConfig {
    /// Loads limits from `NIMBLE_PAGE_DEFAULT_LIMIT` and `NIMBLE_PAGE_MAX_LIMIT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads limits through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &'static str, default: u32| -> Result<u32, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(value) => match value.trim().parse::<u32>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ConfigError::InvalidValue { var, value }),
                },
            }
        };

        let max_limit = read(MAX_LIMIT_VAR, MAX_LIMIT)?;
        let default_limit = read(DEFAULT_LIMIT_VAR, DEFAULT_LIMIT.min(max_limit))?;

        if default_limit > max_limit {
            return Err(ConfigError::DefaultExceedsMax {
                default_limit,
                max_limit,
            });
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Resolves a requested page size.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn resolve_limit(&self, requested: Option<i64>) -> Result<usize, RequestError> {
        let Some(requested) = requested else {
            return Ok(self.default_limit as usize);
        };

        if requested < 1 || requested > i64::from(self.max_limit) {
            return Err(RequestError::InvalidLimit {
                requested,
                max: self.max_limit,
            });
        }

        Ok(requested as usize)
    }
}
