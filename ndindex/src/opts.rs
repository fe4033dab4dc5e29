use serde::Deserialize;
use serde::Serialize;

use crate::IndexError;

/// Environment variable toggling [`IndexOpts::allow_array_indices`].
pub const ALLOW_ARRAY_INDICES_ENV: &str = "NDINDEX_ALLOW_ARRAY_INDICES";

/// Environment variable setting [`IndexOpts::max_ndim`].
pub const MAX_NDIM_ENV: &str = "NDINDEX_MAX_NDIM";

/// `IndexOpts` controls how indices are validated when they are
/// expanded against a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexOpts {
    /// Accept integer and boolean array indices.
    pub allow_array_indices: bool,

    /// Fail expansion if the indexed shape, or the shape of the
    /// result, has more dimensions than this.
    pub max_ndim: Option<usize>,
}

impl IndexOpts {
    /// Accept everything that is well formed.
    pub fn lenient() -> Self {
        Self {
            allow_array_indices: true,
            max_ndim: None,
        }
    }

    /// Basic indexing only, and at most 64 dimensions.
    pub fn strict() -> Self {
        Self {
            allow_array_indices: false,
            max_ndim: Some(64),
        }
    }

    /// Start from [`IndexOpts::lenient`] and apply overrides from the
    /// environment. Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::lenient();
        if let Some(value) = lookup(ALLOW_ARRAY_INDICES_ENV) {
            match parse_bool(&value) {
                Some(allow) => opts.allow_array_indices = allow,
                None => tracing::warn!(
                    "ignoring {}={:?}: expected a boolean",
                    ALLOW_ARRAY_INDICES_ENV,
                    value
                ),
            }
        }
        if let Some(value) = lookup(MAX_NDIM_ENV) {
            match value.trim().parse::<usize>() {
                Ok(max) => opts.max_ndim = Some(max),
                Err(err) => tracing::warn!("ignoring {}={:?}: {}", MAX_NDIM_ENV, value, err),
            }
        }
        opts
    }

    pub(crate) fn check_ndim(&self, ndim: usize) -> Result<(), IndexError> {
        match self.max_ndim {
            Some(max) if ndim > max => Err(IndexError::TooManyDimensions { ndim, max }),
            _ => Ok(()),
        }
    }
}

impl Default for IndexOpts {
    fn default() -> Self {
        Self::lenient()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
