//! Out-of-bounds handling shared by the resampler and the convolution engine.
//!
//! An [`EdgePolicy`] is chosen once per filter invocation and passed by value
//! into the kernels.
//!
//! | policy  | out-of-range index                         |
//! |---------|--------------------------------------------|
//! | `Omit`  | no sample (transparent / skipped)          |
//! | `Clamp` | nearest valid index                        |
//! | `Wrap`  | `index mod len`, always non-negative       |
//!
//! ```rust
//! use pixfx_core::EdgePolicy;
//!
//! assert_eq!(EdgePolicy::Omit.map_index(-1, 5), None);
//! assert_eq!(EdgePolicy::Clamp.map_index(-1, 5), Some(0));
//! assert_eq!(EdgePolicy::Wrap.map_index(-1, 5), Some(4));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How a coordinate outside the raster is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgePolicy {
    /// Drop the sample: transparent black when resampling, skipped entirely
    /// when convolving.
    #[default]
    Omit,
    /// Use the nearest in-bounds row or column.
    Clamp,
    /// Tile the raster.
    Wrap,
}

impl EdgePolicy {
    /// All policies, in legacy id order.
    pub const ALL: [EdgePolicy; 3] = [EdgePolicy::Omit, EdgePolicy::Clamp, EdgePolicy::Wrap];

    /// Resolves index `i` along an axis of length `len`.
    ///
    /// In-range indices are returned unchanged for every policy. Returns
    /// `None` when the sample must be dropped, or when `len == 0`.
    #[inline]
    pub fn map_index(self, i: i64, len: u32) -> Option<u32> {
        if len == 0 {
            return None;
        }
        let n = len as i64;
        if (0..n).contains(&i) {
            return Some(i as u32);
        }
        match self {
            EdgePolicy::Omit => None,
            EdgePolicy::Clamp => Some(i.clamp(0, n - 1) as u32),
            EdgePolicy::Wrap => Some(i.rem_euclid(n) as u32),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            EdgePolicy::Omit => "omit",
            EdgePolicy::Clamp => "clamp",
            EdgePolicy::Wrap => "wrap",
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" | "zero" | "none" => Ok(EdgePolicy::Omit),
            "clamp" => Ok(EdgePolicy::Clamp),
            "wrap" | "tile" => Ok(EdgePolicy::Wrap),
            _ => Err(Error::UnknownEdgePolicy(s.to_string())),
        }
    }
}

/// Legacy numeric ids: 0 = zero/omit, 1 = clamp, 2 = wrap.
impl TryFrom<u8> for EdgePolicy {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        EdgePolicy::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| Error::UnknownEdgePolicy(id.to_string()))
    }
}
