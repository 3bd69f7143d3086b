//! Geolocation bitmap.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported-region flags encoded as a 64-bit bitmap.
///
/// A provider can serve a client when the bitwise AND of their bitmaps is
/// non-empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geolocation(pub u64);

impl Geolocation {
    /// Every region bit set.
    pub const GLOBAL: Self = Self(u64::MAX);

    /// No region bits set.
    pub const NONE: Self = Self(0);

    /// Whether two bitmaps share at least one region.
    pub fn overlaps(&self, other: Geolocation) -> bool {
        self.0 & other.0 != 0
    }

    /// The raw bitmap.
    pub fn bits(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Geolocation {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Geolocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Geolocation({:#b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Geolocation(0b0101);
        let b = Geolocation(0b0100);
        let c = Geolocation(0b0010);
        assert!(a.overlaps(b));
        assert!(!a.overlaps(c));
        assert!(!Geolocation::NONE.overlaps(Geolocation::GLOBAL));
    }
}
