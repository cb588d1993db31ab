//! Content flags for collision filtering.

use serde::{Deserialize, Serialize};

/// What kind of volume a brush is.
///
/// Queries take a mask and skip brushes whose contents don't intersect it,
/// so the player capsule can pass through triggers and water while still
/// standing on solid ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Nothing.
    pub const EMPTY: Self = Self(0);

    /// World geometry: floors, walls, ceilings.
    pub const SOLID: Self = Self(1 << 0);

    /// Water volume. Never blocks the capsule.
    pub const WATER: Self = Self(1 << 1);

    /// Invisible wall that blocks players only.
    pub const PLAYER_CLIP: Self = Self(1 << 2);

    /// Event volume. Never blocks the capsule.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Everything that stops the player capsule and headroom probes.
    pub const MASK_PLAYER_SOLID: Self = Self(Self::SOLID.0 | Self::PLAYER_CLIP.0);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
