//! Collision layer bits
//!
//! Every collider carries a layer `flag` and a `mask`. Both are stored and
//! reported with each hit; overlap tests do not consult them.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Layer bits of a collider
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionLayers: u32 {
        /// Player character
        const PLAYER = 1 << 0;
        /// Hazards the player must dodge
        const ENEMY = 1 << 1;
        /// Collectibles
        const PICKUP = 1 << 2;
        /// Static scenery
        const ENVIRONMENT = 1 << 3;
    }
}

impl CollisionLayers {
    /// Whether any bit is shared with `other`
    pub fn overlaps(self, other: CollisionLayers) -> bool {
        self.intersects(other)
    }
}

// Scene files write layers as plain integers; unknown bits are kept
impl Serialize for CollisionLayers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for CollisionLayers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_bits_retain)
    }
}
