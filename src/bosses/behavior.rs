//! Bosses domain: the closed set of schedulable boss actions.

use std::fmt;
use std::str::FromStr;

/// One schedulable boss action. Names match the identifiers used in boss data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BehaviorTag {
    SummonMinions,
    ShootProjectiles,
    SpreadShot,
    HomingProjectile,
    LaserBeam,
    AggressiveAttack,
    EncryptedComputation,
    Reposition,
}

impl BehaviorTag {
    pub const ALL: [BehaviorTag; 8] = [
        BehaviorTag::SummonMinions,
        BehaviorTag::ShootProjectiles,
        BehaviorTag::SpreadShot,
        BehaviorTag::HomingProjectile,
        BehaviorTag::LaserBeam,
        BehaviorTag::AggressiveAttack,
        BehaviorTag::EncryptedComputation,
        BehaviorTag::Reposition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorTag::SummonMinions => "summonMinions",
            BehaviorTag::ShootProjectiles => "shootProjectiles",
            BehaviorTag::SpreadShot => "spreadShot",
            BehaviorTag::HomingProjectile => "homingProjectile",
            BehaviorTag::LaserBeam => "laserBeam",
            BehaviorTag::AggressiveAttack => "aggressiveAttack",
            BehaviorTag::EncryptedComputation => "homomorphicComputation",
            BehaviorTag::Reposition => "reposition",
        }
    }
}

impl fmt::Display for BehaviorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A behavior name that is not part of [`BehaviorTag::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBehaviorTag(pub String);

impl fmt::Display for UnknownBehaviorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown behavior tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownBehaviorTag {}

impl FromStr for BehaviorTag {
    type Err = UnknownBehaviorTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BehaviorTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownBehaviorTag(s.to_string()))
    }
}
