// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Facing-side resolution from nose and ear offsets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::landmarks::{Landmark, LandmarkPoint};

/// Which side of the body faces the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingSide {
    /// The nose is horizontally closer to the left ear.
    Left,
    /// The nose is horizontally closer to the right ear.
    Right,
    /// Both ears are equally far from the nose (frontal or undecidable).
    Ambiguous,
}

impl FacingSide {
    /// Resolve the facing side from the nose and both ears.
    #[must_use]
    pub fn resolve(
        nose: &LandmarkPoint,
        left_ear: &LandmarkPoint,
        right_ear: &LandmarkPoint,
    ) -> Self {
        let left = (nose.x - left_ear.x).abs();
        let right = (nose.x - right_ear.x).abs();
        if left < right {
            Self::Left
        } else if right < left {
            Self::Right
        } else {
            Self::Ambiguous
        }
    }

    /// Limb landmarks used for angle rules on this facing side.
    ///
    /// Facing left uses the right-side limbs and vice versa. `None` when ambiguous.
    #[must_use]
    pub const fn limbs(self) -> Option<SideLimbs> {
        match self {
            Self::Left => Some(SideLimbs::RIGHT),
            Self::Right => Some(SideLimbs::LEFT),
            Self::Ambiguous => None,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Ambiguous => "ambiguous",
        }
    }
}

impl fmt::Display for FacingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One body side's limb landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideLimbs {
    pub shoulder: Landmark,
    pub elbow: Landmark,
    pub wrist: Landmark,
    pub hip: Landmark,
    pub knee: Landmark,
    pub ankle: Landmark,
}

impl SideLimbs {
    pub const LEFT: Self = Self {
        shoulder: Landmark::LeftShoulder,
        elbow: Landmark::LeftElbow,
        wrist: Landmark::LeftWrist,
        hip: Landmark::LeftHip,
        knee: Landmark::LeftKnee,
        ankle: Landmark::LeftAnkle,
    };

    pub const RIGHT: Self = Self {
        shoulder: Landmark::RightShoulder,
        elbow: Landmark::RightElbow,
        wrist: Landmark::RightWrist,
        hip: Landmark::RightHip,
        knee: Landmark::RightKnee,
        ankle: Landmark::RightAnkle,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32) -> LandmarkPoint {
        LandmarkPoint::new(x, 0.2, 1.0)
    }

    #[test]
    fn test_resolve_left_and_right() {
        assert_eq!(FacingSide::resolve(&pt(0.40), &pt(0.42), &pt(0.55)), FacingSide::Left);
        assert_eq!(FacingSide::resolve(&pt(0.40), &pt(0.55), &pt(0.42)), FacingSide::Right);
    }

    #[test]
    fn test_mirroring_flips_side() {
        let mirror = |p: LandmarkPoint| LandmarkPoint::new(1.0 - p.x, p.y, p.confidence);
        let (nose, le, re) = (pt(0.375), pt(0.5), pt(0.75));
        let side = FacingSide::resolve(&nose, &le, &re);
        // mirroring the image swaps which detector ear is which
        let mirrored = FacingSide::resolve(&mirror(nose), &mirror(re), &mirror(le));
        assert_eq!(side, FacingSide::Left);
        assert_eq!(mirrored, FacingSide::Right);
    }

    #[test]
    fn test_equal_distances_are_ambiguous() {
        assert_eq!(FacingSide::resolve(&pt(0.5), &pt(0.25), &pt(0.75)), FacingSide::Ambiguous);
        assert!(FacingSide::Ambiguous.limbs().is_none());
    }

    #[test]
    fn test_limbs_use_opposite_side() {
        assert_eq!(FacingSide::Left.limbs(), Some(SideLimbs::RIGHT));
        assert_eq!(FacingSide::Right.limbs(), Some(SideLimbs::LEFT));
    }
}
