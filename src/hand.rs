//! Typed hand landmark sets.
//!
//! The external detector outputs 21 loosely structured points per hand. This module converts
//! them into a fixed-size set addressed by [`HandLandmark`] at the boundary, so malformed
//! detections are rejected before they reach any per-frame state.

use std::fmt;

use anyhow::bail;

use crate::image::{draw, Color, Image};
use crate::landmark::{Landmark, Landmarks};

/// Classification of a detected hand as belonging to the subject's left or right hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Returns the canonical label used when handing data to the host environment.
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "LEFT_HAND",
            Side::Right => "RIGHT_HAND",
        }
    }

    /// Parses a side filter from a query string.
    ///
    /// Matching is by prefix and case-insensitive, so `"left"`, `"Left hand"` and `"LEFT_HAND"`
    /// all select [`Side::Left`].
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.trim().to_ascii_lowercase();
        if query.starts_with("left") {
            Some(Side::Left)
        } else if query.starts_with("right") {
            Some(Side::Right)
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Names for the hand landmarks, in detector output order.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// All landmarks, in detector output order.
    pub const ALL: [HandLandmark; 21] = {
        use HandLandmark::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };

    /// Returns the canonical landmark name (`"WRIST"`, `"INDEX_FINGER_TIP"`, …).
    pub fn name(self) -> &'static str {
        use HandLandmark::*;
        match self {
            Wrist => "WRIST",
            ThumbCmc => "THUMB_CMC",
            ThumbMcp => "THUMB_MCP",
            ThumbIp => "THUMB_IP",
            ThumbTip => "THUMB_TIP",
            IndexFingerMcp => "INDEX_FINGER_MCP",
            IndexFingerPip => "INDEX_FINGER_PIP",
            IndexFingerDip => "INDEX_FINGER_DIP",
            IndexFingerTip => "INDEX_FINGER_TIP",
            MiddleFingerMcp => "MIDDLE_FINGER_MCP",
            MiddleFingerPip => "MIDDLE_FINGER_PIP",
            MiddleFingerDip => "MIDDLE_FINGER_DIP",
            MiddleFingerTip => "MIDDLE_FINGER_TIP",
            RingFingerMcp => "RING_FINGER_MCP",
            RingFingerPip => "RING_FINGER_PIP",
            RingFingerDip => "RING_FINGER_DIP",
            RingFingerTip => "RING_FINGER_TIP",
            PinkyMcp => "PINKY_MCP",
            PinkyPip => "PINKY_PIP",
            PinkyDip => "PINKY_DIP",
            PinkyTip => "PINKY_TIP",
        }
    }

    /// Looks a landmark up by its canonical name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lm| lm.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for HandLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const CONNECTIVITY: &[(HandLandmark, HandLandmark)] = {
    use HandLandmark::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// The 21 landmarks of one detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    landmarks: Landmarks,
}

impl HandLandmarks {
    /// Wraps a raw landmark collection, rejecting it unless it has exactly 21 entries.
    pub fn new(landmarks: Landmarks) -> anyhow::Result<Self> {
        if landmarks.len() != HandLandmark::ALL.len() {
            bail!(
                "hand detection has {} landmarks (expected {})",
                landmarks.len(),
                HandLandmark::ALL.len(),
            );
        }
        Ok(Self { landmarks })
    }

    /// Converts raw detector positions into a typed landmark set.
    pub fn from_positions(positions: &[[f32; 3]]) -> anyhow::Result<Self> {
        Self::new(positions.iter().map(|&pos| Landmark::new(pos)).collect())
    }

    pub fn get(&self, landmark: HandLandmark) -> Landmark {
        self.landmarks.get(landmark as usize)
    }

    pub fn wrist(&self) -> Landmark {
        self.get(HandLandmark::Wrist)
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// Draws the hand skeleton onto `target`, scaling the normalized landmark coordinates to the
    /// target's resolution.
    pub fn draw(&self, target: &mut Image) {
        let width = target.width() as f32;
        let height = target.height() as f32;
        let px = |lm: Landmark| (lm.x() * width, lm.y() * height);

        for &(a, b) in CONNECTIVITY {
            draw::line(target, px(self.get(a)), px(self.get(b))).color(Color::GREEN);
        }
        for lm in self.landmarks.iter() {
            draw::marker(target, px(lm)).color(Color::RED);
        }
    }
}
