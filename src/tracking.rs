//! Per-frame tracking driven by an external detector.
//!
//! The host runs capture and detection itself and hands the results over once per rendered
//! frame. [`TrackingSession`] turns them into the annotated texture and the queryable per-side
//! state, and degrades to an empty placeholder image when the capture produced nothing.

use anyhow::Context;
use serde::Deserialize;

use crate::classifier::{HandState, Snapshot};
use crate::hand::{HandLandmarks, Side};
use crate::image::Image;
use crate::landmark::Landmark;
use crate::pose::PoseLandmarks;
use crate::timer::{FpsCounter, Timer};

/// One landmark as serialized by the detector process.
#[derive(Debug, Deserialize)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
    #[serde(default)]
    visibility: Option<f32>,
    #[serde(default)]
    presence: Option<f32>,
}

impl LandmarkJson {
    fn to_landmark(&self) -> Landmark {
        let mut lm = Landmark::new([self.x, self.y, self.z]);
        if let Some(visibility) = self.visibility {
            lm = lm.with_visibility(visibility);
        }
        if let Some(presence) = self.presence {
            lm = lm.with_presence(presence);
        }
        lm
    }
}

#[derive(Debug, Deserialize)]
struct DetectionsJson {
    #[serde(default)]
    hands: Vec<Vec<LandmarkJson>>,
    #[serde(default)]
    pose: Option<Vec<LandmarkJson>>,
}

/// The detector output for one frame: any number of hands, plus the pose if one was found.
#[derive(Debug, Default, Clone)]
pub struct FrameDetections {
    hands: Vec<HandLandmarks>,
    pose: Option<PoseLandmarks>,
}

impl FrameDetections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON a detector process emits for one frame.
    ///
    /// Expected shape: `{"hands": [[{"x":…,"y":…,"z":…}, …]], "pose": [{…}, …]}`, where both
    /// keys may be missing or empty. Malformed landmark counts are rejected.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let raw: DetectionsJson =
            serde_json::from_str(json).context("failed to parse detection results")?;

        let mut detections = Self::new();
        for hand in &raw.hands {
            let landmarks = hand.iter().map(LandmarkJson::to_landmark).collect();
            detections.push_hand(HandLandmarks::new(landmarks)?);
        }
        if let Some(pose) = &raw.pose {
            let landmarks = pose.iter().map(LandmarkJson::to_landmark).collect();
            detections.set_pose(PoseLandmarks::new(landmarks)?);
        }
        Ok(detections)
    }

    pub fn push_hand(&mut self, hand: HandLandmarks) {
        self.hands.push(hand);
    }

    pub fn set_pose(&mut self, pose: PoseLandmarks) {
        self.pose = Some(pose);
    }

    pub fn hands(&self) -> &[HandLandmarks] {
        &self.hands
    }

    pub fn pose(&self) -> Option<&PoseLandmarks> {
        self.pose.as_ref()
    }
}

/// Per-frame state for one camera feed.
///
/// Single-threaded by design: the host calls [`TrackingSession::advance`] once per frame tick
/// from its main callback and queries the session any number of times in between.
pub struct TrackingSession {
    state: HandState,
    t_update: Timer,
    t_draw: Timer,
    fps: FpsCounter,
}

impl TrackingSession {
    pub fn new() -> Self {
        Self {
            state: HandState::new(),
            t_update: Timer::new("update"),
            t_draw: Timer::new("draw"),
            fps: FpsCounter::new("tracking"),
        }
    }

    /// Processes one frame tick.
    ///
    /// Ingests `detections` into the per-side cache and returns `frame` with every detected
    /// hand's skeleton drawn on top, ready to hand to the host renderer.
    ///
    /// A missing or empty `frame` means the capture failed; the failure is logged and an empty
    /// placeholder image is returned without touching the cached state. There is no retry.
    pub fn advance(&mut self, frame: Option<Image>, detections: &FrameDetections) -> Image {
        let Some(mut image) = frame else {
            log::error!("no camera frame available, handing empty image to the host");
            return Image::empty();
        };
        if image.is_empty() {
            log::error!("camera produced an empty frame, handing it through to the host");
            return image;
        }

        self.t_update
            .time(|| self.state.update(detections.hands(), detections.pose()));
        self.t_draw.time(|| {
            for hand in detections.hands() {
                hand.draw(&mut image);
            }
        });
        self.fps.tick_with([&self.t_update, &self.t_draw]);

        image
    }

    pub fn state(&self) -> &HandState {
        &self.state
    }

    /// The labels assigned during the last frame, in detection order.
    pub fn labels(&self) -> &[Option<Side>] {
        self.state.labels()
    }

    /// See [`HandState::distance`].
    pub fn distance(&self, name_a: &str, name_b: &str, side: Option<&str>) -> f32 {
        self.state.distance(name_a, name_b, side)
    }

    /// See [`HandState::export`].
    pub fn export(&self) -> Snapshot {
        self.state.export()
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let hand = (0..21)
            .map(|i| format!(r#"{{"x": 0.{i:02}, "y": 0.5, "z": 0.0}}"#))
            .collect::<Vec<_>>()
            .join(",");
        let json = format!(r#"{{"hands": [[{hand}]]}}"#);

        let detections = FrameDetections::from_json(&json).unwrap();
        assert_eq!(detections.hands().len(), 1);
        assert!(detections.pose().is_none());
        assert_eq!(detections.hands()[0].wrist().position(), [0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_from_json_defaults() {
        let detections = FrameDetections::from_json("{}").unwrap();
        assert!(detections.hands().is_empty());
        assert!(detections.pose().is_none());
    }

    #[test]
    fn test_from_json_rejects_malformed_hand() {
        let json = r#"{"hands": [[{"x": 0.0, "y": 0.0, "z": 0.0}]]}"#;
        assert!(FrameDetections::from_json(json).is_err());
        assert!(FrameDetections::from_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_advance_without_frame_degrades() {
        let mut session = TrackingSession::new();
        let out = session.advance(None, &FrameDetections::new());
        assert!(out.is_empty());

        let out = session.advance(Some(Image::empty()), &FrameDetections::new());
        assert!(out.is_empty());
    }
}
