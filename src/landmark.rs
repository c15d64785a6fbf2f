//! Common code for detector-produced landmarks.

use nalgebra::{distance, distance_squared, Point2, Point3};

type Position = [f32; 3];

/// A collection of landmarks addressed by index.
///
/// Visibility and presence channels are allocated lazily, since only some detectors emit them.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    positions: Box<[Position]>,
    visibility: Option<Box<[f32]>>,
    presence: Option<Box<[f32]>>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len].into_boxed_slice(),
            visibility: None,
            presence: None,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        (0..self.positions.len()).map(|i| self.get(i))
    }

    pub fn get(&self, index: usize) -> Landmark {
        let mut lm = Landmark::new(self.positions[index]);
        if let Some(vis) = &self.visibility {
            lm = lm.with_visibility(vis[index]);
        }
        if let Some(pres) = &self.presence {
            lm = lm.with_presence(pres[index]);
        }
        lm
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        let len = self.positions.len();
        self.positions[index] = landmark.pos;
        if let Some(vis) = landmark.visibility {
            self.visibility.get_or_insert_with(|| vec![0.0; len].into())[index] = vis;
        }
        if let Some(pres) = landmark.presence {
            self.presence.get_or_insert_with(|| vec![0.0; len].into())[index] = pres;
        }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

impl FromIterator<Landmark> for Landmarks {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        let items = iter.into_iter().collect::<Vec<_>>();
        let mut landmarks = Landmarks::new(items.len());
        for (i, lm) in items.into_iter().enumerate() {
            landmarks.set(i, lm);
        }
        landmarks
    }
}

/// A landmark in 3D space.
///
/// X and Y are in normalized image-plane coordinates, Z is relative depth.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Landmark {
    pos: Position,
    visibility: Option<f32>,
    presence: Option<f32>,
}

impl Landmark {
    pub fn new(position: Position) -> Self {
        Self {
            pos: position,
            visibility: None,
            presence: None,
        }
    }

    pub fn with_visibility(self, visibility: f32) -> Self {
        Self {
            visibility: Some(visibility),
            ..self
        }
    }

    pub fn with_presence(self, presence: f32) -> Self {
        Self {
            presence: Some(presence),
            ..self
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }

    #[inline]
    pub fn visibility(&self) -> Option<f32> {
        self.visibility
    }

    #[inline]
    pub fn presence(&self) -> Option<f32> {
        self.presence
    }

    /// Computes the 3D Euclidean distance between `self` and `other`.
    pub fn distance_to(&self, other: &Landmark) -> f32 {
        distance(&Point3::from(self.pos), &Point3::from(other.pos))
    }

    /// Computes the squared distance between `self` and `other` in the image plane, ignoring
    /// depth.
    pub fn plane_distance_squared(&self, other: &Landmark) -> f32 {
        distance_squared(
            &Point2::new(self.x(), self.y()),
            &Point2::new(other.x(), other.y()),
        )
    }
}
