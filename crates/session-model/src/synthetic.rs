//! Synthetic face frames with known metrics.
//!
//! Builds full-size landmark frames whose eye aperture, head yaw and iris
//! offset come out at chosen values. Only the landmarks the engine reads
//! are placed; every other point sits at the image center.

use crate::landmark::{
    indices, LandmarkFrame, Point3, FACE_MESH_LANDMARK_COUNT, IRIS_LANDMARK_COUNT,
};

const LEFT_CHEEK_X: f64 = 0.2;
const LID_Y: f64 = 0.4;
const LEFT_EYE_INNER_X: f64 = 0.30;
const RIGHT_EYE_INNER_X: f64 = 0.60;
const EYE_WIDTH: f64 = 0.10;

/// Parameters of a synthetic face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticFace {
    /// Vertical eyelid gap.
    pub eye_aperture: f64,
    /// Head-yaw ratio; 0.5 is facing the camera.
    pub head_yaw: f64,
    /// Iris-offset ratio for both eyes. `None` builds a plain 468-point frame.
    pub iris_offset: Option<f64>,
    /// Cheek-to-cheek width. Zero yields degenerate geometry.
    pub cheek_span: f64,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self::attentive()
    }
}

impl SyntheticFace {
    /// Eyes open, facing the camera, irises centered.
    pub fn attentive() -> Self {
        Self {
            eye_aperture: 0.03,
            head_yaw: 0.5,
            iris_offset: Some(0.5),
            cheek_span: 0.6,
        }
    }

    pub fn eyes_closed() -> Self {
        Self {
            eye_aperture: 0.005,
            ..Self::attentive()
        }
    }

    pub fn turned_away() -> Self {
        Self {
            head_yaw: 0.9,
            ..Self::attentive()
        }
    }

    pub fn with_aperture(mut self, eye_aperture: f64) -> Self {
        self.eye_aperture = eye_aperture;
        self
    }

    pub fn with_yaw(mut self, head_yaw: f64) -> Self {
        self.head_yaw = head_yaw;
        self
    }

    pub fn with_iris(mut self, iris_offset: Option<f64>) -> Self {
        self.iris_offset = iris_offset;
        self
    }

    pub fn with_cheek_span(mut self, cheek_span: f64) -> Self {
        self.cheek_span = cheek_span;
        self
    }

    /// Build the landmark frame.
    pub fn build(&self) -> LandmarkFrame {
        let count = if self.iris_offset.is_some() {
            IRIS_LANDMARK_COUNT
        } else {
            FACE_MESH_LANDMARK_COUNT
        };
        let mut points = vec![Point3::new(0.5, 0.5, 0.0); count];

        points[indices::UPPER_LID] = Point3::new(0.35, LID_Y, 0.0);
        points[indices::LOWER_LID] = Point3::new(0.35, LID_Y + self.eye_aperture, 0.0);

        points[indices::LEFT_CHEEK] = Point3::new(LEFT_CHEEK_X, 0.55, 0.0);
        points[indices::RIGHT_CHEEK] = Point3::new(LEFT_CHEEK_X + self.cheek_span, 0.55, 0.0);
        points[indices::NOSE_TIP] =
            Point3::new(LEFT_CHEEK_X + self.head_yaw * self.cheek_span, 0.6, -0.05);

        points[indices::LEFT_EYE_INNER] = Point3::new(LEFT_EYE_INNER_X, LID_Y, 0.0);
        points[indices::LEFT_EYE_OUTER] = Point3::new(LEFT_EYE_INNER_X + EYE_WIDTH, LID_Y, 0.0);
        points[indices::RIGHT_EYE_INNER] = Point3::new(RIGHT_EYE_INNER_X, LID_Y, 0.0);
        points[indices::RIGHT_EYE_OUTER] = Point3::new(RIGHT_EYE_INNER_X + EYE_WIDTH, LID_Y, 0.0);

        if let Some(offset) = self.iris_offset {
            points[indices::LEFT_IRIS] =
                Point3::new(LEFT_EYE_INNER_X + offset * EYE_WIDTH, LID_Y, 0.0);
            points[indices::RIGHT_IRIS] =
                Point3::new(RIGHT_EYE_INNER_X + offset * EYE_WIDTH, LID_Y, 0.0);
        }

        LandmarkFrame::new(points)
    }
}
