//! Face-mesh landmark frames.
//!
//! A frame is the full ordered point list produced by the face-landmark
//! detector for one camera image. Indices follow the MediaPipe Face Mesh
//! topology; frames with iris refinement carry ten extra points.

use serde::{Deserialize, Serialize};

/// Landmark indices used by the metric extractor.
pub mod indices {
    /// Upper eyelid of the measured eye.
    pub const UPPER_LID: usize = 159;
    /// Lower eyelid of the measured eye.
    pub const LOWER_LID: usize = 145;
    /// Nose tip.
    pub const NOSE_TIP: usize = 1;
    /// Left cheek contour.
    pub const LEFT_CHEEK: usize = 234;
    /// Right cheek contour.
    pub const RIGHT_CHEEK: usize = 454;

    /// Reference corner of the left eye for the iris ratio.
    pub const LEFT_EYE_INNER: usize = 33;
    /// Far corner of the left eye for the iris ratio.
    pub const LEFT_EYE_OUTER: usize = 133;
    /// Left iris center (refined frames only).
    pub const LEFT_IRIS: usize = 468;

    /// Reference corner of the right eye for the iris ratio.
    pub const RIGHT_EYE_INNER: usize = 362;
    /// Far corner of the right eye for the iris ratio.
    pub const RIGHT_EYE_OUTER: usize = 263;
    /// Right iris center (refined frames only).
    pub const RIGHT_IRIS: usize = 473;

    /// Landmarks that every frame must carry.
    pub const REQUIRED: [usize; 5] = [UPPER_LID, LOWER_LID, NOSE_TIP, LEFT_CHEEK, RIGHT_CHEEK];
}

/// Point count of a plain face-mesh frame.
pub const FACE_MESH_LANDMARK_COUNT: usize = 468;

/// Point count of a frame with iris refinement enabled.
pub const IRIS_LANDMARK_COUNT: usize = 478;

/// A single landmark: normalized image coordinates plus relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// One detector frame. Serialized as a bare array of `[x, y, z]` triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Point3>,
}

impl LandmarkFrame {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    pub fn point(&self, index: usize) -> Option<&Point3> {
        self.points.get(index)
    }

    /// Whether the frame carries iris refinement points.
    pub fn has_iris(&self) -> bool {
        self.points.len() >= IRIS_LANDMARK_COUNT
    }

    /// Fetch a landmark that the caller cannot do without.
    pub fn require(&self, index: usize) -> Result<&Point3, ExtractionError> {
        let point = self
            .points
            .get(index)
            .ok_or(ExtractionError::MalformedFrame {
                index,
                len: self.points.len(),
            })?;
        if !point.is_finite() {
            return Err(ExtractionError::NonFiniteLandmark { index });
        }
        Ok(point)
    }
}

/// A horizontal distance used as a ratio denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSpan {
    /// Left cheek to right cheek (head yaw).
    Cheeks,
    /// Left eye corners (iris offset).
    LeftEye,
    /// Right eye corners (iris offset).
    RightEye,
}

impl std::fmt::Display for ReferenceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cheeks => "cheek",
            Self::LeftEye => "left eye",
            Self::RightEye => "right eye",
        };
        f.write_str(name)
    }
}

/// Why a frame could not be turned into metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Malformed frame: landmark {index} missing (frame has {len} points)")]
    MalformedFrame { index: usize, len: usize },

    #[error("Malformed frame: landmark {index} has non-finite coordinates")]
    NonFiniteLandmark { index: usize },

    #[error("Degenerate geometry: {span} span has zero width")]
    DegenerateGeometry { span: ReferenceSpan },
}

/// Coarse classification of [`ExtractionError`] carried in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionErrorKind {
    MalformedFrame,
    DegenerateGeometry,
}

impl ExtractionError {
    pub fn kind(&self) -> ExtractionErrorKind {
        match self {
            Self::MalformedFrame { .. } | Self::NonFiniteLandmark { .. } => {
                ExtractionErrorKind::MalformedFrame
            }
            Self::DegenerateGeometry { .. } => ExtractionErrorKind::DegenerateGeometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_as_triple() {
        let json = serde_json::to_string(&Point3::new(0.25, 0.5, -0.01)).unwrap();
        assert_eq!(json, "[0.25,0.5,-0.01]");
    }

    #[test]
    fn test_frame_serializes_as_bare_array() {
        let frame = LandmarkFrame::new(vec![Point3::new(0.1, 0.2, 0.0)]);
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, "[[0.1,0.2,0.0]]");
        let back: LandmarkFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_require_reports_missing_index() {
        let frame = LandmarkFrame::new(vec![Point3::default(); 10]);
        let err = frame.require(indices::RIGHT_CHEEK).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MalformedFrame {
                index: indices::RIGHT_CHEEK,
                len: 10
            }
        );
        assert_eq!(err.kind(), ExtractionErrorKind::MalformedFrame);
    }

    #[test]
    fn test_require_rejects_nan() {
        let mut points = vec![Point3::default(); 3];
        points[1].x = f64::NAN;
        let frame = LandmarkFrame::new(points);
        assert!(frame.require(0).is_ok());
        assert_eq!(
            frame.require(1).unwrap_err(),
            ExtractionError::NonFiniteLandmark { index: 1 }
        );
    }

    #[test]
    fn test_iris_detection_by_count() {
        let plain = LandmarkFrame::new(vec![Point3::default(); FACE_MESH_LANDMARK_COUNT]);
        let refined = LandmarkFrame::new(vec![Point3::default(); IRIS_LANDMARK_COUNT]);
        assert!(!plain.has_iris());
        assert!(refined.has_iris());
    }

    #[test]
    fn test_degenerate_message_names_span() {
        let err = ExtractionError::DegenerateGeometry {
            span: ReferenceSpan::Cheeks,
        };
        assert_eq!(err.to_string(), "Degenerate geometry: cheek span has zero width");
        assert_eq!(err.kind(), ExtractionErrorKind::DegenerateGeometry);
    }
}
