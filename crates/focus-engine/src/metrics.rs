//! Metric extraction: one landmark frame in, three scalar signals out.
//!
//! All signals are ratios or deltas in normalized image space:
//! - **Eye aperture:** vertical gap between the upper and lower eyelid of
//!   one eye. This is a raw coordinate delta, not a scale-invariant eye
//!   aspect ratio, so its threshold depends on face size in the image.
//! - **Head yaw:** horizontal position of the nose tip between the cheeks
//!   (0.5 = facing the camera).
//! - **Iris offset:** horizontal position of each iris between its eye
//!   corners, averaged over both eyes. Only on iris-refined frames.

use serde::Serialize;

use focusguard_session_model::landmark::{indices, ExtractionError, LandmarkFrame, ReferenceSpan};

/// Scalar signals derived from one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub eye_aperture: f64,
    pub head_yaw: f64,
    pub iris_offset: Option<f64>,
}

/// Extract metrics from a frame.
///
/// Fails on missing or non-finite required landmarks and on zero-width
/// reference spans. Never returns NaN or infinite values.
pub fn extract(frame: &LandmarkFrame) -> Result<Metrics, ExtractionError> {
    for index in indices::REQUIRED {
        frame.require(index)?;
    }

    let upper = frame.require(indices::UPPER_LID)?;
    let lower = frame.require(indices::LOWER_LID)?;
    let eye_aperture = (upper.y - lower.y).abs();

    let nose = frame.require(indices::NOSE_TIP)?;
    let left_cheek = frame.require(indices::LEFT_CHEEK)?;
    let right_cheek = frame.require(indices::RIGHT_CHEEK)?;
    let head_yaw = ratio(
        nose.x - left_cheek.x,
        right_cheek.x - left_cheek.x,
        ReferenceSpan::Cheeks,
    )?;

    let iris_offset = if frame.has_iris() {
        let left = iris_ratio(
            frame,
            indices::LEFT_EYE_INNER,
            indices::LEFT_EYE_OUTER,
            indices::LEFT_IRIS,
            ReferenceSpan::LeftEye,
        )?;
        let right = iris_ratio(
            frame,
            indices::RIGHT_EYE_INNER,
            indices::RIGHT_EYE_OUTER,
            indices::RIGHT_IRIS,
            ReferenceSpan::RightEye,
        )?;
        Some((left + right) / 2.0)
    } else {
        None
    };

    Ok(Metrics {
        eye_aperture,
        head_yaw,
        iris_offset,
    })
}

fn iris_ratio(
    frame: &LandmarkFrame,
    inner: usize,
    outer: usize,
    iris: usize,
    span: ReferenceSpan,
) -> Result<f64, ExtractionError> {
    let inner = frame.require(inner)?;
    let outer = frame.require(outer)?;
    let iris = frame.require(iris)?;
    ratio((iris.x - inner.x).abs(), (outer.x - inner.x).abs(), span)
}

fn ratio(numerator: f64, denominator: f64, span: ReferenceSpan) -> Result<f64, ExtractionError> {
    let value = numerator / denominator;
    if denominator == 0.0 || !value.is_finite() {
        return Err(ExtractionError::DegenerateGeometry { span });
    }
    Ok(value)
}
