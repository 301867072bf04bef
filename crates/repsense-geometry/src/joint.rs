//! Joint measurement from landmark triples

use repsense_core::{JointAngleSample, Landmark, LandmarkFrame};

use crate::{angle_at, SidePolicy, Vec3};

/// Plane a joint angle is measured in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnglePlane {
    /// Image plane only (x, y)
    Projected,
    /// Full 3D: world landmarks when supplied, otherwise image x, y, z
    Spatial,
    /// Weighted mix, `w` is the share of the spatial angle
    Blended(f32),
}

/// Three landmarks whose middle one is the joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointAnchors {
    pub proximal: usize,
    pub joint: usize,
    pub distal: usize,
}

impl JointAnchors {
    pub const fn new(proximal: usize, joint: usize, distal: usize) -> Self {
        Self {
            proximal,
            joint,
            distal,
        }
    }
}

/// One side of a bilateral measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideReading {
    pub sample: JointAngleSample,
    /// Depth of the joint landmark, smaller is nearer the camera
    pub depth: f32,
}

/// Measure the angle at `anchors.joint`
///
/// Returns `None` if any anchor is missing from the frame, below
/// `min_visibility`, or the bones are degenerate. Confidence is the lowest
/// visibility of the three anchors.
pub fn measure_joint(
    frame: &LandmarkFrame<'_>,
    anchors: JointAnchors,
    plane: AnglePlane,
    min_visibility: f32,
) -> Option<SideReading> {
    let a = visible(frame, anchors.proximal, min_visibility)?;
    let j = visible(frame, anchors.joint, min_visibility)?;
    let b = visible(frame, anchors.distal, min_visibility)?;

    let angle = match plane {
        AnglePlane::Projected => projected_angle(a, j, b)?,
        AnglePlane::Spatial => spatial_angle(frame, anchors, a, j, b)?,
        AnglePlane::Blended(w) => {
            let w = w.clamp(0.0, 1.0);
            let flat = projected_angle(a, j, b)?;
            match spatial_angle(frame, anchors, a, j, b) {
                Some(deep) => (1.0 - w) * flat + w * deep,
                None => flat,
            }
        }
    };

    let confidence = a.visibility.min(j.visibility).min(b.visibility);
    Some(SideReading {
        sample: JointAngleSample::new(angle, confidence),
        depth: j.z,
    })
}

/// Measure both sides and reduce them with `policy`
pub fn measure_bilateral<P: SidePolicy + ?Sized>(
    frame: &LandmarkFrame<'_>,
    left: JointAnchors,
    right: JointAnchors,
    plane: AnglePlane,
    min_visibility: f32,
    policy: &P,
) -> Option<JointAngleSample> {
    policy.select(
        measure_joint(frame, left, plane, min_visibility),
        measure_joint(frame, right, plane, min_visibility),
    )
}

fn visible<'a>(frame: &LandmarkFrame<'a>, index: usize, min_visibility: f32) -> Option<&'a Landmark> {
    frame.get(index).filter(|lm| lm.is_visible(min_visibility))
}

fn projected_angle(a: &Landmark, j: &Landmark, b: &Landmark) -> Option<f32> {
    angle_at(Vec3::projected(a), Vec3::projected(j), Vec3::projected(b))
}

fn spatial_angle(
    frame: &LandmarkFrame<'_>,
    anchors: JointAnchors,
    a: &Landmark,
    j: &Landmark,
    b: &Landmark,
) -> Option<f32> {
    let world = (
        frame.world_point(anchors.proximal),
        frame.world_point(anchors.joint),
        frame.world_point(anchors.distal),
    );
    match world {
        (Some(wa), Some(wj), Some(wb)) => angle_at(
            Vec3::from_landmark(wa),
            Vec3::from_landmark(wj),
            Vec3::from_landmark(wb),
        ),
        _ => angle_at(
            Vec3::from_landmark(a),
            Vec3::from_landmark(j),
            Vec3::from_landmark(b),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHORS: JointAnchors = JointAnchors::new(0, 1, 2);

    fn bent_in_depth() -> Vec<Landmark> {
        // Straight in the image plane, bent toward the camera
        vec![
            Landmark::new(0.5, 0.2, 0.0),
            Landmark::new(0.5, 0.5, 0.0),
            Landmark::new(0.5, 0.8, -0.3),
        ]
    }

    #[test]
    fn test_projected_ignores_depth() {
        let lms = bent_in_depth();
        let frame = LandmarkFrame::new(&lms);
        let reading = measure_joint(&frame, ANCHORS, AnglePlane::Projected, 0.5).unwrap();
        assert!((reading.sample.angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_spatial_sees_depth() {
        let lms = bent_in_depth();
        let frame = LandmarkFrame::new(&lms);
        let reading = measure_joint(&frame, ANCHORS, AnglePlane::Spatial, 0.5).unwrap();
        assert!((reading.sample.angle - 135.0).abs() < 0.01);
    }

    #[test]
    fn test_blended_sits_between() {
        let lms = bent_in_depth();
        let frame = LandmarkFrame::new(&lms);
        let reading = measure_joint(&frame, ANCHORS, AnglePlane::Blended(0.5), 0.5).unwrap();
        assert!((reading.sample.angle - 157.5).abs() < 0.01);
    }

    #[test]
    fn test_world_landmarks_preferred() {
        let image = bent_in_depth();
        let world = vec![
            Landmark::new(0.0, 0.0, 0.0),
            Landmark::new(0.0, 0.4, 0.0),
            Landmark::new(0.4, 0.4, 0.0),
        ];
        let frame = LandmarkFrame::with_world(&image, &world);
        let reading = measure_joint(&frame, ANCHORS, AnglePlane::Spatial, 0.5).unwrap();
        assert!((reading.sample.angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_low_visibility_rejected() {
        let mut lms = bent_in_depth();
        lms[1].visibility = 0.2;
        let frame = LandmarkFrame::new(&lms);
        assert!(measure_joint(&frame, ANCHORS, AnglePlane::Projected, 0.5).is_none());
    }

    #[test]
    fn test_short_frame_rejected() {
        let lms = vec![Landmark::new(0.0, 0.0, 0.0); 2];
        let frame = LandmarkFrame::new(&lms);
        assert!(measure_joint(&frame, ANCHORS, AnglePlane::Projected, 0.5).is_none());
    }

    #[test]
    fn test_confidence_is_min_visibility() {
        let mut lms = bent_in_depth();
        lms[0].visibility = 0.9;
        lms[1].visibility = 0.7;
        lms[2].visibility = 0.8;
        let frame = LandmarkFrame::new(&lms);
        let reading = measure_joint(&frame, ANCHORS, AnglePlane::Projected, 0.5).unwrap();
        assert!((reading.sample.confidence - 0.7).abs() < 1e-6);
    }
}
