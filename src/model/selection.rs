use nalgebra::{Matrix4, Point2, Point3};

use super::body::BodyID;
use super::motion::BodyPose;

/// Converts a position in canvas pixels (origin top-left, y down) to normalized
/// device coordinates (origin center, y up). A zero-sized canvas (minimized
/// window) is treated as one pixel across.
pub fn pixel_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Point2<f32> {
    let ndc_x = (x / width.max(1) as f64) * 2.0 - 1.0;
    let ndc_y = 1.0 - (y / height.max(1) as f64) * 2.0;
    Point2::new(ndc_x as f32, ndc_y as f32)
}

/// Where a world-space point lands on screen, or `None` if it's behind the camera.
pub fn project_to_ndc(view_proj: &Matrix4<f32>, point: &Point3<f32>) -> Option<Point2<f32>> {
    let clip = view_proj * point.to_homogeneous();
    if clip.w <= 0.0 {
        return None;
    }
    Some(Point2::new(clip.x / clip.w, clip.y / clip.w))
}

/// Finds the body whose center lands closest to the click, as long as it's
/// within `threshold` (in NDC units). There are only a handful of bodies, so we
/// just check all of them.
pub fn detect_body_at_position(
    poses: &[BodyPose],
    view_proj: &Matrix4<f32>,
    click: Point2<f32>,
    threshold: f32,
) -> Option<BodyID> {
    poses
        .iter()
        .filter_map(|pose| {
            let position: Point3<f32> = nalgebra::convert(pose.position);
            let ndc = project_to_ndc(view_proj, &position)?;
            Some((pose.id, nalgebra::distance(&ndc, &click)))
        })
        .filter(|&(_, dist)| dist < threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}
