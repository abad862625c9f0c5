use nalgebra::Point3;

/// Splits a line strip into the point pairs `GL_LINES` wants, interleaved with
/// a color per vertex: (pt, color, pt, color, ...).
pub fn strip_to_line_pairs(points: &[Point3<f32>], color: Point3<f32>) -> Vec<Point3<f32>> {
    let mut data = Vec::with_capacity(4 * points.len().saturating_sub(1));
    for pts in points.windows(2) {
        data.push(pts[0]);
        data.push(color);
        data.push(pts[1]);
        data.push(color);
    }
    data
}
