//! Marching squares over a [`ScalarField2D`].
//!
//! Produces unordered line segments; the SVG backend draws them one by one,
//! so no stitching into polylines is needed.

use meritscope_types::ScalarField2D;

/// Two endpoints `[x, y]` of one piece of a level curve
pub type Segment = [[f64; 2]; 2];

/// Segments of the level curve `z = level`.
///
/// Cells touching a NaN sample are skipped. Saddle cells are resolved with
/// the mean of the four corners.
pub fn contour_segments(field: &ScalarField2D, level: f64) -> Vec<Segment> {
    let (x, y, z) = (field.x(), field.y(), field.z());
    let (rows, cols) = field.shape();
    let mut segments = Vec::new();
    if rows < 2 || cols < 2 {
        return segments;
    }

    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            // Counter-clockwise from the lower-left corner; edge k joins
            // corner k and corner k + 1.
            let corners = [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)];
            let values = corners.map(|c| z[c] - level);
            if values.iter().any(|v| v.is_nan()) {
                continue;
            }
            let points = corners.map(|c| [x[c], y[c]]);

            let mut crossings: Vec<[f64; 2]> = Vec::with_capacity(4);
            for a in 0..4 {
                let b = (a + 1) % 4;
                let (va, vb) = (values[a], values[b]);
                if (va < 0.0) != (vb < 0.0) {
                    let t = va / (va - vb);
                    crossings.push(lerp(points[a], points[b], t));
                }
            }

            match crossings.len() {
                2 => segments.push([crossings[0], crossings[1]]),
                4 => {
                    let center = values.iter().sum::<f64>() / 4.0;
                    if (center < 0.0) == (values[0] < 0.0) {
                        // corners 1 and 3 are cut off
                        segments.push([crossings[0], crossings[1]]);
                        segments.push([crossings[2], crossings[3]]);
                    } else {
                        segments.push([crossings[3], crossings[0]]);
                        segments.push([crossings[1], crossings[2]]);
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

#[inline]
fn lerp(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]
}
