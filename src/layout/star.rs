use std::f32::consts::{FRAC_PI_2, PI};

/// Outline of a star polygon in the XY plane, first tip pointing up.
///
/// Returns `2 * points` vertices alternating between `outer` and `inner`
/// radius; the host extrudes this into the topper mesh once at startup.
pub fn star_outline(points: usize, outer: f32, inner: f32) -> Vec<[f32; 2]> {
    if points < 2 {
        return Vec::new();
    }
    (0..points * 2)
        .map(|i| {
            let angle = i as f32 * PI / points as f32 + FRAC_PI_2;
            let r = if i % 2 == 0 { outer } else { inner };
            [angle.cos() * r, angle.sin() * r]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_point_star() {
        let outline = star_outline(5, 1.0, 0.4);
        assert_eq!(outline.len(), 10);
        assert!(outline[0][0].abs() < 1e-6);
        assert!((outline[0][1] - 1.0).abs() < 1e-6);
        for (i, [x, y]) in outline.iter().enumerate() {
            let r = (x * x + y * y).sqrt();
            let expected = if i % 2 == 0 { 1.0 } else { 0.4 };
            assert!((r - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_star() {
        assert!(star_outline(0, 1.0, 0.4).is_empty());
        assert!(star_outline(1, 1.0, 0.4).is_empty());
    }
}
