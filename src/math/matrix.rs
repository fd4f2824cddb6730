use super::Vec3;

/// 4x4 matrix for instance transforms (column-major for WebGL)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[12] = x;
        m.data[13] = y;
        m.data[14] = z;
        m
    }

    /// Translation * rotation(Euler XYZ) * scale, the same composition
    /// order a scene-graph node uses for its local matrix.
    pub fn compose(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let (a, b) = (rotation.x.cos(), rotation.x.sin());
        let (c, d) = (rotation.y.cos(), rotation.y.sin());
        let (e, f) = (rotation.z.cos(), rotation.z.sin());

        let ae = a * e;
        let af = a * f;
        let be = b * e;
        let bf = b * f;

        Self {
            data: [
                c * e * scale.x,
                (af + be * d) * scale.x,
                (bf - ae * d) * scale.x,
                0.0,
                -c * f * scale.y,
                (ae - bf * d) * scale.y,
                (be + af * d) * scale.y,
                0.0,
                d * scale.z,
                -b * c * scale.z,
                a * c * scale.z,
                0.0,
                position.x,
                position.y,
                position.z,
                1.0,
            ],
        }
    }

    /// Rotation taking direction `from` onto direction `to`.
    ///
    /// Degenerate input (zero-length or non-finite vectors) yields the
    /// identity so NaN never reaches an instance transform.
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let (from, to) = match (from.try_normalize(), to.try_normalize()) {
            (Some(f), Some(t)) => (f, t),
            _ => return Self::identity(),
        };

        let c = from.dot(&to);
        if c < -1.0 + 1e-6 {
            // Opposite directions: half turn about any axis orthogonal to `from`
            let axis = if from.x.abs() > from.z.abs() {
                Vec3::new(-from.y, from.x, 0.0)
            } else {
                Vec3::new(0.0, -from.z, from.y)
            };
            let n = match axis.try_normalize() {
                Some(n) => n,
                None => return Self::identity(),
            };
            return Self {
                data: [
                    2.0 * n.x * n.x - 1.0, 2.0 * n.x * n.y, 2.0 * n.x * n.z, 0.0,
                    2.0 * n.x * n.y, 2.0 * n.y * n.y - 1.0, 2.0 * n.y * n.z, 0.0,
                    2.0 * n.x * n.z, 2.0 * n.y * n.z, 2.0 * n.z * n.z - 1.0, 0.0,
                    0.0, 0.0, 0.0, 1.0,
                ],
            };
        }

        let v = from.cross(&to);
        let k = 1.0 / (1.0 + c);

        Self {
            data: [
                c + k * v.x * v.x,
                k * v.x * v.y + v.z,
                k * v.x * v.z - v.y,
                0.0,
                k * v.x * v.y - v.z,
                c + k * v.y * v.y,
                k * v.y * v.z + v.x,
                0.0,
                k * v.x * v.z + v.y,
                k * v.y * v.z - v.x,
                c + k * v.z * v.z,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
            ],
        }
    }

    /// Matrix multiplication
    pub fn mul(&self, other: &Mat4) -> Self {
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.data[row + k * 4] * other.data[k + col * 4];
                }
                result[row + col * 4] = sum;
            }
        }

        Self { data: result }
    }

    /// Transform a point (applies translation)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * p.x + self.data[4] * p.y + self.data[8] * p.z + self.data[12],
            self.data[1] * p.x + self.data[5] * p.y + self.data[9] * p.z + self.data[13],
            self.data[2] * p.x + self.data[6] * p.y + self.data[10] * p.z + self.data[14],
        )
    }

    /// Transform a direction (ignores translation)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * d.x + self.data[4] * d.y + self.data[8] * d.z,
            self.data[1] * d.x + self.data[5] * d.y + self.data[9] * d.z,
            self.data[2] * d.x + self.data[6] * d.y + self.data[10] * d.z,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Copy into a 16-float slot of an instance buffer
    #[inline]
    pub fn write_to(&self, out: &mut [f32]) {
        out[..16].copy_from_slice(&self.data);
    }

    pub fn as_slice(&self) -> &[f32; 16] {
        &self.data
    }
}
