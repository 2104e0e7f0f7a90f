use std::ops::Mul;

/// Column-major 4x4 matrix, laid out the way `glUniformMatrix4fv` expects
/// with `transpose = false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    /// Elements; column `c`, row `r` lives at `c * 4 + r`
    pub data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    /// The identity matrix.
    #[rustfmt::skip]
    pub const IDENTITY: Mat4 = Mat4 {
        data: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// A 2D scale followed by a translation: `p * scale + translation`.
    #[must_use]
    pub fn translate_scale(translation: (f32, f32), scale: (f32, f32)) -> Self {
        let mut m = Self::IDENTITY;
        m.data[0] = scale.0;
        m.data[5] = scale.1;
        m.data[12] = translation.0;
        m.data[13] = translation.1;
        m
    }

    /// Applies the matrix to the point `(x, y, 0, 1)`.
    #[must_use]
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.data;
        (m[0] * x + m[4] * y + m[12], m[1] * x + m[5] * y + m[13])
    }
}

/// The product `self × rhs`; applied to a point, `rhs` acts first.
impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut data = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                data[col * 4 + row] = (0..4)
                    .map(|k| self.data[k * 4 + row] * rhs.data[col * 4 + k])
                    .sum();
            }
        }
        Mat4 { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_neutral() {
        let m = Mat4::translate_scale((0.5, -0.25), (2.0, 3.0));
        assert_eq!(Mat4::IDENTITY * m, m);
        assert_eq!(m * Mat4::IDENTITY, m);
    }

    #[test]
    fn test_translate_scale_layout() {
        let m = Mat4::translate_scale((0.5, -0.25), (2.0, 3.0));
        assert_eq!(m.data[0], 2.0);
        assert_eq!(m.data[5], 3.0);
        assert_eq!(m.data[12], 0.5);
        assert_eq!(m.data[13], -0.25);
        assert_eq!(m.transform_point(1.0, 1.0), (2.5, 2.75));
    }

    #[test]
    fn test_product_applies_right_operand_first() {
        let scale = Mat4::translate_scale((0.0, 0.0), (2.0, 2.0));
        let shift = Mat4::translate_scale((1.0, 1.0), (1.0, 1.0));

        // shift, then scale
        assert_eq!((scale * shift).transform_point(0.0, 0.0), (2.0, 2.0));
        // scale, then shift
        assert_eq!((shift * scale).transform_point(0.0, 0.0), (1.0, 1.0));
    }
}
