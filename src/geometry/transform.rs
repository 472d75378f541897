use nalgebra::{Matrix3, Matrix4, Vector4};

use crate::structure::coordinate::Coordinate;

/// A 4x4 homogeneous rigid transform. Primitive operations post-multiply
/// the current matrix, so composition reads left to right:
/// `identity -> translate(a) -> concat(R) -> translate(b)` applies `b`
/// first and `a` last when the result is used on a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct XForm {
    matrix: Matrix4<f64>,
}

impl Default for XForm {
    fn default() -> Self {
        XForm::new()
    }
}

impl XForm {
    pub fn new() -> XForm {
        XForm { matrix: Matrix4::identity() }
    }

    pub fn identity(&mut self) {
        self.matrix = Matrix4::identity();
    }

    pub fn translate(&mut self, t: &Coordinate) {
        let mut m = Matrix4::identity();
        m[(0, 3)] = t.x;
        m[(1, 3)] = t.y;
        m[(2, 3)] = t.z;
        self.matrix *= m;
    }

    /// Concatenate a 3x3 rotation.
    pub fn concat(&mut self, rot: &Matrix3<f64>) {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
        self.matrix *= m;
    }

    pub fn load(&mut self, matrix: Matrix4<f64>) {
        self.matrix = matrix;
    }

    pub fn current(&self) -> Matrix4<f64> {
        self.matrix
    }

    /// Rotation block of the composed transform.
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Net translation of the composed transform.
    pub fn translation(&self) -> Coordinate {
        Coordinate::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Homogeneous product with the coordinate as a 4-vector (w = 1),
    /// renormalized by w.
    pub fn transform(&self, coord: &Coordinate) -> Coordinate {
        let v = self.matrix * Vector4::new(coord.x, coord.y, coord.z, 1.0);
        let w = if v[3] != 0.0 { v[3] } else { 1.0 };
        Coordinate::new(v[0] / w, v[1] / w, v[2] / w)
    }

    pub fn is_identity(&self, tol: f64) -> bool {
        (self.matrix - Matrix4::identity()).abs().max() < tol
    }
}

#[cfg(test)]
mod transform_tests {
    use super::*;

    #[test]
    fn test_translate_then_apply() {
        let mut w = XForm::new();
        w.translate(&Coordinate::new(1.0, 2.0, 3.0));
        let p = w.transform(&Coordinate::new(0.5, 0.0, -1.0));
        assert_eq!(p, Coordinate::new(1.5, 2.0, 2.0));
    }

    #[test]
    fn test_composition_order() {
        // identity -> translate(a) -> concat(R) -> translate(b)
        // applied to p must equal a + R * (p + b)
        let rot = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let a = Coordinate::new(10.0, 0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0, 0.0);
        let mut w = XForm::new();
        w.translate(&a);
        w.concat(&rot);
        w.translate(&b);
        let p = w.transform(&Coordinate::new(1.0, 0.0, 0.0));
        // p + b = (1,1,0); R * -> (-1,1,0); + a -> (9,1,0)
        assert!(p.distance(&Coordinate::new(9.0, 1.0, 0.0)) < 1e-12);
    }

    #[test]
    fn test_identity_check() {
        let mut w = XForm::new();
        assert!(w.is_identity(1e-12));
        w.translate(&Coordinate::new(0.0, 0.0, 1e-3));
        assert!(!w.is_identity(1e-6));
    }
}
