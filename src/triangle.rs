use crate::math::vec3::Vec3;

/// Three points forming one triangle of a triangulated polygon.
///
/// After [`Triangle::sort_by_y`] the points are in non-decreasing Y order,
/// which is what the scanline fill expects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec3; 3],
}

impl Triangle {
    pub const fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self {
            points: [p1, p2, p3],
        }
    }

    pub fn p1(&self) -> Vec3 {
        self.points[0]
    }

    pub fn p2(&self) -> Vec3 {
        self.points[1]
    }

    pub fn p3(&self) -> Vec3 {
        self.points[2]
    }

    /// Reorders the points so that `p1.y <= p2.y <= p3.y`.
    ///
    /// Three comparisons suffice for 3 elements (bubble sort).
    pub fn sort_by_y(&mut self) {
        let [v0, v1, v2] = &mut self.points;
        if v1.y < v0.y {
            std::mem::swap(v0, v1);
        }
        if v2.y < v1.y {
            std::mem::swap(v1, v2);
        }
        if v1.y < v0.y {
            std::mem::swap(v0, v1);
        }
    }

    /// Returns a copy with the points sorted by Y.
    pub fn sorted_by_y(mut self) -> Self {
        self.sort_by_y();
        self
    }

    /// Cross product of the edges `p1 -> p2` and `p1 -> p3`. Not normalized.
    pub fn normal(&self) -> Vec3 {
        let e1 = self.p2() - self.p1();
        let e2 = self.p3() - self.p1();
        e1.cross(e2)
    }

    /// A triangle faces the viewer when its normal has a positive component
    /// along `eye`. Degenerate triangles are never front-facing.
    pub fn is_front_facing(&self, eye: Vec3) -> bool {
        self.normal().dot(eye) > 0.0
    }

    /// Signed area of the XY projection; positive for counter-clockwise order.
    pub fn signed_area_2d(&self) -> f32 {
        (self.p2() - self.p1()).cross_2d(self.p3() - self.p1()) / 2.0
    }
}
