use nalgebra::Vector3;

// A non-negative function defined on the surface of a sphere `S`, parameterized by the
// polar angle theta (from +z) and the azimuth phi (from +x towards +y).
pub trait SphericalFunction {
    fn lookup(&self, theta: f32, phi: f32) -> f32;
    fn lookup_vec(&self, vec: Vector3<f32>) -> f32 {
        let r = vec.magnitude();
        if r == 0. {
            return 0.;
        }
        let theta = (vec.z / r).max(-1.).min(1.).acos();
        let phi = f32::atan2(vec.y, vec.x).rem_euclid(2. * std::f32::consts::PI);
        self.lookup(theta, phi)
    }
}

pub trait SphericalFunctionHelper {
    fn lookup_many(&self, items: impl Iterator<Item = (f32, f32)>) -> Vec<f32>;
}

impl<T: SphericalFunction> SphericalFunctionHelper for T {
    fn lookup_many(&self, items: impl Iterator<Item = (f32, f32)>) -> Vec<f32> {
        items.map(|(theta, phi)| self.lookup(theta, phi)).collect()
    }
}
