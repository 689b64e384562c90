//! Built-in demo scene.
//!
//! A small analytic scene so the driver has something to render out of the
//! box: a matte sphere and a spherical lamp floating over a gradient sky.
//! Everything is closed-form; there is no acceleration structure to build.

use ember_math::{Ray, Vec3};
use ember_renderer::Scene;

const MAX_DEPTH: u32 = 4;

struct Sphere {
    center: Vec3,
    radius: f32,
    albedo: Vec3,
    emission: Vec3,
    reflectivity: f32,
}

impl Sphere {
    /// Nearest positive hit parameter, if any.
    fn hit(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t = -b - sqrt_disc;
        if t > 1e-3 {
            return Some(t);
        }
        let t = -b + sqrt_disc;
        (t > 1e-3).then_some(t)
    }
}

/// The demo scene: two spheres in front of the classic Cornell eye point.
pub struct DemoScene {
    spheres: Vec<Sphere>,
    sun_direction: Vec3,
}

impl DemoScene {
    pub fn new() -> Self {
        Self {
            spheres: vec![
                Sphere {
                    center: Vec3::new(278.0, 273.0, 100.0),
                    radius: 120.0,
                    albedo: Vec3::new(0.65, 0.35, 0.25),
                    emission: Vec3::ZERO,
                    reflectivity: 0.25,
                },
                Sphere {
                    center: Vec3::new(420.0, 450.0, -50.0),
                    radius: 60.0,
                    albedo: Vec3::ZERO,
                    emission: Vec3::new(8.0, 7.5, 6.0),
                    reflectivity: 0.0,
                },
            ],
            sun_direction: Vec3::new(-0.4, 0.8, -0.45).normalize(),
        }
    }

    fn sky(&self, ray: &Ray) -> Vec3 {
        let a = 0.5 * (ray.direction().y + 1.0);
        let white = Vec3::ONE;
        let blue = Vec3::new(0.5, 0.7, 1.0);
        white * (1.0 - a) + blue * a
    }

    fn closest_hit(&self, ray: &Ray) -> Option<(&Sphere, f32)> {
        let mut best: Option<(&Sphere, f32)> = None;
        for sphere in &self.spheres {
            if let Some(t) = sphere.hit(ray) {
                if best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((sphere, t));
                }
            }
        }
        best
    }

    fn in_shadow(&self, point: Vec3) -> bool {
        let shadow_ray = Ray::new(point, self.sun_direction);
        self.closest_hit(&shadow_ray)
            .map_or(false, |(sphere, _)| sphere.emission == Vec3::ZERO)
    }
}

impl Default for DemoScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for DemoScene {
    fn cast_ray(&self, ray: &Ray, depth: u32) -> Vec3 {
        if depth >= MAX_DEPTH {
            return Vec3::ZERO;
        }

        let Some((sphere, t)) = self.closest_hit(ray) else {
            return self.sky(ray);
        };

        if sphere.emission != Vec3::ZERO {
            return sphere.emission;
        }

        let point = ray.at(t);
        let normal = (point - sphere.center).normalize();

        // Lambert term against the fixed sun, shadowed by occluders.
        let mut radiance = Vec3::splat(0.08) * sphere.albedo;
        if !self.in_shadow(point) {
            let n_dot_l = normal.dot(self.sun_direction).max(0.0);
            radiance += sphere.albedo * n_dot_l;
        }

        // A mirror bounce so the recursion depth actually matters.
        if sphere.reflectivity > 0.0 {
            let reflected =
                ray.direction() - 2.0 * ray.direction().dot(normal) * normal;
            let bounce = Ray::new(point, reflected.normalize());
            radiance += sphere.reflectivity * self.cast_ray(&bounce, depth + 1);
        }

        radiance
    }
}
