#![allow(dead_code)]

use pliant::{MeshRaycaster, Plane, Ray, ScreenPoint, Vec3};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route library logs to the test harness; `RUST_LOG=pliant=trace` shows them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Orthographic camera looking down -z; the rendered mesh is treated as the z = 0 plane.
pub struct TopDown;

impl MeshRaycaster<Vec3<f32>> for TopDown {
    fn screen_ray(&self, s: ScreenPoint<f32>) -> Option<Ray<Vec3<f32>>> {
        Some(Ray::new(Vec3::new(s.x, s.y, 10.0), Vec3::new(0.0, 0.0, -1.0)))
    }

    fn intersect_mesh(&self, ray: &Ray<Vec3<f32>>) -> Option<Vec3<f32>> {
        Plane::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)).intersect_ray(ray)
    }
}

pub fn assert_near(a: Vec3<f32>, b: Vec3<f32>, eps: f32) {
    assert!(
        (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps && (a.z - b.z).abs() < eps,
        "{:?} != {:?} (eps {})",
        a,
        b,
        eps
    );
}
