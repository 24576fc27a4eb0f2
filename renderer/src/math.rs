//! Math helpers shared by the sampler, camera and raycaster

use glam::Vec2;

/// Wrap an integer coordinate onto `[0, dim)`, tiling the plane
#[inline]
pub fn wrap(v: i32, dim: usize) -> usize {
    v.rem_euclid(dim as i32) as usize
}

/// Floor a world coordinate to its cell index
#[inline]
pub fn cell(v: f32) -> i32 {
    libm::floorf(v) as i32
}

/// Unit vector pointing along `angle` (radians) in the ground plane
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(libm::cosf(angle), libm::sinf(angle))
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
