//! Math utilities and types
//!
//! Provides the small set of math types a 2D scene needs. Positions keep a
//! third component so content can use it for draw ordering.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Check whether `value` lies in the closed interval `[min, max]`
    pub fn in_range(value: f32, min: f32, max: f32) -> bool {
        min <= value && value <= max
    }
}

pub use utils::{clamp, in_range};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
    }

    #[test]
    fn test_in_range_is_inclusive() {
        assert!(in_range(0.0, 0.0, 1.0));
        assert!(in_range(1.0, 0.0, 1.0));
        assert!(!in_range(1.01, 0.0, 1.0));
    }
}
