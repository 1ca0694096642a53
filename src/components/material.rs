//! Per-body material and the combination rule applied when a contact is
//! created.

use specs::{Component, VecStorage};

use crate::real::Real;

/// Surface properties of a body. All fields are nonnegative; `stiffness`
/// and `damping` use `large_scalar` (see [`crate::config::PhysicsConfig`])
/// to denote "rigid" rather than a literal infinity, so the series
/// combination below stays a plain finite division.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub restitution: Real,
    pub friction: Real,
    pub stiffness: Real,
    pub damping: Real,
}

impl Component for Material {
    type Storage = VecStorage<Self>;
}

/// The combined constants used by a contact's constraint row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedMaterial {
    pub restitution: Real,
    pub friction: Real,
    pub stiffness: Real,
    pub damping: Real,
}

impl Material {
    /// Combines two materials: restitution and friction multiply,
    /// stiffness and damping combine in series unless both sides are rigid
    /// (`>= large_scalar`), in which case the combined value stays rigid.
    pub fn combine(a: &Material, b: &Material, large_scalar: Real) -> CombinedMaterial {
        let stiffness = if a.stiffness < large_scalar || b.stiffness < large_scalar {
            series(a.stiffness, b.stiffness)
        } else {
            large_scalar
        };
        let damping = if a.damping < large_scalar || b.damping < large_scalar {
            series(a.damping, b.damping)
        } else {
            large_scalar
        };
        CombinedMaterial {
            restitution: a.restitution * b.restitution,
            friction: a.friction * b.friction,
            stiffness,
            damping,
        }
    }
}

fn series(a: Real, b: Real) -> Real {
    1.0 / (1.0 / a + 1.0 / b)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    const LARGE_SCALAR: Real = 1.0e18;

    #[test]
    fn finite_stiffness_combines_in_series() {
        let a = Material { restitution: 0.5, friction: 0.4, stiffness: 100.0, damping: 10.0 };
        let b = Material { restitution: 0.8, friction: 0.5, stiffness: 300.0, damping: 30.0 };

        let combined = Material::combine(&a, &b, LARGE_SCALAR);

        assert_abs_diff_eq!(combined.restitution, 0.4, epsilon = 1.0e-6);
        assert_abs_diff_eq!(combined.friction, 0.2, epsilon = 1.0e-6);
        assert_abs_diff_eq!(combined.stiffness, series(100.0, 300.0), epsilon = 1.0e-3);
        assert_abs_diff_eq!(combined.damping, series(10.0, 30.0), epsilon = 1.0e-3);
    }

    #[test]
    fn rigid_paired_with_finite_yields_the_finite_series_value_not_rigid() {
        let rigid = Material { restitution: 1.0, friction: 1.0, stiffness: LARGE_SCALAR, damping: LARGE_SCALAR };
        let finite = Material { restitution: 0.5, friction: 0.5, stiffness: 200.0, damping: 20.0 };

        let combined = Material::combine(&rigid, &finite, LARGE_SCALAR);

        assert!(combined.stiffness < LARGE_SCALAR);
        assert_relative_eq!(combined.stiffness, series(LARGE_SCALAR, 200.0), max_relative = 1.0e-3);
    }

    #[test]
    fn both_rigid_stays_rigid() {
        let a = Material { restitution: 1.0, friction: 1.0, stiffness: LARGE_SCALAR, damping: LARGE_SCALAR };
        let b = Material { restitution: 1.0, friction: 1.0, stiffness: LARGE_SCALAR, damping: LARGE_SCALAR };

        let combined = Material::combine(&a, &b, LARGE_SCALAR);

        assert_eq!(combined.stiffness, LARGE_SCALAR);
        assert_eq!(combined.damping, LARGE_SCALAR);
    }
}
