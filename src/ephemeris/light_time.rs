//! Observer-relative states with light-time and stellar aberration corrections.
//!
//! All computations take place in the J2000 frame:
//!
//! * `LT` evaluates the target once at the light-time corrected epoch `et - lt`,
//! * `CN` iterates that evaluation until the light time stops changing,
//! * `+S` additionally rotates the apparent position toward the observer's velocity.
//!
//! The velocity part of corrected states is the target velocity at `et - lt` minus the
//! observer velocity at `et`; the rate of change of the light time is not accounted for.
use log::trace;
use nalgebra::{Rotation3, Unit, Vector3, Vector6};

use super::{Aberration, Body, EphemerisProvider};
use crate::{
    constants::{Second, VLIGHT},
    geofinder_errors::GeoFinderError,
};

/// Upper bound on the number of converged light-time iterations.
const MAX_LT_ITERATIONS: usize = 10;

/// Relative change of the light time below which `CN` iterations stop.
const LT_CONVERGENCE: f64 = 1e-12;

/// State of `target` relative to `observer` in J2000, corrected per `correction`.
///
/// Returns the state and the one-way light time between the two bodies.
pub fn corrected_state<E>(
    provider: &E,
    target: Body,
    et: Second,
    correction: Aberration,
    observer: Body,
) -> Result<(Vector6<f64>, Second), GeoFinderError>
where
    E: EphemerisProvider + ?Sized,
{
    let obs = provider.barycentric_state(observer, et)?;
    let geometric = provider.barycentric_state(target, et)? - obs;
    let mut lt = position_of(&geometric).norm() / VLIGHT;

    if !correction.uses_light_time() {
        return Ok((geometric, lt));
    }

    let iterations = if correction.is_converged() {
        MAX_LT_ITERATIONS
    } else {
        1
    };

    let mut relative = geometric;
    for i in 0..iterations {
        relative = provider.barycentric_state(target, et - lt)? - obs;
        let next_lt = position_of(&relative).norm() / VLIGHT;
        let delta = (next_lt - lt).abs();
        lt = next_lt;
        if correction.is_converged() && delta <= LT_CONVERGENCE * lt {
            trace!("light time converged after {} iterations: {lt} s", i + 1);
            break;
        }
    }

    if correction.uses_stellar() {
        let apparent = stellar_aberration(
            &position_of(&relative),
            &Vector3::new(obs[3], obs[4], obs[5]),
        );
        relative.fixed_rows_mut::<3>(0).copy_from(&apparent);
    }

    Ok((relative, lt))
}

/// Correct a light-time corrected position for the observer's velocity.
///
/// The position is rotated toward the observer velocity by `asin(|u × v / c|)` around
/// `u × v`, `u` being the unit line of sight.
pub fn stellar_aberration(position: &Vector3<f64>, obs_velocity: &Vector3<f64>) -> Vector3<f64> {
    let norm = position.norm();
    if norm == 0.0 {
        return *position;
    }
    let axis = (position / norm).cross(&(obs_velocity / VLIGHT));
    let sin_phi = axis.norm();
    if sin_phi == 0.0 {
        return *position;
    }
    let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), sin_phi.asin());
    rotation * position
}

fn position_of(state: &Vector6<f64>) -> Vector3<f64> {
    Vector3::new(state[0], state[1], state[2])
}
