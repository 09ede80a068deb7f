/**
 * Physical MHD flux vector along a chosen axis, and the fastest
 * left/right characteristic signal speeds from the roots of the quartic
 * wave-phase polynomial.
 *
 * Generalized from a two-cardinal-direction (radial, polar) dispatch to
 * the three Cartesian axes used by the RMHD core, and replaces a
 * mutated-global axis selection with an explicit [`Axis`] parameter.
 */
use crate::config::{Config, QuarticMode};
use crate::eos;
use crate::grid::Axis;
use crate::quartic;
use crate::variables::{Conserved, Primitive};

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

struct FluidFrame {
    w: f64,
    b0: f64,
    b_fluid: [f64; 3],
    b2_fluid: f64,
    p_star: f64,
    enthalpy: f64,
}

fn fluid_frame(p: &Primitive, gamma_law_index: f64) -> FluidFrame {
    let v = p.velocity();
    let b = p.magnetic_field();
    let v2 = dot(v, v);
    let b2 = dot(b, b);
    let bv = dot(b, v);
    let w = 1.0 / (1.0 - v2).sqrt();
    let b0 = w * bv;
    let b2_fluid = (b2 + b0 * b0) / (w * w);
    let b_fluid = [
        (b[0] + b0 * w * v[0]) / w,
        (b[1] + b0 * w * v[1]) / w,
        (b[2] + b0 * w * v[2]) / w,
    ];
    let enthalpy = eos::specific_enthalpy(p.density(), p.pressure(), gamma_law_index);
    let p_star = p.pressure() + 0.5 * b2_fluid;
    FluidFrame { w, b0, b_fluid, b2_fluid, p_star, enthalpy }
}

/// Physical flux vector `F(U, P)` along `axis`.
pub fn physical_flux(u: &Conserved, p: &Primitive, axis: Axis, gamma_law_index: f64) -> Conserved {
    let frame = fluid_frame(p, gamma_law_index);
    let v = p.velocity();
    let b = p.magnetic_field();
    let i = axis.index();
    let vi = v[i];
    let bi = b[i];

    let f_d = u.mass_density() * vi;
    let f_tau = u.energy() * vi - frame.b0 * bi / frame.w + frame.p_star * vi;

    let mut f_s = [0.0; 3];
    for (j, f_sj) in f_s.iter_mut().enumerate() {
        let delta_ij = if i == j { 1.0 } else { 0.0 };
        *f_sj = u.momentum()[j] * vi - frame.b_fluid[j] * bi / frame.w + frame.p_star * delta_ij;
    }

    let mut f_b = [0.0; 3];
    for (j, f_bj) in f_b.iter_mut().enumerate() {
        *f_bj = if i == j { 0.0 } else { vi * b[j] - v[j] * bi };
    }

    Conserved([f_d, f_tau, f_s[0], f_s[1], f_s[2], f_b[0], f_b[1], f_b[2]])
}

fn quartic_coefficients(p: &Primitive, frame: &FluidFrame, axis: Axis, gamma_law_index: f64) -> (f64, f64, f64, f64, f64) {
    let v = p.velocity();
    let i = axis.index();
    let vi = v[i];
    let bi = frame.b_fluid[i];
    let w = frame.w;
    let w2 = w * w;
    let w4 = w2 * w2;
    let rho = p.density();
    let cs2 = eos::sound_speed_squared(rho, p.pressure(), gamma_law_index);

    let k = rho * frame.enthalpy * (1.0 / cs2 - 1.0) * w4;
    let l = -(rho * frame.enthalpy + frame.b2_fluid / cs2) * w2;

    let a4 = k - l - frame.b0 * frame.b0;
    let a3 = -4.0 * k * vi + 2.0 * l * vi + 2.0 * frame.b0 * bi;
    let a2 = 6.0 * k * vi * vi + l * (1.0 - vi * vi) + frame.b0 * frame.b0 - bi * bi;
    let a1 = -4.0 * k * vi.powi(3) - 2.0 * l * vi - 2.0 * frame.b0 * bi;
    let a0 = k * vi.powi(4) + l * vi * vi + bi * bi;

    (a4, a3, a2, a1, a0)
}

/// Fastest right- (`a_plus`) and left- (`a_minus`) going signal speeds
/// along `axis`. Any root with `|a| > 1` is replaced by the light-speed
/// cone `(-1, 1)`. Returns the pair to fold into the caller's
/// `max_lambda` accumulator.
pub fn wavespeeds(p: &Primitive, axis: Axis, config: &Config) -> (f64, f64) {
    let frame = fluid_frame(p, config.adiabatic_gamma);

    let (a_plus, a_minus) = match config.quartic_mode {
        QuarticMode::None => (1.0, -1.0),
        mode => {
            let (a4, a3, a2, a1, a0) = quartic_coefficients(p, &frame, axis, config.adiabatic_gamma);
            match mode {
                QuarticMode::Exact => {
                    let roots = quartic::solve_quartic(a4, a3, a2, a1, a0);
                    match (roots.max(), roots.min()) {
                        (Some(hi), Some(lo)) => (hi, lo),
                        _ => (1.0, -1.0),
                    }
                }
                QuarticMode::Approx1 => quartic::approx_roots(a4, a3, a2, a1, a0, 3),
                QuarticMode::Approx2 => quartic::approx_roots(a4, a3, a2, a1, a0, 8),
                QuarticMode::None => unreachable!(),
            }
        }
    };

    let a_plus = if a_plus.abs() > 1.0 { 1.0 } else { a_plus };
    let a_minus = if a_minus.abs() > 1.0 { -1.0 } else { a_minus };
    (a_plus, a_minus)
}

/// Flux vector and signal speeds together, as the original
/// `rmhd_flux_and_eval` entry point did.
pub fn flux_and_wavespeeds(u: &Conserved, p: &Primitive, axis: Axis, config: &Config) -> (Conserved, f64, f64) {
    let f = physical_flux(u, p, axis, config.adiabatic_gamma);
    let (a_plus, a_minus) = wavespeeds(p, axis, config);
    (f, a_plus, a_minus)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::variables::prim_to_cons;

    #[test]
    fn wavespeeds_are_clamped_to_light_cone() {
        let config = Config::default();
        let p = Primitive([1.0, 1.0, 0.3, 0.0, 0.0, 0.5, 1.0, 0.0]);
        let (a_plus, a_minus) = wavespeeds(&p, Axis::X, &config);
        assert!(a_plus <= 1.0 && a_plus >= -1.0);
        assert!(a_minus <= 1.0 && a_minus >= -1.0);
        assert!(a_minus <= a_plus);
    }

    #[test]
    fn flux_of_static_uniform_field_has_no_mass_flux() {
        let config = Config::default();
        let p = Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let u = prim_to_cons(&p, config.adiabatic_gamma);
        let f = physical_flux(&u, &p, Axis::X, config.adiabatic_gamma);
        assert_eq!(f[0], 0.0);
    }

    #[test]
    fn none_mode_returns_light_cone_directly() {
        let config = Config { quartic_mode: QuarticMode::None, ..Config::default() };
        let p = Primitive([1.0, 1.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(wavespeeds(&p, Axis::X, &config), (1.0, -1.0));
    }
}
