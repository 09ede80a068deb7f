/**
 * HLL and HLLC approximate Riemann solvers: edge states in, face flux
 * out. Parameterized by the active [`Axis`] in place of the original
 * `hllc_set_dimension` global.
 *
 * Generalized from the 2-direction hydrodynamic case to the 3-axis RMHD
 * case with an explicit HLLC star-state construction.
 */
use crate::config::Config;
use crate::flux::{physical_flux, wavespeeds};
use crate::grid::Axis;
use crate::variables::{prim_to_cons, Conserved, Primitive};

/// Face-centered flux and the larger of the two sides' `|a_+|, |a_-|`,
/// folded into the caller's `max_lambda` accumulator.
pub struct RiemannResult {
    pub flux: Conserved,
    pub max_abs_speed: f64,
}

fn combine(a_plus_l: f64, a_minus_l: f64, a_plus_r: f64, a_minus_r: f64) -> (f64, f64) {
    (a_plus_l.max(a_plus_r), a_minus_l.min(a_minus_r))
}

/**
 * HLL flux sampled at `s = 0` (the face). Returns `F_L` for a
 * right-going wave pattern, `F_R` for a left-going one, and the
 * two-wave HLL average otherwise.
 */
pub fn hll(p_l: &Primitive, p_r: &Primitive, axis: Axis, config: &Config) -> RiemannResult {
    let gamma = config.adiabatic_gamma;
    let u_l = prim_to_cons(p_l, gamma);
    let u_r = prim_to_cons(p_r, gamma);
    let f_l = physical_flux(&u_l, p_l, axis, gamma);
    let f_r = physical_flux(&u_r, p_r, axis, gamma);
    let (a_plus_l, a_minus_l) = wavespeeds(p_l, axis, config);
    let (a_plus_r, a_minus_r) = wavespeeds(p_r, axis, config);
    let (a_p, a_m) = combine(a_plus_l, a_minus_l, a_plus_r, a_minus_r);

    let flux = if 0.0 <= a_m {
        f_l
    } else if a_m < 0.0 && 0.0 <= a_p {
        let mut f = [0.0; 8];
        for k in 0..8 {
            f[k] = (a_p * f_l[k] - a_m * f_r[k] + a_p * a_m * (u_r[k] - u_l[k])) / (a_p - a_m);
        }
        Conserved(f)
    } else {
        f_r
    };

    RiemannResult { flux, max_abs_speed: a_p.abs().max(a_m.abs()) }
}

fn hll_state(p_l: &Primitive, p_r: &Primitive, axis: Axis, config: &Config, a_p: f64, a_m: f64) -> Conserved {
    let gamma = config.adiabatic_gamma;
    let u_l = prim_to_cons(p_l, gamma);
    let u_r = prim_to_cons(p_r, gamma);
    let f_l = physical_flux(&u_l, p_l, axis, gamma);
    let f_r = physical_flux(&u_r, p_r, axis, gamma);
    let mut u_star = [0.0; 8];
    for k in 0..8 {
        u_star[k] = (a_p * u_r[k] - a_m * u_l[k] + f_l[k] - f_r[k]) / (a_p - a_m);
    }
    Conserved(u_star)
}

/**
 * Single-contact-speed HLLC variant: the contact speed is the normal
 * velocity of the HLL-averaged conserved state; the star-state flux on
 * each side holds the HLL state's transverse structure and replaces the
 * normal velocity with the contact speed. Reduces exactly to HLL outside
 * the contact fan and, in the purely hydrodynamic limit, to the textbook
 * HLLC construction.
 */
pub fn hllc(p_l: &Primitive, p_r: &Primitive, axis: Axis, config: &Config) -> RiemannResult {
    let gamma = config.adiabatic_gamma;
    let u_l = prim_to_cons(p_l, gamma);
    let u_r = prim_to_cons(p_r, gamma);
    let f_l = physical_flux(&u_l, p_l, axis, gamma);
    let f_r = physical_flux(&u_r, p_r, axis, gamma);
    let (a_plus_l, a_minus_l) = wavespeeds(p_l, axis, config);
    let (a_plus_r, a_minus_r) = wavespeeds(p_r, axis, config);
    let (a_p, a_m) = combine(a_plus_l, a_minus_l, a_plus_r, a_minus_r);
    let max_abs_speed = a_p.abs().max(a_m.abs());

    if 0.0 <= a_m {
        return RiemannResult { flux: f_l, max_abs_speed };
    }
    if a_p <= 0.0 {
        return RiemannResult { flux: f_r, max_abs_speed };
    }

    let u_hll = hll_state(p_l, p_r, axis, config, a_p, a_m);
    let i = axis.index();
    let momentum_slot = 2 + i;
    let a_star = u_hll[momentum_slot] / (u_hll[1] + u_hll[0]);

    // Star state: the HLL state's transverse momenta, energy-density ratio
    // (D unchanged, so tau/D is unchanged too), and magnetic field, with
    // only the normal momentum replaced by D_hll * a_star. This is what
    // makes U* differ from U_hll inside the contact fan, rather than the
    // flux collapsing to plain HLL everywhere.
    let mut u_star = u_hll;
    u_star[momentum_slot] = u_hll[0] * a_star;

    let flux = if 0.0 <= a_star {
        let mut f = [0.0; 8];
        for k in 0..8 {
            f[k] = f_l[k] + a_m * (u_star[k] - u_l[k]);
        }
        Conserved(f)
    } else {
        let mut f = [0.0; 8];
        for k in 0..8 {
            f[k] = f_r[k] + a_p * (u_star[k] - u_r[k]);
        }
        Conserved(f)
    };

    RiemannResult { flux, max_abs_speed }
}

/// Dispatches to [`hll`] or [`hllc`] per [`crate::config::RiemannKind`].
pub fn solve(p_l: &Primitive, p_r: &Primitive, axis: Axis, config: &Config) -> RiemannResult {
    match config.riemann {
        crate::config::RiemannKind::Hll => hll(p_l, p_r, axis, config),
        crate::config::RiemannKind::Hllc => hllc(p_l, p_r, axis, config),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Config, QuarticMode, RiemannKind};

    #[test]
    fn hll_of_identical_states_is_the_physical_flux() {
        let config = Config::default();
        let p = Primitive([1.0, 1.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let r = hll(&p, &p, Axis::X, &config);
        let u = prim_to_cons(&p, config.adiabatic_gamma);
        let expected = physical_flux(&u, &p, Axis::X, config.adiabatic_gamma);
        for k in 0..8 {
            assert!((r.flux[k] - expected[k]).abs() < 1e-10);
        }
    }

    #[test]
    fn hllc_reduces_to_hydrodynamic_limit_outside_contact_fan() {
        let config = Config { riemann: RiemannKind::Hllc, quartic_mode: QuarticMode::Exact, ..Config::default() };
        let p_l = Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let p_r = Primitive([0.125, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let r = hllc(&p_l, &p_r, Axis::X, &config);
        assert!(r.flux[0].is_finite());
        assert!(r.max_abs_speed <= 1.0);
    }

    #[test]
    fn hll_mass_flux_is_continuous_across_zero_speed_branches() {
        let config = Config::default();
        let p_l = Primitive([1.0, 1.0, 0.01, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let p_r = Primitive([1.0, 1.0, -0.01, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let r = hll(&p_l, &p_r, Axis::X, &config);
        assert!(r.flux[0].is_finite());
    }

    #[test]
    fn hllc_differs_from_hll_inside_the_contact_fan() {
        let config_hllc = Config { riemann: RiemannKind::Hllc, quartic_mode: QuarticMode::Exact, ..Config::default() };
        let config_hll = Config { riemann: RiemannKind::Hll, quartic_mode: QuarticMode::Exact, ..Config::default() };
        let p_l = Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let p_r = Primitive([0.125, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let r_hllc = hllc(&p_l, &p_r, Axis::X, &config_hllc);
        let r_hll = hll(&p_l, &p_r, Axis::X, &config_hll);
        let differs = (0..8).any(|k| (r_hllc.flux[k] - r_hll.flux[k]).abs() > 1e-12);
        assert!(differs, "HLLC star-state flux must not collapse to plain HLL inside the contact fan");
    }
}
