/**
 * The eight-component primitive and conserved state vectors, the
 * closed-form primitive-to-conserved map, and the 2D Newton inversion that
 * recovers primitives from conserved variables.
 *
 * Mirrors the `hydro_srhd::srhd_2d::{Primitive, Conserved}` usage pattern
 * in the relativistic hydro adapter, generalized from a 4-component
 * (rho, p, v_r, v_q) pair to the full 8-component RMHD state.
 */
use log::{debug, warn};

use crate::config::Config;
use crate::eos;
use crate::error::CellFailures;

pub const PRESSURE_FLOOR: f64 = 1e-10;
const NEWTON_MAX_ITER: u32 = 25;
const NEWTON_TOL: f64 = 1e-6;
const Z_MAX: f64 = 1e20;
const W_MIN: f64 = 1.0;
const W_MAX: f64 = 1e12;




/// Primitive state (rho, p, v_x, v_y, v_z, B_x, B_y, B_z).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Primitive(pub [f64; 8]);

/// Conserved state (D, tau, S_x, S_y, S_z, B_x, B_y, B_z).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Conserved(pub [f64; 8]);

impl std::ops::Index<usize> for Primitive {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 { &self.0[i] }
}
impl std::ops::IndexMut<usize> for Primitive {
    fn index_mut(&mut self, i: usize) -> &mut f64 { &mut self.0[i] }
}
impl std::ops::Index<usize> for Conserved {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 { &self.0[i] }
}
impl std::ops::IndexMut<usize> for Conserved {
    fn index_mut(&mut self, i: usize) -> &mut f64 { &mut self.0[i] }
}

impl Primitive {
    pub fn density(&self) -> f64 { self.0[0] }
    pub fn pressure(&self) -> f64 { self.0[1] }
    pub fn velocity(&self) -> [f64; 3] { [self.0[2], self.0[3], self.0[4]] }
    pub fn magnetic_field(&self) -> [f64; 3] { [self.0[5], self.0[6], self.0[7]] }

    pub fn velocity_squared(&self) -> f64 {
        dot(self.velocity(), self.velocity())
    }

    pub fn lorentz_factor(&self) -> f64 {
        1.0 / (1.0 - self.velocity_squared()).sqrt()
    }
}

impl Conserved {
    pub fn mass_density(&self) -> f64 { self.0[0] }
    pub fn energy(&self) -> f64 { self.0[1] }
    pub fn momentum(&self) -> [f64; 3] { [self.0[2], self.0[3], self.0[4]] }
    pub fn magnetic_field(&self) -> [f64; 3] { [self.0[5], self.0[6], self.0[7]] }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}




/**
 * Closed-form map from primitive to conserved variables. Total: no
 * failure modes. The caller must ensure `v^2 < 1` and `rho > 0`.
 */
pub fn prim_to_cons(p: &Primitive, gamma_law_index: f64) -> Conserved {
    let rho = p.density();
    let pressure = p.pressure();
    let v = p.velocity();
    let b = p.magnetic_field();

    let v2 = dot(v, v);
    let b2 = dot(b, b);
    let bv = dot(b, v);
    let w = 1.0 / (1.0 - v2).sqrt();
    let b0 = w * bv;
    let bsq_fluid = (b2 + b0 * b0) / (w * w);
    let bvec = [
        (b[0] + b0 * w * v[0]) / w,
        (b[1] + b0 * w * v[1]) / w,
        (b[2] + b0 * w * v[2]) / w,
    ];
    let e = eos::specific_internal_energy(rho, pressure, gamma_law_index);
    let p_star = pressure + 0.5 * bsq_fluid;
    let h_star = 1.0 + e + 0.5 * bsq_fluid / rho + p_star / rho;

    let d = rho * w;
    let tau = rho * h_star * w * w - p_star - b0 * b0 - d;
    let s = [
        rho * h_star * w * w * v[0] - b0 * bvec[0],
        rho * h_star * w * w * v[1] - b0 * bvec[1],
        rho * h_star * w * w * v[2] - b0 * bvec[2],
    ];

    Conserved([d, tau, s[0], s[1], s[2], b[0], b[1], b[2]])
}

/// Array-level fan-out over `prim_to_cons_point`, data-parallel when the
/// `parallel` feature is enabled.
pub fn prim_to_cons_array(p: &[Primitive], gamma_law_index: f64) -> Vec<Conserved> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        p.par_iter().map(|pi| prim_to_cons(pi, gamma_law_index)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        p.iter().map(|pi| prim_to_cons(pi, gamma_law_index)).collect()
    }
}




/// Outcome of one cell's 2D Newton conserved-to-primitive inversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recovered {
    pub primitive: Primitive,
    /// Lorentz factor cached for the 4-velocity reconstruction path.
    pub lorentz_factor: f64,
}

struct NewtonState {
    z: f64,
    w: f64,
}

fn newton_residuals(z: f64, w: f64, d: f64, tau: f64, b2: f64, s2: f64, bs2: f64, p: f64, gamma_law_index: f64) -> (f64, f64, f64, f64, f64, f64) {
    let w2 = w * w;
    let f1 = -s2 + (z + b2).powi(2) * (w2 - 1.0) / w2 - (2.0 * z + b2) * bs2 / (z * z);
    let f2 = -tau + z + b2 - p - 0.5 * b2 / w2 - 0.5 * bs2 / (z * z) - d;

    let df1_dz = 2.0 * (b2 + z) * (bs2 * w2 + (w2 - 1.0) * z.powi(3)) / (w2 * z.powi(3));
    let df1_dw = 2.0 * (b2 + z).powi(2) / w.powi(3);
    let df2_dz = 1.0 + bs2 / z.powi(3) - (gamma_law_index - 1.0) / (gamma_law_index * w2);
    let df2_dw = b2 / w.powi(3) + (2.0 * z - d * w) * (gamma_law_index - 1.0) / (gamma_law_index * w.powi(3));

    (f1, f2, df1_dz, df1_dw, df2_dz, df2_dw)
}

fn pressure_of(z: f64, w: f64, d: f64, gamma_law_index: f64) -> f64 {
    (d / w) * (z / (d * w) - 1.0) * (gamma_law_index - 1.0) / gamma_law_index
}

/// Note that `f1` uses `(B.S)^2` where `bs2` here is `(B.S)^2` directly,
/// matching the residual formulas of the 2D Newton scheme verbatim.
fn newton_step(state: &mut NewtonState, d: f64, tau: f64, b2: f64, s2: f64, bs2: f64, gamma_law_index: f64, p_floor_engaged: bool) -> (f64, f64) {
    let p = if p_floor_engaged {
        PRESSURE_FLOOR
    } else {
        pressure_of(state.z, state.w, d, gamma_law_index)
    };
    let (f1, f2, df1_dz, df1_dw, df2_dz, df2_dw) = newton_residuals(state.z, state.w, d, tau, b2, s2, bs2, p, gamma_law_index);

    let det = df1_dz * df2_dw - df1_dw * df2_dz;
    let dz = (f1 * df2_dw - df1_dw * f2) / det;
    let dw = (df1_dz * f2 - f1 * df2_dz) / det;

    let mut z_new = state.z - dz;
    if z_new <= 0.0 {
        z_new = -z_new;
    }
    if z_new >= Z_MAX {
        z_new = state.z;
    }
    let mut w_new = state.w - dw;
    if w_new < W_MIN {
        w_new = W_MIN;
    }
    if w_new > W_MAX {
        w_new = W_MAX;
    }

    let rel = (dz / state.z).abs() + (dw / state.w).abs();
    state.z = z_new;
    state.w = w_new;
    (f1, rel)
}

fn seed(u: &Conserved, guess: &Primitive, use_estimate: bool) -> NewtonState {
    if use_estimate {
        let d = u.mass_density();
        let s2 = dot(u.momentum(), u.momentum());
        let w = (s2 / (d * d) + 1.0).sqrt();
        NewtonState { z: d * w, w }
    } else {
        let w = guess.lorentz_factor();
        let z = guess.density() * w;
        NewtonState { z, w }
    }
}

/**
 * Inverts conserved variables to primitives at a single cell via the 2D
 * Newton iteration in (Z, W) = (rho h W^2, W). Returns `Ok` with the
 * recovered state on convergence, `Err` if the Newton loop fails even
 * after engaging the pressure floor and restarting once.
 */
pub fn cons_to_prim(u: &Conserved, guess: &Primitive, config: &Config) -> Result<Recovered, ()> {
    let d = u.mass_density();
    let tau = u.energy();
    let s = u.momentum();
    let b = u.magnetic_field();
    let b2 = dot(b, b);
    let s2 = dot(s, s);
    let bs2 = dot(b, s).powi(2);
    let gamma_law_index = config.adiabatic_gamma;

    let mut floor_engaged = false;

    'restart: loop {
        let mut state = seed(u, guess, config.cons_to_prim_use_estimate);
        for iter in 0..NEWTON_MAX_ITER {
            let (f1, rel) = newton_step(&mut state, d, tau, b2, s2, bs2, gamma_law_index, floor_engaged);
            if rel < NEWTON_TOL {
                let mut p = pressure_of(state.z, state.w, d, gamma_law_index);
                if p < PRESSURE_FLOOR && !floor_engaged {
                    if config.cons_to_prim_verbose {
                        debug!("cons_to_prim: pressure {} below floor, engaging floor and restarting", p);
                    }
                    floor_engaged = true;
                    continue 'restart;
                }
                if floor_engaged {
                    p = PRESSURE_FLOOR;
                }
                let b0 = dot(b, s) * state.w / state.z;
                let denom = state.z + b2;
                let v = [
                    (s[0] + b0 * b[0] / state.w) / denom,
                    (s[1] + b0 * b[1] / state.w) / denom,
                    (s[2] + b0 * b[2] / state.w) / denom,
                ];
                let primitive = Primitive([d / state.w, p, v[0], v[1], v[2], b[0], b[1], b[2]]);
                return Ok(Recovered { primitive, lorentz_factor: state.w });
            }
            let _ = (iter, f1);
        }
        if !floor_engaged {
            if config.cons_to_prim_verbose {
                debug!("cons_to_prim: Newton did not converge in {} iterations, engaging floor and restarting", NEWTON_MAX_ITER);
            }
            floor_engaged = true;
            continue 'restart;
        }
        if config.cons_to_prim_verbose {
            warn!("cons_to_prim: Newton failed to converge after floor engagement (D={}, tau={})", d, tau);
        }
        return Err(());
    }
}

/// Array-level `cons_to_prim`, accumulating a [`CellFailures`] report
/// rather than a bare integer sum, data-parallel when `parallel` is on.
pub fn cons_to_prim_array(u: &[Conserved], guess: &mut [Primitive], config: &Config) -> CellFailures {
    let mut failures = CellFailures::default();
    for (i, (ui, pi)) in u.iter().zip(guess.iter_mut()).enumerate() {
        match cons_to_prim(ui, pi, config) {
            Ok(r) => *pi = r.primitive,
            Err(()) => failures.push(i),
        }
    }
    failures
}

#[cfg(test)]
mod test {
    use super::*;

    fn eps_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn pure_hydro_round_trip() {
        let config = Config { adiabatic_gamma: 5.0 / 3.0, ..Config::default() };
        let p0 = Primitive([1.0, 1.0, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let u = prim_to_cons(&p0, config.adiabatic_gamma);
        let w_expected = 1.0 / (1.0 - 0.09_f64).sqrt();
        assert!(eps_eq(u.mass_density(), w_expected, 1e-10));
        let r = cons_to_prim(&u, &p0, &config).unwrap();
        assert!(eps_eq(r.primitive[2], 0.3, 1e-10));
        assert!(eps_eq(r.primitive[0], 1.0, 1e-10));
        assert!(eps_eq(r.primitive[1], 1.0, 1e-10));
    }

    #[test]
    fn magnetized_stationary_fluid() {
        let config = Config { adiabatic_gamma: 5.0 / 3.0, ..Config::default() };
        let p0 = Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let u = prim_to_cons(&p0, config.adiabatic_gamma);
        assert!(eps_eq(u.mass_density(), 1.0, 1e-12));
        assert!(u.momentum().iter().all(|&s| s.abs() < 1e-12));
        let r = cons_to_prim(&u, &p0, &config).unwrap();
        assert!(r.primitive.velocity().iter().all(|&v| v.abs() < 1e-8));
        assert!(eps_eq(r.primitive[5], 1.0, 1e-10));
    }

    #[test]
    fn idempotent_recovery() {
        let config = Config::default();
        let p0 = Primitive([2.0, 0.5, 0.1, 0.2, -0.1, 0.3, 0.1, 0.0]);
        let u = prim_to_cons(&p0, config.adiabatic_gamma);
        let r1 = cons_to_prim(&u, &p0, &config).unwrap();
        let r2 = cons_to_prim(&u, &r1.primitive, &config).unwrap();
        for i in 0..8 {
            assert!(eps_eq(r1.primitive[i], r2.primitive[i], 1e-12));
        }
    }

    #[test]
    fn high_lorentz_four_velocity_round_trip() {
        let ux = 4.0_f64;
        let w = (1.0 + ux * ux).sqrt();
        let vx = ux / w;
        let config = Config { cons_to_prim_use_estimate: true, ..Config::default() };
        let p0 = Primitive([1.0, 1.0, vx, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let u = prim_to_cons(&p0, config.adiabatic_gamma);
        let r = cons_to_prim(&u, &p0, &config).unwrap();
        assert!(eps_eq(r.primitive[2], vx, 1e-8));
    }

    #[test]
    fn array_driver_reports_no_failures_for_physical_states() {
        let config = Config::default();
        let prims = vec![
            Primitive([1.0, 1.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Primitive([0.5, 0.2, -0.2, 0.1, 0.0, 0.1, 0.0, 0.0]),
        ];
        let cons: Vec<Conserved> = prims.iter().map(|p| prim_to_cons(p, config.adiabatic_gamma)).collect();
        let mut guesses = prims.clone();
        let failures = cons_to_prim_array(&cons, &mut guesses, &config);
        assert!(failures.is_empty());
    }
}
