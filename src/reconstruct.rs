/**
 * PLM slope-limited reconstruction of a face-adjacent primitive edge
 * state, in either the 3-velocity or 4-velocity flavor, plus the
 * degenerate piecewise-constant case.
 *
 * Three-cell windows, gradients computed per slot, edge states built by
 * adding/subtracting half the gradient, over the flat 8-slot RMHD buffer
 * and both velocity representations.
 */
use crate::config::{Config, Reconstruction};
use crate::limiter::minmod;
use crate::variables::Primitive;

const RHO: usize = 0;
const PRES: usize = 1;
const BX: usize = 5;
const BY: usize = 6;
const BZ: usize = 7;

/// +1.0 selects the right edge of the stencil's center cell, -1.0 the
/// left edge (i.e. `P_L` of face `i` vs. `P_R` of face `i+1`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    fn sign(self) -> f64 {
        match self {
            Side::Right => 1.0,
            Side::Left => -1.0,
        }
    }
}

fn edge_3velocity(l: &Primitive, c: &Primitive, r: &Primitive, config: &Config, side: Side) -> Primitive {
    let mut out = *c;
    let s = side.sign();
    for k in 0..8 {
        let g = config.limiter.gradient(l[k], c[k], r[k], config.plm_theta);
        out[k] = c[k] + 0.5 * s * g;
    }
    out
}

fn edge_4velocity(
    l: &Primitive,
    c: &Primitive,
    r: &Primitive,
    u_l: [f64; 3],
    u_c: [f64; 3],
    u_r: [f64; 3],
    config: &Config,
    side: Side,
) -> Primitive {
    let s = side.sign();
    let mut out = *c;

    for &k in &[RHO, PRES, BX, BY, BZ] {
        let g = minmod(l[k], c[k], r[k], config.plm_theta);
        out[k] = c[k] + 0.5 * s * g;
    }

    let mut u_edge = [0.0; 3];
    for i in 0..3 {
        let g = config.limiter.gradient(u_l[i], u_c[i], u_r[i], config.plm_theta);
        u_edge[i] = u_c[i] + 0.5 * s * g;
    }
    let w = (1.0 + u_edge[0] * u_edge[0] + u_edge[1] * u_edge[1] + u_edge[2] * u_edge[2]).sqrt();
    out[2] = u_edge[0] / w;
    out[3] = u_edge[1] / w;
    out[4] = u_edge[2] / w;

    out
}

/**
 * Reconstructs the edge state on `side` of the stencil's center cell
 * `c`, given its left/right neighbors `l`/`r`. Under `Plm4Velocity`,
 * `four_velocity` must carry the corresponding `(u_l, u_c, u_r)` triples
 * cached by the primitive recovery; it is ignored otherwise.
 */
pub fn edge_state(
    l: &Primitive,
    c: &Primitive,
    r: &Primitive,
    four_velocity: Option<([f64; 3], [f64; 3], [f64; 3])>,
    config: &Config,
    side: Side,
) -> Primitive {
    match config.reconstruction {
        Reconstruction::PiecewiseConstant => *c,
        Reconstruction::Plm3Velocity => edge_3velocity(l, c, r, config, side),
        Reconstruction::Plm4Velocity => {
            let (u_l, u_c, u_r) = four_velocity.expect("Plm4Velocity reconstruction requires cached 4-velocity stencil");
            edge_4velocity(l, c, r, u_l, u_c, u_r, config, side)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn piecewise_constant_reproduces_cell_center_on_both_sides() {
        let config = Config { reconstruction: Reconstruction::PiecewiseConstant, ..Config::default() };
        let l = Primitive([1.0, 1.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let c = Primitive([1.2, 0.9, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let r = Primitive([1.4, 0.8, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let right = edge_state(&l, &c, &r, None, &config, Side::Right);
        let left = edge_state(&l, &c, &r, None, &config, Side::Left);
        assert_eq!(right.0, c.0);
        assert_eq!(left.0, c.0);
    }

    #[test]
    fn plm_minmod_reproduces_exact_linear_profile() {
        let config = Config { reconstruction: Reconstruction::Plm3Velocity, limiter: crate::limiter::Limiter::Minmod, ..Config::default() };
        // Linear primitive profile: slot 0 increases by 1.0 per cell.
        let cells: Vec<Primitive> = (0..5)
            .map(|i| Primitive([i as f64, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]))
            .collect();
        // Interior cell index 2, stencil (1,2,3).
        let right = edge_state(&cells[1], &cells[2], &cells[3], None, &config, Side::Right);
        let left = edge_state(&cells[1], &cells[2], &cells[3], None, &config, Side::Left);
        assert!((right[0] - 2.5).abs() < 1e-12);
        assert!((left[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn four_velocity_reconstruction_stays_subluminal() {
        let config = Config { reconstruction: Reconstruction::Plm4Velocity, ..Config::default() };
        let l = Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let c = Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let r = Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let u = ([3.0, 0.0, 0.0], [4.0, 0.0, 0.0], [5.0, 0.0, 0.0]);
        let edge = edge_state(&l, &c, &r, Some(u), &config, Side::Right);
        let v2 = edge[2] * edge[2] + edge[3] * edge[3] + edge[4] * edge[4];
        assert!(v2 < 1.0);
    }
}
