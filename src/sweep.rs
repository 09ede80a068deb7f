/**
 * `Fiph`: the one-sided flux field along a single axis. Reconstructs
 * edge states from the cached primitive buffer, calls the configured
 * Riemann solver at each interior face, and zeroes the sentinel
 * ghost-face fluxes outside the valid range.
 *
 * Axis sweeps write to distinct flux buffers, so the optional
 * `rayon`-backed path can split the interior faces across threads with
 * `par_chunks_mut`.
 */
use crate::config::Config;
use crate::grid::{Axis, Grid};
use crate::reconstruct::{edge_state, Side};
use crate::riemann;
use crate::variables::{Conserved, Primitive};

/// Computes the face flux at the face between cell `i` and cell `i +
/// stride`, using the 3-cell stencils centered at `i` (right edge) and
/// `i + stride` (left edge).
fn face_flux(
    primitive: &[Primitive],
    four_velocity: Option<&[[f64; 3]]>,
    i: usize,
    stride: usize,
    axis: Axis,
    config: &Config,
) -> (Conserved, f64) {
    let four_vel_at = |center: usize| four_velocity.map(|buf| (buf[center - stride], buf[center], buf[center + stride]));

    let p_l = edge_state(
        &primitive[i - stride],
        &primitive[i],
        &primitive[i + stride],
        four_vel_at(i),
        config,
        Side::Right,
    );
    let p_r = edge_state(
        &primitive[i],
        &primitive[i + stride],
        &primitive[i + 2 * stride],
        four_vel_at(i + stride),
        config,
        Side::Left,
    );

    let result = riemann::solve(&p_l, &p_r, axis, config);
    (result.flux, result.max_abs_speed)
}

/**
 * Fills `flux` (length `grid.num_cells()`) with the face-centered flux
 * field along `axis`: `flux[i]` is the flux at the face between cell `i`
 * and cell `i + stride`. Faces before the first interior face and past
 * the last are zeroed. Returns the largest `|a|` seen across the sweep,
 * to be folded into the caller's `max_lambda` accumulator.
 */
pub fn fiph(
    primitive: &[Primitive],
    four_velocity: Option<&[[f64; 3]]>,
    flux: &mut [Conserved],
    axis: Axis,
    grid: &Grid,
    config: &Config,
) -> f64 {
    let stride = grid.cell_stride(axis);
    let n = grid.num_cells();
    let lo = stride;
    let hi = n.saturating_sub(2 * stride);

    for slot in flux[..lo].iter_mut() {
        *slot = Conserved([0.0; 8]);
    }
    for slot in flux[hi..].iter_mut() {
        *slot = Conserved([0.0; 8]);
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let speeds: Vec<f64> = flux[lo..hi]
            .par_chunks_mut(1)
            .enumerate()
            .map(|(k, chunk)| {
                let i = lo + k;
                let (f, speed) = face_flux(primitive, four_velocity, i, stride, axis, config);
                chunk[0] = f;
                speed
            })
            .collect();
        speeds.into_iter().fold(0.0, f64::max)
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut max_speed = 0.0_f64;
        for i in lo..hi {
            let (f, speed) = face_flux(primitive, four_velocity, i, stride, axis, config);
            flux[i] = f;
            max_speed = max_speed.max(speed);
        }
        max_speed
    }
}
