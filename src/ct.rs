/**
 * Constraint transport: replaces the magnetic-field slots of the axis
 * fluxes with corner-averaged electromotive forces so the discrete
 * magnetic divergence update vanishes exactly, given a div-B-free
 * initial condition.
 *
 * The averaging weights below are exact; changing them silently breaks
 * the divergence-preservation property.
 */
use crate::grid::{Axis, Grid, B1, B2, B3};
use crate::variables::Conserved;

fn offset(base: usize, delta: isize) -> usize {
    (base as isize + delta) as usize
}

/// `(F_self B_other)_new` per the §4.8 stencil, where `self`/`other` name
/// an ordered axis pair (e.g. self=X, other=Y gives `(F_x B_y)_new`).
fn emf_average(
    f_self: &[Conserved],
    slot_other: usize,
    f_other: &[Conserved],
    slot_self: usize,
    i: usize,
    s_self: isize,
    s_other: isize,
) -> f64 {
    let term_self = 2.0 * f_self[i][slot_other] + f_self[offset(i, s_other)][slot_other] + f_self[offset(i, -s_other)][slot_other];
    let term_other = f_other[i][slot_self]
        + f_other[offset(i, s_self)][slot_self]
        + f_other[offset(i, -s_other)][slot_self]
        + f_other[offset(i, s_self - s_other)][slot_self];
    (term_self - term_other) / 8.0
}

/// Applies the corner-averaged EMF stencil to one ordered axis pair,
/// writing the two updated cross-slots and zeroing each flux array's own
/// diagonal slot, over the widest range at which every accessed offset
/// stays in bounds.
fn apply_pair(f_a: &mut [Conserved], slot_a: usize, f_b: &mut [Conserved], slot_b: usize, axis_a: Axis, axis_b: Axis, grid: &Grid) {
    let s_a = grid.cell_stride(axis_a) as isize;
    let s_b = grid.cell_stride(axis_b) as isize;
    let n = grid.num_cells();
    let margin = (s_a.max(s_b)) as usize;
    let lo = margin;
    let hi = n.saturating_sub(margin);

    let mut new_a = vec![0.0; n];
    let mut new_b = vec![0.0; n];
    for i in lo..hi {
        new_a[i] = emf_average(f_a, slot_b, f_b, slot_a, i, s_a, s_b);
        new_b[i] = emf_average(f_b, slot_a, f_a, slot_b, i, s_b, s_a);
    }
    for i in lo..hi {
        f_a[i][slot_a] = 0.0;
        f_b[i][slot_b] = 0.0;
        f_a[i][slot_b] = new_a[i];
        f_b[i][slot_a] = new_b[i];
    }
}

/**
 * 2D constraint transport over the X and Y axis fluxes: replaces
 * `fx[Bx]`/`fy[By]` with zero and `fx[By]`/`fy[Bx]` with the averaged
 * corner EMF.
 */
pub fn constraint_transport_2d(fx: &mut [Conserved], fy: &mut [Conserved], grid: &Grid) {
    apply_pair(fx, B1, fy, B2, Axis::X, Axis::Y, grid);
}

/**
 * 3D constraint transport: the 2D (X, Y) pair plus the two cyclic
 * extensions (Y, Z) and (Z, X), so that every flux array's own-axis
 * field slot is zeroed and its two transverse slots come from the
 * corner-averaged EMFs of the adjacent axis pairs.
 */
pub fn constraint_transport_3d(fx: &mut [Conserved], fy: &mut [Conserved], fz: &mut [Conserved], grid: &Grid) {
    apply_pair(fx, B1, fy, B2, Axis::X, Axis::Y, grid);
    apply_pair(fy, B2, fz, B3, Axis::Y, Axis::Z, grid);
    apply_pair(fz, B3, fx, B1, Axis::Z, Axis::X, grid);
}
