/**
 * The `Solver` context: owns the grid geometry, the `Config`, and the
 * scratch buffers (primitive cache, per-axis flux buffers, 4-velocity
 * cache) that the original design allocated on entry to the `Alive`
 * state and released on `finalize`.
 *
 * Replaces the process-wide `Alive`/`Dead` singleton with an ordinary
 * owned value: constructing a `Solver` is `initialize`, dropping it is
 * `finalize`. Generalized from a `HashMap<BlockIndex, _>` of distributed
 * blocks down to a single flat grid's scratch buffers.
 */
use crate::config::Config;
use crate::ct;
use crate::error::{CellFailures, RmhdError};
use crate::grid::{Axis, Grid};
use crate::sweep;
use crate::variables::{self, Conserved, Primitive};

/// The `Alive` state: a live grid, configuration, and scratch buffers.
/// There is no `Dead` variant in this crate — its absence is simply the
/// absence of a `Solver` value.
pub struct Solver {
    config: Config,
    grid: Grid,
    primitive: Vec<Primitive>,
    four_velocity: Vec<[f64; 3]>,
    flux_x: Vec<Conserved>,
    flux_y: Vec<Conserved>,
    flux_z: Vec<Conserved>,
    max_lambda: f64,
    newton_iterations: u64,
}

impl Solver {
    /// Constructs a live solver context: copies the caller's initial
    /// primitive snapshot as the Newton seed and allocates the per-cell
    /// scratch arrays, in place of the original `initialize(P0, N_x, N_y,
    /// N_z, L_x, L_y, L_z, quiet)`.
    pub fn new(config: Config, grid: Grid, initial_primitive: &[Primitive]) -> anyhow::Result<Self> {
        config.validate()?;
        let n = grid.num_cells();
        if initial_primitive.len() != n {
            anyhow::bail!("initial primitive snapshot has {} cells, expected {}", initial_primitive.len(), n);
        }
        Ok(Solver {
            config,
            grid,
            primitive: initial_primitive.to_vec(),
            four_velocity: vec![[0.0; 3]; n],
            flux_x: vec![Conserved([0.0; 8]); n],
            flux_y: vec![Conserved([0.0; 8]); n],
            flux_z: vec![Conserved([0.0; 8]); n],
            max_lambda: 0.0,
            newton_iterations: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) -> anyhow::Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Largest signal speed seen since the last reset.
    pub fn max_lambda(&self) -> f64 {
        self.max_lambda
    }

    pub fn reset_max_lambda(&mut self) {
        self.max_lambda = 0.0;
    }

    pub fn newton_iterations(&self) -> u64 {
        self.newton_iterations
    }

    pub fn primitive_cache(&self) -> &[Primitive] {
        &self.primitive
    }

    fn recover_primitives(&mut self, u: &[Conserved]) -> CellFailures {
        let mut failures = CellFailures::default();
        for i in 0..self.grid.num_cells() {
            match variables::cons_to_prim(&u[i], &self.primitive[i], &self.config) {
                Ok(r) => {
                    self.primitive[i] = r.primitive;
                    let w = r.lorentz_factor;
                    let v = r.primitive.velocity();
                    self.four_velocity[i] = [w * v[0], w * v[1], w * v[2]];
                }
                Err(()) => failures.push(i),
            }
        }
        failures
    }

    /// The cached 4-velocity scratch, exposed only when `Plm4Velocity`
    /// reconstruction is selected; `None` otherwise so [`sweep::fiph`]
    /// skips the extra stencil lookups under the other modes.
    fn four_velocity_for_reconstruction(&self) -> Option<&[[f64; 3]]> {
        match self.config.reconstruction {
            crate::config::Reconstruction::Plm4Velocity => Some(&self.four_velocity),
            _ => None,
        }
    }

    fn require_dimension(&self, want: usize) -> Result<(), RmhdError> {
        let have = self.grid.dimension();
        if have != want {
            Err(RmhdError::DimensionMismatch { have, want })
        } else {
            Ok(())
        }
    }

    fn run(&mut self, u: &[Conserved], l: &mut [Conserved], axes: &[Axis]) -> CellFailures {
        let failures = self.recover_primitives(u);

        let four_vel = self.four_velocity_for_reconstruction();
        for &axis in axes {
            let buf = match axis {
                Axis::X => &mut self.flux_x,
                Axis::Y => &mut self.flux_y,
                Axis::Z => &mut self.flux_z,
            };
            let speed = sweep::fiph(&self.primitive, four_vel, buf, axis, &self.grid, &self.config);
            self.max_lambda = self.max_lambda.max(speed);
        }

        if axes.len() == 2 {
            ct::constraint_transport_2d(&mut self.flux_x, &mut self.flux_y, &self.grid);
        } else if axes.len() == 3 {
            ct::constraint_transport_3d(&mut self.flux_x, &mut self.flux_y, &mut self.flux_z, &self.grid);
        }

        let strides: Vec<(Axis, usize, f64)> = axes
            .iter()
            .map(|&axis| (axis, self.grid.cell_stride(axis), self.grid.spacing(axis)))
            .collect();
        let lo = strides.iter().map(|&(_, s, _)| s).max().unwrap_or(0);
        let n = self.grid.num_cells();

        for i in lo..n {
            let mut acc = [0.0; 8];
            for &(axis, stride, d_axis) in &strides {
                let buf = match axis {
                    Axis::X => &self.flux_x,
                    Axis::Y => &self.flux_y,
                    Axis::Z => &self.flux_z,
                };
                for k in 0..8 {
                    acc[k] -= (buf[i][k] - buf[i - stride][k]) / d_axis;
                }
            }
            l[i] = Conserved(acc);
        }

        failures
    }

    /// `dUdt_1d(U) -> L, failures`. Requires a 1D grid.
    pub fn dudt_1d(&mut self, u: &[Conserved], l: &mut [Conserved]) -> Result<CellFailures, RmhdError> {
        self.require_dimension(1)?;
        Ok(self.run(u, l, &[Axis::X]))
    }

    /// `dUdt_2d(U) -> L, failures`. Requires a 2D grid.
    pub fn dudt_2d(&mut self, u: &[Conserved], l: &mut [Conserved]) -> Result<CellFailures, RmhdError> {
        self.require_dimension(2)?;
        Ok(self.run(u, l, &[Axis::X, Axis::Y]))
    }

    /// `dUdt_3d(U) -> L, failures`. Requires a 3D grid.
    pub fn dudt_3d(&mut self, u: &[Conserved], l: &mut [Conserved]) -> Result<CellFailures, RmhdError> {
        self.require_dimension(3)?;
        Ok(self.run(u, l, &[Axis::X, Axis::Y, Axis::Z]))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{QuarticMode, Reconstruction, RiemannKind};
    use crate::variables::prim_to_cons;

    fn uniform_grid_1d(n: usize) -> Grid {
        Grid::new(n, 1, 1, 1.0, 1.0, 1.0)
    }

    #[test]
    fn dimension_mismatch_is_refused_without_touching_l() {
        let grid = uniform_grid_1d(40);
        let config = Config::default();
        let p0 = vec![Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]); grid.num_cells()];
        let mut solver = Solver::new(config, grid, &p0).unwrap();
        let u: Vec<Conserved> = p0.iter().map(|p| prim_to_cons(p, 1.4)).collect();
        let sentinel = Conserved([-999.0; 8]);
        let mut l = vec![sentinel; u.len()];
        let err = solver.dudt_2d(&u, &mut l).unwrap_err();
        assert!(matches!(err, RmhdError::DimensionMismatch { have: 1, want: 2 }));
        assert!(l.iter().all(|c| c.0 == sentinel.0));
    }

    #[test]
    fn brio_wu_like_shock_tube_1d_is_finite_with_no_failures() {
        let n = 400;
        let grid = Grid::new(n, 1, 1, 1.0, 1.0, 1.0);
        let config = Config {
            riemann: RiemannKind::Hll,
            reconstruction: Reconstruction::Plm3Velocity,
            limiter: crate::limiter::Limiter::Minmod,
            quartic_mode: QuarticMode::Exact,
            adiabatic_gamma: 2.0,
            ..Config::default()
        };
        let p0: Vec<Primitive> = (0..n)
            .map(|i| {
                if i < n / 2 {
                    Primitive([1.0, 1.0, 0.0, 0.0, 0.0, 0.5, 1.0, 0.0])
                } else {
                    Primitive([0.125, 0.1, 0.0, 0.0, 0.0, 0.5, -1.0, 0.0])
                }
            })
            .collect();
        let u: Vec<Conserved> = p0.iter().map(|p| prim_to_cons(p, config.adiabatic_gamma)).collect();
        let mut solver = Solver::new(config, grid, &p0).unwrap();
        let mut l = vec![Conserved([0.0; 8]); n];
        let failures = solver.dudt_1d(&u, &mut l).unwrap();
        assert!(failures.is_empty());
        assert!(solver.max_lambda() <= 1.0 + 1e-9);
        let stride = solver.grid().cell_stride(Axis::X);
        for cell in l.iter().take(n - stride).skip(stride) {
            for k in 0..8 {
                assert!(cell[k].is_finite());
            }
        }
    }
}
