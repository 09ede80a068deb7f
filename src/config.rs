/**
 * User-facing configuration: every enumerated mode and scalar parameter
 * from the external interface, aggregated into a single `serde`-derived
 * struct with its own `validate`, in the style of the hydro solver
 * configs this crate's core descends from.
 *
 * Replaces `set_state`/`get_state` on a process-wide singleton with
 * ordinary struct assignment and cloning of a `Config` value owned by
 * the caller.
 */
use serde::{Deserialize, Serialize};

use crate::limiter::Limiter;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiemannKind {
    Hll,
    Hllc,
}

impl Default for RiemannKind {
    fn default() -> Self {
        RiemannKind::Hll
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconstruction {
    PiecewiseConstant,
    Plm3Velocity,
    Plm4Velocity,
}

impl Default for Reconstruction {
    fn default() -> Self {
        Reconstruction::Plm3Velocity
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarticMode {
    Exact,
    Approx1,
    Approx2,
    None,
}

impl Default for QuarticMode {
    fn default() -> Self {
        QuarticMode::Exact
    }
}

/**
 * Full set of solver parameters: Riemann solver, reconstruction,
 * limiter, wavespeed mode, and the scalar/boolean knobs exposed at the
 * dU/dt entry points.
 */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub riemann: RiemannKind,

    #[serde(default)]
    pub reconstruction: Reconstruction,

    #[serde(default)]
    pub limiter: Limiter,

    #[serde(default)]
    pub quartic_mode: QuarticMode,

    #[serde(default)]
    pub cons_to_prim_use_estimate: bool,

    #[serde(default)]
    pub cons_to_prim_verbose: bool,

    /// Adiabatic index Gamma: (1, 2].
    #[serde(default = "Config::default_adiabatic_gamma")]
    pub adiabatic_gamma: f64,

    /// PLM steepening parameter theta: [1, 2].
    #[serde(default = "Config::default_plm_theta")]
    pub plm_theta: f64,
}

impl Config {
    fn default_adiabatic_gamma() -> f64 {
        1.4
    }

    fn default_plm_theta() -> f64 {
        2.0
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.plm_theta < 1.0 || self.plm_theta > 2.0 {
            anyhow::bail!("plm_theta must be in the range [1, 2]")
        }
        if self.adiabatic_gamma <= 1.0 || self.adiabatic_gamma > 2.0 {
            anyhow::bail!("adiabatic_gamma must be in the range (1, 2]")
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            riemann: RiemannKind::default(),
            reconstruction: Reconstruction::default(),
            limiter: Limiter::default(),
            quartic_mode: QuarticMode::default(),
            cons_to_prim_use_estimate: false,
            cons_to_prim_verbose: false,
            adiabatic_gamma: Config::default_adiabatic_gamma(),
            plm_theta: Config::default_plm_theta(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_theta_is_rejected() {
        let c = Config { plm_theta: 0.5, ..Config::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn out_of_range_gamma_is_rejected() {
        let c = Config { adiabatic_gamma: 3.0, ..Config::default() };
        assert!(c.validate().is_err());
    }
}
