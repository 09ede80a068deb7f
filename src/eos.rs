/**
 * Ideal-gas equation of state relating rest density, pressure, specific
 * internal energy, and sound speed. Pure functions; no state.
 */

/// Specific internal energy e = p / (rho (Gamma - 1))
pub fn specific_internal_energy(rho: f64, p: f64, gamma_law_index: f64) -> f64 {
    p / (rho * (gamma_law_index - 1.0))
}

/// Specific enthalpy h = 1 + e + p/rho
pub fn specific_enthalpy(rho: f64, p: f64, gamma_law_index: f64) -> f64 {
    1.0 + specific_internal_energy(rho, p, gamma_law_index) + p / rho
}

/// Sound speed squared c_s^2 = Gamma p / (p + rho + rho e)
pub fn sound_speed_squared(rho: f64, p: f64, gamma_law_index: f64) -> f64 {
    let e = specific_internal_energy(rho, p, gamma_law_index);
    gamma_law_index * p / (p + rho + rho * e)
}
