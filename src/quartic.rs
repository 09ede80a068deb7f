/**
 * Real roots of a real quartic `a4 x^4 + a3 x^3 + a2 x^2 + a1 x + a0 = 0`.
 *
 * Exposes a pure function `solve_quartic` in place of a stateful
 * build-then-read solver object, plus the two fixed-iteration Newton
 * approximations used by the `Approx1`/`Approx2` wavespeed modes.
 */
use std::f64::consts::PI;

/// Up to four real roots of a quartic, found by the exact Ferrari-style
/// solver. Double/complex roots are simply absent from `roots`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuarticRoots {
    pub roots: Vec<f64>,
}

impl QuarticRoots {
    pub fn max(&self) -> Option<f64> {
        self.roots.iter().cloned().fold(None, |m, x| Some(m.map_or(x, |m: f64| m.max(x))))
    }

    pub fn min(&self) -> Option<f64> {
        self.roots.iter().cloned().fold(None, |m, x| Some(m.map_or(x, |m: f64| m.min(x))))
    }
}

/// All real roots of the monic cubic `t^3 + b t^2 + c t + d = 0`.
fn solve_cubic_real_roots(b: f64, c: f64, d: f64) -> Vec<f64> {
    let p = c - b * b / 3.0;
    let q = 2.0 * b.powi(3) / 27.0 - b * c / 3.0 + d;

    let depressed: Vec<f64> = if p.abs() < 1e-14 {
        vec![(-q).cbrt()]
    } else {
        let delta = (q / 2.0).powi(2) + (p / 3.0).powi(3);
        if delta > 0.0 {
            let sq = delta.sqrt();
            let u = (-q / 2.0 + sq).cbrt();
            let v = (-q / 2.0 - sq).cbrt();
            vec![u + v]
        } else {
            let r = (-(p / 3.0).powi(3)).sqrt();
            let phi = (-q / (2.0 * r)).clamp(-1.0, 1.0).acos();
            let m = 2.0 * (-p / 3.0).sqrt();
            vec![
                m * (phi / 3.0).cos(),
                m * ((phi + 2.0 * PI) / 3.0).cos(),
                m * ((phi + 4.0 * PI) / 3.0).cos(),
            ]
        }
    };
    depressed.into_iter().map(|t| t - b / 3.0).collect()
}

/// Real roots of a monic quadratic `x^2 + b x + c = 0`.
fn solve_quadratic_real_roots(b: f64, c: f64) -> Vec<f64> {
    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        vec![]
    } else if disc == 0.0 {
        vec![-b / 2.0]
    } else {
        let sq = disc.sqrt();
        vec![(-b + sq) / 2.0, (-b - sq) / 2.0]
    }
}

/**
 * Exact, Ferrari-style real-root solver for a general quartic with
 * `a4 != 0`. Reduces to a depressed quartic, solves the cubic resolvent
 * for an auxiliary variable `z`, and factors the quartic into two real
 * quadratics.
 */
pub fn solve_quartic(a4: f64, a3: f64, a2: f64, a1: f64, a0: f64) -> QuarticRoots {
    if a4.abs() < 1e-300 {
        // Degenerate to a cubic (or lower) in a3..a0; cascade down rather
        // than dividing by a2, which may be negative or zero.
        if a3.abs() < 1e-300 {
            if a2.abs() < 1e-300 {
                if a1.abs() < 1e-300 {
                    return QuarticRoots { roots: vec![] };
                }
                return QuarticRoots { roots: vec![-a0 / a1] };
            }
            return QuarticRoots { roots: solve_quadratic_real_roots(a1 / a2, a0 / a2) };
        }
        return QuarticRoots { roots: solve_cubic_real_roots(a2 / a3, a1 / a3, a0 / a3) };
    }

    let b = a3 / a4;
    let c = a2 / a4;
    let d = a1 / a4;
    let e = a0 / a4;

    let shift = b / 4.0;
    let p = c - 3.0 * b * b / 8.0;
    let q = b.powi(3) / 8.0 - b * c / 2.0 + d;
    let r = -3.0 * b.powi(4) / 256.0 + b * b * c / 16.0 - b * d / 4.0 + e;

    if q.abs() < 1e-13 {
        let mut roots = Vec::new();
        let disc = p * p - 4.0 * r;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for &y2 in &[(-p + sq) / 2.0, (-p - sq) / 2.0] {
                if y2 > 0.0 {
                    let y = y2.sqrt();
                    roots.push(y - shift);
                    roots.push(-y - shift);
                } else if y2 == 0.0 {
                    roots.push(-shift);
                }
            }
        }
        return QuarticRoots { roots };
    }

    // Resolvent cubic z^3 - (p/2) z^2 - r z + (p r / 2 - q^2 / 8) = 0.
    let cubic_roots = solve_cubic_real_roots(-p / 2.0, -r, p * r / 2.0 - q * q / 8.0);
    let z0 = cubic_roots
        .into_iter()
        .fold(None, |best: Option<f64>, z| match best {
            Some(b) if 2.0 * b - p >= 2.0 * z - p => Some(b),
            _ => Some(z),
        })
        .unwrap_or(p / 2.0);

    let s = (2.0 * z0 - p).max(0.0).sqrt();
    let mut roots = Vec::new();
    if s > 1e-12 {
        for &(sign_s, sign_pm) in &[(1.0, 1.0), (-1.0, -1.0)] {
            // x^2 (+/-) s x + (z0 (-/+) q/(2s)) = 0
            let lin = sign_s * s;
            let con = z0 - sign_pm * q / (2.0 * s);
            for x in solve_quadratic_real_roots(-lin, con) {
                roots.push(x - shift);
            }
        }
    } else {
        // s ~ 0 degenerates to the biquadratic branch in z0.
        let disc = z0 * z0 - r;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for &y2 in &[-z0 + sq, -z0 - sq] {
                if y2 > 0.0 {
                    let y = y2.sqrt();
                    roots.push(y - shift);
                    roots.push(-y - shift);
                } else if y2 == 0.0 {
                    roots.push(-shift);
                }
            }
        }
    }
    QuarticRoots { roots }
}

fn eval(a4: f64, a3: f64, a2: f64, a1: f64, a0: f64, x: f64) -> (f64, f64) {
    let f = ((a4 * x + a3) * x + a2) * x * x + a1 * x + a0;
    let fp = (4.0 * a4 * x + 3.0 * a3) * x * x + 2.0 * a2 * x + a1;
    (f, fp)
}

fn newton_refine(a4: f64, a3: f64, a2: f64, a1: f64, a0: f64, mut x: f64, iterations: u32) -> f64 {
    for _ in 0..iterations {
        let (f, fp) = eval(a4, a3, a2, a1, a0, x);
        if fp.abs() < 1e-300 {
            break;
        }
        x -= f / fp;
    }
    x
}

/// Fixed-iteration Newton refinement of the quartic seeded at +1 and -1,
/// used by the `Approx1`/`Approx2` wavespeed modes. Returns `(a_plus,
/// a_minus)` without full root classification.
pub fn approx_roots(a4: f64, a3: f64, a2: f64, a1: f64, a0: f64, iterations: u32) -> (f64, f64) {
    let r_plus = newton_refine(a4, a3, a2, a1, a0, 1.0, iterations);
    let r_minus = newton_refine(a4, a3, a2, a1, a0, -1.0, iterations);
    (r_plus.max(r_minus), r_plus.min(r_minus))
}
