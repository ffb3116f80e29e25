//! Ohno (2013) CCT from uv via cascading Planckian tables.
//!
//! Planckian chromaticities are integrated from Planck's law against the
//! multi-lobe Gaussian fit of the CIE 1931 2° observer (Wyman, Sloan & Shirley
//! 2013), sampled every 5 nm over 360-830 nm.

use super::Uv;
use crate::diagnostic;

/// Second radiation constant (m·K)
const C2: f64 = 1.4388e-2;
/// First radiation constant (W·m²)
const C1: f64 = 3.741_771_852e-16;

const WAVELENGTH_START_NM: u32 = 360;
const WAVELENGTH_END_NM: u32 = 830;
const WAVELENGTH_STEP_NM: usize = 5;

/// Above this |Duv| the triangular estimate is replaced by the parabolic one.
const PARABOLIC_DUV_THRESHOLD: f64 = 0.002;

#[derive(Debug, Clone)]
pub struct OhnoSolver {
    /// Lower bound of the first table (K)
    pub start: f64,
    /// Upper bound of the first table (K)
    pub end: f64,
    /// Rows per table, at least 3
    pub count: usize,
    /// Number of table refinements
    pub iterations: usize,
}

impl Default for OhnoSolver {
    fn default() -> Self {
        Self {
            start: 1000.0,
            end: 100_000.0,
            count: 10,
            iterations: 6,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Row {
    t: f64,
    u: f64,
    v: f64,
    d: f64,
}

/// Asymmetric Gaussian lobe
fn lobe(lambda: f64, mu: f64, sigma_lo: f64, sigma_hi: f64) -> f64 {
    let sigma = if lambda < mu { sigma_lo } else { sigma_hi };
    let t = (lambda - mu) / sigma;
    (-0.5 * t * t).exp()
}

fn cmf(lambda: f64) -> [f64; 3] {
    let x = 1.056 * lobe(lambda, 599.8, 37.9, 31.0) + 0.362 * lobe(lambda, 442.0, 16.0, 26.7)
        - 0.065 * lobe(lambda, 501.1, 20.4, 26.2);
    let y = 0.821 * lobe(lambda, 568.8, 46.9, 40.5) + 0.286 * lobe(lambda, 530.9, 16.3, 31.1);
    let z = 1.217 * lobe(lambda, 437.0, 11.8, 36.0) + 0.681 * lobe(lambda, 459.0, 26.0, 13.8);
    [x, y, z]
}

/// Spectral radiant exitance of a blackbody
fn planck(lambda_m: f64, t: f64) -> f64 {
    C1 / lambda_m.powi(5) / ((C2 / (lambda_m * t)).exp() - 1.0)
}

/// CIE 1960 uv of a blackbody at `t` kelvin
pub(super) fn planckian_uv(t: f64) -> Uv {
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for nm in (WAVELENGTH_START_NM..=WAVELENGTH_END_NM).step_by(WAVELENGTH_STEP_NM) {
        let lambda = f64::from(nm);
        let m = planck(lambda * 1e-9, t);
        let [cx, cy, cz] = cmf(lambda);
        x += m * cx;
        y += m * cy;
        z += m * cz;
    }
    let denom = x + 15.0 * y + 3.0 * z;
    Uv::new(4.0 * x / denom, 6.0 * y / denom)
}

impl OhnoSolver {
    fn table(&self, uv: Uv, start: f64, end: f64) -> Vec<Row> {
        let count = self.count.max(3);
        (0..count)
            .map(|k| {
                let t = start + (end - start) * k as f64 / (count - 1) as f64;
                let p = planckian_uv(t);
                Row {
                    t,
                    u: p.u,
                    v: p.v,
                    d: (uv.u - p.u).hypot(uv.v - p.v),
                }
            })
            .collect()
    }

    /// Returns `(cct, duv)`.
    pub fn uv_to_cct(&self, uv: Uv) -> (f64, f64) {
        let mut start = self.start;
        let mut end = self.end;
        let mut table = Vec::new();
        let mut index = 1;

        for _ in 0..self.iterations.max(1) {
            table = self.table(uv, start, end);
            index = table
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.d.total_cmp(&b.1.d))
                .map(|(i, _)| i)
                .unwrap_or(1);

            if index == 0 {
                diagnostic!(
                    t = table[0].t,
                    "minimal distance on lowest Planckian table bound, result may be unreliable"
                );
                index = 1;
            } else if index == table.len() - 1 {
                diagnostic!(
                    t = table[index].t,
                    "minimal distance on highest Planckian table bound, result may be unreliable"
                );
                index -= 1;
            }

            start = table[index - 1].t;
            end = table[index + 1].t;
        }

        let prev = table[index - 1];
        let cur = table[index];
        let next = table[index + 1];

        // triangular solution
        let l = (next.u - prev.u).hypot(next.v - prev.v);
        let x = (prev.d * prev.d - next.d * next.d + l * l) / (2.0 * l);
        let mut t = prev.t + (next.t - prev.t) * (x / l);
        let vtx = prev.v + (next.v - prev.v) * (x / l);
        let sign = if uv.v - vtx >= 0.0 { 1.0 } else { -1.0 };
        let mut duv = (prev.d * prev.d - x * x).max(0.0).sqrt() * sign;

        if duv.abs() >= PARABOLIC_DUV_THRESHOLD {
            let (tp, tc, tn) = (prev.t, cur.t, next.t);
            let (dp, dc, dn) = (prev.d, cur.d, next.d);
            let xx = (tn - tc) * (tp - tn) * (tc - tp);
            let a = (tp * (dn - dc) + tc * (dp - dn) + tn * (dc - dp)) / xx;
            let b = -(tp * tp * (dn - dc) + tc * tc * (dp - dn) + tn * tn * (dc - dp)) / xx;
            let c = -(dp * (tn - tc) * tc * tn
                + dc * (tp - tn) * tp * tn
                + dn * (tc - tp) * tp * tc)
                / xx;

            t = -b / (2.0 * a);
            duv = sign * (a * t * t + b * t + c);
        }

        (t, duv)
    }
}
