//! Closed-form and search-based CCT solvers working on xy.

use super::Xy;
use crate::diagnostic;

/// McCamy (1992) cubic approximation.
pub fn mccamy_1992(xy: Xy) -> f64 {
    let n = (xy.x - 0.3320) / (xy.y - 0.1858);
    -449.0 * n.powi(3) + 3525.0 * n.powi(2) - 6823.3 * n + 5520.33
}

/// Hernández-Andrés et al. (1999) exponential fit, switching to the
/// high-temperature constants above 50000 K.
pub fn hernandez_1999(xy: Xy) -> f64 {
    let n = (xy.x - 0.3366) / (xy.y - 0.1735);
    let cct = -949.86315
        + 6253.80338 * (-n / 0.92159).exp()
        + 28.70599 * (-n / 0.20039).exp()
        + 0.00004 * (-n / 0.07125).exp();

    if cct > 50_000.0 {
        let n = (xy.x - 0.3356) / (xy.y - 0.1691);
        36284.48953 + 0.00228 * (-n / 0.07861).exp() + 5.4535e-36 * (-n / 0.01543).exp()
    } else {
        cct
    }
}

const KANG_MIN_K: f64 = 1667.0;
const KANG_MAX_K: f64 = 25_000.0;
const KANG_SCAN_STEPS: usize = 256;
const KANG_REFINE_STEPS: usize = 64;

/// Kang et al. (2002) cubic spline from CCT to xy.
pub(super) fn kang_cct_to_xy(t: f64) -> Xy {
    let t2 = t * t;
    let t3 = t2 * t;

    let x = if t <= 4000.0 {
        -0.266_123_9e9 / t3 - 0.234_358_9e6 / t2 + 0.877_695_6e3 / t + 0.179_910
    } else {
        -3.025_846_9e9 / t3 + 2.107_037_9e6 / t2 + 0.222_634_7e3 / t + 0.240_390
    };

    let x2 = x * x;
    let x3 = x2 * x;
    let y = if t <= 2222.0 {
        -1.106_381_4 * x3 - 1.348_110_20 * x2 + 2.185_558_32 * x - 0.202_196_83
    } else if t <= 4000.0 {
        -0.954_947_6 * x3 - 1.374_185_93 * x2 + 2.091_370_15 * x - 0.167_488_67
    } else {
        3.081_758_0 * x3 - 5.873_386_70 * x2 + 3.751_129_97 * x - 0.370_014_83
    };

    Xy::new(x, y)
}

/// Kang et al. (2002), inverted numerically.
///
/// The forward spline has no closed-form inverse, so the temperature whose
/// spline point lies nearest `xy` is found with a coarse scan in mired space
/// followed by golden-section refinement.
pub fn kang_2002(xy: Xy) -> f64 {
    let distance = |t: f64| {
        let p = kang_cct_to_xy(t);
        (p.x - xy.x).hypot(p.y - xy.y)
    };

    let mired_hi = 1.0e6 / KANG_MIN_K;
    let mired_lo = 1.0e6 / KANG_MAX_K;
    let sample = |k: usize| {
        let mired = mired_lo + (mired_hi - mired_lo) * k as f64 / KANG_SCAN_STEPS as f64;
        1.0e6 / mired
    };

    let best = (0..=KANG_SCAN_STEPS)
        .min_by(|&a, &b| distance(sample(a)).total_cmp(&distance(sample(b))))
        .unwrap_or(0);

    if best == 0 || best == KANG_SCAN_STEPS {
        diagnostic!(
            x = xy.x,
            y = xy.y,
            "chromaticity outside the Kang 2002 domain, clamping search to its bound"
        );
    }

    // samples run from hot to cold, so the neighbour after `best` is cooler
    let mut lo = sample((best + 1).min(KANG_SCAN_STEPS));
    let mut hi = sample(best.saturating_sub(1));

    let ratio = (5.0_f64.sqrt() - 1.0) / 2.0;
    for _ in 0..KANG_REFINE_STEPS {
        let a = hi - ratio * (hi - lo);
        let b = lo + ratio * (hi - lo);
        if distance(a) < distance(b) {
            hi = b;
        } else {
            lo = a;
        }
    }

    (lo + hi) / 2.0
}
