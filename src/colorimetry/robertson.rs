//! Robertson (1968) isotemperature lines.

use super::Uv;

#[derive(Debug, Clone, Copy)]
struct Isotherm {
    /// reciprocal megakelvin
    mired: f64,
    u: f64,
    v: f64,
    /// slope of the isotemperature line in uv
    slope: f64,
}

const fn iso(mired: f64, u: f64, v: f64, slope: f64) -> Isotherm {
    Isotherm { mired, u, v, slope }
}

const ISOTHERMS: [Isotherm; 31] = [
    iso(0.0, 0.18006, 0.26352, -0.24341),
    iso(10.0, 0.18066, 0.26589, -0.25479),
    iso(20.0, 0.18133, 0.26846, -0.26876),
    iso(30.0, 0.18208, 0.27119, -0.28539),
    iso(40.0, 0.18293, 0.27407, -0.30470),
    iso(50.0, 0.18388, 0.27709, -0.32675),
    iso(60.0, 0.18494, 0.28021, -0.35156),
    iso(70.0, 0.18611, 0.28342, -0.37915),
    iso(80.0, 0.18740, 0.28668, -0.40955),
    iso(90.0, 0.18880, 0.28997, -0.44278),
    iso(100.0, 0.19032, 0.29326, -0.47888),
    iso(125.0, 0.19462, 0.30141, -0.58204),
    iso(150.0, 0.19962, 0.30921, -0.70471),
    iso(175.0, 0.20525, 0.31647, -0.84901),
    iso(200.0, 0.21142, 0.32312, -1.0182),
    iso(225.0, 0.21807, 0.32909, -1.2168),
    iso(250.0, 0.22511, 0.33439, -1.4512),
    iso(275.0, 0.23247, 0.33904, -1.7298),
    iso(300.0, 0.24010, 0.34308, -2.0637),
    iso(325.0, 0.24792, 0.34655, -2.4681),
    iso(350.0, 0.25591, 0.34951, -2.9641),
    iso(375.0, 0.26400, 0.35200, -3.5814),
    iso(400.0, 0.27218, 0.35407, -4.3633),
    iso(425.0, 0.28039, 0.35577, -5.3762),
    iso(450.0, 0.28863, 0.35714, -6.7262),
    iso(475.0, 0.29685, 0.35823, -8.5955),
    iso(500.0, 0.30505, 0.35907, -11.324),
    iso(525.0, 0.31320, 0.35968, -15.628),
    iso(550.0, 0.32129, 0.36011, -23.325),
    iso(575.0, 0.32931, 0.36038, -40.770),
    iso(600.0, 0.33724, 0.36051, -116.45),
];

/// Unit direction of an isotherm's slope
fn direction(slope: f64) -> (f64, f64) {
    let len = 1.0_f64.hypot(slope);
    (1.0 / len, slope / len)
}

/// uv of `cct` shifted by `duv` along the interpolated isotherm direction.
///
/// Temperatures below 1667 K (above 600 mired) extrapolate from the last two
/// isotherms.
pub(super) fn cct_to_uv(cct: f64, duv: f64) -> Uv {
    let mired = 1.0e6 / cct;
    let last = ISOTHERMS.len() - 2;
    let i = (0..last)
        .find(|&i| mired < ISOTHERMS[i + 1].mired)
        .unwrap_or(last);

    let lo = ISOTHERMS[i];
    let hi = ISOTHERMS[i + 1];
    let f = (hi.mired - mired) / (hi.mired - lo.mired);

    let u = lo.u * f + hi.u * (1.0 - f);
    let v = lo.v * f + hi.v * (1.0 - f);

    let (du1, dv1) = direction(lo.slope);
    let (du2, dv2) = direction(hi.slope);
    let du = du1 * f + du2 * (1.0 - f);
    let dv = dv1 * f + dv2 * (1.0 - f);
    let len = du.hypot(dv);

    Uv::new(u + du / len * -duv, v + dv / len * -duv)
}

/// Robertson's interpolation between the two isotherms bracketing `uv`.
/// Returns `(cct, duv)`.
pub(super) fn uv_to_cct(uv: Uv) -> (f64, f64) {
    let mut last_dt = 0.0;
    let mut last_du = 0.0;
    let mut last_dv = 0.0;

    for i in 1..ISOTHERMS.len() {
        let cur = ISOTHERMS[i];
        let prev = ISOTHERMS[i - 1];

        let (du, dv) = direction(cur.slope);
        let uu = uv.u - cur.u;
        let vv = uv.v - cur.v;
        let dt = -uu * dv + vv * du;

        if dt <= 0.0 || i == ISOTHERMS.len() - 1 {
            let dt = -dt.min(0.0);
            let f = if i == 1 { 0.0 } else { dt / (last_dt + dt) };

            let cct = 1.0e6 / (prev.mired * f + cur.mired * (1.0 - f));
            let uu = uv.u - (prev.u * f + cur.u * (1.0 - f));
            let vv = uv.v - (prev.v * f + cur.v * (1.0 - f));

            let du = du * (1.0 - f) + last_du * f;
            let dv = dv * (1.0 - f) + last_dv * f;
            let len = du.hypot(dv);
            let duv = uu * du / len + vv * dv / len;

            return (cct, -duv);
        }

        last_dt = dt;
        last_du = du;
        last_dv = dv;
    }

    (f64::NAN, f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_on_the_locus() {
        for cct in [2000.0, 4000.0, 6500.0, 10000.0, 20000.0] {
            let uv = cct_to_uv(cct, 0.0);
            let (back, duv) = uv_to_cct(uv);
            assert!((back - cct).abs() / cct < 0.01, "{cct} -> {back}");
            assert!(duv.abs() < 1e-3);
        }
    }

    #[test]
    fn offset_moves_perpendicular_to_the_locus() {
        let on = cct_to_uv(5000.0, 0.0);
        let above = cct_to_uv(5000.0, 0.025);
        let below = cct_to_uv(5000.0, -0.025);
        let dist = |a: Uv, b: Uv| (a.u - b.u).hypot(a.v - b.v);
        assert!((dist(on, above) - 0.025).abs() < 1e-9);
        assert!((dist(on, below) - 0.025).abs() < 1e-9);

        let (cct_above, _) = uv_to_cct(above);
        assert!((cct_above - 5000.0).abs() < 50.0);
    }

    #[test]
    fn very_low_temperatures_extrapolate() {
        let uv = cct_to_uv(1000.0, 0.0);
        assert!(uv.u.is_finite() && uv.v.is_finite());
        assert!(uv.u > ISOTHERMS[30].u);
    }
}
