//! Colorimetric transforms and CCT solvers.
//!
//! This is the colorimetry collaborator the estimator is written against:
//! sRGB decoding, XYZ and chromaticity conversions, the Robertson 1968
//! isotemperature model, and a handful of named CCT solvers. Degenerate inputs
//! are reported through [`crate::diagnostic!`] and otherwise propagate as
//! non-finite numbers.

mod ohno;
mod robertson;
mod xy_methods;

pub use ohno::OhnoSolver;
pub use xy_methods::{hernandez_1999, kang_2002, mccamy_1992};

use thiserror::Error;

use crate::diagnostic;

/// sRGB to XYZ matrix (IEC 61966-2-1 primaries, D65 white)
const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_390_80, 0.357_584_34, 0.180_480_79],
    [0.212_639_01, 0.715_168_68, 0.072_192_32],
    [0.019_330_82, 0.119_194_78, 0.950_532_15],
];

/// CIE 1931 2° chromaticity of illuminant D65
pub const D65: Xy = Xy {
    x: 0.3127,
    y: 0.3290,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorimetryError {
    #[error("no CCT solver named '{0}'")]
    UnsupportedMethod(String),
}

/// 8-bit sRGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 0..1
    pub fn normalized(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }
}

/// CIE 1931 tristimulus values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// CIE 1931 chromaticity coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

impl Xy {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// CIE 1960 UCS chromaticity coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

impl Uv {
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// Colorimetry operations the CCT estimator depends on.
pub trait Colorimetry {
    /// sRGB (channels normalized to 0..1 after decoding the transfer curve) to XYZ
    fn srgb_to_xyz(&self, rgb: Rgb) -> Xyz;

    fn xyz_to_xy(&self, xyz: Xyz) -> Xy;

    /// Inverse of `xyz_to_xy` at unit luminance
    fn xy_to_xyz(&self, xy: Xy) -> Xyz;

    fn xyz_to_uv(&self, xyz: Xyz) -> Uv;

    /// Inverse of `xyz_to_uv` at unit luminance
    fn uv_to_xyz(&self, uv: Uv) -> Xyz;

    /// Point on the Robertson 1968 isotemperature line for `cct`, offset
    /// perpendicular to the Planckian locus by `duv`.
    fn cct_to_uv_robertson(&self, cct: f64, duv: f64) -> Uv;

    fn uv_to_cct_robertson(&self, uv: Uv) -> f64;

    fn uv_to_cct_ohno(&self, uv: Uv) -> f64;

    /// Generic named-method solver working directly on xy.
    fn xy_to_cct(&self, xy: Xy, method: &str) -> Result<f64, ColorimetryError>;

    fn uv_to_xy(&self, uv: Uv) -> Xy {
        self.xyz_to_xy(self.uv_to_xyz(uv))
    }

    fn xy_to_uv(&self, xy: Xy) -> Uv {
        self.xyz_to_uv(self.xy_to_xyz(xy))
    }

    fn rgb_to_xy(&self, rgb: Rgb) -> Xy {
        self.xyz_to_xy(self.srgb_to_xyz(rgb))
    }
}

/// Default colorimetry implementation
#[derive(Debug, Clone, Default)]
pub struct StandardColorimetry {
    ohno: OhnoSolver,
}

impl StandardColorimetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ohno_solver(ohno: OhnoSolver) -> Self {
        Self { ohno }
    }
}

/// sRGB transfer curve decode
#[inline]
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Colorimetry for StandardColorimetry {
    fn srgb_to_xyz(&self, rgb: Rgb) -> Xyz {
        let [r, g, b] = rgb.normalized().map(srgb_to_linear);
        let row = |m: [f64; 3]| m[0] * r + m[1] * g + m[2] * b;
        Xyz::new(
            row(SRGB_TO_XYZ[0]),
            row(SRGB_TO_XYZ[1]),
            row(SRGB_TO_XYZ[2]),
        )
    }

    fn xyz_to_xy(&self, xyz: Xyz) -> Xy {
        let sum = xyz.x + xyz.y + xyz.z;
        if sum == 0.0 {
            diagnostic!("tristimulus sum is zero, using the D65 white point chromaticity");
            return D65;
        }
        Xy::new(xyz.x / sum, xyz.y / sum)
    }

    fn xy_to_xyz(&self, xy: Xy) -> Xyz {
        if xy.y == 0.0 {
            diagnostic!(x = xy.x, "chromaticity y is zero, XYZ is undefined");
        }
        Xyz::new(xy.x / xy.y, 1.0, (1.0 - xy.x - xy.y) / xy.y)
    }

    fn xyz_to_uv(&self, xyz: Xyz) -> Uv {
        let denom = xyz.x + 15.0 * xyz.y + 3.0 * xyz.z;
        if denom == 0.0 {
            diagnostic!("X + 15Y + 3Z is zero, uv is undefined");
        }
        Uv::new(4.0 * xyz.x / denom, 6.0 * xyz.y / denom)
    }

    fn uv_to_xyz(&self, uv: Uv) -> Xyz {
        if uv.v == 0.0 {
            diagnostic!(u = uv.u, "chromaticity v is zero, XYZ is undefined");
        }
        Xyz::new(
            3.0 * uv.u / (2.0 * uv.v),
            1.0,
            (4.0 - uv.u - 10.0 * uv.v) / (2.0 * uv.v),
        )
    }

    fn cct_to_uv_robertson(&self, cct: f64, duv: f64) -> Uv {
        robertson::cct_to_uv(cct, duv)
    }

    fn uv_to_cct_robertson(&self, uv: Uv) -> f64 {
        robertson::uv_to_cct(uv).0
    }

    fn uv_to_cct_ohno(&self, uv: Uv) -> f64 {
        self.ohno.uv_to_cct(uv).0
    }

    fn xy_to_cct(&self, xy: Xy, method: &str) -> Result<f64, ColorimetryError> {
        match method {
            "McCamy 1992" => Ok(mccamy_1992(xy)),
            "Kang 2002" => Ok(kang_2002(xy)),
            "Hernandez 1999" => Ok(hernandez_1999(xy)),
            "Robertson 1968" => Ok(self.uv_to_cct_robertson(self.xy_to_uv(xy))),
            "Ohno 2013" => Ok(self.uv_to_cct_ohno(self.xy_to_uv(xy))),
            other => Err(ColorimetryError::UnsupportedMethod(other.to_string())),
        }
    }
}
