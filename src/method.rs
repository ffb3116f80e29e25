use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::domain::TemperatureRange;
use crate::error::{CctError, Result};

/// Named CCT estimation method.
///
/// Names match the colorimetry literature and are what configuration files and
/// the CLI accept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum Method {
    #[default]
    #[strum(serialize = "Ohno 2013")]
    Ohno2013,
    #[strum(serialize = "Robertson 1968")]
    Robertson1968,
    #[strum(serialize = "McCamy 1992")]
    McCamy1992,
    #[strum(serialize = "Kang 2002")]
    Kang2002,
    #[strum(serialize = "Hernandez 1999")]
    Hernandez1999,
    /// Hernández-Andrés constants for 3000-50000 K
    #[strum(serialize = "andres99_1")]
    Andres99Low,
    /// Hernández-Andrés constants for 50000-800000 K
    #[strum(serialize = "andres99_2")]
    Andres99High,
}

/// Static validity range of a method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MethodSpec {
    pub method: Method,
    pub range: TemperatureRange,
    /// Out-of-range points clamp to `high + 1` / `low - 1` instead of failing
    pub clamps: bool,
}

impl Method {
    pub fn parse(name: &str) -> Result<Self> {
        name.parse::<Method>()
            .map_err(|_| CctError::UnsupportedMethod(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn spec(self) -> MethodSpec {
        let (low, high) = match self {
            Method::Ohno2013 => (1000.0, 20_000.0),
            Method::Robertson1968 => (500.0, 1_000_000.0),
            Method::McCamy1992 => (2000.0, 12_500.0),
            Method::Kang2002 => (1667.0, 25_000.0),
            Method::Hernandez1999 => (3000.0, 1_000_000.0),
            Method::Andres99Low => (3000.0, 50_000.0),
            Method::Andres99High => (50_000.0, 800_000.0),
        };
        MethodSpec {
            method: self,
            range: TemperatureRange::new(low, high),
            clamps: matches!(self, Method::Ohno2013),
        }
    }

    pub fn all() -> impl Iterator<Item = Method> {
        Method::iter()
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Method::parse(&name).map_err(serde::de::Error::custom)
    }
}
