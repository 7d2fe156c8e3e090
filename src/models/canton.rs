//! Swiss cantons.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The 26 Swiss cantons, identified by their official abbreviation.
///
/// The canton of the workplace selects the holiday calendar and the sick pay
/// scale.
///
/// # Example
///
/// ```
/// use emplaw_engine::models::Canton;
///
/// let canton: Canton = "ZH".parse().unwrap();
/// assert_eq!(canton, Canton::Zh);
/// assert_eq!(canton.to_string(), "ZH");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Canton {
    /// Aargau
    Ag,
    /// Appenzell Innerrhoden
    Ai,
    /// Appenzell Ausserrhoden
    Ar,
    /// Bern
    Be,
    /// Basel-Landschaft
    Bl,
    /// Basel-Stadt
    Bs,
    /// Fribourg
    Fr,
    /// Geneva
    Ge,
    /// Glarus
    Gl,
    /// Graubünden
    Gr,
    /// Jura
    Ju,
    /// Lucerne
    Lu,
    /// Neuchâtel
    Ne,
    /// Nidwalden
    Nw,
    /// Obwalden
    Ow,
    /// St. Gallen
    Sg,
    /// Schaffhausen
    Sh,
    /// Solothurn
    So,
    /// Schwyz
    Sz,
    /// Thurgau
    Tg,
    /// Ticino
    Ti,
    /// Uri
    Ur,
    /// Vaud
    Vd,
    /// Valais
    Vs,
    /// Zug
    Zg,
    /// Zurich
    Zh,
}

impl Canton {
    /// All cantons in alphabetical order of their abbreviation.
    pub const ALL: [Canton; 26] = [
        Canton::Ag,
        Canton::Ai,
        Canton::Ar,
        Canton::Be,
        Canton::Bl,
        Canton::Bs,
        Canton::Fr,
        Canton::Ge,
        Canton::Gl,
        Canton::Gr,
        Canton::Ju,
        Canton::Lu,
        Canton::Ne,
        Canton::Nw,
        Canton::Ow,
        Canton::Sg,
        Canton::Sh,
        Canton::So,
        Canton::Sz,
        Canton::Tg,
        Canton::Ti,
        Canton::Ur,
        Canton::Vd,
        Canton::Vs,
        Canton::Zg,
        Canton::Zh,
    ];

    /// Returns the official two-letter abbreviation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Canton::Ag => "AG",
            Canton::Ai => "AI",
            Canton::Ar => "AR",
            Canton::Be => "BE",
            Canton::Bl => "BL",
            Canton::Bs => "BS",
            Canton::Fr => "FR",
            Canton::Ge => "GE",
            Canton::Gl => "GL",
            Canton::Gr => "GR",
            Canton::Ju => "JU",
            Canton::Lu => "LU",
            Canton::Ne => "NE",
            Canton::Nw => "NW",
            Canton::Ow => "OW",
            Canton::Sg => "SG",
            Canton::Sh => "SH",
            Canton::So => "SO",
            Canton::Sz => "SZ",
            Canton::Tg => "TG",
            Canton::Ti => "TI",
            Canton::Ur => "UR",
            Canton::Vd => "VD",
            Canton::Vs => "VS",
            Canton::Zg => "ZG",
            Canton::Zh => "ZH",
        }
    }
}

impl std::fmt::Display for Canton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Canton {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Canton::ALL
            .iter()
            .copied()
            .find(|canton| canton.as_str() == code)
            .ok_or(EngineError::UnknownCanton { code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("vd".parse::<Canton>().unwrap(), Canton::Vd);
        assert_eq!(" GE ".parse::<Canton>().unwrap(), Canton::Ge);
    }

    #[test]
    fn test_parse_unknown_canton() {
        match "XX".parse::<Canton>() {
            Err(EngineError::UnknownCanton { code }) => assert_eq!(code, "XX"),
            other => panic!("Expected UnknownCanton, got {:?}", other),
        }
    }

    #[test]
    fn test_all_cantons_round_trip_through_abbreviation() {
        for canton in Canton::ALL {
            assert_eq!(canton.as_str().parse::<Canton>().unwrap(), canton);
        }
    }

    #[test]
    fn test_serialization_uses_abbreviation() {
        assert_eq!(serde_json::to_string(&Canton::Bs).unwrap(), "\"BS\"");
        let canton: Canton = serde_json::from_str("\"AI\"").unwrap();
        assert_eq!(canton, Canton::Ai);
    }
}
