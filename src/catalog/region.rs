use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::LocalizedText;
use crate::utils::geo::Coordinate;

/// The ten administrative regions served by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionCode {
    Ad,
    Ce,
    En,
    Es,
    Lt,
    No,
    Nw,
    Ou,
    Su,
    Sw,
}

#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub code: RegionCode,
    pub name: LocalizedText,
    pub capital: &'static str,
    pub center: Coordinate,
}

impl RegionCode {
    pub const ALL: [RegionCode; 10] = [
        RegionCode::Ad,
        RegionCode::Ce,
        RegionCode::En,
        RegionCode::Es,
        RegionCode::Lt,
        RegionCode::No,
        RegionCode::Nw,
        RegionCode::Ou,
        RegionCode::Su,
        RegionCode::Sw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionCode::Ad => "AD",
            RegionCode::Ce => "CE",
            RegionCode::En => "EN",
            RegionCode::Es => "ES",
            RegionCode::Lt => "LT",
            RegionCode::No => "NO",
            RegionCode::Nw => "NW",
            RegionCode::Ou => "OU",
            RegionCode::Su => "SU",
            RegionCode::Sw => "SW",
        }
    }

    /// Regions sharing a border with this one
    pub fn adjacent(&self) -> &'static [RegionCode] {
        use RegionCode::*;
        match self {
            Ad => &[Ce, Es, No, Nw, Ou],
            Ce => &[Ad, Es, Lt, Ou, Su],
            En => &[No],
            Es => &[Ad, Ce, Su],
            Lt => &[Ce, Ou, Su, Sw],
            No => &[Ad, En],
            Nw => &[Ad, Ou, Sw],
            Ou => &[Ad, Ce, Lt, Nw, Sw],
            Su => &[Ce, Es, Lt],
            Sw => &[Lt, Nw, Ou],
        }
    }

    pub fn is_adjacent_to(&self, other: RegionCode) -> bool {
        self.adjacent().contains(&other)
    }

    pub fn region(&self) -> Region {
        let (fr, en, capital, lat, lng) = match self {
            RegionCode::Ad => ("Adamaoua", "Adamawa", "Ngaoundéré", 7.3167, 13.5833),
            RegionCode::Ce => ("Centre", "Centre", "Yaoundé", 3.8480, 11.5021),
            RegionCode::En => ("Extrême-Nord", "Far North", "Maroua", 10.5956, 14.3247),
            RegionCode::Es => ("Est", "East", "Bertoua", 4.5775, 13.6846),
            RegionCode::Lt => ("Littoral", "Littoral", "Douala", 4.0511, 9.7679),
            RegionCode::No => ("Nord", "North", "Garoua", 9.3017, 13.3921),
            RegionCode::Nw => ("Nord-Ouest", "North-West", "Bamenda", 5.9631, 10.1591),
            RegionCode::Ou => ("Ouest", "West", "Bafoussam", 5.4781, 10.4176),
            RegionCode::Su => ("Sud", "South", "Ebolowa", 2.9000, 11.1500),
            RegionCode::Sw => ("Sud-Ouest", "South-West", "Buea", 4.1527, 9.2410),
        };

        Region {
            code: *self,
            name: LocalizedText::new(fr, en),
            capital,
            center: Coordinate::new(lat, lng),
        }
    }

    pub fn center(&self) -> Coordinate {
        self.region().center
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl fmt::Display for UnknownRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown region code: {}", self.0)
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for RegionCode {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RegionCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRegion(wanted.to_string()))
    }
}

pub fn all_regions() -> Vec<Region> {
    RegionCode::ALL.iter().map(RegionCode::region).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_symmetric() {
        for code in RegionCode::ALL {
            assert!(!code.is_adjacent_to(code), "{code} lists itself");
            for neighbour in code.adjacent() {
                assert!(
                    neighbour.is_adjacent_to(code),
                    "{code} -> {neighbour} is not mirrored"
                );
            }
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("lt".parse::<RegionCode>().unwrap(), RegionCode::Lt);
        assert_eq!(" Nw ".parse::<RegionCode>().unwrap(), RegionCode::Nw);
        assert!("XX".parse::<RegionCode>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&RegionCode::Ou).unwrap();
        assert_eq!(json, "\"OU\"");
        let parsed: RegionCode = serde_json::from_str("\"SW\"").unwrap();
        assert_eq!(parsed, RegionCode::Sw);
    }

    #[test]
    fn test_every_region_has_a_table_entry() {
        let regions = all_regions();
        assert_eq!(regions.len(), 10);
        assert_eq!(RegionCode::Lt.region().capital, "Douala");
    }
}
