//! Closed set of nationality codes accepted for user records.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// ISO 3166-1 alpha-2 codes, sorted so lookups can binary search.
const COUNTRY_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Nationality of a user, restricted to ISO 3166-1 alpha-2 country codes.
///
/// Codes are case sensitive: `"CA"` is accepted, `"ca"` is not.
///
/// # Examples
/// ```
/// use backend::domain::Nationality;
///
/// let nationality = Nationality::from_code("CA").expect("known code");
/// assert_eq!(nationality.as_str(), "CA");
/// assert!(Nationality::from_code("XX").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Nationality(&'static str);

impl Nationality {
    /// Look up a code in the closed set.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        COUNTRY_CODES
            .binary_search(&code)
            .ok()
            .and_then(|index| COUNTRY_CODES.get(index))
            .map(|known| Self(known))
    }

    /// Two-letter code as stored and serialised.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Nationality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<Nationality> for String {
    fn from(value: Nationality) -> Self {
        value.0.to_owned()
    }
}

/// Raised when a code is not part of the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown nationality code: {0}")]
pub struct UnknownNationality(pub String);

impl TryFrom<String> for Nationality {
    type Error = UnknownNationality;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value).ok_or(UnknownNationality(value))
    }
}

impl<'de> Deserialize<'de> for Nationality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Self::try_from(code).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn codes_are_sorted_and_unique() {
        assert!(COUNTRY_CODES.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(COUNTRY_CODES.len(), 249);
    }

    #[rstest]
    #[case("CA")]
    #[case("FR")]
    #[case("MA")]
    #[case("ZW")]
    fn known_codes_are_accepted(#[case] code: &str) {
        let nationality = Nationality::from_code(code).expect("known code");
        assert_eq!(nationality.as_str(), code);
    }

    #[rstest]
    #[case("")]
    #[case("ca")]
    #[case("CAN")]
    #[case("XX")]
    fn unknown_codes_are_rejected(#[case] code: &str) {
        assert!(Nationality::from_code(code).is_none());
    }

    #[test]
    fn serialises_as_plain_code() {
        let nationality = Nationality::from_code("SN").expect("known code");
        let json = serde_json::to_string(&nationality).expect("serialises");
        assert_eq!(json, "\"SN\"");
        let back: Nationality = serde_json::from_str(&json).expect("deserialises");
        assert_eq!(back, nationality);
    }

    fn decode_owned<T: serde::de::DeserializeOwned>(json: String) -> Result<T, serde_json::Error> {
        serde_json::from_str(&json)
    }

    #[test]
    fn deserialises_from_owned_input() {
        let back: Nationality = decode_owned("\"GB\"".to_owned()).expect("deserialises");
        assert_eq!(back.as_str(), "GB");
    }

    #[test]
    fn deserialising_unknown_code_fails() {
        let err = decode_owned::<Nationality>("\"XX\"".to_owned()).expect_err("unknown code");
        assert!(err.to_string().contains("unknown nationality code: XX"));
    }
}
