//! Postal code syntax checks and region lookup.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Region reported for well-formed codes whose prefix matches no range.
pub const UNKNOWN_REGION: &str = "unknown";

/// An inclusive range of two-digit postal prefixes belonging to one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostalRegion {
    /// First prefix of the range.
    pub first: u8,
    /// Last prefix of the range, inclusive.
    pub last: u8,
    /// Administrative region name.
    pub name: &'static str,
}

/// Ordered prefix table; the first matching range wins.
pub const POSTAL_REGIONS: &[PostalRegion] = &[
    PostalRegion {
        first: 10,
        last: 19,
        name: "Praha",
    },
    PostalRegion {
        first: 20,
        last: 29,
        name: "Středočeský kraj",
    },
    PostalRegion {
        first: 30,
        last: 39,
        name: "Západní Čechy",
    },
    PostalRegion {
        first: 40,
        last: 49,
        name: "Severní Čechy",
    },
    PostalRegion {
        first: 50,
        last: 59,
        name: "Východní Čechy",
    },
    PostalRegion {
        first: 60,
        last: 69,
        name: "Jižní Morava",
    },
    PostalRegion {
        first: 70,
        last: 79,
        name: "Severní Morava",
    },
];

/// Outcome of [`validate_postal_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PostalCodeCheck {
    /// Whether the code is five ASCII digits once whitespace is removed.
    pub valid: bool,
    /// Region for a valid code; `None` when the code is invalid.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub region: Option<String>,
}

impl PostalCodeCheck {
    const fn invalid() -> Self {
        Self {
            valid: false,
            region: None,
        }
    }
}

/// Validate a postal code and resolve its region.
///
/// All whitespace is stripped first, so `"110 00"` and `"11000"` are
/// equivalent.
///
/// # Examples
///
/// ```
/// use lastmile_core::validate_postal_code;
///
/// let check = validate_postal_code("110 00");
/// assert!(check.valid);
/// assert_eq!(check.region.as_deref(), Some("Praha"));
///
/// assert!(!validate_postal_code("1100").valid);
/// ```
#[must_use]
pub fn validate_postal_code(code: &str) -> PostalCodeCheck {
    let digits: Vec<u8> = code
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| u8::try_from(ch).ok().filter(u8::is_ascii_digit))
        .collect::<Option<_>>()
        .unwrap_or_default();

    let [tens, units, _, _, _] = digits.as_slice() else {
        return PostalCodeCheck::invalid();
    };
    let prefix = (tens - b'0') * 10 + (units - b'0');
    let region = region_for_prefix(prefix).map_or(UNKNOWN_REGION, |found| found.name);

    PostalCodeCheck {
        valid: true,
        region: Some(region.to_owned()),
    }
}

fn region_for_prefix(prefix: u8) -> Option<&'static PostalRegion> {
    POSTAL_REGIONS
        .iter()
        .find(|region| (region.first..=region.last).contains(&prefix))
}
