use core::{fmt, str::FromStr};

/// A Battle.net API region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Americas.
    Us,
    /// Europe.
    Eu,
    /// Korea.
    Kr,
    /// Taiwan.
    Tw,
    /// China.
    Cn,
}

impl Region {
    /// Every supported region, in display order.
    pub const ALL: [Self; 5] = [Self::Us, Self::Eu, Self::Kr, Self::Tw, Self::Cn];

    /// The lowercase region code, as used in hostnames and namespaces.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
            Self::Kr => "kr",
            Self::Tw => "tw",
            Self::Cn => "cn",
        }
    }

    /// The dynamic data namespace for this region, e.g. `dynamic-eu`.
    pub fn dynamic_namespace(&self) -> String {
        format!("dynamic-{self}")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A region code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Region must be one of the following: {}", allowed_regions())]
pub struct InvalidRegion {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Region {
    type Err = InvalidRegion;

    /// Exact, case-sensitive match on the region code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| InvalidRegion {
                input: s.to_owned(),
            })
    }
}

/// Returns true if `region` is one of the supported region codes.
pub fn is_valid_region(region: &str) -> bool {
    region.parse::<Region>().is_ok()
}

/// The supported region codes as a comma-separated list.
pub fn allowed_regions() -> String {
    Region::ALL.map(|region| region.as_str()).join(", ")
}
