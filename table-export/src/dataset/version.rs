//! Provider version numbers

use std::fmt;
use std::str::FromStr;

/// `major.minor` version reported by a dataset provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProviderVersion {
    /// Last version that only offers the step cursor
    pub const LAST_STEP_CURSOR_ONLY: ProviderVersion = ProviderVersion::new(10, 0);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether this provider offers the column-projecting cursor
    pub fn has_projected_cursor(&self) -> bool {
        *self > Self::LAST_STEP_CURSOR_ONLY
    }
}

impl FromStr for ProviderVersion {
    type Err = String;

    /// Parses `M`, `M.m` or `M.m.patch` (the patch part is ignored)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let parse_part = |part: Option<&str>| -> Result<u32, String> {
            match part {
                None => Ok(0),
                Some(p) => p
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid provider version: {:?}", s)),
            }
        };

        let major = match parts.next() {
            Some(p) if !p.is_empty() => parse_part(Some(p))?,
            _ => return Err(format!("Invalid provider version: {:?}", s)),
        };
        let minor = parse_part(parts.next())?;
        // Patch digits still have to be numeric
        parse_part(parts.next())?;

        Ok(Self { major, minor })
    }
}

impl fmt::Display for ProviderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
