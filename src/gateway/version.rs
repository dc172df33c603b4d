//! Engine version gate

use std::fmt;

/// Major/minor pair extracted from an engine version string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
}

impl EngineVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the leading `MAJOR.MINOR` of a version string
    ///
    /// Anything after the minor digits is ignored, so `4.4.1.stable.official`
    /// parses as 4.4. Returns `None` when the string does not start with
    /// two dot-separated numbers.
    pub fn parse(version: &str) -> Option<Self> {
        let (major, rest) = leading_number(version.trim())?;
        let rest = rest.strip_prefix('.')?;
        let (minor, _) = leading_number(rest)?;
        Some(Self { major, minor })
    }

    pub fn at_least(&self, required: EngineVersion) -> bool {
        *self >= required
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Whether `version` is at least `major.minor`; unparseable strings are not
pub fn is_at_least(version: &str, major: u32, minor: u32) -> bool {
    EngineVersion::parse(version)
        .map(|v| v.at_least(EngineVersion::new(major, minor)))
        .unwrap_or(false)
}

fn leading_number(s: &str) -> Option<(u32, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_gate() {
        assert!(is_at_least("4.4.1", 4, 4));
        assert!(!is_at_least("4.3.9", 4, 4));
        assert!(is_at_least("5.0", 4, 4));
        assert!(is_at_least("4.4", 4, 4));
        assert!(!is_at_least("3.9", 4, 4));
    }

    #[test]
    fn test_version_gate_non_matching() {
        for version in ["", "godot", "v4.4", "4", "4.", ".4", "four.four"] {
            assert!(!is_at_least(version, 4, 4), "Should reject: {:?}", version);
        }
    }

    #[test]
    fn test_parse_engine_output() {
        let v = EngineVersion::parse("4.4.1.stable.official.49a5bc7b6\n").unwrap();
        assert_eq!(v, EngineVersion::new(4, 4));
        assert_eq!(v.to_string(), "4.4");

        let v = EngineVersion::parse("4.10-beta").unwrap();
        assert_eq!(v, EngineVersion::new(4, 10));
    }

    #[test]
    fn test_ordering() {
        assert!(EngineVersion::new(4, 10) > EngineVersion::new(4, 4));
        assert!(EngineVersion::new(5, 0) > EngineVersion::new(4, 99));
        assert!(EngineVersion::new(4, 4).at_least(EngineVersion::new(4, 4)));
    }

    #[test]
    fn test_overflowing_number() {
        assert_eq!(EngineVersion::parse("99999999999.1"), None);
    }
}
