use std::fmt;

pub use semver::Version;

use super::constraint::ConstraintError;

/// Parses a full semantic version (`major.minor.patch[-pre][+build]`).
pub fn parse_version(s: &str) -> Result<Version, ConstraintError> {
    Version::parse(s).map_err(|_| ConstraintError::InvalidVersion(s.to_string()))
}

/// A version with optional minor and patch components.
///
/// Tilde and caret bounds accept partial versions (`~1`, `^0.2`), where the
/// omitted components widen the allowed range. All other constraint forms
/// require full versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialVersion {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
}

impl PartialVersion {
    pub fn parse(s: &str) -> Result<Self, ConstraintError> {
        if s.contains('-') || s.contains('+') {
            return Err(ConstraintError::PrereleaseInConstraint);
        }

        let mut segments = s.split('.');
        let major = parse_numeric(segments.next().unwrap_or(""), s)?;
        let minor = segments
            .next()
            .map(|seg| parse_numeric(seg, s))
            .transpose()?;
        let patch = segments
            .next()
            .map(|seg| parse_numeric(seg, s))
            .transpose()?;

        if segments.next().is_some() {
            return Err(ConstraintError::InvalidVersion(s.to_string()));
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    /// The lowest version covered by this partial version.
    pub fn floor(&self) -> Version {
        Version::new(
            self.major,
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        )
    }
}

impl fmt::Display for PartialVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{patch}")?;
        }
        Ok(())
    }
}

// Numeric identifiers must not have leading zeros beyond "0" itself.
fn parse_numeric(segment: &str, source: &str) -> Result<u64, ConstraintError> {
    if segment.is_empty()
        || !segment.bytes().all(|b| b.is_ascii_digit())
        || (segment.len() > 1 && segment.starts_with('0'))
    {
        return Err(ConstraintError::InvalidVersion(source.to_string()));
    }
    segment
        .parse()
        .map_err(|_| ConstraintError::InvalidVersion(source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn parse_full_version() {
        let v = parse_version("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn parse_prerelease_and_build() {
        let v = parse_version("1.0.0-alpha.1+build.5").unwrap();
        assert_eq!(v.pre.as_str(), "alpha.1");
        assert_eq!(v.build.as_str(), "build.5");
    }

    #[test]
    fn parse_rejects_leading_zeros() {
        assert!(parse_version("01.0.0").is_err());
        assert!(parse_version("1.0.0-01").is_err());
    }

    #[test]
    fn parse_rejects_partial() {
        assert!(parse_version("1").is_err());
        assert!(parse_version("1.2").is_err());
    }

    #[test]
    fn format_round_trip() {
        for source in ["0.0.0", "1.2.3", "1.0.0-alpha.1", "2.1.0-rc.2+build.11"] {
            let v = parse_version(source).unwrap();
            let reparsed = parse_version(&v.to_string()).unwrap();
            assert_eq!(v, reparsed, "round trip of {source:?}");
        }
    }

    #[test]
    fn ordering_is_total() {
        let versions = [
            parse_version("0.9.9").unwrap(),
            parse_version("1.0.0-alpha").unwrap(),
            parse_version("1.0.0").unwrap(),
            parse_version("1.0.1").unwrap(),
            parse_version("2.0.0").unwrap(),
        ];

        for a in &versions {
            for b in &versions {
                // Exactly one of a<b, a=b, a>b holds for every pair.
                let relations = [
                    a.cmp(b) == Ordering::Less,
                    a.cmp(b) == Ordering::Equal,
                    a.cmp(b) == Ordering::Greater,
                ];
                assert_eq!(
                    relations.iter().filter(|held| **held).count(),
                    1,
                    "{a} vs {b}"
                );
            }
        }

        let a = parse_version("1.0.0-alpha").unwrap();
        let b = parse_version("1.0.0").unwrap();
        assert_eq!(a.cmp(&b), Ordering::Less);
    }

    #[test]
    fn prerelease_ordering() {
        // numeric < non-numeric; numeric by value; shorter prefix loses
        let cases = [
            ("1.0.0-alpha", "1.0.0-alpha.1"),
            ("1.0.0-alpha.1", "1.0.0-alpha.beta"),
            ("1.0.0-alpha.beta", "1.0.0-beta"),
            ("1.0.0-beta.2", "1.0.0-beta.11"),
            ("1.0.0-rc.1", "1.0.0"),
        ];
        for (lo, hi) in cases {
            let lo = parse_version(lo).unwrap();
            let hi = parse_version(hi).unwrap();
            assert_eq!(lo.cmp(&hi), Ordering::Less, "{lo} < {hi}");
        }
    }

    #[test]
    fn partial_version_parse() {
        assert_eq!(
            PartialVersion::parse("1").unwrap(),
            PartialVersion {
                major: 1,
                minor: None,
                patch: None
            }
        );
        assert_eq!(
            PartialVersion::parse("1.2").unwrap(),
            PartialVersion {
                major: 1,
                minor: Some(2),
                patch: None
            }
        );
        assert_eq!(
            PartialVersion::parse("1.2.3").unwrap().floor(),
            Version::new(1, 2, 3)
        );
    }

    #[test]
    fn partial_version_rejects_prerelease() {
        assert_eq!(
            PartialVersion::parse("1.2.3-alpha"),
            Err(ConstraintError::PrereleaseInConstraint)
        );
    }

    #[test]
    fn partial_version_rejects_malformed() {
        assert!(PartialVersion::parse("").is_err());
        assert!(PartialVersion::parse("1.2.3.4").is_err());
        assert!(PartialVersion::parse("01").is_err());
        assert!(PartialVersion::parse("1.x").is_err());
    }

    #[test]
    fn partial_version_display() {
        assert_eq!(PartialVersion::parse("1").unwrap().to_string(), "1");
        assert_eq!(PartialVersion::parse("1.2").unwrap().to_string(), "1.2");
        assert_eq!(PartialVersion::parse("1.2.3").unwrap().to_string(), "1.2.3");
    }
}
