use std::fmt;

use super::ReferenceError;

/// Content-addressable digest for resource verification.
///
/// When a digest is present on a reference, the reference is frozen and
/// always refers to the exact same content. Only the `algorithm:hash`
/// format is validated here; checking the hash against file contents is a
/// higher-layer concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    algorithm: String,
    hash: String,
}

impl Digest {
    /// Parses a digest string in the form `algorithm:hash`.
    ///
    /// Both halves are normalized to lowercase and must be non-empty.
    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        let s = s.trim();

        let Some((algorithm, hash)) = s.split_once(':') else {
            return Err(ReferenceError::InvalidDigest(
                "missing digest algorithm prefix".to_string(),
            ));
        };

        if algorithm.is_empty() {
            return Err(ReferenceError::InvalidDigest(
                "empty digest algorithm".to_string(),
            ));
        }
        if hash.is_empty() {
            return Err(ReferenceError::InvalidDigest(
                "empty digest hash".to_string(),
            ));
        }

        Ok(Self {
            algorithm: algorithm.to_lowercase(),
            hash: hash.to_lowercase(),
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let d = Digest::parse("sha256:abcd1234").unwrap();
        assert_eq!(d.algorithm(), "sha256");
        assert_eq!(d.hash(), "abcd1234");
        assert_eq!(d.to_string(), "sha256:abcd1234");
    }

    #[test]
    fn parse_normalizes_case() {
        let d = Digest::parse("SHA256:ABCD1234").unwrap();
        assert_eq!(d.to_string(), "sha256:abcd1234");
    }

    #[test]
    fn parse_missing_colon() {
        assert!(Digest::parse("sha256abcd").is_err());
    }

    #[test]
    fn parse_empty_halves() {
        assert!(Digest::parse(":abcd").is_err());
        assert!(Digest::parse("sha256:").is_err());
    }

    #[test]
    fn equality() {
        let a = Digest::parse("sha256:abcd").unwrap();
        let b = Digest::parse("SHA256:abcd").unwrap();
        let c = Digest::parse("sha512:abcd").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
