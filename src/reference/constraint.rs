use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use super::version::{parse_version, PartialVersion, Version};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("empty constraint")]
    Empty,

    #[error("empty constraint group")]
    EmptyGroup,

    #[error("invalid version {0:?}")]
    InvalidVersion(String),

    #[error("prerelease versions are not allowed in constraints")]
    PrereleaseInConstraint,

    #[error("bare wildcard cannot be combined with other bounds")]
    BareWildcard,

    #[error("multiple wildcards in one group")]
    MultipleWildcards,

    #[error("wildcard cannot be combined with operator or range bounds")]
    WildcardWithBounds,

    #[error("constraint has no upper bound")]
    MissingUpperBound,

    #[error("invalid range")]
    InvalidRange,

    #[error("no common versions")]
    NoCommonVersions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    /// `*` — any version.
    Any,
    /// `M.x.x` — any version within a major.
    Major(u64),
    /// `M.m.x` — any version within a major.minor.
    MajorMinor(u64, u64),
}

/// A single bound within a constraint group.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Compare(Op, Version),
    Tilde(PartialVersion),
    Caret(PartialVersion),
    /// Inclusive range, written `a - b`.
    Range(Version, Version),
    Wildcard(Wildcard),
}

/// Bounds joined by implicit AND.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintGroup {
    atoms: Vec<Atom>,
}

/// A semantic version constraint: groups of bounds joined by `||`.
///
/// A version matches the constraint if it matches every bound of at least
/// one group. Prereleases may not appear inside constraints, and a
/// candidate version carrying a prerelease never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionConstraint {
    groups: Vec<ConstraintGroup>,
}

impl VersionConstraint {
    /// Parses a constraint expression.
    ///
    /// Supported forms: comparison bounds (`=`, `>`, `>=`, `<`, `<=`),
    /// tilde and caret bounds (`~1.2`, `^0.4.1`), inclusive ranges
    /// (`1.0.0 - 2.0.0`), wildcards (`*`, `1.x.x`, `1.2.x`), and a bare
    /// version meaning exact equality. Bounds within a group are joined by
    /// whitespace (AND); groups are joined by `||` (OR).
    ///
    /// A group whose only bounds are `>` or `>=` is rejected: constraints
    /// must be bounded above.
    pub fn parse(s: &str) -> Result<Self, ConstraintError> {
        if s.trim().is_empty() {
            return Err(ConstraintError::Empty);
        }

        let mut groups = Vec::new();
        for group_source in s.split("||") {
            groups.push(ConstraintGroup::parse(group_source)?);
        }

        Ok(Self { groups })
    }

    /// Whether a version satisfies this constraint.
    pub fn matches(&self, v: &Version) -> bool {
        if !v.pre.is_empty() {
            return false;
        }
        self.groups.iter().any(|g| g.matches(v))
    }

    /// The constraint satisfied exactly by versions matching both inputs.
    ///
    /// Disjoint inputs produce a well-formed constraint that matches no
    /// version; use [`VersionConstraint::is_empty`] or
    /// [`VersionConstraint::require_satisfiable`] to detect that case.
    pub fn intersect(&self, other: &VersionConstraint) -> VersionConstraint {
        let mut groups = Vec::new();

        for a in &self.groups {
            let ia = a.interval();
            for b in &other.groups {
                let met = ia.meet(&b.interval());
                if !met.is_empty() {
                    groups.push(met.into_group());
                }
            }
        }

        if groups.is_empty() {
            return Self::unsatisfiable();
        }
        Self { groups }
    }

    /// Whether no version can satisfy this constraint.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.interval().is_empty())
    }

    /// Errors with `no common versions` when the constraint is empty.
    pub fn require_satisfiable(&self) -> Result<(), ConstraintError> {
        if self.is_empty() {
            return Err(ConstraintError::NoCommonVersions);
        }
        Ok(())
    }

    // The canonical constraint matching no version.
    fn unsatisfiable() -> Self {
        Self {
            groups: vec![ConstraintGroup {
                atoms: vec![Atom::Compare(Op::Lt, Version::new(0, 0, 0))],
            }],
        }
    }
}

impl std::str::FromStr for VersionConstraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl ConstraintGroup {
    fn parse(source: &str) -> Result<Self, ConstraintError> {
        let tokens: Vec<&str> = source.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(ConstraintError::EmptyGroup);
        }

        let mut atoms = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            // Inclusive range: `<version> - <version>`.
            if i + 2 < tokens.len() && tokens[i + 1] == "-" {
                let lo = parse_release(tokens[i])?;
                let hi = parse_release(tokens[i + 2])?;
                if hi < lo {
                    return Err(ConstraintError::InvalidRange);
                }
                atoms.push(Atom::Range(lo, hi));
                i += 3;
                continue;
            }
            if tokens[i] == "-" {
                return Err(ConstraintError::InvalidRange);
            }

            atoms.push(parse_atom(tokens[i])?);
            i += 1;
        }

        let group = Self { atoms };
        group.validate()?;
        Ok(group)
    }

    fn validate(&self) -> Result<(), ConstraintError> {
        let wildcards = self
            .atoms
            .iter()
            .filter(|a| matches!(a, Atom::Wildcard(_)))
            .count();

        if wildcards > 1 {
            return Err(ConstraintError::MultipleWildcards);
        }
        if wildcards == 1 && self.atoms.len() > 1 {
            if self.atoms.contains(&Atom::Wildcard(Wildcard::Any)) {
                return Err(ConstraintError::BareWildcard);
            }
            return Err(ConstraintError::WildcardWithBounds);
        }

        let has_lower = self
            .atoms
            .iter()
            .any(|a| matches!(a, Atom::Compare(Op::Gt | Op::Gte, _)));
        let has_upper = self.atoms.iter().any(|a| {
            !matches!(a, Atom::Compare(Op::Gt | Op::Gte, _))
        });
        if has_lower && !has_upper {
            return Err(ConstraintError::MissingUpperBound);
        }

        Ok(())
    }

    fn matches(&self, v: &Version) -> bool {
        self.atoms.iter().all(|a| a.matches(v))
    }

    fn interval(&self) -> Interval {
        let mut interval = Interval::unbounded();
        for atom in &self.atoms {
            interval = interval.meet(&atom.interval());
        }
        interval
    }
}

fn parse_atom(token: &str) -> Result<Atom, ConstraintError> {
    if token == "*" {
        return Ok(Atom::Wildcard(Wildcard::Any));
    }

    for (prefix, op) in [
        (">=", Op::Gte),
        ("<=", Op::Lte),
        (">", Op::Gt),
        ("<", Op::Lt),
        ("=", Op::Eq),
    ] {
        if let Some(rest) = token.strip_prefix(prefix) {
            return Ok(Atom::Compare(op, parse_release(rest)?));
        }
    }

    if let Some(rest) = token.strip_prefix('~') {
        return Ok(Atom::Tilde(PartialVersion::parse(rest)?));
    }
    if let Some(rest) = token.strip_prefix('^') {
        return Ok(Atom::Caret(PartialVersion::parse(rest)?));
    }

    if let Some(wildcard) = parse_wildcard(token)? {
        return Ok(Atom::Wildcard(wildcard));
    }

    // A bare version is an exact bound.
    Ok(Atom::Compare(Op::Eq, parse_release(token)?))
}

// Parses `M.x.x` / `M.m.x` forms. Returns Ok(None) for tokens without a
// wildcard segment.
fn parse_wildcard(token: &str) -> Result<Option<Wildcard>, ConstraintError> {
    if !token.split('.').any(|seg| seg == "x") {
        return Ok(None);
    }

    let segments: Vec<&str> = token.split('.').collect();
    match segments.as_slice() {
        [major, "x", "x"] | [major, "x"] => {
            let major = major
                .parse()
                .map_err(|_| ConstraintError::InvalidVersion(token.to_string()))?;
            Ok(Some(Wildcard::Major(major)))
        }
        [major, minor, "x"] => {
            let major = major
                .parse()
                .map_err(|_| ConstraintError::InvalidVersion(token.to_string()))?;
            let minor = minor
                .parse()
                .map_err(|_| ConstraintError::InvalidVersion(token.to_string()))?;
            Ok(Some(Wildcard::MajorMinor(major, minor)))
        }
        _ => Err(ConstraintError::InvalidVersion(token.to_string())),
    }
}

// Parses a full version and rejects prerelease or build components, which
// are not allowed inside constraints.
fn parse_release(s: &str) -> Result<Version, ConstraintError> {
    let v = parse_version(s)?;
    if !v.pre.is_empty() {
        return Err(ConstraintError::PrereleaseInConstraint);
    }
    if !v.build.is_empty() {
        return Err(ConstraintError::InvalidVersion(s.to_string()));
    }
    Ok(v)
}

impl Atom {
    fn matches(&self, v: &Version) -> bool {
        match self {
            Atom::Compare(op, bound) => {
                let ord = v.cmp(bound);
                match op {
                    Op::Eq => ord == Ordering::Equal,
                    Op::Gt => ord == Ordering::Greater,
                    Op::Gte => ord != Ordering::Less,
                    Op::Lt => ord == Ordering::Less,
                    Op::Lte => ord != Ordering::Greater,
                }
            }
            Atom::Tilde(_) | Atom::Caret(_) | Atom::Range(_, _) | Atom::Wildcard(_) => {
                self.interval().contains(v)
            }
        }
    }

    fn interval(&self) -> Interval {
        match self {
            Atom::Compare(Op::Eq, v) => Interval::closed(v.clone(), v.clone()),
            Atom::Compare(Op::Gt, v) => Interval::above(v.clone(), Edge::Exclusive),
            Atom::Compare(Op::Gte, v) => Interval::above(v.clone(), Edge::Inclusive),
            Atom::Compare(Op::Lt, v) => Interval::below(v.clone(), Edge::Exclusive),
            Atom::Compare(Op::Lte, v) => Interval::below(v.clone(), Edge::Inclusive),
            Atom::Tilde(p) => Interval::half_open(p.floor(), tilde_upper(p)),
            Atom::Caret(p) => Interval::half_open(p.floor(), caret_upper(p)),
            Atom::Range(lo, hi) => Interval::closed(lo.clone(), hi.clone()),
            Atom::Wildcard(Wildcard::Any) => Interval::unbounded(),
            Atom::Wildcard(Wildcard::Major(m)) => {
                Interval::half_open(Version::new(*m, 0, 0), Version::new(m + 1, 0, 0))
            }
            Atom::Wildcard(Wildcard::MajorMinor(m, n)) => {
                Interval::half_open(Version::new(*m, *n, 0), Version::new(*m, n + 1, 0))
            }
        }
    }
}

// `~` allows patch-level changes when a minor is present, minor-level
// changes when only the major is present.
fn tilde_upper(p: &PartialVersion) -> Version {
    match p.minor {
        Some(minor) => Version::new(p.major, minor + 1, 0),
        None => Version::new(p.major + 1, 0, 0),
    }
}

// `^` allows changes that do not modify the left-most non-zero element.
fn caret_upper(p: &PartialVersion) -> Version {
    if p.major > 0 {
        return Version::new(p.major + 1, 0, 0);
    }
    match p.minor {
        None => Version::new(1, 0, 0),
        Some(minor) if minor > 0 => Version::new(0, minor + 1, 0),
        Some(_) => match p.patch {
            None => Version::new(0, 1, 0),
            Some(patch) => Version::new(0, 0, patch + 1),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Inclusive,
    Exclusive,
}

// A contiguous span of release versions. `None` bounds are unbounded; the
// implicit floor of the version space is 0.0.0.
#[derive(Debug, Clone)]
struct Interval {
    lo: Option<(Version, Edge)>,
    hi: Option<(Version, Edge)>,
}

impl Interval {
    fn unbounded() -> Self {
        Self { lo: None, hi: None }
    }

    fn above(v: Version, edge: Edge) -> Self {
        Self {
            lo: Some((v, edge)),
            hi: None,
        }
    }

    fn below(v: Version, edge: Edge) -> Self {
        Self {
            lo: None,
            hi: Some((v, edge)),
        }
    }

    fn closed(lo: Version, hi: Version) -> Self {
        Self {
            lo: Some((lo, Edge::Inclusive)),
            hi: Some((hi, Edge::Inclusive)),
        }
    }

    fn half_open(lo: Version, hi: Version) -> Self {
        Self {
            lo: Some((lo, Edge::Inclusive)),
            hi: Some((hi, Edge::Exclusive)),
        }
    }

    fn contains(&self, v: &Version) -> bool {
        if let Some((lo, edge)) = &self.lo {
            match v.cmp(lo) {
                Ordering::Less => return false,
                Ordering::Equal if *edge == Edge::Exclusive => return false,
                _ => {}
            }
        }
        if let Some((hi, edge)) = &self.hi {
            match v.cmp(hi) {
                Ordering::Greater => return false,
                Ordering::Equal if *edge == Edge::Exclusive => return false,
                _ => {}
            }
        }
        true
    }

    fn meet(&self, other: &Interval) -> Interval {
        let lo = tighter_bound(&self.lo, &other.lo, Ordering::Greater);
        let hi = tighter_bound(&self.hi, &other.hi, Ordering::Less);
        Interval { lo, hi }
    }

    fn is_empty(&self) -> bool {
        // Versions are non-negative, so an unbounded low edge is 0.0.0.
        let zero = (Version::new(0, 0, 0), Edge::Inclusive);
        let (lo, lo_edge) = self.lo.as_ref().unwrap_or(&zero);
        let Some((hi, hi_edge)) = &self.hi else {
            return false;
        };

        match lo.cmp(hi) {
            Ordering::Greater => true,
            Ordering::Equal => *lo_edge == Edge::Exclusive || *hi_edge == Edge::Exclusive,
            Ordering::Less => false,
        }
    }

    fn into_group(self) -> ConstraintGroup {
        if let (Some((lo, Edge::Inclusive)), Some((hi, Edge::Inclusive))) = (&self.lo, &self.hi) {
            if lo == hi {
                return ConstraintGroup {
                    atoms: vec![Atom::Compare(Op::Eq, lo.clone())],
                };
            }
        }

        let mut atoms = Vec::new();
        if let Some((lo, edge)) = self.lo {
            let op = match edge {
                Edge::Inclusive => Op::Gte,
                Edge::Exclusive => Op::Gt,
            };
            atoms.push(Atom::Compare(op, lo));
        }
        if let Some((hi, edge)) = self.hi {
            let op = match edge {
                Edge::Inclusive => Op::Lte,
                Edge::Exclusive => Op::Lt,
            };
            atoms.push(Atom::Compare(op, hi));
        }
        if atoms.is_empty() {
            atoms.push(Atom::Wildcard(Wildcard::Any));
        }

        ConstraintGroup { atoms }
    }
}

// Picks the tighter of two optional bounds; `prefer` says which ordering
// wins (Greater for low bounds, Less for high bounds). On equal versions
// the exclusive edge is tighter.
fn tighter_bound(
    a: &Option<(Version, Edge)>,
    b: &Option<(Version, Edge)>,
    prefer: Ordering,
) -> Option<(Version, Edge)> {
    match (a, b) {
        (None, None) => None,
        (Some(bound), None) | (None, Some(bound)) => Some(bound.clone()),
        (Some((va, ea)), Some((vb, eb))) => {
            let ord = va.cmp(vb);
            if ord == prefer {
                Some((va.clone(), *ea))
            } else if ord == Ordering::Equal {
                let edge = if *ea == Edge::Exclusive || *eb == Edge::Exclusive {
                    Edge::Exclusive
                } else {
                    Edge::Inclusive
                };
                Some((va.clone(), edge))
            } else {
                Some((vb.clone(), *eb))
            }
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Op::Eq => "",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Compare(op, v) => write!(f, "{op}{v}"),
            Atom::Tilde(p) => write!(f, "~{p}"),
            Atom::Caret(p) => write!(f, "^{p}"),
            Atom::Range(lo, hi) => write!(f, "{lo} - {hi}"),
            Atom::Wildcard(Wildcard::Any) => f.write_str("*"),
            Atom::Wildcard(Wildcard::Major(m)) => write!(f, "{m}.x.x"),
            Atom::Wildcard(Wildcard::MajorMinor(m, n)) => write!(f, "{m}.{n}.x"),
        }
    }
}

impl fmt::Display for ConstraintGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" || ")?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(s: &str) -> VersionConstraint {
        VersionConstraint::parse(s).unwrap()
    }

    fn version(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    fn assert_matches(c: &VersionConstraint, yes: &[&str], no: &[&str]) {
        for v in yes {
            assert!(c.matches(&version(v)), "{c} should match {v}");
        }
        for v in no {
            assert!(!c.matches(&version(v)), "{c} should not match {v}");
        }
    }

    #[test]
    fn exact_bound() {
        let c = constraint("=1.0.0");
        assert_matches(&c, &["1.0.0"], &["1.0.1", "0.9.9"]);
    }

    #[test]
    fn bare_version_is_exact() {
        let c = constraint("1.0.0");
        assert_matches(&c, &["1.0.0"], &["1.0.1"]);
    }

    #[test]
    fn comparison_bounds() {
        let c = constraint(">=1.0.0 <2.0.0");
        assert_matches(&c, &["1.0.0", "1.9.9"], &["2.0.0", "0.9.9"]);

        let c = constraint(">1.0.0 <=2.0.0");
        assert_matches(&c, &["1.0.1", "2.0.0"], &["1.0.0", "2.0.1"]);
    }

    #[test]
    fn caret_bound() {
        assert_matches(
            &constraint("^1.2.3"),
            &["1.2.3", "1.9.0"],
            &["1.2.2", "2.0.0"],
        );
        assert_matches(
            &constraint("^0.2.3"),
            &["0.2.3", "0.2.9"],
            &["0.3.0", "1.0.0"],
        );
        assert_matches(&constraint("^0.0.3"), &["0.0.3"], &["0.0.4", "0.1.0"]);
        assert_matches(&constraint("^0"), &["0.0.0", "0.9.9"], &["1.0.0"]);
    }

    #[test]
    fn tilde_bound() {
        assert_matches(
            &constraint("~1.2.3"),
            &["1.2.3", "1.2.9"],
            &["1.3.0", "1.2.2"],
        );
        assert_matches(&constraint("~1.2"), &["1.2.0", "1.2.9"], &["1.3.0"]);
        assert_matches(&constraint("~1"), &["1.0.0", "1.9.9"], &["2.0.0"]);
    }

    #[test]
    fn inclusive_range() {
        let c = constraint("1.0.0 - 2.0.0");
        assert_matches(&c, &["1.0.0", "1.5.0", "2.0.0"], &["0.9.9", "2.0.1"]);
    }

    #[test]
    fn reversed_range_rejected() {
        assert_eq!(
            VersionConstraint::parse("2.0.0 - 1.0.0"),
            Err(ConstraintError::InvalidRange)
        );
    }

    #[test]
    fn wildcards() {
        assert_matches(&constraint("*"), &["0.0.1", "99.0.0"], &[]);
        assert_matches(&constraint("1.x.x"), &["1.0.0", "1.9.9"], &["2.0.0"]);
        assert_matches(&constraint("1.2.x"), &["1.2.0", "1.2.9"], &["1.3.0"]);
    }

    #[test]
    fn or_groups() {
        let c = constraint(">=1.0.0 <2.0.0 || >=3.0.0 <4.0.0");
        assert_matches(&c, &["1.5.0", "3.5.0"], &["2.5.0", "4.0.0"]);
    }

    #[test]
    fn empty_constraint_rejected() {
        assert_eq!(VersionConstraint::parse(""), Err(ConstraintError::Empty));
        assert_eq!(
            VersionConstraint::parse(">=1.0.0 <2.0.0 ||"),
            Err(ConstraintError::EmptyGroup)
        );
    }

    #[test]
    fn bare_wildcard_with_other_tokens_rejected() {
        assert_eq!(
            VersionConstraint::parse("* >=1.0.0"),
            Err(ConstraintError::BareWildcard)
        );
    }

    #[test]
    fn multiple_wildcards_rejected() {
        assert_eq!(
            VersionConstraint::parse("1.x.x 2.x.x"),
            Err(ConstraintError::MultipleWildcards)
        );
    }

    #[test]
    fn wildcard_with_bounds_rejected() {
        assert_eq!(
            VersionConstraint::parse("1.x.x <1.5.0"),
            Err(ConstraintError::WildcardWithBounds)
        );
    }

    #[test]
    fn missing_upper_bound_rejected() {
        assert_eq!(
            VersionConstraint::parse(">=1.0.0"),
            Err(ConstraintError::MissingUpperBound)
        );
        assert_eq!(
            VersionConstraint::parse(">1.0.0 >=1.2.0"),
            Err(ConstraintError::MissingUpperBound)
        );
        // An upper bound in one group does not cover another group.
        assert_eq!(
            VersionConstraint::parse("<2.0.0 || >=3.0.0"),
            Err(ConstraintError::MissingUpperBound)
        );
    }

    #[test]
    fn prerelease_rejected_in_constraints() {
        assert_eq!(
            VersionConstraint::parse(">=1.0.0-alpha <2.0.0"),
            Err(ConstraintError::PrereleaseInConstraint)
        );
        assert_eq!(
            VersionConstraint::parse("1.0.0-alpha - 2.0.0"),
            Err(ConstraintError::PrereleaseInConstraint)
        );
        assert_eq!(
            VersionConstraint::parse("~1.2.3-alpha"),
            Err(ConstraintError::PrereleaseInConstraint)
        );
    }

    #[test]
    fn prerelease_candidates_never_match() {
        let c = constraint(">=1.0.0 <2.0.0");
        assert!(!c.matches(&version("1.5.0-alpha")));

        assert!(!constraint("*").matches(&version("1.0.0-rc.1")));
    }

    #[test]
    fn display_round_trip() {
        for source in [
            ">=1.0.0 <2.0.0",
            "~1.2 || ^0.4.1",
            "1.0.0 - 2.0.0",
            "1.x.x",
            "1.2.x",
            "*",
            ">1.0.0 <=3.0.0 || 4.x.x",
        ] {
            let c = constraint(source);
            let reparsed = constraint(&c.to_string());
            assert_eq!(c, reparsed, "round trip of {source:?}");
        }
    }

    #[test]
    fn intersect_overlapping() {
        let a = constraint(">=1.0.0 <2.0.0");
        let b = constraint(">=1.5.0 <3.0.0");
        let c = a.intersect(&b);

        assert_matches(&c, &["1.5.0", "1.9.9"], &["1.4.9", "2.0.0"]);
        assert!(!c.is_empty());
    }

    #[test]
    fn intersect_disjoint_is_empty() {
        let a = constraint(">=1.0.0 <2.0.0");
        let b = constraint(">=3.0.0 <4.0.0");
        let c = a.intersect(&b);

        assert!(c.is_empty());
        assert_eq!(
            c.require_satisfiable(),
            Err(ConstraintError::NoCommonVersions)
        );
        assert_matches(&c, &[], &["0.0.0", "1.5.0", "3.5.0"]);

        // The empty result is well-formed and reparses.
        let reparsed = constraint(&c.to_string());
        assert!(reparsed.is_empty());
    }

    #[test]
    fn intersect_is_commutative() {
        let samples = ["0.9.0", "1.0.0", "1.5.0", "2.0.0", "2.5.0", "3.0.0"];
        let a = constraint(">=1.0.0 <2.5.0 || =3.0.0");
        let b = constraint("~1.5 || >=2.0.0 <3.5.0");

        let ab = a.intersect(&b);
        let ba = b.intersect(&a);
        for s in samples {
            let v = version(s);
            assert_eq!(ab.matches(&v), ba.matches(&v), "at {s}");
        }
    }

    #[test]
    fn intersect_is_associative() {
        let samples = ["1.0.0", "1.2.0", "1.5.0", "1.8.0", "2.0.0"];
        let a = constraint(">=1.0.0 <2.0.0");
        let b = constraint(">=1.2.0 <1.9.0");
        let c = constraint("<=1.7.0 >=1.1.0");

        let left = a.intersect(&b).intersect(&c);
        let right = a.intersect(&b.intersect(&c));
        for s in samples {
            let v = version(s);
            assert_eq!(left.matches(&v), right.matches(&v), "at {s}");
        }
    }

    #[test]
    fn intersect_self_is_idempotent() {
        let samples = ["0.9.9", "1.0.0", "1.5.0", "2.0.0"];
        let c = constraint(">=1.0.0 <2.0.0 || 3.x.x");
        let cc = c.intersect(&c);
        for s in samples {
            let v = version(s);
            assert_eq!(c.matches(&v), cc.matches(&v), "at {s}");
        }
    }

    #[test]
    fn intersect_exact_versions() {
        let a = constraint("=1.0.0");
        let b = constraint(">=0.5.0 <1.5.0");
        let c = a.intersect(&b);
        assert_matches(&c, &["1.0.0"], &["1.0.1", "0.9.9"]);

        let disjoint = a.intersect(&constraint("=2.0.0"));
        assert!(disjoint.is_empty());
    }

    #[test]
    fn intersect_wildcards() {
        let a = constraint("1.x.x");
        let b = constraint(">=1.5.0 <3.0.0");
        let c = a.intersect(&b);
        assert_matches(&c, &["1.5.0", "1.9.9"], &["1.4.9", "2.0.0"]);
    }
}
