//! Maven version ordering and range matching.
//!
//! Versions split on `.` and `-` into segments. Numeric segments compare as
//! numbers; well-known qualifiers order as
//! `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`.
//! Trailing zero segments are insignificant, so `1.0` equals `1.0.0`.
//! AndroidX-style suffixes such as `beta01` are split into qualifier and
//! number, so `1.1.0-beta01` < `1.1.0-beta02` < `1.1.0-rc01` < `1.1.0`.

use std::cmp::Ordering;
use std::fmt;

/// A parsed Maven version with comparable segments.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    pub original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Qualifier(QualifierKind),
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum QualifierKind {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            segments: version
                .split(['.', '-'])
                .filter(|t| !t.is_empty())
                .flat_map(split_qualifier_number)
                .map(classify)
                .collect(),
        }
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| compare_segments(self.segments.get(i), other.segments.get(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// `beta01` -> [`beta`, `01`]; anything else is returned unchanged.
fn split_qualifier_number(token: &str) -> Vec<&str> {
    let Some(pos) = token.find(|c: char| c.is_ascii_digit()) else {
        return vec![token];
    };
    let (head, tail) = token.split_at(pos);
    let head_letters = !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic());
    let tail_digits = tail.chars().all(|c| c.is_ascii_digit());
    if head_letters && tail_digits {
        vec![head, tail]
    } else {
        vec![token]
    }
}

fn classify(token: &str) -> Segment {
    if let Ok(n) = token.parse::<u64>() {
        return Segment::Numeric(n);
    }
    let kind = match token.to_lowercase().as_str() {
        "alpha" | "a" => QualifierKind::Alpha,
        "beta" | "b" => QualifierKind::Beta,
        "milestone" | "m" => QualifierKind::Milestone,
        "rc" | "cr" => QualifierKind::Rc,
        "snapshot" => QualifierKind::Snapshot,
        "ga" | "final" | "release" => QualifierKind::Release,
        "sp" => QualifierKind::Sp,
        _ => return Segment::Text(token.to_string()),
    };
    Segment::Qualifier(kind)
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(s), None) => against_missing(s),
        (None, Some(s)) => against_missing(s).reverse(),
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

/// How a segment compares to an absent one (i.e. a plain release).
fn against_missing(seg: &Segment) -> Ordering {
    match seg {
        Segment::Numeric(0) => Ordering::Equal,
        Segment::Numeric(_) => Ordering::Greater,
        Segment::Qualifier(q) => q.cmp(&QualifierKind::Release),
        Segment::Text(_) => Ordering::Less,
    }
}

fn compare_present(a: &Segment, b: &Segment) -> Ordering {
    use Segment::*;
    match (a, b) {
        (Numeric(a), Numeric(b)) => a.cmp(b),
        (Qualifier(a), Qualifier(b)) => a.cmp(b),
        (Text(a), Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Numeric(_), _) => Ordering::Greater,
        (_, Numeric(_)) => Ordering::Less,
        (Qualifier(q), Text(_)) => {
            if *q >= QualifierKind::Release {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Text(_), Qualifier(_)) => compare_present(b, a).reverse(),
    }
}

/// A Maven version range expression.
///
/// Supports: `[1.0,2.0)`, `[1.0,]`, `(,2.0)`, `[1.5]` (exact).
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub spec: String,
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

#[derive(Debug, Clone)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

impl VersionRange {
    /// Parse a Maven version range string.
    ///
    /// Returns `None` for bare versions and for malformed ranges.
    pub fn parse(spec: &str) -> Option<Self> {
        let s = spec.trim();
        let lower_inclusive = match s.chars().next()? {
            '[' => true,
            '(' => false,
            _ => return None,
        };
        let upper_inclusive = match s.chars().last()? {
            ']' => true,
            ')' => false,
            _ => return None,
        };
        if s.len() < 2 {
            return None;
        }
        let inner = &s[1..s.len() - 1];

        let bound = |raw: &str, inclusive: bool| {
            let raw = raw.trim();
            (!raw.is_empty()).then(|| Bound {
                version: MavenVersion::parse(raw),
                inclusive,
            })
        };

        let (lower, upper) = match inner.split_once(',') {
            Some((lo, hi)) => (bound(lo, lower_inclusive), bound(hi, upper_inclusive)),
            None => {
                // `[1.5]` pins exactly one version; `(1.5)` is meaningless.
                if !(lower_inclusive && upper_inclusive) {
                    return None;
                }
                let exact = bound(inner, true)?;
                (Some(exact.clone()), Some(exact))
            }
        };

        Some(Self {
            spec: s.to_string(),
            lower,
            upper,
        })
    }

    /// Check if a version satisfies this range.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        let above_lower = self.lower.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Greater => true,
            Ordering::Equal => b.inclusive,
            Ordering::Less => false,
        });
        let below_upper = self.upper.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Less => true,
            Ordering::Equal => b.inclusive,
            Ordering::Greater => false,
        });
        above_lower && below_upper
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}
