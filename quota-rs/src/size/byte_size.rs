use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Sum;
use std::str::FromStr;

use super::unit::ByteUnit;
use crate::error::{QuotaError, Result};

#[derive(Debug, Clone, Copy)]
enum Magnitude {
    Finite { value: u64, unit: ByteUnit },
    Unlimited,
}

/// Immutable, unit-aware, non-negative storage size
///
/// Two sizes are equal when their byte magnitude is equal, regardless of
/// the unit they were written in. The unlimited sentinel compares greater
/// than every finite size.
#[derive(Debug, Clone, Copy)]
pub struct ByteSize {
    magnitude: Magnitude,
}

impl ByteSize {
    pub fn new(value: u64, unit: ByteUnit) -> Self {
        ByteSize {
            magnitude: Magnitude::Finite { value, unit },
        }
    }

    pub fn bytes(value: u64) -> Self {
        Self::new(value, ByteUnit::Byte)
    }

    pub fn kib(value: u64) -> Self {
        Self::new(value, ByteUnit::KiB)
    }

    pub fn mib(value: u64) -> Self {
        Self::new(value, ByteUnit::MiB)
    }

    pub fn gib(value: u64) -> Self {
        Self::new(value, ByteUnit::GiB)
    }

    pub fn tib(value: u64) -> Self {
        Self::new(value, ByteUnit::TiB)
    }

    /// Zero bytes
    pub fn zero() -> Self {
        Self::bytes(0)
    }

    /// The unlimited sentinel
    pub fn inf() -> Self {
        ByteSize {
            magnitude: Magnitude::Unlimited,
        }
    }

    pub fn is_inf(&self) -> bool {
        matches!(self.magnitude, Magnitude::Unlimited)
    }

    pub fn is_zero(&self) -> bool {
        self.to_bytes() == Some(0)
    }

    /// Numeric value in [`Self::unit`], `None` when unlimited
    pub fn value(&self) -> Option<u64> {
        match self.magnitude {
            Magnitude::Finite { value, .. } => Some(value),
            Magnitude::Unlimited => None,
        }
    }

    /// Unit the size is expressed in (bytes for the unlimited sentinel)
    pub fn unit(&self) -> ByteUnit {
        match self.magnitude {
            Magnitude::Finite { unit, .. } => unit,
            Magnitude::Unlimited => ByteUnit::Byte,
        }
    }

    /// Normalized magnitude in bytes, `None` when unlimited
    pub fn to_bytes(&self) -> Option<u128> {
        match self.magnitude {
            Magnitude::Finite { value, unit } => Some(value as u128 * unit.factor() as u128),
            Magnitude::Unlimited => None,
        }
    }

    /// One of this size's own unit
    pub fn one_unit(&self) -> ByteSize {
        ByteSize::new(1, self.unit())
    }

    /// Sum of both sizes. Unlimited absorbs everything.
    ///
    /// A finite sum too large to express as a `u64` count of any unit
    /// becomes unlimited.
    pub fn increase(&self, other: &ByteSize) -> ByteSize {
        match (self.magnitude, other.magnitude) {
            (Magnitude::Finite { unit: a, .. }, Magnitude::Finite { unit: b, .. }) => {
                let total = self.finite_bytes() + other.finite_bytes();
                Self::from_total(total, a.finer(b)).unwrap_or_else(ByteSize::inf)
            }
            _ => ByteSize::inf(),
        }
    }

    /// Difference of both sizes, clamped at zero.
    ///
    /// Removing an unlimited size leaves nothing; removing a finite size
    /// from unlimited leaves unlimited.
    pub fn decrease(&self, other: &ByteSize) -> ByteSize {
        match (self.magnitude, other.magnitude) {
            (Magnitude::Finite { unit: a, .. }, Magnitude::Finite { unit: b, .. }) => {
                let total = self.finite_bytes().saturating_sub(other.finite_bytes());
                // Only reachable near u64::MAX PiB, where no unit holds the exact rest.
                Self::from_total(total, a.finer(b)).unwrap_or(*self)
            }
            (Magnitude::Unlimited, Magnitude::Finite { .. }) => ByteSize::inf(),
            (_, Magnitude::Unlimited) => ByteSize::new(0, self.unit()),
        }
    }

    pub fn less_than(&self, other: &ByteSize) -> bool {
        self < other
    }

    pub fn greater_than(&self, other: &ByteSize) -> bool {
        self > other
    }

    pub fn greater_than_or_equal_to(&self, other: &ByteSize) -> bool {
        self >= other
    }

    pub fn equals(&self, other: &ByteSize) -> bool {
        self == other
    }

    fn finite_bytes(&self) -> u128 {
        self.to_bytes().unwrap_or(0)
    }

    /// Express `total` bytes in the largest unit that divides it exactly.
    /// Zero keeps `zero_unit`. `None` when the count overflows `u64`.
    fn from_total(total: u128, zero_unit: ByteUnit) -> Option<ByteSize> {
        if total == 0 {
            return Some(ByteSize::new(0, zero_unit));
        }

        let unit = ByteUnit::ALL
            .iter()
            .rev()
            .copied()
            .find(|unit| total % unit.factor() as u128 == 0)
            .unwrap_or(ByteUnit::Byte);
        let value = u64::try_from(total / unit.factor() as u128).ok()?;

        Some(ByteSize::new(value, unit))
    }
}

impl Default for ByteSize {
    fn default() -> Self {
        ByteSize::zero()
    }
}

impl PartialEq for ByteSize {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for ByteSize {}

impl Hash for ByteSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl Ord for ByteSize {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.to_bytes(), other.to_bytes()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for ByteSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Sum for ByteSize {
    fn sum<I: Iterator<Item = ByteSize>>(iter: I) -> Self {
        iter.fold(ByteSize::zero(), |acc, size| acc.increase(&size))
    }
}

impl<'a> Sum<&'a ByteSize> for ByteSize {
    fn sum<I: Iterator<Item = &'a ByteSize>>(iter: I) -> Self {
        iter.fold(ByteSize::zero(), |acc, size| acc.increase(size))
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.magnitude {
            Magnitude::Finite { value, unit } => write!(f, "{} {}", value, unit),
            Magnitude::Unlimited => f.write_str("inf"),
        }
    }
}

impl FromStr for ByteSize {
    type Err = QuotaError;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();

        if matches!(input.to_ascii_lowercase().as_str(), "inf" | "unlimited" | "-1") {
            return Ok(ByteSize::inf());
        }

        let split = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        let (digits, symbol) = input.split_at(split);

        if digits.is_empty() {
            return Err(QuotaError::InvalidByteSize(s.to_string()));
        }

        let value: u64 = digits
            .parse()
            .map_err(|_| QuotaError::InvalidByteSize(s.to_string()))?;
        let unit = ByteUnit::from_symbol(symbol)
            .ok_or_else(|| QuotaError::InvalidByteSize(s.to_string()))?;

        Ok(ByteSize::new(value, unit))
    }
}

impl Serialize for ByteSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct ByteSizeVisitor;

impl<'de> Visitor<'de> for ByteSizeVisitor {
    type Value = ByteSize;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a size such as \"10 GiB\", a byte count, or \"inf\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ByteSize, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<ByteSize, E> {
        Ok(ByteSize::bytes(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<ByteSize, E> {
        match v {
            -1 => Ok(ByteSize::inf()),
            v if v >= 0 => Ok(ByteSize::bytes(v as u64)),
            v => Err(E::custom(format!("negative size: {}", v))),
        }
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ByteSizeVisitor)
    }
}
