use std::{fmt, num::ParseIntError, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generator used for every random draw of a simulation run.
pub type SimRng = Pcg32;

/// Source of uniformly distributed values in `[0, 1)`.
///
/// The simulation never touches a global generator. Every operation that needs randomness
/// (obstacle respawn, initial weights, parent picking, mutation) takes a `RandomSource`,
/// so a run is fully determined by the source it is handed.
///
/// Any [`rand::Rng`] is a `RandomSource`. Tests that need exact control over each draw can
/// use [`ScriptedSource`] instead.
pub trait RandomSource {
    /// Returns the next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Returns a value in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }

    /// Returns an index in `0..len`, computed as `floor(r * len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick an index from an empty range");
        let index = (self.next_unit() * len as f64).floor() as usize;
        index.min(len - 1)
    }

    /// Returns `true` with probability `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

impl<R> RandomSource for R
where
    R: Rng + ?Sized,
{
    fn next_unit(&mut self) -> f64 {
        self.random()
    }
}

/// A [`RandomSource`] that replays a fixed list of values, starting over when exhausted.
///
/// # Example
///
/// ```
/// use hurdle_engine::{RandomSource as _, ScriptedSource};
///
/// let mut source = ScriptedSource::new([0.25, 0.75]);
/// assert_eq!(source.next_unit(), 0.25);
/// assert_eq!(source.next_unit(), 0.75);
/// assert_eq!(source.next_unit(), 0.25);
/// assert_eq!(source.draws(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
    draws: usize,
}

impl ScriptedSource {
    /// Creates a source replaying `values` in order.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty or holds a value outside `[0, 1)`.
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        assert!(!values.is_empty(), "scripted source needs at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "scripted values must lie in [0, 1)"
        );
        Self {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// Number of values handed out so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.draws += 1;
        value
    }
}

/// Seed for a deterministic simulation run.
///
/// A 128-bit seed that initializes the [`SimRng`] shared by a run. Two runs started from the
/// same seed and fed the same tick inputs produce identical weights and fitness scores.
///
/// Seeds are written as 32 lowercase hex digits, both by [`Display`](fmt::Display) and by
/// the serde implementation. Parsing accepts up to 32 hex digits in either case, with an
/// optional `0x` prefix.
///
/// # Example
///
/// ```
/// use hurdle_engine::SimSeed;
///
/// let seed: SimSeed = "0x2a".parse().unwrap();
/// assert_eq!(seed, SimSeed::from_u64(42));
/// assert_eq!(seed.to_string(), "0000000000000000000000000000002a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimSeed([u8; 16]);

impl SimSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a seed whose numeric value is `value`.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }

    /// Draws a fresh seed from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        rand::rng().random()
    }

    /// Builds the generator this seed describes.
    #[must_use]
    pub fn rng(self) -> SimRng {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for SimSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("seed must have 1 to 32 hex digits, got {len}")]
    Length { len: usize },
    #[display("invalid hex seed {text:?}")]
    Digit { text: String, source: ParseIntError },
}

impl FromStr for SimSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() || digits.len() > 32 {
            return Err(ParseSeedError::Length { len: digits.len() });
        }
        let value = u128::from_str_radix(digits, 16).map_err(|source| ParseSeedError::Digit {
            text: s.to_owned(),
            source,
        })?;
        Ok(Self(value.to_be_bytes()))
    }
}

impl Serialize for SimSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SimSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<SimSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SimSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_source_stays_in_unit_interval() {
        let mut rng = SimSeed::from_u64(7).rng();
        for _ in 0..1000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimSeed::from_u64(99).rng();
        let mut b = SimSeed::from_u64(99).rng();
        let xs = (0..16).map(|_| a.next_unit()).collect::<Vec<_>>();
        let ys = (0..16).map(|_| b.next_unit()).collect::<Vec<_>>();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_index_uses_floor() {
        let mut source = ScriptedSource::new([0.0, 0.49, 0.5, 0.99]);
        assert_eq!(source.index(2), 0);
        assert_eq!(source.index(2), 0);
        assert_eq!(source.index(2), 1);
        assert_eq!(source.index(2), 1);
    }

    #[test]
    fn test_uniform_and_chance() {
        let mut source = ScriptedSource::new([0.5, 0.19, 0.2]);
        assert_eq!(source.uniform(0.0, 200.0), 100.0);
        assert!(source.chance(0.2));
        assert!(!source.chance(0.2));
    }

    #[test]
    #[should_panic(expected = "scripted values must lie in [0, 1)")]
    fn test_scripted_rejects_one() {
        let _ = ScriptedSource::new([1.0]);
    }

    #[test]
    fn test_seed_format_is_32_char_hex() {
        let seed = SimSeed::from_bytes([0xAB; 16]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"abababababababababababababababab\"");
        let deserialized: SimSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_parse_accepts_short_and_uppercase() {
        assert_eq!("FF".parse::<SimSeed>().unwrap(), SimSeed::from_u64(255));
        assert_eq!("0X10".parse::<SimSeed>().unwrap(), SimSeed::from_u64(16));
    }

    #[test]
    fn test_seed_parse_errors() {
        assert_eq!(
            "".parse::<SimSeed>(),
            Err(ParseSeedError::Length { len: 0 })
        );
        assert_eq!(
            "0".repeat(33).parse::<SimSeed>(),
            Err(ParseSeedError::Length { len: 33 })
        );
        assert!(matches!(
            "xyz".parse::<SimSeed>(),
            Err(ParseSeedError::Digit { .. })
        ));
        assert!(serde_json::from_str::<SimSeed>("\"not-hex\"").is_err());
    }
}
