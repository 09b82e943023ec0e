use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// An 8-bit RGB colour.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats the colour as `#rrggbb`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex_str: &str) -> anyhow::Result<Self> {
        let trimmed = hex_str.trim().trim_start_matches('#');
        let bytes = hex::decode(trimmed)?;
        anyhow::ensure!(
            bytes.len() == 3,
            "expected 3 colour channels, got {}",
            bytes.len()
        );
        Ok(Self::new(bytes[0], bytes[1], bytes[2]))
    }
}

/// Body pattern. Categorical, never blended.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// No markings.
    #[serde(rename = "none")]
    Plain,
    Spots,
    Stripes,
    Spikes,
}

impl Pattern {
    /// Every pattern, in a stable order.
    pub const ALL: [Pattern; 4] = [
        Pattern::Plain,
        Pattern::Spots,
        Pattern::Stripes,
        Pattern::Spikes,
    ];
}

/// Physical traits. Creation range [0.5, 2.0].
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Physique {
    pub size: f64,
    pub speed: f64,
    pub stamina: f64,
}

/// Visual traits.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Appearance {
    pub primary_color: Rgb,
    pub accent_color: Rgb,
    pub pattern: Pattern,
}

/// Body proportions.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Proportions {
    /// Creation range [0.5, 1.5].
    pub head_size: f64,
    /// Creation range [0.7, 1.5].
    pub body_length: f64,
    /// Creation range [0.6, 1.4].
    pub limb_length: f64,
}

/// Behavioural traits, each in [0, 1] at creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Temperament {
    pub aggression: f64,
    pub curiosity: f64,
    pub social: f64,
}

/// The complete genome of one individual.
///
/// Fixed at birth. Every numeric field stays finite and non-negative, see
/// [`TraitSet::is_well_formed`].
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct TraitSet {
    pub physique: Physique,
    pub appearance: Appearance,
    pub proportions: Proportions,
    pub temperament: Temperament,
}

impl TraitSet {
    /// All scalar traits in declaration order.
    #[must_use]
    pub fn scalars(&self) -> [f64; 9] {
        [
            self.physique.size,
            self.physique.speed,
            self.physique.stamina,
            self.proportions.head_size,
            self.proportions.body_length,
            self.proportions.limb_length,
            self.temperament.aggression,
            self.temperament.curiosity,
            self.temperament.social,
        ]
    }

    /// True when every scalar trait is finite and `>= 0`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.scalars().iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}
