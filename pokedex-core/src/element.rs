/// Elemental types a catalog entity can carry.
///
/// Centralizes the type names used by the API and the colour each one is
/// rendered with, so the CLI never matches on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Colour used for types without a palette entry (`#777777`).
    pub const NEUTRAL: Rgb = Rgb(0x77, 0x77, 0x77);

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

const ALL_TYPES: &[ElementType] = &[
    ElementType::Normal,
    ElementType::Fire,
    ElementType::Water,
    ElementType::Electric,
    ElementType::Grass,
    ElementType::Ice,
    ElementType::Fighting,
    ElementType::Poison,
    ElementType::Ground,
    ElementType::Flying,
    ElementType::Psychic,
    ElementType::Bug,
    ElementType::Rock,
    ElementType::Ghost,
    ElementType::Dragon,
    ElementType::Dark,
    ElementType::Steel,
    ElementType::Fairy,
];

impl ElementType {
    /// Name as used by the catalog API.
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Electric => "electric",
            Self::Grass => "grass",
            Self::Ice => "ice",
            Self::Fighting => "fighting",
            Self::Poison => "poison",
            Self::Ground => "ground",
            Self::Flying => "flying",
            Self::Psychic => "psychic",
            Self::Bug => "bug",
            Self::Rock => "rock",
            Self::Ghost => "ghost",
            Self::Dragon => "dragon",
            Self::Dark => "dark",
            Self::Steel => "steel",
            Self::Fairy => "fairy",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Self::Normal => Rgb(0xA8, 0xA7, 0x7A),
            Self::Fire => Rgb(0xEE, 0x81, 0x30),
            Self::Water => Rgb(0x63, 0x90, 0xF0),
            Self::Electric => Rgb(0xF7, 0xD0, 0x2C),
            Self::Grass => Rgb(0x7A, 0xC7, 0x4C),
            Self::Ice => Rgb(0x96, 0xD9, 0xD6),
            Self::Fighting => Rgb(0xC2, 0x2E, 0x28),
            Self::Poison => Rgb(0xA3, 0x3E, 0xA1),
            Self::Ground => Rgb(0xE2, 0xBF, 0x65),
            Self::Flying => Rgb(0xA9, 0x8F, 0xF3),
            Self::Psychic => Rgb(0xF9, 0x55, 0x87),
            Self::Bug => Rgb(0xA6, 0xB9, 0x1A),
            Self::Rock => Rgb(0xB6, 0xA1, 0x36),
            Self::Ghost => Rgb(0x73, 0x57, 0x97),
            Self::Dragon => Rgb(0x6F, 0x35, 0xFC),
            Self::Dark => Rgb(0x70, 0x57, 0x46),
            Self::Steel => Rgb(0xB7, 0xB7, 0xCE),
            Self::Fairy => Rgb(0xD6, 0x85, 0xAD),
        }
    }

    /// Colour for an API type name, falling back to [`Rgb::NEUTRAL`] for
    /// names outside the palette (e.g. `"shadow"`, `"unknown"`).
    pub fn color_for(name: &str) -> Rgb {
        name.parse::<ElementType>()
            .map(|t| t.color())
            .unwrap_or(Rgb::NEUTRAL)
    }

    /// All 18 type variants.
    pub fn all() -> &'static [ElementType] {
        ALL_TYPES
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

/// Error returned when a string cannot be parsed into an `ElementType`.
#[derive(Debug, Clone)]
pub struct ElementTypeParseError(pub String);

impl std::fmt::Display for ElementTypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown type: '{}'", self.0)
    }
}

impl std::error::Error for ElementTypeParseError {}

impl std::str::FromStr for ElementType {
    type Err = ElementTypeParseError;

    /// Parse a type from its API name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_TYPES
            .iter()
            .copied()
            .find(|t| t.api_name() == lower)
            .ok_or_else(|| ElementTypeParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/element_tests.rs"]
mod tests;
