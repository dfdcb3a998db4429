use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The reading progress of a book. Stored and displayed through its canonical Spanish label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingStatus {
    Read,
    ToRead,
    InProgress,
    NotRead,
    Abandoned,
}

impl ReadingStatus {
    /// All statuses in the order the status selectors list them.
    pub const ALL: [Self; 5] = [
        Self::Read,
        Self::ToRead,
        Self::InProgress,
        Self::NotRead,
        Self::Abandoned,
    ];

    /// Canonical label, the value written to `libros.estado_lectura`
    #[must_use]
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Read => "Leído",
            Self::ToRead => "Por leer",
            Self::InProgress => "En proceso",
            Self::NotRead => "No leído",
            Self::Abandoned => "Abandonado",
        }
    }

    /// Parses a stored or user-provided status. Surrounding whitespace, letter case and Spanish
    /// accents are ignored, and the older registration spellings ("ya leído", "dejado") are
    /// accepted.
    #[must_use]
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).as_str() {
            "leido" | "ya leido" => Some(Self::Read),
            "por leer" => Some(Self::ToRead),
            "en proceso" => Some(Self::InProgress),
            "no leido" => Some(Self::NotRead),
            "abandonado" | "dejado" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

impl Default for ReadingStatus {
    /// Newly registered books have not been read yet
    #[inline]
    fn default() -> Self {
        Self::ToRead
    }
}

impl fmt::Display for ReadingStatus {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ReadingStatus {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ReadingStatus {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown reading status `{raw}`")))
    }
}

/// Lower-cases, trims, collapses inner whitespace and strips the accents used in Spanish.
fn fold(raw: &str) -> String {
    let lowered: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}
