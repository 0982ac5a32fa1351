use serde::{Deserialize, Serialize};

/// Citation convention, keyed by research domain. The fixed set maps a
/// human-readable domain label to the formal style name that is substituted
/// verbatim into the generation instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationStyle {
    SocialSciences,
    Humanities,
    History,
    Engineering,
    Biomedicine,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::SocialSciences,
        CitationStyle::Humanities,
        CitationStyle::History,
        CitationStyle::Engineering,
        CitationStyle::Biomedicine,
    ];

    /// Domain label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            CitationStyle::SocialSciences => "Social sciences",
            CitationStyle::Humanities => "Humanities",
            CitationStyle::History => "History",
            CitationStyle::Engineering => "Engineering",
            CitationStyle::Biomedicine => "Biomedicine",
        }
    }

    /// Formal style name embedded verbatim in the prompt.
    pub fn style_name(&self) -> &'static str {
        match self {
            CitationStyle::SocialSciences => "APA 7th edition",
            CitationStyle::Humanities => "MLA 9th edition",
            CitationStyle::History => "Chicago 17th edition (notes and bibliography)",
            CitationStyle::Engineering => "IEEE",
            CitationStyle::Biomedicine => "AMA 11th edition",
        }
    }

    /// Accepts the domain label or the style keyword, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_ascii_lowercase();
        match needle.as_str() {
            "social sciences" | "social_sciences" | "apa" => Some(CitationStyle::SocialSciences),
            "humanities" | "mla" => Some(CitationStyle::Humanities),
            "history" | "chicago" => Some(CitationStyle::History),
            "engineering" | "ieee" => Some(CitationStyle::Engineering),
            "biomedicine" | "ama" => Some(CitationStyle::Biomedicine),
            _ => None,
        }
    }
}

impl Default for CitationStyle {
    fn default() -> Self {
        CitationStyle::SocialSciences
    }
}

impl std::fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.style_name())
    }
}

impl std::str::FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CitationStyle::parse(s).ok_or_else(|| format!("unknown citation style: {s}"))
    }
}
