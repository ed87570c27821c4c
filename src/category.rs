use serde::{Deserialize, Serialize};

/// News category predicted by the classifier (strongly-typed).
///
/// The declaration order is the fixed category order used everywhere a
/// per-category vector appears: classifier decision values, confidence
/// maps and linear model rows.
///
/// # Variants
///
/// | Index | Variant       | Machine label  | Display label |
/// |------:|---------------|----------------|---------------|
/// | 0     | `Economic`    | `economic`     | Economic      |
/// | 1     | `Environment` | `environment`  | Environment   |
/// | 2     | `Health`      | `health`       | Health        |
/// | 3     | `Politic`     | `politic`      | Politics      |
/// | 4     | `Sport`       | `sport`        | Sports        |
/// | 5     | `Technology`  | `technology`   | Technology    |
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Economic = 0,
    Environment = 1,
    Health = 2,
    #[serde(alias = "politics")]
    Politic = 3,
    Sport = 4,
    Technology = 5,
}

impl Category {
    /// All categories in the fixed order.
    pub const ALL: [Category; 6] = [
        Category::Economic,
        Category::Environment,
        Category::Health,
        Category::Politic,
        Category::Sport,
        Category::Technology,
    ];

    /// Number of categories.
    pub const COUNT: usize = Self::ALL.len();

    /// Machine label, as stored in model files and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Economic => "economic",
            Category::Environment => "environment",
            Category::Health => "health",
            Category::Politic => "politic",
            Category::Sport => "sport",
            Category::Technology => "technology",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Economic => "Economic",
            Category::Environment => "Environment",
            Category::Health => "Health",
            Category::Politic => "Politics",
            Category::Sport => "Sports",
            Category::Technology => "Technology",
        }
    }

    /// Position of the category in [`Category::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a position in the fixed order back into a category.
    ///
    /// Returns `None` for out-of-range values.
    #[inline]
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }
}

impl TryFrom<&str> for Category {
    /// Parses a machine label (case-insensitive, surrounding whitespace ignored).
    ///
    /// `"politics"` is accepted as an alias of `"politic"`, the label the
    /// trained models use.
    type Error = ();

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economic" => Ok(Self::Economic),
            "environment" => Ok(Self::Environment),
            "health" => Ok(Self::Health),
            "politic" | "politics" => Ok(Self::Politic),
            "sport" => Ok(Self::Sport),
            "technology" => Ok(Self::Technology),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
