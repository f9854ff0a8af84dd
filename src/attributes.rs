// 🏛️ Semantic Layer - Startup attribute catalogue
// Attributes exist independently of any feed layout; schemas reference them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Every attribute a Startup can carry, named by its camelCase feed key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    // Identity / display
    Name,
    Description,
    ImageUrl,
    Url,
    CompanyName,
    Website,
    OgTitle,
    OgDescription,
    OgImage,

    // Classification
    Tags,
    Category,
    TechVertical,
    RoundStage,
    Country,
    Industry,
    Sector,
    Investors,

    // Financial
    FundingAmount,
    RoundSize,
    RoundSizeRange,

    // Temporal
    DateAdded,
    RoundDate,
    RoundMonth,
    RoundYear,
    FoundationYear,
}

impl Attribute {
    pub const ALL: [Attribute; 25] = [
        Attribute::Name,
        Attribute::Description,
        Attribute::ImageUrl,
        Attribute::Url,
        Attribute::CompanyName,
        Attribute::Website,
        Attribute::OgTitle,
        Attribute::OgDescription,
        Attribute::OgImage,
        Attribute::Tags,
        Attribute::Category,
        Attribute::TechVertical,
        Attribute::RoundStage,
        Attribute::Country,
        Attribute::Industry,
        Attribute::Sector,
        Attribute::Investors,
        Attribute::FundingAmount,
        Attribute::RoundSize,
        Attribute::RoundSizeRange,
        Attribute::DateAdded,
        Attribute::RoundDate,
        Attribute::RoundMonth,
        Attribute::RoundYear,
        Attribute::FoundationYear,
    ];

    /// Feed / JSON key for this attribute
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Description => "description",
            Attribute::ImageUrl => "imageUrl",
            Attribute::Url => "url",
            Attribute::CompanyName => "companyName",
            Attribute::Website => "website",
            Attribute::OgTitle => "ogTitle",
            Attribute::OgDescription => "ogDescription",
            Attribute::OgImage => "ogImage",
            Attribute::Tags => "tags",
            Attribute::Category => "category",
            Attribute::TechVertical => "techVertical",
            Attribute::RoundStage => "roundStage",
            Attribute::Country => "country",
            Attribute::Industry => "industry",
            Attribute::Sector => "sector",
            Attribute::Investors => "investors",
            Attribute::FundingAmount => "fundingAmount",
            Attribute::RoundSize => "roundSize",
            Attribute::RoundSizeRange => "roundSizeRange",
            Attribute::DateAdded => "dateAdded",
            Attribute::RoundDate => "roundDate",
            Attribute::RoundMonth => "roundMonth",
            Attribute::RoundYear => "roundYear",
            Attribute::FoundationYear => "foundationYear",
        }
    }

    /// Multi-valued attributes hold a sequence instead of a single string
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Attribute::Tags | Attribute::Investors)
    }

    /// Coercion a schema gets when it does not say otherwise
    pub fn default_coercion(&self) -> Coercion {
        match self {
            Attribute::Tags | Attribute::Investors => Coercion::List,
            Attribute::Category => Coercion::Category,
            Attribute::ImageUrl => Coercion::DefaultText(PLACEHOLDER_IMAGE_URL.to_string()),
            Attribute::Url => Coercion::DefaultText(PLACEHOLDER_URL.to_string()),
            Attribute::DateAdded => Coercion::Today,
            _ => Coercion::Text,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| a.key() == s)
            .ok_or_else(|| format!("unknown attribute: {}", s))
    }
}

// ============================================================================
// COERCIONS
// ============================================================================

/// Image shown when the feed row has none
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/800x600?text=No+Image";

/// Link used when the feed row has no url
pub const PLACEHOLDER_URL: &str = "#";

/// How a trimmed field value becomes an attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Coercion {
    /// Blank → no value
    Text,
    /// Split on ',' and trim each piece; blank → empty list
    List,
    /// Validate against the closed category set, fallback "Other"
    Category,
    /// Blank → the given text
    DefaultText(String),
    /// Blank → the load date as YYYY-MM-DD
    Today,
}

impl Coercion {
    /// Serialized name of the kind
    pub fn kind(&self) -> &'static str {
        match self {
            Coercion::Text => "text",
            Coercion::List => "list",
            Coercion::Category => "category",
            Coercion::DefaultText(_) => "defaultText",
            Coercion::Today => "today",
        }
    }

    /// Can this kind fill `attribute`?
    ///
    /// Category only fills the category, lists only multi-valued attributes,
    /// and the text kinds only plain text attributes.
    pub fn applies_to(&self, attribute: Attribute) -> bool {
        match self {
            Coercion::Category => attribute == Attribute::Category,
            Coercion::List => attribute.is_multi_valued(),
            Coercion::Text | Coercion::DefaultText(_) | Coercion::Today => {
                !attribute.is_multi_valued() && attribute != Attribute::Category
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
