// 🚀 Startup Entity - One catalogue record
//
// Identity: `id` (row index at load time, NOT stable across reloads)
// Values: everything else, all optional except `name`
//
// "No value" is always None (or an empty list), never an empty string, so
// filters can treat blank as unknown consistently.

use crate::attributes::Attribute;
use crate::entities::category::StartupCategory;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// STARTUP ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Startup {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    pub id: String,
    pub name: String,

    // ========================================================================
    // DISPLAY
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,

    // ========================================================================
    // CLASSIFICATION
    // ========================================================================
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<StartupCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_vertical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Feed order preserved
    #[serde(default)]
    pub investors: Vec<String>,

    // ========================================================================
    // FINANCIAL (free text as typed in the sheet)
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_size_range: Option<String>,

    // ========================================================================
    // TEMPORAL (free text as typed in the sheet)
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foundation_year: Option<String>,
}

impl Startup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Startup {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set a single-valued attribute (blank → no value)
    pub fn with(mut self, attribute: Attribute, value: &str) -> Self {
        let value = value.trim();
        if attribute.is_multi_valued() {
            self.set_list(attribute, split_list(value));
        } else if attribute == Attribute::Category {
            self.category = Some(StartupCategory::coerce(value));
        } else {
            self.set_text(attribute, non_blank(value));
        }
        self
    }

    // ========================================================================
    // ATTRIBUTE ACCESS
    // ========================================================================

    /// Value of a single-valued attribute, None when absent
    ///
    /// Multi-valued attributes always answer None here; use `list()`.
    pub fn text(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Name => Some(self.name.as_str()),
            Attribute::Category => self.category.map(|c| c.as_str()),
            Attribute::Tags | Attribute::Investors => None,
            other => self.text_slot(other).and_then(|slot| slot.as_deref()),
        }
    }

    /// Values of a multi-valued attribute (empty for single-valued ones)
    pub fn list(&self, attribute: Attribute) -> &[String] {
        match attribute {
            Attribute::Tags => &self.tags,
            Attribute::Investors => &self.investors,
            _ => &[],
        }
    }

    /// Assign a plain text attribute
    ///
    /// `name` becomes the empty string on None; category and list
    /// attributes are ignored (they have their own setters).
    pub fn set_text(&mut self, attribute: Attribute, value: Option<String>) {
        match attribute {
            Attribute::Name => self.name = value.unwrap_or_default(),
            Attribute::Category | Attribute::Tags | Attribute::Investors => {}
            other => {
                if let Some(slot) = self.text_slot_mut(other) {
                    *slot = value;
                }
            }
        }
    }

    pub fn set_list(&mut self, attribute: Attribute, values: Vec<String>) {
        match attribute {
            Attribute::Tags => self.tags = values,
            Attribute::Investors => self.investors = values,
            _ => {}
        }
    }

    fn text_slot(&self, attribute: Attribute) -> Option<&Option<String>> {
        let slot = match attribute {
            Attribute::Description => &self.description,
            Attribute::ImageUrl => &self.image_url,
            Attribute::Url => &self.url,
            Attribute::CompanyName => &self.company_name,
            Attribute::Website => &self.website,
            Attribute::OgTitle => &self.og_title,
            Attribute::OgDescription => &self.og_description,
            Attribute::OgImage => &self.og_image,
            Attribute::TechVertical => &self.tech_vertical,
            Attribute::RoundStage => &self.round_stage,
            Attribute::Country => &self.country,
            Attribute::Industry => &self.industry,
            Attribute::Sector => &self.sector,
            Attribute::FundingAmount => &self.funding_amount,
            Attribute::RoundSize => &self.round_size,
            Attribute::RoundSizeRange => &self.round_size_range,
            Attribute::DateAdded => &self.date_added,
            Attribute::RoundDate => &self.round_date,
            Attribute::RoundMonth => &self.round_month,
            Attribute::RoundYear => &self.round_year,
            Attribute::FoundationYear => &self.foundation_year,
            Attribute::Name | Attribute::Category | Attribute::Tags | Attribute::Investors => {
                return None
            }
        };
        Some(slot)
    }

    fn text_slot_mut(&mut self, attribute: Attribute) -> Option<&mut Option<String>> {
        let slot = match attribute {
            Attribute::Description => &mut self.description,
            Attribute::ImageUrl => &mut self.image_url,
            Attribute::Url => &mut self.url,
            Attribute::CompanyName => &mut self.company_name,
            Attribute::Website => &mut self.website,
            Attribute::OgTitle => &mut self.og_title,
            Attribute::OgDescription => &mut self.og_description,
            Attribute::OgImage => &mut self.og_image,
            Attribute::TechVertical => &mut self.tech_vertical,
            Attribute::RoundStage => &mut self.round_stage,
            Attribute::Country => &mut self.country,
            Attribute::Industry => &mut self.industry,
            Attribute::Sector => &mut self.sector,
            Attribute::FundingAmount => &mut self.funding_amount,
            Attribute::RoundSize => &mut self.round_size,
            Attribute::RoundSizeRange => &mut self.round_size_range,
            Attribute::DateAdded => &mut self.date_added,
            Attribute::RoundDate => &mut self.round_date,
            Attribute::RoundMonth => &mut self.round_month,
            Attribute::RoundYear => &mut self.round_year,
            Attribute::FoundationYear => &mut self.foundation_year,
            Attribute::Name | Attribute::Category | Attribute::Tags | Attribute::Investors => {
                return None
            }
        };
        Some(slot)
    }

    // ========================================================================
    // DERIVED VALUES
    // ========================================================================

    /// Cleaned numeric funding amount, None when absent or not a number
    pub fn funding_amount_value(&self) -> Option<f64> {
        self.funding_amount.as_deref().and_then(clean_amount)
    }

    /// Round date as a calendar date, None when absent or unparsable
    pub fn round_date_value(&self) -> Option<NaiveDate> {
        self.round_date.as_deref().and_then(parse_calendar_date)
    }
}

// ============================================================================
// VALUE HELPERS
// ============================================================================

/// Trimmed value, or None when blank
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split on ',' and trim each piece; a blank source gives an empty list
pub(crate) fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value
        .split(',')
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip everything but digits and '.', then parse
///
/// "$1,200,000" → 1200000.0. Returns None when nothing numeric is left or
/// the remainder is not a single number ("1.2.3"). The result is always
/// finite and non-negative since '-' is stripped.
pub fn clean_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Parse a free-text date typed into the sheet
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

// ============================================================================
// TESTS
// ============================================================================
