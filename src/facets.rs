// 🗂️ Facet Indexer - Filter options derived from the loaded catalogue
//
// For every classification attribute: the distinct non-absent values in
// first-seen order (deterministic, so option lists render stably).
// For funding: the numeric min/max over cleanly parsed amounts.

use crate::attributes::Attribute;
use crate::entities::Startup;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper slider bound used when no startup has a numeric funding amount.
/// Policy choice: the lower bound falls back to 0 and the upper to this.
pub const DEFAULT_FUNDING_CEILING: f64 = 1_000_000.0;

/// Closed numeric interval [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingRange {
    pub min: f64,
    pub max: f64,
}

impl FundingRange {
    pub fn new(min: f64, max: f64) -> Self {
        FundingRange { min, max }
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for FundingRange {
    fn default() -> Self {
        FundingRange::new(0.0, DEFAULT_FUNDING_CEILING)
    }
}

/// Every option list a filter UI needs, built in one pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetIndex {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub tech_verticals: Vec<String>,
    pub countries: Vec<String>,
    pub industries: Vec<String>,
    pub sectors: Vec<String>,
    pub investors: Vec<String>,
    pub round_stages: Vec<String>,
    pub funding_amount_range: FundingRange,
}

impl FacetIndex {
    pub fn build(startups: &[Startup]) -> Self {
        FacetIndex {
            categories: distinct_values(startups, Attribute::Category),
            tags: distinct_values(startups, Attribute::Tags),
            tech_verticals: distinct_values(startups, Attribute::TechVertical),
            countries: distinct_values(startups, Attribute::Country),
            industries: distinct_values(startups, Attribute::Industry),
            sectors: distinct_values(startups, Attribute::Sector),
            investors: distinct_values(startups, Attribute::Investors),
            round_stages: distinct_values(startups, Attribute::RoundStage),
            funding_amount_range: funding_amount_range(startups),
        }
    }

    /// Option list for one attribute (empty for non-facet attributes)
    pub fn values(&self, attribute: Attribute) -> &[String] {
        match attribute {
            Attribute::Category => &self.categories,
            Attribute::Tags => &self.tags,
            Attribute::TechVertical => &self.tech_verticals,
            Attribute::Country => &self.countries,
            Attribute::Industry => &self.industries,
            Attribute::Sector => &self.sectors,
            Attribute::Investors => &self.investors,
            Attribute::RoundStage => &self.round_stages,
            _ => &[],
        }
    }
}

/// Distinct non-absent values of one attribute, first-seen order
///
/// Multi-valued attributes are flattened across all startups first.
pub fn distinct_values(startups: &[Startup], attribute: Attribute) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();

    let mut push = |value: &str| {
        if !value.is_empty() && seen.insert(value.to_string()) {
            values.push(value.to_string());
        }
    };

    for startup in startups {
        if attribute.is_multi_valued() {
            startup.list(attribute).iter().for_each(|v| push(v.as_str()));
        } else if let Some(value) = startup.text(attribute) {
            push(value);
        }
    }

    values
}

/// Min/max of cleaned funding amounts, or [0, DEFAULT_FUNDING_CEILING]
pub fn funding_amount_range(startups: &[Startup]) -> FundingRange {
    startups
        .iter()
        .filter_map(Startup::funding_amount_value)
        .fold(None, |range: Option<FundingRange>, amount| {
            Some(match range {
                None => FundingRange::new(amount, amount),
                Some(r) => FundingRange::new(r.min.min(amount), r.max.max(amount)),
            })
        })
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================
