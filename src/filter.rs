// 🔎 Filter Evaluator - Multi-criterion predicate over the catalogue
//
// AND across clauses, OR within a clause's value set.
// A clause is active when present and non-empty; an empty set is the same
// as no constraint, never "match nothing".
//
// Missing-data policy (product decision, keep as is):
// - funding range and round date: a startup with no usable value PASSES
// - classification fields: a startup with no value FAILS an active clause
// The asymmetry is intentional and pending product confirmation.

use crate::attributes::Attribute;
use crate::entities::Startup;
use crate::facets::FundingRange;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RELATIVE DATE WINDOWS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundDateWindow {
    #[serde(rename = "Last Month")]
    LastMonth,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Last Year")]
    LastYear,
}

impl RoundDateWindow {
    pub const ALL: [RoundDateWindow; 3] = [
        RoundDateWindow::LastMonth,
        RoundDateWindow::LastQuarter,
        RoundDateWindow::LastYear,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            RoundDateWindow::LastMonth => "Last Month",
            RoundDateWindow::LastQuarter => "Last Quarter",
            RoundDateWindow::LastYear => "Last Year",
        }
    }

    fn months(&self) -> u32 {
        match self {
            RoundDateWindow::LastMonth => 1,
            RoundDateWindow::LastQuarter => 3,
            RoundDateWindow::LastYear => 12,
        }
    }

    /// Earliest date inside the window, in calendar months back from `now`
    pub fn start(&self, now: NaiveDate) -> NaiveDate {
        now.checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }

    /// `date >= now - window`; later dates (including future ones) are inside
    pub fn contains(&self, date: NaiveDate, now: NaiveDate) -> bool {
        date >= self.start(now)
    }
}

impl fmt::Display for RoundDateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for RoundDateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.token() == s.trim())
            .ok_or_else(|| format!("unknown round date window: {}", s))
    }
}

// ============================================================================
// FILTER SPEC
// ============================================================================

/// One field of a FilterSpec, as shown on an active-filter badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Search,
    Category,
    Tags,
    TechVertical,
    Country,
    Industry,
    Sector,
    Investors,
    RoundStage,
    RoundDate,
    FundingAmountRange,
}

/// One (field, value) pair of an active filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub field: FilterField,
    pub value: String,
}

/// Constraints for one query, built by the UI and never stored by the core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub search: String,
    pub category: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub tech_vertical: Option<Vec<String>>,
    pub country: Option<Vec<String>>,
    pub industry: Option<Vec<String>>,
    pub sector: Option<Vec<String>>,
    pub investors: Option<Vec<String>>,
    pub round_stage: Option<Vec<String>>,
    pub round_date: Option<Vec<RoundDateWindow>>,
    pub funding_amount_range: Option<FundingRange>,
}

/// Value-set fields in badge order, with the attribute they constrain
const SET_FIELDS: [(FilterField, Attribute); 8] = [
    (FilterField::Category, Attribute::Category),
    (FilterField::Tags, Attribute::Tags),
    (FilterField::TechVertical, Attribute::TechVertical),
    (FilterField::Country, Attribute::Country),
    (FilterField::Industry, Attribute::Industry),
    (FilterField::Sector, Attribute::Sector),
    (FilterField::Investors, Attribute::Investors),
    (FilterField::RoundStage, Attribute::RoundStage),
];

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Builder: replace the value set of a set-valued field
    ///
    /// Search, round date and funding range have their own builders; passing
    /// them here is a no-op.
    pub fn with_values<I, S>(mut self, field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(slot) = self.values_mut(field) {
            *slot = Some(values.into_iter().map(Into::into).collect());
        }
        self
    }

    pub fn with_round_date<I>(mut self, windows: I) -> Self
    where
        I: IntoIterator<Item = RoundDateWindow>,
    {
        self.round_date = Some(windows.into_iter().collect());
        self
    }

    pub fn with_funding_range(mut self, min: f64, max: f64) -> Self {
        self.funding_amount_range = Some(FundingRange::new(min, max));
        self
    }

    // ------------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------------

    pub fn values(&self, field: FilterField) -> Option<&Vec<String>> {
        match field {
            FilterField::Category => self.category.as_ref(),
            FilterField::Tags => self.tags.as_ref(),
            FilterField::TechVertical => self.tech_vertical.as_ref(),
            FilterField::Country => self.country.as_ref(),
            FilterField::Industry => self.industry.as_ref(),
            FilterField::Sector => self.sector.as_ref(),
            FilterField::Investors => self.investors.as_ref(),
            FilterField::RoundStage => self.round_stage.as_ref(),
            FilterField::Search | FilterField::RoundDate | FilterField::FundingAmountRange => None,
        }
    }

    fn values_mut(&mut self, field: FilterField) -> Option<&mut Option<Vec<String>>> {
        match field {
            FilterField::Category => Some(&mut self.category),
            FilterField::Tags => Some(&mut self.tags),
            FilterField::TechVertical => Some(&mut self.tech_vertical),
            FilterField::Country => Some(&mut self.country),
            FilterField::Industry => Some(&mut self.industry),
            FilterField::Sector => Some(&mut self.sector),
            FilterField::Investors => Some(&mut self.investors),
            FilterField::RoundStage => Some(&mut self.round_stage),
            FilterField::Search | FilterField::RoundDate | FilterField::FundingAmountRange => None,
        }
    }

    /// True when no clause is active (everything matches)
    pub fn is_empty(&self) -> bool {
        self.active_filters().is_empty()
    }

    /// Every active (field, value) pair, in a stable order
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut active = Vec::new();

        if !self.search.trim().is_empty() {
            active.push(ActiveFilter {
                field: FilterField::Search,
                value: self.search.trim().to_string(),
            });
        }

        for (field, _) in SET_FIELDS {
            for value in self.values(field).into_iter().flatten() {
                active.push(ActiveFilter {
                    field,
                    value: value.clone(),
                });
            }
        }

        for window in self.round_date.iter().flatten() {
            active.push(ActiveFilter {
                field: FilterField::RoundDate,
                value: window.token().to_string(),
            });
        }

        if let Some(range) = self.funding_amount_range {
            active.push(ActiveFilter {
                field: FilterField::FundingAmountRange,
                value: format!("{} - {}", range.min, range.max),
            });
        }

        active
    }

    /// Copy with one value removed from one field
    ///
    /// Search and funding range have a single value, so they are cleared.
    /// Removing the last value leaves an empty set, which is inactive.
    pub fn without(&self, field: FilterField, value: &str) -> FilterSpec {
        let mut next = self.clone();
        match field {
            FilterField::Search => next.search.clear(),
            FilterField::FundingAmountRange => next.funding_amount_range = None,
            FilterField::RoundDate => {
                if let Some(windows) = next.round_date.as_mut() {
                    windows.retain(|w| w.token() != value);
                }
            }
            other => {
                if let Some(Some(values)) = next.values_mut(other) {
                    values.retain(|v| v != value);
                }
            }
        }
        next
    }

    /// Copy with a whole field removed
    pub fn clear(&self, field: FilterField) -> FilterSpec {
        let mut next = self.clone();
        match field {
            FilterField::Search => next.search.clear(),
            FilterField::FundingAmountRange => next.funding_amount_range = None,
            FilterField::RoundDate => next.round_date = None,
            other => {
                if let Some(slot) = next.values_mut(other) {
                    *slot = None;
                }
            }
        }
        next
    }

    // ------------------------------------------------------------------------
    // Clauses
    // ------------------------------------------------------------------------

    /// Does one startup satisfy every active clause?
    pub fn matches(&self, startup: &Startup, now: NaiveDate) -> bool {
        self.matches_search(startup)
            && SET_FIELDS
                .iter()
                .all(|(field, attr)| self.matches_set(*field, *attr, startup))
            && self.matches_funding(startup)
            && self.matches_round_date(startup, now)
    }

    fn matches_search(&self, startup: &Startup) -> bool {
        // Blank means inactive; otherwise the text is matched as typed
        if self.search.trim().is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();

        startup.name.to_lowercase().contains(&needle)
            || startup
                .og_description
                .as_deref()
                .map_or(false, |d| d.to_lowercase().contains(&needle))
    }

    fn matches_set(&self, field: FilterField, attribute: Attribute, startup: &Startup) -> bool {
        let wanted = match active_set(self.values(field)) {
            Some(wanted) => wanted,
            None => return true,
        };

        if attribute.is_multi_valued() {
            startup.list(attribute).iter().any(|v| wanted.contains(v))
        } else {
            // No value fails an active clause
            startup
                .text(attribute)
                .map_or(false, |v| wanted.iter().any(|w| w == v))
        }
    }

    fn matches_funding(&self, startup: &Startup) -> bool {
        match (self.funding_amount_range, startup.funding_amount_value()) {
            (Some(range), Some(amount)) => range.contains(amount),
            // Inactive clause, or unknown funding: permissive
            _ => true,
        }
    }

    fn matches_round_date(&self, startup: &Startup, now: NaiveDate) -> bool {
        let windows = match self.round_date.as_deref() {
            Some(windows) if !windows.is_empty() => windows,
            _ => return true,
        };

        match startup.round_date_value() {
            Some(date) => windows.iter().any(|w| w.contains(date, now)),
            // Absent or unparsable round date: permissive
            None => true,
        }
    }
}

fn active_set(values: Option<&Vec<String>>) -> Option<&Vec<String>> {
    values.filter(|v| !v.is_empty())
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Subset of `startups` satisfying every clause, in input order
///
/// Pure: `now` is the evaluation date for relative windows and the input
/// is never mutated.
pub fn evaluate<'a>(startups: &'a [Startup], spec: &FilterSpec, now: NaiveDate) -> Vec<&'a Startup> {
    startups.iter().filter(|s| spec.matches(s, now)).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn ids(result: &[&Startup]) -> Vec<String> {
        result.iter().map(|s| s.id.clone()).collect()
    }

    fn catalogue() -> Vec<Startup> {
        vec![
            Startup::new("1", "Acme Rockets")
                .with(Attribute::Country, "Chile")
                .with(Attribute::TechVertical, "DeepTech")
                .with(Attribute::Investors, "Acme Ventures")
                .with(Attribute::FundingAmount, "$1,200,000")
                .with(Attribute::RoundDate, "2025-06-01")
                .with(Attribute::OgDescription, "Reusable launch vehicles"),
            Startup::new("2", "Beta Pay")
                .with(Attribute::Country, "Mexico")
                .with(Attribute::TechVertical, "Fintech")
                .with(Attribute::Investors, "Other Fund")
                .with(Attribute::FundingAmount, "300000")
                .with(Attribute::RoundDate, "2024-12-01"),
            Startup::new("3", "Gamma Health")
                .with(Attribute::TechVertical, "HealthTech")
                .with(Attribute::FundingAmount, "undisclosed")
                .with(Attribute::RoundDate, "sometime in 2023"),
        ]
    }

    #[test]
    fn test_empty_spec_returns_everything_in_order() {
        let startups = catalogue();
        let result = evaluate(&startups, &FilterSpec::new(), now());

        assert_eq!(ids(&result), vec!["1", "2", "3"]);
        assert!(FilterSpec::new().is_empty());
    }

    #[test]
    fn test_empty_sets_are_inactive() {
        let startups = catalogue();
        let spec = FilterSpec::new()
            .with_values(FilterField::Country, Vec::<String>::new())
            .with_round_date(Vec::new());

        assert_eq!(evaluate(&startups, &spec, now()).len(), 3);
        assert!(spec.is_empty());
    }

    #[test]
    fn test_search_name_or_og_description() {
        let startups = catalogue();

        let by_name = FilterSpec::new().with_search("beta");
        assert_eq!(ids(&evaluate(&startups, &by_name, now())), vec!["2"]);

        let by_og = FilterSpec::new().with_search("LAUNCH");
        assert_eq!(ids(&evaluate(&startups, &by_og, now())), vec!["1"]);

        let blank = FilterSpec::new().with_search("   ");
        assert_eq!(evaluate(&startups, &blank, now()).len(), 3);
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        let startups = vec![
            Startup::new("1", "Paypal"),
            Startup::new("2", "Beta Pay"),
        ];

        let spaced = FilterSpec::new().with_search(" pay");
        assert_eq!(ids(&evaluate(&startups, &spaced, now())), vec!["2"]);

        let plain = FilterSpec::new().with_search("pay");
        assert_eq!(ids(&evaluate(&startups, &plain, now())), vec!["1", "2"]);
    }

    #[test]
    fn test_single_valued_or_within_field() {
        let startups = catalogue();
        let spec = FilterSpec::new().with_values(FilterField::TechVertical, ["DeepTech", "HealthTech"]);

        assert_eq!(ids(&evaluate(&startups, &spec, now())), vec!["1", "3"]);
    }

    #[test]
    fn test_missing_classification_value_fails_active_clause() {
        let startups = catalogue();
        let spec = FilterSpec::new().with_values(FilterField::Country, ["Chile", "Mexico"]);

        // Gamma has no country and is excluded
        assert_eq!(ids(&evaluate(&startups, &spec, now())), vec!["1", "2"]);
    }

    #[test]
    fn test_investors_any_match() {
        let startups = catalogue();
        let spec = FilterSpec::new().with_values(FilterField::Investors, ["Acme Ventures"]);

        assert_eq!(ids(&evaluate(&startups, &spec, now())), vec!["1"]);
    }

    #[test]
    fn test_funding_range_inclusive() {
        let startups = catalogue();

        let wide = FilterSpec::new().with_funding_range(1_000_000.0, 1_500_000.0);
        // Gamma's funding is unknown, so it passes
        assert_eq!(ids(&evaluate(&startups, &wide, now())), vec!["1", "3"]);

        let narrow = FilterSpec::new().with_funding_range(0.0, 500_000.0);
        assert_eq!(ids(&evaluate(&startups, &narrow, now())), vec!["2", "3"]);

        let exact = FilterSpec::new().with_funding_range(300_000.0, 300_000.0);
        assert_eq!(ids(&evaluate(&startups, &exact, now())), vec!["2", "3"]);
    }

    #[test]
    fn test_inverted_range_keeps_only_unknown_funding() {
        let startups = catalogue();
        let spec = FilterSpec::new().with_funding_range(500_000.0, 100.0);

        assert_eq!(ids(&evaluate(&startups, &spec, now())), vec!["3"]);
    }

    #[test]
    fn test_round_date_windows() {
        let startups = catalogue();

        let month = FilterSpec::new().with_round_date([RoundDateWindow::LastMonth]);
        // Gamma's round date does not parse, so it passes
        assert_eq!(ids(&evaluate(&startups, &month, now())), vec!["1", "3"]);

        let year = FilterSpec::new().with_round_date([RoundDateWindow::LastYear]);
        assert_eq!(ids(&evaluate(&startups, &year, now())), vec!["1", "2", "3"]);

        let either = FilterSpec::new()
            .with_round_date([RoundDateWindow::LastMonth, RoundDateWindow::LastQuarter]);
        assert_eq!(ids(&evaluate(&startups, &either, now())), vec!["1", "3"]);
    }

    #[test]
    fn test_missing_round_date_passes() {
        let startups = vec![Startup::new("1", "No date")];
        let spec = FilterSpec::new().with_round_date([RoundDateWindow::LastMonth]);

        assert_eq!(evaluate(&startups, &spec, now()).len(), 1);
    }

    #[test]
    fn test_window_boundaries_are_calendar_months() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

        // Feb has no 31st: one month back clamps to Feb 28
        assert_eq!(
            RoundDateWindow::LastMonth.start(now),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            RoundDateWindow::LastYear.start(now),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );

        let edge = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(RoundDateWindow::LastQuarter.contains(edge, now));
        assert!(!RoundDateWindow::LastQuarter.contains(edge.pred_opt().unwrap(), now));
    }

    #[test]
    fn test_clauses_combine_with_and() {
        let startups = catalogue();
        let spec = FilterSpec::new()
            .with_values(FilterField::Country, ["Chile", "Mexico"])
            .with_funding_range(0.0, 500_000.0);

        assert_eq!(ids(&evaluate(&startups, &spec, now())), vec!["2"]);
    }

    #[test]
    fn test_reapplying_is_stable() {
        let startups = catalogue();
        let spec = FilterSpec::new()
            .with_values(FilterField::TechVertical, ["DeepTech", "Fintech"])
            .with_round_date([RoundDateWindow::LastYear]);

        let first: Vec<Startup> = evaluate(&startups, &spec, now()).into_iter().cloned().collect();
        let second = evaluate(&first, &spec, now());

        assert_eq!(ids(&second), first.iter().map(|s| s.id.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn test_active_filters_and_removal() {
        let spec = FilterSpec::new()
            .with_search("pay")
            .with_values(FilterField::Country, ["Chile", "Mexico"])
            .with_round_date([RoundDateWindow::LastQuarter])
            .with_funding_range(0.0, 10.0);

        let active = spec.active_filters();
        assert_eq!(active.len(), 5);
        assert_eq!(active[0].field, FilterField::Search);
        assert_eq!(active[1].value, "Chile");
        assert_eq!(active[3].value, "Last Quarter");

        let fewer = spec.without(FilterField::Country, "Chile");
        assert_eq!(fewer.country, Some(vec!["Mexico".to_string()]));

        let none = fewer.without(FilterField::Country, "Mexico");
        assert_eq!(none.country, Some(Vec::new()));
        assert_eq!(none.active_filters().len(), 3);

        let cleared = spec.clear(FilterField::RoundDate).clear(FilterField::Search);
        assert_eq!(cleared.round_date, None);
        assert!(cleared.search.is_empty());
    }

    #[test]
    fn test_deserialize_camel_case_spec() {
        let json = r#"{
            "search": "acme",
            "techVertical": ["DeepTech"],
            "roundDate": ["Last Month", "Last Year"],
            "fundingAmountRange": { "min": 0, "max": 2000000 }
        }"#;

        let spec: FilterSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.tech_vertical, Some(vec!["DeepTech".to_string()]));
        assert_eq!(
            spec.round_date,
            Some(vec![RoundDateWindow::LastMonth, RoundDateWindow::LastYear])
        );
        assert_eq!(spec.funding_amount_range, Some(FundingRange::new(0.0, 2_000_000.0)));
        assert_eq!(spec.country, None);
    }

    #[test]
    fn test_window_tokens_parse() {
        assert_eq!("Last Quarter".parse::<RoundDateWindow>(), Ok(RoundDateWindow::LastQuarter));
        assert!("Last Week".parse::<RoundDateWindow>().is_err());
    }
}
