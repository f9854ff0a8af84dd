// 📐 Shape Layer - Versioned feed schemas
// Which column holds which attribute, per published layout of the sheet
//
// The sheet's column layout has grown over time. Each layout is a value
// (an ordered list of column mappings), so the normalizer can be re-pointed
// at a new layout without touching parsing or filtering.

use crate::attributes::{Attribute, Coercion};
use crate::error::SchemaError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// COLUMN MAPPING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// 0-based position in the parsed row
    pub index: usize,

    pub attribute: Attribute,

    /// None = the attribute's default coercion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coercion: Option<Coercion>,
}

impl ColumnMapping {
    pub fn new(index: usize, attribute: Attribute) -> Self {
        ColumnMapping {
            index,
            attribute,
            coercion: None,
        }
    }

    /// Builder: override the coercion
    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Coercion actually applied to this column
    pub fn effective_coercion(&self) -> Coercion {
        self.coercion
            .clone()
            .unwrap_or_else(|| self.attribute.default_coercion())
    }
}

// ============================================================================
// FEED SCHEMA
// ============================================================================

/// Attribute order of the catalogue layout (v1)
const CATALOGUE_COLUMNS: [Attribute; 7] = [
    Attribute::Name,
    Attribute::Description,
    Attribute::ImageUrl,
    Attribute::Url,
    Attribute::Tags,
    Attribute::Category,
    Attribute::DateAdded,
];

/// Columns appended by the open-graph layout (v2)
const OPEN_GRAPH_COLUMNS: [Attribute; 4] = [
    Attribute::TechVertical,
    Attribute::RoundStage,
    Attribute::OgDescription,
    Attribute::OgImage,
];

/// Columns appended by the funding layout (v3)
const FUNDING_COLUMNS: [Attribute; 14] = [
    Attribute::CompanyName,
    Attribute::Website,
    Attribute::FundingAmount,
    Attribute::Country,
    Attribute::Industry,
    Attribute::Sector,
    Attribute::Investors,
    Attribute::RoundSize,
    Attribute::RoundSizeRange,
    Attribute::RoundDate,
    Attribute::RoundMonth,
    Attribute::RoundYear,
    Attribute::FoundationYear,
    Attribute::OgTitle,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSchema {
    pub version: String,
    pub columns: Vec<ColumnMapping>,
}

impl FeedSchema {
    /// Build a schema from attributes laid out in consecutive columns
    pub fn from_attributes(version: impl Into<String>, attributes: &[Attribute]) -> Self {
        FeedSchema {
            version: version.into(),
            columns: attributes
                .iter()
                .enumerate()
                .map(|(index, attr)| ColumnMapping::new(index, *attr))
                .collect(),
        }
    }

    /// v1: name, description, imageUrl, url, tags, category, dateAdded
    pub fn v1() -> Self {
        Self::from_attributes("v1", &CATALOGUE_COLUMNS)
    }

    /// v2: v1 + techVertical, roundStage, ogDescription, ogImage
    pub fn v2() -> Self {
        let attributes: Vec<Attribute> = CATALOGUE_COLUMNS
            .iter()
            .chain(OPEN_GRAPH_COLUMNS.iter())
            .copied()
            .collect();
        Self::from_attributes("v2", &attributes)
    }

    /// v3: v2 + company, funding, geography, investors and round details
    pub fn v3() -> Self {
        let attributes: Vec<Attribute> = CATALOGUE_COLUMNS
            .iter()
            .chain(OPEN_GRAPH_COLUMNS.iter())
            .chain(FUNDING_COLUMNS.iter())
            .copied()
            .collect();
        Self::from_attributes("v3", &attributes)
    }

    /// The most complete built-in layout
    pub fn latest() -> Self {
        Self::v3()
    }

    /// Look up a built-in layout by version name
    pub fn by_version(version: &str) -> Result<Self, SchemaError> {
        match version {
            "v1" => Ok(Self::v1()),
            "v2" => Ok(Self::v2()),
            "v3" | "latest" => Ok(Self::v3()),
            other => Err(SchemaError::UnknownVersion(other.to_string())),
        }
    }

    /// Parse and validate a JSON schema document
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: FeedSchema =
            serde_json::from_str(json).context("Failed to parse feed schema JSON")?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load a JSON schema document from disk
    pub fn load_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid schema file: {}", path.display()))
    }

    /// Minimum number of fields a row needs for this layout
    pub fn width(&self) -> usize {
        self.columns.iter().map(|c| c.index + 1).max().unwrap_or(0)
    }

    pub fn maps(&self, attribute: Attribute) -> bool {
        self.columns.iter().any(|c| c.attribute == attribute)
    }

    /// Reject layouts that would map a column or attribute twice, pair an
    /// attribute with a coercion that cannot fill it, or lose the name
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut indices = HashSet::new();
        let mut attributes = HashSet::new();

        for column in &self.columns {
            if !indices.insert(column.index) {
                return Err(SchemaError::DuplicateColumn {
                    version: self.version.clone(),
                    index: column.index,
                });
            }
            let coercion = column.effective_coercion();
            if !coercion.applies_to(column.attribute) {
                return Err(SchemaError::IncompatibleCoercion {
                    version: self.version.clone(),
                    attribute: column.attribute.to_string(),
                    coercion: coercion.kind().to_string(),
                });
            }
            if !attributes.insert(column.attribute) {
                return Err(SchemaError::DuplicateAttribute {
                    version: self.version.clone(),
                    attribute: column.attribute.to_string(),
                });
            }
        }

        if !attributes.contains(&Attribute::Name) {
            return Err(SchemaError::MissingName {
                version: self.version.clone(),
            });
        }

        Ok(())
    }
}

impl Default for FeedSchema {
    fn default() -> Self {
        Self::latest()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_widths() {
        assert_eq!(FeedSchema::v1().width(), 7);
        assert_eq!(FeedSchema::v2().width(), 11);
        assert_eq!(FeedSchema::v3().width(), 25);
    }

    #[test]
    fn test_builtin_schemas_are_valid() {
        for version in ["v1", "v2", "v3"] {
            let schema = FeedSchema::by_version(version).unwrap();
            assert!(schema.validate().is_ok(), "{} should validate", version);
        }
    }

    #[test]
    fn test_v3_column_positions() {
        let schema = FeedSchema::v3();
        let at = |i: usize| schema.columns.iter().find(|c| c.index == i).unwrap().attribute;

        assert_eq!(at(0), Attribute::Name);
        assert_eq!(at(7), Attribute::TechVertical);
        assert_eq!(at(13), Attribute::FundingAmount);
        assert_eq!(at(17), Attribute::Investors);
        assert_eq!(at(20), Attribute::RoundDate);
        assert_eq!(at(24), Attribute::OgTitle);
    }

    #[test]
    fn test_unknown_version() {
        let err = FeedSchema::by_version("v9").unwrap_err();
        assert_eq!(err, SchemaError::UnknownVersion("v9".to_string()));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let schema = FeedSchema {
            version: "broken".to_string(),
            columns: vec![
                ColumnMapping::new(0, Attribute::Name),
                ColumnMapping::new(0, Attribute::Country),
            ],
        };

        assert!(matches!(
            schema.validate(),
            Err(SchemaError::DuplicateColumn { index: 0, .. })
        ));
    }

    #[test]
    fn test_missing_name_rejected() {
        let schema = FeedSchema::from_attributes("nameless", &[Attribute::Country]);
        assert!(matches!(schema.validate(), Err(SchemaError::MissingName { .. })));
    }

    #[test]
    fn test_category_coercion_on_other_attribute_rejected() {
        let json = r#"{
            "version": "custom",
            "columns": [
                { "index": 0, "attribute": "name" },
                { "index": 1, "attribute": "category" },
                { "index": 2, "attribute": "country", "coercion": { "kind": "category" } }
            ]
        }"#;

        let err = FeedSchema::from_json(json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::IncompatibleCoercion { coercion, .. }) if coercion == "category"
        ));
    }

    #[test]
    fn test_list_coercion_on_single_valued_attribute_rejected() {
        let schema = FeedSchema {
            version: "custom".to_string(),
            columns: vec![
                ColumnMapping::new(0, Attribute::Name),
                ColumnMapping::new(1, Attribute::Sector).with_coercion(Coercion::List),
            ],
        };

        assert_eq!(
            schema.validate(),
            Err(SchemaError::IncompatibleCoercion {
                version: "custom".to_string(),
                attribute: "sector".to_string(),
                coercion: "list".to_string(),
            })
        );
    }

    #[test]
    fn test_text_coercion_on_category_rejected() {
        let schema = FeedSchema {
            version: "custom".to_string(),
            columns: vec![
                ColumnMapping::new(0, Attribute::Name),
                ColumnMapping::new(1, Attribute::Category).with_coercion(Coercion::Text),
            ],
        };

        assert!(matches!(
            schema.validate(),
            Err(SchemaError::IncompatibleCoercion { .. })
        ));
    }

    #[test]
    fn test_from_json_sparse_layout() {
        let json = r#"{
            "version": "sparse",
            "columns": [
                { "index": 0, "attribute": "name" },
                { "index": 3, "attribute": "country" },
                { "index": 5, "attribute": "investors" },
                { "index": 6, "attribute": "url", "coercion": { "kind": "text" } }
            ]
        }"#;

        let schema = FeedSchema::from_json(json).unwrap();
        assert_eq!(schema.width(), 7);
        assert_eq!(schema.columns[2].effective_coercion(), Coercion::List);
        assert_eq!(schema.columns[3].effective_coercion(), Coercion::Text);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&FeedSchema::v2()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let schema = FeedSchema::load_file(file.path()).unwrap();
        assert_eq!(schema, FeedSchema::v2());
    }

    #[test]
    fn test_load_file_rejects_invalid_layout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"version":"x","columns":[]}"#).unwrap();

        assert!(FeedSchema::load_file(file.path()).is_err());
    }
}
