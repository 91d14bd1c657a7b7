//! The canonical extraction record and its nested types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An initiative with a tracked monetary value.
///
/// All four keys are always present once a record has been standardized,
/// even when the source fragment only supplied a bare description string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeInitiative {
    /// Initiative identifier; synthesized positionally (`QT1`, `QT2`, ...)
    /// when the source did not provide one.
    pub id: String,

    /// What the initiative does.
    pub description: String,

    /// Expected value in EUR, if stated.
    pub value_eur: Option<f64>,

    /// Tracking status, if stated.
    pub status: Option<String>,
}

/// A non-monetary initiative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeInitiative {
    /// Initiative identifier; synthesized positionally (`Q1`, `Q2`, ...)
    /// when the source did not provide one.
    pub id: String,

    /// Short title of the initiative.
    pub title: String,

    /// Longer description, if stated.
    pub description: Option<String>,
}

/// SWOT analysis with all four lists always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    /// Strengths.
    #[serde(default)]
    pub strengths: Vec<String>,

    /// Weaknesses.
    #[serde(default)]
    pub weaknesses: Vec<String>,

    /// Opportunities.
    #[serde(default)]
    pub opportunities: Vec<String>,

    /// Threats.
    #[serde(default)]
    pub threats: Vec<String>,
}

/// The canonical, schema-complete extraction result.
///
/// Every field is optional: a field the model never mentioned stays absent,
/// which callers must treat as "unknown" rather than "empty". Fields the
/// model emitted outside the canonical schema are preserved in [`extra`].
///
/// Records are immutable once built; they are the terminal pipeline artifact
/// and serialize directly to the exported JSON document.
///
/// [`extra`]: CommodityRecord::extra
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommodityRecord {
    /// Name of the commodity the document covers (e.g. "Sugar").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity_name: Option<String>,

    /// Managers responsible for the commodity. Always a sequence after
    /// standardization, never a bare string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_managers: Option<Vec<String>>,

    /// Document creation date, free-form (source formats are inconsistent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// Strategy expiration date, free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,

    /// Cost breakdown: driver name to numeric share, or the original string
    /// when it could not be parsed as a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_drivers: Option<Map<String, Value>>,

    /// Monetary initiatives, IDs unique within the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantitative_initiatives: Option<Vec<QuantitativeInitiative>>,

    /// Non-monetary initiatives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualitative_initiatives: Option<Vec<QualitativeInitiative>>,

    /// SWOT analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swot_analysis: Option<SwotAnalysis>,

    /// Free-form sustainability information (deforestation risk, emissions,
    /// certifications, ...); no fixed schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability_factors: Option<Map<String, Value>>,

    /// Fields the model emitted that are not part of the canonical schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommodityRecord {
    /// Build a record from a standardized JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
