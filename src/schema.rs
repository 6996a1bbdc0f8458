use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Department name used by presentation-layer filtering when the model
/// could not attribute a line item to a specific department.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Three-way health classification of a financial ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioStatus {
    Good,
    Warning,
    Critical,
}

/// Direction of a significant period-over-period movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatio {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: RatioStatus,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub name: String,
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    #[serde(rename = "liquidityComment")]
    pub liquidity_comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantChange {
    pub item: String,
    pub amount: f64,
    /// Already formatted by the model (e.g. "+15.2%"), kept verbatim.
    pub percentage: String,
    pub trend: Trend,
    pub reason: String,
    /// Absence is preserved through parsing; consumers that filter or
    /// display by department fall back to [`DEFAULT_DEPARTMENT`].
    #[serde(rename = "relatedDepartment", default)]
    pub related_department: Option<String>,
}

impl SignificantChange {
    /// Department name for display/filtering purposes.
    pub fn department_or_general(&self) -> &str {
        self.related_department
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DEPARTMENT)
    }
}

/// Validated output of one analysis request.
///
/// All collections are guaranteed present after deserialization (absent or
/// `null` in the wire payload becomes an empty vector), so downstream
/// rendering never branches on missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "overallAnalysis")]
    pub overall_analysis: String,
    #[serde(rename = "formalReport")]
    pub formal_report: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ratios: Vec<FinancialRatio>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub departments: Vec<DepartmentSummary>,
    #[serde(
        rename = "significantChanges",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub significant_changes: Vec<SignificantChange>,
    #[serde(rename = "topHighItems", default, deserialize_with = "null_as_empty")]
    pub top_high_items: Vec<String>,
    #[serde(rename = "topLowItems", default, deserialize_with = "null_as_empty")]
    pub top_low_items: Vec<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// The structural contract sent to Gemini as `responseSchema`.
///
/// Mirrors [`AnalysisResult`] field for field; `relatedDepartment` is the
/// only optional property.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallAnalysis": { "type": "STRING" },
            "formalReport": { "type": "STRING" },
            "ratios": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "value": { "type": "NUMBER" },
                        "unit": { "type": "STRING" },
                        "status": {
                            "type": "STRING",
                            "enum": ["good", "warning", "critical"]
                        },
                        "description": { "type": "STRING" }
                    },
                    "required": ["name", "value", "unit", "status", "description"]
                }
            },
            "departments": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "revenue": { "type": "NUMBER" },
                        "expense": { "type": "NUMBER" },
                        "profit": { "type": "NUMBER" },
                        "liquidityComment": { "type": "STRING" }
                    },
                    "required": ["name", "revenue", "expense", "profit", "liquidityComment"]
                }
            },
            "significantChanges": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "relatedDepartment": { "type": "STRING" },
                        "amount": { "type": "NUMBER" },
                        "percentage": { "type": "STRING" },
                        "trend": {
                            "type": "STRING",
                            "enum": ["increase", "decrease"]
                        },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["item", "amount", "percentage", "trend", "reason"]
                }
            },
            "topHighItems": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "topLowItems": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": [
            "overallAnalysis",
            "formalReport",
            "ratios",
            "departments",
            "significantChanges",
            "topHighItems",
            "topLowItems"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_all_top_level_keys() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        for key in [
            "overallAnalysis",
            "formalReport",
            "ratios",
            "departments",
            "significantChanges",
            "topHighItems",
            "topLowItems",
        ] {
            assert!(required.iter().any(|v| v == key), "missing {}", key);
        }
    }

    #[test]
    fn test_status_enum_is_closed() {
        assert!(serde_json::from_str::<RatioStatus>("\"good\"").is_ok());
        assert!(serde_json::from_str::<RatioStatus>("\"warning\"").is_ok());
        assert!(serde_json::from_str::<RatioStatus>("\"critical\"").is_ok());
        assert!(serde_json::from_str::<RatioStatus>("\"unknown\"").is_err());
    }

    #[test]
    fn test_trend_enum_is_closed() {
        assert!(serde_json::from_str::<Trend>("\"increase\"").is_ok());
        assert!(serde_json::from_str::<Trend>("\"decrease\"").is_ok());
        assert!(serde_json::from_str::<Trend>("\"flat\"").is_err());
    }

    #[test]
    fn test_missing_collections_become_empty() {
        let result: AnalysisResult =
            serde_json::from_str(r###"{"overallAnalysis":"ok","formalReport":"## Report"}"###).unwrap();
        assert!(result.ratios.is_empty());
        assert!(result.departments.is_empty());
        assert!(result.significant_changes.is_empty());
        assert!(result.top_high_items.is_empty());
        assert!(result.top_low_items.is_empty());
    }

    #[test]
    fn test_null_collections_become_empty() {
        let result: AnalysisResult = serde_json::from_str(
            r#"{"overallAnalysis":"ok","formalReport":"r","ratios":null,"topHighItems":null}"#,
        )
        .unwrap();
        assert!(result.ratios.is_empty());
        assert!(result.top_high_items.is_empty());
    }

    #[test]
    fn test_related_department_absence_is_preserved() {
        let change: SignificantChange = serde_json::from_str(
            r#"{"item":"ค่าขนส่ง","amount":120000.0,"percentage":"+18%","trend":"increase","reason":"น้ำมันแพงขึ้น"}"#,
        )
        .unwrap();
        assert_eq!(change.related_department, None);
        assert_eq!(change.department_or_general(), DEFAULT_DEPARTMENT);

        let change: SignificantChange = serde_json::from_str(
            r#"{"item":"ยอดขาย","amount":1.0,"percentage":"+1%","trend":"increase","reason":"x","relatedDepartment":"ฝ่ายขาย"}"#,
        )
        .unwrap();
        assert_eq!(change.department_or_general(), "ฝ่ายขาย");
    }
}
