//! Requirements intake
//!
//! Inbound request bodies are untyped JSON. [`normalize`] coerces them into a
//! [`RequirementsPayload`] without judging the values, and
//! [`RequirementsPayload::validate`] turns that into typed [`Requirements`]
//! the baseline engine can consume.
//!
//! ```
//! use hwconf_core::requirements::{normalize, UsageType};
//!
//! let raw = serde_json::json!({
//!     "usageType": "coding",
//!     "budgetRange": "1200-1500",
//!     "quantity": "5-20",
//!     "formFactor": "laptop",
//!     "requiredSoftware": "VS Code, PyCharm, ",
//!     "brandConstraints": "Lenovo",
//!     "performancePriority": "ram"
//! });
//!
//! let payload = normalize(&raw).unwrap();
//! assert_eq!(payload.required_software, vec!["VS Code", "PyCharm"]);
//!
//! let requirements = payload.validate().unwrap();
//! assert_eq!(requirements.usage_type, UsageType::Coding);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfiguratorError, Result};

/// Workload category; selects the preset row and the price band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageType {
    #[serde(rename = "office")]
    Office = 0,
    #[serde(rename = "web")]
    Web = 1,
    #[serde(rename = "editing")]
    Editing = 2,
    #[serde(rename = "rendering")]
    Rendering = 3,
    #[serde(rename = "coding")]
    Coding = 4,
    #[serde(rename = "data analysis")]
    DataAnalysis = 5,
    #[serde(rename = "gaming")]
    Gaming = 6,
    #[serde(rename = "server")]
    Server = 7,
    #[serde(rename = "mixed")]
    Mixed = 8,
}

impl UsageType {
    /// Every usage type, in table order
    pub const ALL: [UsageType; 9] = [
        UsageType::Office,
        UsageType::Web,
        UsageType::Editing,
        UsageType::Rendering,
        UsageType::Coding,
        UsageType::DataAnalysis,
        UsageType::Gaming,
        UsageType::Server,
        UsageType::Mixed,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageType::Office => "office",
            UsageType::Web => "web",
            UsageType::Editing => "editing",
            UsageType::Rendering => "rendering",
            UsageType::Coding => "coding",
            UsageType::DataAnalysis => "data analysis",
            UsageType::Gaming => "gaming",
            UsageType::Server => "server",
            UsageType::Mixed => "mixed",
        }
    }
}

/// Order size bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    #[serde(rename = "1")]
    Single = 0,
    #[serde(rename = "5-20")]
    SmallBatch = 1,
    #[serde(rename = "20-50")]
    Department = 2,
    #[serde(rename = "50-200")]
    Campus = 3,
    #[serde(rename = "200+")]
    Enterprise = 4,
}

impl Quantity {
    pub const ALL: [Quantity; 5] = [
        Quantity::Single,
        Quantity::SmallBatch,
        Quantity::Department,
        Quantity::Campus,
        Quantity::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quantity::Single => "1",
            Quantity::SmallBatch => "5-20",
            Quantity::Department => "20-50",
            Quantity::Campus => "50-200",
            Quantity::Enterprise => "200+",
        }
    }
}

/// Chassis type; only affects the accessory list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormFactor {
    #[serde(rename = "laptop")]
    Laptop,
    #[serde(rename = "desktop")]
    Desktop,
    #[serde(rename = "SFF")]
    SmallFormFactor,
    #[serde(rename = "workstation")]
    Workstation,
    #[serde(rename = "ultrabook")]
    Ultrabook,
    #[serde(rename = "server")]
    Server,
}

impl FormFactor {
    pub const ALL: [FormFactor; 6] = [
        FormFactor::Laptop,
        FormFactor::Desktop,
        FormFactor::SmallFormFactor,
        FormFactor::Workstation,
        FormFactor::Ultrabook,
        FormFactor::Server,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormFactor::Laptop => "laptop",
            FormFactor::Desktop => "desktop",
            FormFactor::SmallFormFactor => "SFF",
            FormFactor::Workstation => "workstation",
            FormFactor::Ultrabook => "ultrabook",
            FormFactor::Server => "server",
        }
    }

    /// Portable machines get a docking station
    pub fn is_portable(&self) -> bool {
        matches!(self, FormFactor::Laptop | FormFactor::Ultrabook)
    }
}

/// Which component gets the budget emphasis; selects a note only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformancePriority {
    Cpu = 0,
    Gpu = 1,
    Ram = 2,
    Balanced = 3,
}

impl PerformancePriority {
    pub const ALL: [PerformancePriority; 4] = [
        PerformancePriority::Cpu,
        PerformancePriority::Gpu,
        PerformancePriority::Ram,
        PerformancePriority::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformancePriority::Cpu => "cpu",
            PerformancePriority::Gpu => "gpu",
            PerformancePriority::Ram => "ram",
            PerformancePriority::Balanced => "balanced",
        }
    }
}

macro_rules! impl_wire_str {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ();

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == s)
                    .ok_or(())
            }
        }
    };
}

impl_wire_str!(UsageType);
impl_wire_str!(Quantity);
impl_wire_str!(FormFactor);
impl_wire_str!(PerformancePriority);

/// Normalized request body. Enum-like fields are plain strings here and have
/// not been checked against their allowed values yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsPayload {
    pub usage_type: String,
    pub budget_range: String,
    pub quantity: String,
    pub form_factor: String,
    pub required_software: Vec<String>,
    pub brand_constraints: String,
    pub performance_priority: String,
    pub storage_requirements: String,
    pub networking_needs: String,
    pub durability_needs: String,
    pub warranty_preferences: String,
    pub power_preferences: String,
    pub compliance_notes: String,
}

/// Validated requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub usage_type: UsageType,
    pub budget_range: String,
    pub quantity: Quantity,
    pub form_factor: FormFactor,
    pub required_software: Vec<String>,
    pub brand_constraints: String,
    pub performance_priority: PerformancePriority,
    #[serde(default)]
    pub storage_requirements: String,
    #[serde(default)]
    pub networking_needs: String,
    #[serde(default)]
    pub durability_needs: String,
    #[serde(default)]
    pub warranty_preferences: String,
    #[serde(default)]
    pub power_preferences: String,
    #[serde(default)]
    pub compliance_notes: String,
}

/// Required fields, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 7] = [
    "usageType",
    "budgetRange",
    "quantity",
    "formFactor",
    "requiredSoftware",
    "brandConstraints",
    "performancePriority",
];

/// Coerce an untyped request body into a [`RequirementsPayload`].
///
/// Only fails when `raw` is not a JSON object. Missing or null fields become
/// empty strings; `requiredSoftware` accepts either a list or a
/// comma-separated string.
pub fn normalize(raw: &Value) -> Result<RequirementsPayload> {
    let source = raw.as_object().ok_or_else(|| {
        ConfiguratorError::InvalidPayload("Invalid request payload".to_string())
    })?;

    Ok(RequirementsPayload {
        usage_type: text_field(source, "usageType"),
        budget_range: text_field(source, "budgetRange"),
        quantity: text_field(source, "quantity"),
        form_factor: text_field(source, "formFactor"),
        required_software: software_list(source.get("requiredSoftware")),
        brand_constraints: text_field(source, "brandConstraints"),
        performance_priority: text_field(source, "performancePriority"),
        storage_requirements: text_field(source, "storageRequirements"),
        networking_needs: text_field(source, "networkingNeeds"),
        durability_needs: text_field(source, "durabilityNeeds"),
        warranty_preferences: text_field(source, "warrantyPreferences"),
        power_preferences: text_field(source, "powerPreferences"),
        compliance_notes: text_field(source, "complianceNotes"),
    })
}

fn text_field(source: &Map<String, Value>, key: &str) -> String {
    source.get(key).map(coerce_text).unwrap_or_default()
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Split a comma-joined list, trimming tokens and dropping empty ones
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn software_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => split_list(s),
        _ => Vec::new(),
    }
}

impl RequirementsPayload {
    /// Check required fields and enum membership.
    ///
    /// Reports the first missing field in [`REQUIRED_FIELDS`] order, then the
    /// first enum field holding an unknown value.
    pub fn validate(&self) -> Result<Requirements> {
        for field in REQUIRED_FIELDS {
            if self.is_blank(field) {
                return Err(ConfiguratorError::missing_field(field));
            }
        }

        Ok(Requirements {
            usage_type: parse_field("usageType", &self.usage_type)?,
            budget_range: self.budget_range.clone(),
            quantity: parse_field("quantity", &self.quantity)?,
            form_factor: parse_field("formFactor", &self.form_factor)?,
            required_software: self.required_software.clone(),
            brand_constraints: self.brand_constraints.clone(),
            performance_priority: parse_field("performancePriority", &self.performance_priority)?,
            storage_requirements: self.storage_requirements.clone(),
            networking_needs: self.networking_needs.clone(),
            durability_needs: self.durability_needs.clone(),
            warranty_preferences: self.warranty_preferences.clone(),
            power_preferences: self.power_preferences.clone(),
            compliance_notes: self.compliance_notes.clone(),
        })
    }

    fn is_blank(&self, field: &str) -> bool {
        let text = match field {
            "usageType" => &self.usage_type,
            "budgetRange" => &self.budget_range,
            "quantity" => &self.quantity,
            "formFactor" => &self.form_factor,
            "brandConstraints" => &self.brand_constraints,
            "performancePriority" => &self.performance_priority,
            "requiredSoftware" => return self.required_software.is_empty(),
            _ => return false,
        };
        text.trim().is_empty()
    }
}

fn parse_field<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ConfiguratorError::invalid_value(field, value))
}

impl Requirements {
    /// Parse and validate in one step
    pub fn from_value(raw: &Value) -> Result<Self> {
        normalize(raw)?.validate()
    }
}
