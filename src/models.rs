use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============ Lead Models ============

/// A sales lead as exported from the CRM.
///
/// Every attribute is optional and empty strings are treated as absent.
/// `email` doubles as the record identity in the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// CRM lifecycle status (`new`, `open`, `in_progress`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_open_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_click_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_deals: Option<i64>,
    /// Carried through from the CRM; no factor reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_amount: Option<f64>,
    /// Creation date in any format accepted by [`crate::dates::parse_date`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    /// Last notes update, same formats as `create_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_last_updated: Option<String>,
}

/// Decodes an explicit `null` as the type's default, like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns the field value when it is present and non-empty.
pub fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

impl Lead {
    /// The nine attributes that make up a complete profile.
    pub fn profile_fields(&self) -> [&Option<String>; 9] {
        [
            &self.email,
            &self.firstname,
            &self.lastname,
            &self.company,
            &self.jobtitle,
            &self.phone,
            &self.city,
            &self.country,
            &self.industry,
        ]
    }
}

// ============ Factor Models ============

/// The closed set of scoring factors, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorKind {
    #[serde(rename = "Lead Source")]
    LeadSource,
    #[serde(rename = "Valid Email")]
    ValidEmail,
    #[serde(rename = "Company Match")]
    CompanyMatch,
    #[serde(rename = "Industry Match")]
    IndustryMatch,
    #[serde(rename = "Recency")]
    Recency,
    #[serde(rename = "Lead Status")]
    LeadStatus,
    #[serde(rename = "Engagement")]
    Engagement,
    #[serde(rename = "Profile Complete")]
    ProfileComplete,
    #[serde(rename = "Company Size")]
    CompanySize,
    #[serde(rename = "Activity Recency")]
    ActivityRecency,
}

impl FactorKind {
    pub const ALL: [FactorKind; 10] = [
        FactorKind::LeadSource,
        FactorKind::ValidEmail,
        FactorKind::CompanyMatch,
        FactorKind::IndustryMatch,
        FactorKind::Recency,
        FactorKind::LeadStatus,
        FactorKind::Engagement,
        FactorKind::ProfileComplete,
        FactorKind::CompanySize,
        FactorKind::ActivityRecency,
    ];

    /// Key under which the config service publishes this factor's weight.
    pub fn weight_key(self) -> &'static str {
        match self {
            FactorKind::LeadSource => "lead_source",
            FactorKind::ValidEmail => "has_valid_email",
            FactorKind::CompanyMatch => "has_company_match",
            FactorKind::IndustryMatch => "industry_match",
            FactorKind::Recency => "days_since_created",
            FactorKind::LeadStatus => "lead_status",
            FactorKind::Engagement => "engagement_score",
            FactorKind::ProfileComplete => "profile_completeness",
            FactorKind::CompanySize => "company_size_bucket",
            FactorKind::ActivityRecency => "recency_score",
        }
    }

    /// Human readable name reported in score breakdowns.
    pub fn display_name(self) -> &'static str {
        match self {
            FactorKind::LeadSource => "Lead Source",
            FactorKind::ValidEmail => "Valid Email",
            FactorKind::CompanyMatch => "Company Match",
            FactorKind::IndustryMatch => "Industry Match",
            FactorKind::Recency => "Recency",
            FactorKind::LeadStatus => "Lead Status",
            FactorKind::Engagement => "Engagement",
            FactorKind::ProfileComplete => "Profile Complete",
            FactorKind::CompanySize => "Company Size",
            FactorKind::ActivityRecency => "Activity Recency",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-client factor weights, keyed by [`FactorKind::weight_key`].
///
/// Values come from an external service and are not trusted: missing,
/// null, zero, negative and non-finite weights all disable the factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightSet(HashMap<String, Option<f64>>);

impl WeightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, kind: FactorKind, weight: f64) -> Self {
        self.0.insert(kind.weight_key().to_string(), Some(weight));
        self
    }

    /// Usable weight for `kind`, or `None` when the factor must be skipped.
    pub fn weight(&self, kind: FactorKind) -> Option<f64> {
        self.0
            .get(kind.weight_key())
            .copied()
            .flatten()
            .filter(|weight| weight.is_finite() && *weight > 0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, f64>> for WeightSet {
    fn from(map: HashMap<String, f64>) -> Self {
        Self(map.into_iter().map(|(key, value)| (key, Some(value))).collect())
    }
}

/// One line of a lead's score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub name: FactorKind,
    pub weight: f64,
    /// Normalized evidence in `[0, 1]`.
    pub value: f64,
    /// Always `value * weight`.
    pub contribution: f64,
}

/// Qualitative bucket derived from the integer score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadLabel {
    #[serde(rename = "Hot Lead")]
    Hot,
    #[serde(rename = "Warm Lead")]
    Warm,
    #[serde(rename = "Cool Lead")]
    Cool,
    #[serde(rename = "Cold Lead")]
    Cold,
}

impl LeadLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadLabel::Hot => "Hot Lead",
            LeadLabel::Warm => "Warm Lead",
            LeadLabel::Cool => "Cool Lead",
            LeadLabel::Cold => "Cold Lead",
        }
    }
}

impl fmt::Display for LeadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score for a single lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    /// Echo of the lead's email (empty when the lead had none).
    pub email: String,
    /// Integer in `[0, 100]`.
    pub score: u8,
    pub label: LeadLabel,
    /// Breakdown in evaluation order.
    pub factors: Vec<ScoreFactor>,
}

// ============ API Request/Response Models ============

/// Body of `POST /leads`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreLeadsRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub leads: Vec<Lead>,
    /// When set, used instead of `email` as the identity sent to the config service.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

impl ScoreLeadsRequest {
    /// Identity under which the client's weights are looked up.
    pub fn config_identity(&self) -> &str {
        non_empty(&self.client_id).unwrap_or(&self.email)
    }
}

/// Body returned by `POST /leads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLeadsResponse {
    pub scores: Vec<LeadScore>,
    pub method: String,
    pub client_id: String,
}

/// Scoring configuration published by the config service for one client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientScoringConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub weights: WeightSet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_id: String,
    /// Free-form tag naming the scoring method, echoed to the caller.
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
}
