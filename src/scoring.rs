//! Rule-based lead scoring.
//!
//! Each factor is described by a [`FactorRule`] in [`FACTOR_RULES`]. The
//! aggregator walks that table once per lead, so the order of the table is
//! the order of every score breakdown.

use crate::dates::parse_date;
use crate::models::{non_empty, FactorKind, Lead, LeadLabel, LeadScore, ScoreFactor, WeightSet};
use chrono::{DateTime, Duration, Utc};

/// Creation dates older than this many days score zero recency.
const RECENCY_WINDOW_DAYS: f64 = 90.0;
/// Notes updated within this window count as recent activity.
const ACTIVITY_WINDOW_DAYS: i64 = 30;

/// Open count at which opens alone contribute their full share.
const ENGAGEMENT_OPEN_CAP: f64 = 10.0;
const ENGAGEMENT_CLICK_CAP: f64 = 3.0;
const ENGAGEMENT_OPEN_SHARE: f64 = 0.4;
const ENGAGEMENT_CLICK_SHARE: f64 = 0.6;

const STATUS_VALUES: &[(&str, f64)] = &[
    ("new", 0.3),
    ("open", 0.5),
    ("in_progress", 0.7),
    ("qualified", 1.0),
    ("unqualified", 0.1),
];
const STATUS_DEFAULT: f64 = 0.5;

/// Seniority tiers, checked top to bottom; the first tier with a matching
/// keyword wins.
const TITLE_TIERS: &[(&[&str], f64)] = &[
    (&["ceo", "founder", "owner"], 1.0),
    (&["director", "vp", "chief"], 0.8),
    (&["manager", "head"], 0.6),
];
const TITLE_DEFAULT: f64 = 0.3;

const ACTIVITY_WITH_DEALS: f64 = 0.7;
const ACTIVITY_RECENT_NOTES: f64 = 0.5;
const ACTIVITY_DEFAULT: f64 = 0.2;

/// Computes a factor's value in `[0, 1]`, or `None` when the lead lacks the
/// evidence the factor needs.
pub type FactorFn = fn(&Lead, DateTime<Utc>) -> Option<f64>;

/// Declarative description of one scoring factor.
#[derive(Clone, Copy)]
pub struct FactorRule {
    pub kind: FactorKind,
    pub compute: FactorFn,
    /// Presence factors report nothing when their condition is false.
    pub suppress_zero: bool,
}

pub const FACTOR_RULES: [FactorRule; 10] = [
    FactorRule {
        kind: FactorKind::LeadSource,
        compute: lead_source,
        suppress_zero: true,
    },
    FactorRule {
        kind: FactorKind::ValidEmail,
        compute: valid_email,
        suppress_zero: true,
    },
    FactorRule {
        kind: FactorKind::CompanyMatch,
        compute: company_match,
        suppress_zero: true,
    },
    FactorRule {
        kind: FactorKind::IndustryMatch,
        compute: industry_match,
        suppress_zero: true,
    },
    FactorRule {
        kind: FactorKind::Recency,
        compute: recency,
        suppress_zero: false,
    },
    FactorRule {
        kind: FactorKind::LeadStatus,
        compute: lead_status,
        suppress_zero: false,
    },
    FactorRule {
        kind: FactorKind::Engagement,
        compute: engagement,
        suppress_zero: false,
    },
    FactorRule {
        kind: FactorKind::ProfileComplete,
        compute: profile_completeness,
        suppress_zero: false,
    },
    FactorRule {
        kind: FactorKind::CompanySize,
        compute: company_size,
        suppress_zero: false,
    },
    FactorRule {
        kind: FactorKind::ActivityRecency,
        compute: activity_recency,
        suppress_zero: false,
    },
];

fn presence(present: bool) -> Option<f64> {
    Some(if present { 1.0 } else { 0.0 })
}

pub fn lead_source(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    presence(non_empty(&lead.email).is_some())
}

pub fn valid_email(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    presence(non_empty(&lead.email).is_some_and(|email| email.contains('@')))
}

pub fn company_match(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    presence(non_empty(&lead.company).is_some())
}

pub fn industry_match(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    presence(non_empty(&lead.industry).is_some())
}

/// Linear decay from 1 on the creation day to 0 after ninety whole days.
/// Missing or unparseable creation dates yield no factor at all.
pub fn recency(lead: &Lead, now: DateTime<Utc>) -> Option<f64> {
    let raw = non_empty(&lead.create_date)?;
    let created = match parse_date(raw) {
        Ok(created) => created,
        Err(e) => {
            tracing::debug!("Skipping recency factor: {}", e);
            return None;
        }
    };

    let days = now.signed_duration_since(created).num_days() as f64;
    Some((1.0 - days / RECENCY_WINDOW_DAYS).clamp(0.0, 1.0))
}

pub fn lead_status(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    let status = non_empty(&lead.lead_status)?.to_lowercase();
    let value = STATUS_VALUES
        .iter()
        .find(|(name, _)| *name == status)
        .map(|(_, value)| *value)
        .unwrap_or(STATUS_DEFAULT);
    Some(value)
}

/// Opens and clicks are not capped individually; only the sum saturates at 1.
pub fn engagement(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    let opens = lead.email_open_count.unwrap_or(0).max(0) as f64;
    let clicks = lead.email_click_count.unwrap_or(0).max(0) as f64;

    let value = (opens / ENGAGEMENT_OPEN_CAP) * ENGAGEMENT_OPEN_SHARE
        + (clicks / ENGAGEMENT_CLICK_CAP) * ENGAGEMENT_CLICK_SHARE;
    Some(value.min(1.0))
}

pub fn profile_completeness(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    let fields = lead.profile_fields();
    let filled = fields
        .iter()
        .filter(|field| non_empty(field).is_some())
        .count();
    Some(filled as f64 / fields.len() as f64)
}

/// Seniority of the contact, used as a proxy for the buying power of the company.
pub fn company_size(lead: &Lead, _now: DateTime<Utc>) -> Option<f64> {
    let title = non_empty(&lead.jobtitle)?.to_lowercase();
    let value = TITLE_TIERS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|(_, value)| *value)
        .unwrap_or(TITLE_DEFAULT);
    Some(value)
}

pub fn activity_recency(lead: &Lead, now: DateTime<Utc>) -> Option<f64> {
    if lead.num_deals.unwrap_or(0) > 0 {
        return Some(ACTIVITY_WITH_DEALS);
    }

    let notes_recent = non_empty(&lead.notes_last_updated)
        .and_then(|raw| parse_date(raw).ok())
        .is_some_and(|updated| {
            now.signed_duration_since(updated) < Duration::days(ACTIVITY_WINDOW_DAYS)
        });

    Some(if notes_recent {
        ACTIVITY_RECENT_NOTES
    } else {
        ACTIVITY_DEFAULT
    })
}

/// Evaluates every factor for `lead` in table order.
///
/// A factor is left out when its weight is unusable, when the lead lacks the
/// evidence it needs, or when it is a presence factor whose condition is false.
pub fn extract_factors(lead: &Lead, weights: &WeightSet, now: DateTime<Utc>) -> Vec<ScoreFactor> {
    FACTOR_RULES
        .iter()
        .filter_map(|rule| {
            let weight = weights.weight(rule.kind)?;
            let value = (rule.compute)(lead, now)?;
            if rule.suppress_zero && value <= 0.0 {
                return None;
            }
            Some(ScoreFactor {
                name: rule.kind,
                weight,
                value,
                contribution: value * weight,
            })
        })
        .collect()
}

/// Sums contributions into an integer score in `[0, 100]` and its label.
///
/// Rounding is half away from zero, so a raw 0.625 becomes 63.
pub fn aggregate(factors: &[ScoreFactor]) -> (u8, LeadLabel) {
    let raw: f64 = factors.iter().map(|factor| factor.contribution).sum();
    let scaled = raw * 100.0;
    let score = if scaled.is_nan() {
        0
    } else {
        scaled.clamp(0.0, 100.0).round() as u8
    };
    (score, label_for(score))
}

pub fn label_for(score: u8) -> LeadLabel {
    match score {
        80.. => LeadLabel::Hot,
        60..=79 => LeadLabel::Warm,
        40..=59 => LeadLabel::Cool,
        _ => LeadLabel::Cold,
    }
}

/// Scores one lead against a client's weights.
///
/// `now` is the reference instant for every date-based factor; callers pass
/// the same instant for all leads of a batch.
pub fn score_lead(lead: &Lead, weights: &WeightSet, now: DateTime<Utc>) -> LeadScore {
    let factors = extract_factors(lead, weights, now);
    let (score, label) = aggregate(&factors);

    LeadScore {
        email: lead.email.clone().unwrap_or_default(),
        score,
        label,
        factors,
    }
}
