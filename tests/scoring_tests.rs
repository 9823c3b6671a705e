/// Scenario tests for the scoring engine
/// Exercises factor extraction, ordering and aggregation through the public API
use chrono::{DateTime, TimeZone, Utc};
use lead_scoring_api::dates::parse_date;
use lead_scoring_api::models::{FactorKind, Lead, LeadLabel, WeightSet};
use lead_scoring_api::scoring::score_lead;

fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 2, 15, 0, 0, 0).unwrap()
}

fn scenario_lead() -> Lead {
    Lead {
        email: Some("a@b.com".to_string()),
        company: Some("Acme".to_string()),
        create_date: Some("2023-01-01".to_string()),
        ..Default::default()
    }
}

fn scenario_weights() -> WeightSet {
    WeightSet::new()
        .with(FactorKind::LeadSource, 0.2)
        .with(FactorKind::ValidEmail, 0.2)
        .with(FactorKind::CompanyMatch, 0.2)
        .with(FactorKind::Recency, 0.4)
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_documented_scenario_yields_four_factors() {
        let score = score_lead(&scenario_lead(), &scenario_weights(), reference_now());

        let names: Vec<FactorKind> = score.factors.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                FactorKind::LeadSource,
                FactorKind::ValidEmail,
                FactorKind::CompanyMatch,
                FactorKind::Recency
            ]
        );

        // 45 days old: recency 0.5, raw 0.2 * 3 + 0.5 * 0.4 = 0.8
        let recency = &score.factors[3];
        assert!((recency.value - 0.5).abs() < 1e-12);
        assert!((recency.contribution - 0.2).abs() < 1e-12);
        assert_eq!(score.score, 80);
        assert_eq!(score.label, LeadLabel::Hot);
        assert_eq!(score.email, "a@b.com");
    }

    #[test]
    fn test_scenario_with_stale_creation_date_keeps_recency_line() {
        let score = score_lead(&scenario_lead(), &scenario_weights(), Utc::now());

        assert_eq!(score.factors.len(), 4);
        assert_eq!(score.factors[3].name, FactorKind::Recency);
        assert_eq!(score.factors[3].value, 0.0);
        assert_eq!(score.score, 60);
        assert_eq!(score.label, LeadLabel::Warm);
    }

    #[test]
    fn test_unparseable_creation_date_omits_recency() {
        let lead = Lead {
            create_date: Some("not-a-date".to_string()),
            ..scenario_lead()
        };
        let score = score_lead(&lead, &scenario_weights(), reference_now());

        assert_eq!(score.factors.len(), 3);
        assert!(score.factors.iter().all(|f| f.name != FactorKind::Recency));
        assert_eq!(score.score, 60);
    }

    #[test]
    fn test_epoch_millis_creation_date() {
        let created = reference_now() - chrono::Duration::days(9);
        let lead = Lead {
            create_date: Some(created.timestamp_millis().to_string()),
            ..scenario_lead()
        };
        let score = score_lead(&lead, &scenario_weights(), reference_now());

        let recency = score
            .factors
            .iter()
            .find(|f| f.name == FactorKind::Recency)
            .expect("recency factor present");
        assert!((recency.value - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let now = reference_now();
        let first = score_lead(&scenario_lead(), &scenario_weights(), now);
        let second = score_lead(&scenario_lead(), &scenario_weights(), now);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[cfg(test)]
mod weight_handling_tests {
    use super::*;

    #[test]
    fn test_presence_factors_need_true_condition() {
        let lead = Lead {
            email: Some("no-at-sign".to_string()),
            ..Default::default()
        };
        let weights = WeightSet::new()
            .with(FactorKind::LeadSource, 1.0)
            .with(FactorKind::ValidEmail, 1.0)
            .with(FactorKind::CompanyMatch, 1.0)
            .with(FactorKind::IndustryMatch, 1.0);

        let score = score_lead(&lead, &weights, reference_now());
        assert_eq!(score.factors.len(), 1);
        assert_eq!(score.factors[0].name, FactorKind::LeadSource);
        assert_eq!(score.score, 100);
    }

    #[test]
    fn test_negative_weight_is_skipped() {
        let weights = WeightSet::new()
            .with(FactorKind::LeadSource, -0.5)
            .with(FactorKind::CompanyMatch, 0.3);

        let score = score_lead(&scenario_lead(), &weights, reference_now());
        assert_eq!(score.factors.len(), 1);
        assert_eq!(score.factors[0].name, FactorKind::CompanyMatch);
        assert_eq!(score.score, 30);
        assert_eq!(score.label, LeadLabel::Cold);
    }

    #[test]
    fn test_oversized_weights_clamp_to_hundred() {
        let weights = WeightSet::new().with(FactorKind::ProfileComplete, 1_000.0);
        let score = score_lead(&scenario_lead(), &weights, reference_now());

        assert_eq!(score.factors.len(), 1);
        assert_eq!(score.score, 100);
        assert_eq!(score.label, LeadLabel::Hot);
    }

    #[test]
    fn test_status_lookup_is_case_insensitive() {
        let weights = WeightSet::new().with(FactorKind::LeadStatus, 1.0);
        let upper = Lead {
            lead_status: Some("QUALIFIED".to_string()),
            ..Default::default()
        };
        let lower = Lead {
            lead_status: Some("qualified".to_string()),
            ..Default::default()
        };

        let upper = score_lead(&upper, &weights, reference_now());
        let lower = score_lead(&lower, &weights, reference_now());
        assert_eq!(upper.factors, lower.factors);
        assert_eq!(upper.factors[0].value, 1.0);
    }

    #[test]
    fn test_ceo_tier_beats_manager_tier() {
        let weights = WeightSet::new().with(FactorKind::CompanySize, 1.0);
        let lead = Lead {
            jobtitle: Some("CEO / Office Manager".to_string()),
            ..Default::default()
        };

        let score = score_lead(&lead, &weights, reference_now());
        assert_eq!(score.factors[0].value, 1.0);
    }

    #[test]
    fn test_weights_from_config_payload() {
        let weights: WeightSet = serde_json::from_value(serde_json::json!({
            "engagement_score": 0.5,
            "recency_score": 0.5,
            "unknown_factor": 3.0
        }))
        .unwrap();
        let lead = Lead {
            email_open_count: Some(10),
            email_click_count: Some(3),
            num_deals: Some(1),
            ..Default::default()
        };

        let score = score_lead(&lead, &weights, reference_now());
        let names: Vec<FactorKind> = score.factors.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![FactorKind::Engagement, FactorKind::ActivityRecency]
        );
        // 0.5 * 1.0 + 0.5 * 0.7 = 0.85
        assert_eq!(score.score, 85);
    }
}

#[cfg(test)]
mod date_tests {
    use super::*;

    #[test]
    fn test_documented_date_examples() {
        assert_eq!(
            parse_date("1700000000000").unwrap(),
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        );
        assert_eq!(
            parse_date("2023-01-15").unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap()
        );
        assert!(parse_date("not-a-date").is_err());
    }
}
