//! Wildfire risk assessment.
//!
//! A property's score is a weighted sum of site factors plus its region's
//! base risk, scaled by the region's seasonal multiplier:
//!
//! ```text
//! raw   = base_risk + 2*vegetation + slope + 3*weather + water
//! water = numerator / distance_to_water   (0 when distance <= 0)
//! score = raw * seasonal_multiplier / 100
//! ```
//!
//! All division truncates toward zero. Sums and products saturate at the
//! `i64` bounds.

use std::collections::HashMap;

use tracing::debug;

use crate::config::RiskConfig;
use crate::types::*;

const VEGETATION_WEIGHT: i64 = 2;
const SLOPE_WEIGHT: i64 = 1;
const WEATHER_WEIGHT: i64 = 3;
const MULTIPLIER_SCALE: i64 = 100;

/// In-memory store of regional factors and property assessments.
#[derive(Debug, Default)]
pub struct RiskAssessor {
    config: RiskConfig,
    /// Stored factors by region code
    regional_factors: HashMap<String, RegionalRiskFactor>,
    /// Latest assessment by property
    assessments: HashMap<PropertyId, RiskAssessment>,
}

impl RiskAssessor {
    /// Create an assessor with default regional factors and threshold.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RiskConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Insert or replace the factors for a region.
    pub fn set_regional_risk(
        &mut self,
        region: impl Into<String>,
        base_risk: i64,
        seasonal_multiplier: i64,
    ) {
        let region = region.into();
        debug!(region = %region, base_risk, seasonal_multiplier, "Set regional risk");
        self.regional_factors.insert(
            region,
            RegionalRiskFactor {
                base_risk,
                seasonal_multiplier,
            },
        );
    }

    /// Factors for a region, falling back to the configured defaults.
    pub fn regional_risk(&self, region: &str) -> RegionalRiskFactor {
        self.regional_factors
            .get(region)
            .copied()
            .unwrap_or_else(|| self.config.default_regional_factor())
    }

    /// Factors stored for a region, if any.
    pub fn stored_regional_risk(&self, region: &str) -> Option<&RegionalRiskFactor> {
        self.regional_factors.get(region)
    }

    /// Score a property, store the assessment, and return the score.
    ///
    /// Any earlier assessment of the same property is replaced.
    pub fn assess(
        &mut self,
        ctx: &TxContext,
        property_id: PropertyId,
        factors: RiskFactors,
        region: &str,
    ) -> i64 {
        let regional = self.regional_risk(region);
        let risk_score = self.compute_score(&factors, &regional);

        debug!(
            property_id,
            region = %region,
            risk_score,
            "Assessed property risk"
        );

        self.assessments.insert(
            property_id,
            RiskAssessment {
                risk_score,
                assessment_date: ctx.block_time,
                factors,
            },
        );

        risk_score
    }

    /// The scoring formula, without touching stored state.
    pub fn compute_score(&self, factors: &RiskFactors, regional: &RegionalRiskFactor) -> i64 {
        let water = if factors.distance_to_water > 0 {
            self.config.water_proximity_numerator / factors.distance_to_water
        } else {
            0
        };

        let raw = regional
            .base_risk
            .saturating_add(factors.vegetation_density.saturating_mul(VEGETATION_WEIGHT))
            .saturating_add(factors.slope.saturating_mul(SLOPE_WEIGHT))
            .saturating_add(factors.weather_risk.saturating_mul(WEATHER_WEIGHT))
            .saturating_add(water);

        raw.saturating_mul(regional.seasonal_multiplier) / MULTIPLIER_SCALE
    }

    /// Latest assessment for a property.
    pub fn get(&self, property_id: PropertyId) -> Option<&RiskAssessment> {
        self.assessments.get(&property_id)
    }

    /// True when the stored score exceeds the threshold. Unassessed
    /// properties are never high risk.
    pub fn is_high_risk(&self, property_id: PropertyId) -> bool {
        self.assessments
            .get(&property_id)
            .map(|a| a.risk_score > self.config.high_risk_threshold)
            .unwrap_or(false)
    }

    /// All high-risk property ids, ascending.
    pub fn high_risk_properties(&self) -> Vec<PropertyId> {
        let mut ids: Vec<PropertyId> = self
            .assessments
            .iter()
            .filter(|(_, a)| a.risk_score > self.config.high_risk_threshold)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TxContext {
        TxContext::new("ST1ASSESSOR", 100, Timestamp(1_625_097_600))
    }

    #[test]
    fn test_default_factors_truncate() {
        let mut assessor = RiskAssessor::new();
        // 50 + 60 + 15 + 60 + 20 = 205; 205 * 10 / 100 = 20
        let score = assessor.assess(&ctx(), 1, RiskFactors::new(30, 15, 20, 5), "CA-SB");
        assert_eq!(score, 20);

        let assessment = assessor.get(1).unwrap();
        assert_eq!(assessment.risk_score, 20);
        assert_eq!(assessment.assessment_date, Timestamp(1_625_097_600));
        assert_eq!(assessment.factors.distance_to_water, 5);
    }

    #[test]
    fn test_stored_regional_factors_apply() {
        let mut assessor = RiskAssessor::new();
        assessor.set_regional_risk("CA-SB", 70, 20);
        // 70 + 80 + 25 + 90 + 50 = 315; 315 * 20 / 100 = 63
        let score = assessor.assess(&ctx(), 1, RiskFactors::new(40, 25, 30, 2), "CA-SB");
        assert_eq!(score, 63);
        assert_eq!(
            assessor.stored_regional_risk("CA-SB"),
            Some(&RegionalRiskFactor {
                base_risk: 70,
                seasonal_multiplier: 20,
            })
        );
        assert!(assessor.stored_regional_risk("CA-LA").is_none());
        assert_eq!(assessor.regional_risk("CA-LA").base_risk, 50);
    }

    #[test]
    fn test_non_positive_distance_skips_water_term() {
        let assessor = RiskAssessor::new();
        let regional = assessor.regional_risk("any");
        let zero = assessor.compute_score(&RiskFactors::new(0, 0, 0, 0), &regional);
        let negative = assessor.compute_score(&RiskFactors::new(0, 0, 0, -4), &regional);
        assert_eq!(zero, 5);
        assert_eq!(negative, 5);
    }

    #[test]
    fn test_negative_inputs_flow_through() {
        let assessor = RiskAssessor::new();
        let regional = RegionalRiskFactor {
            base_risk: 0,
            seasonal_multiplier: 100,
        };
        // -20 - 5 - 30 = -55
        let score = assessor.compute_score(&RiskFactors::new(-10, -5, -10, 0), &regional);
        assert_eq!(score, -55);
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        let assessor = RiskAssessor::new();
        let regional = RegionalRiskFactor {
            base_risk: i64::MAX,
            seasonal_multiplier: 100,
        };
        let score = assessor.compute_score(&RiskFactors::new(i64::MAX, 0, 0, 1), &regional);
        assert_eq!(score, i64::MAX / 100);
    }

    #[test]
    fn test_reassessment_overwrites() {
        let mut assessor = RiskAssessor::new();
        assessor.assess(&ctx(), 7, RiskFactors::new(30, 15, 20, 5), "CA-SB");
        let later = ctx().at(150, Timestamp(1_625_200_000));
        assessor.assess(&later, 7, RiskFactors::new(0, 0, 0, 0), "CA-SB");

        let assessment = assessor.get(7).unwrap();
        assert_eq!(assessment.risk_score, 5);
        assert_eq!(assessment.assessment_date, Timestamp(1_625_200_000));
    }

    #[test]
    fn test_high_risk_threshold() {
        let mut assessor = RiskAssessor::new();
        assert!(!assessor.is_high_risk(1));

        // 50 + 20 + 5 + 30 + 5 = 110; 110 * 10 / 100 = 11
        assessor.assess(&ctx(), 1, RiskFactors::new(10, 5, 10, 20), "LOW-RISK");
        assessor.set_regional_risk("HIGH-RISK", 80, 20);
        // 80 + 80 + 30 + 120 + 100 = 410; 410 * 20 / 100 = 82
        assessor.assess(&ctx(), 2, RiskFactors::new(40, 30, 40, 1), "HIGH-RISK");
        // Exactly at the threshold: 70 * 100 / 100 = 70
        assessor.set_regional_risk("EDGE", 70, 100);
        assessor.assess(&ctx(), 3, RiskFactors::default(), "EDGE");

        assert!(!assessor.is_high_risk(1));
        assert!(assessor.is_high_risk(2));
        assert!(!assessor.is_high_risk(3));
        assert_eq!(assessor.high_risk_properties(), vec![2]);
    }

    #[test]
    fn test_configured_threshold() {
        let mut assessor = RiskAssessor::with_config(RiskConfig {
            high_risk_threshold: 10,
            ..Default::default()
        });
        assessor.assess(&ctx(), 1, RiskFactors::new(10, 5, 10, 20), "LOW-RISK");
        assert!(assessor.is_high_risk(1));
    }
}
