//! Risk assessment integration tests

use firewatch::{RiskAssessor, RiskFactors, Timestamp, TxContext};

fn ctx() -> TxContext {
    TxContext::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM", 100, Timestamp(1_625_097_600))
}

#[test]
fn test_set_regional_risk_factors() {
    let mut assessor = RiskAssessor::new();

    assessor.set_regional_risk("CA-SB", 60, 15);

    let factors = assessor.stored_regional_risk("CA-SB").unwrap();
    assert_eq!(factors.base_risk, 60);
    assert_eq!(factors.seasonal_multiplier, 15);
}

#[test]
fn test_assess_with_default_regional_factors() {
    let mut assessor = RiskAssessor::new();

    let score = assessor.assess(&ctx(), 1, RiskFactors::new(30, 15, 20, 5), "CA-SB");

    // 50 + 60 + 15 + 60 + 20 = 205; 205 * 10 / 100 = 20
    assert_eq!(score, 20);
    assert_eq!(assessor.get(1).unwrap().risk_score, 20);
}

#[test]
fn test_assess_with_custom_regional_factors() {
    let mut assessor = RiskAssessor::new();
    assessor.set_regional_risk("CA-SB", 70, 20);

    let score = assessor.assess(&ctx(), 1, RiskFactors::new(40, 25, 30, 2), "CA-SB");

    assert_eq!(score, 63);
    assert_eq!(assessor.get(1).unwrap().risk_score, 63);
}

#[test]
fn test_identify_high_risk_properties() {
    let mut assessor = RiskAssessor::new();
    assessor.assess(&ctx(), 1, RiskFactors::new(10, 5, 10, 20), "LOW-RISK");

    assessor.set_regional_risk("HIGH-RISK", 80, 20);
    assessor.assess(&ctx(), 2, RiskFactors::new(40, 30, 40, 1), "HIGH-RISK");

    assert!(!assessor.is_high_risk(1));
    assert!(assessor.is_high_risk(2));
    assert!(!assessor.is_high_risk(3));
}

#[test]
fn test_retrieve_property_risk_assessment() {
    let mut assessor = RiskAssessor::new();
    assessor.assess(&ctx(), 1, RiskFactors::new(30, 15, 20, 5), "CA-SB");

    let assessment = assessor.get(1).expect("assessment should exist");

    assert_eq!(assessment.factors.vegetation_density, 30);
    assert_eq!(assessment.factors.slope, 15);
    assert_eq!(assessment.factors.weather_risk, 20);
    assert_eq!(assessment.factors.distance_to_water, 5);
    assert!(assessor.get(2).is_none());
}
