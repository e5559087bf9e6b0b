// ==========================================
// 司法资产看板 - 风险分级引擎
// ==========================================
// 职责: CodeSummary → RiskTier
// 协议: 两阶段
//   1. 先对当前过滤集合的全部分组求 max_impact（下限 1）
//   2. 再逐组分级,不得孤立分级单个分组
// 规则:
// - estimated_value_total > 0 → Critical（短路）
// - score = 0.65 × impactNorm + 0.35 × urgencyNorm
// - score ≥ 0.66 → High; ≥ 0.35 → Medium; 其余 Low
// 说明: max_impact 随过滤集合变化,同一分组在不同过滤下可得到不同等级
// ==========================================

use crate::config::dashboard_config::RiskWeights;
use crate::domain::summary::CodeSummary;
use crate::domain::types::RiskTier;
use tracing::{debug, instrument};

fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

// ==========================================
// RiskClassifier - 风险分级引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    weights: RiskWeights,
}

impl RiskClassifier {
    pub fn new(weights: RiskWeights) -> Self {
        Self { weights }
    }

    /// 阶段 1: 当前分组集合的最大影响（下限 1）
    pub fn max_impact(summaries: &[CodeSummary]) -> f64 {
        summaries
            .iter()
            .map(|s| s.impact_total)
            .filter(|v| v.is_finite())
            .fold(1.0, f64::max)
    }

    /// 综合得分（不含 Critical 短路）
    pub fn score(&self, summary: &CodeSummary, max_impact: f64) -> f64 {
        let impact_norm = clamp01(summary.impact_total / max_impact);
        let urgency_norm = clamp01(summary.urgency_avg / self.weights.urgency_cap_months);
        self.weights.impact_weight * impact_norm + self.weights.urgency_weight * urgency_norm
    }

    /// 阶段 2: 单组分级
    ///
    /// 前置条件: max_impact 来自同一过滤集合的 `max_impact()`
    pub fn classify(&self, summary: &CodeSummary, max_impact: f64) -> RiskTier {
        if summary.estimated_value_total > 0.0 {
            return RiskTier::Critical;
        }

        let score = self.score(summary, max_impact);
        if score >= self.weights.high_threshold {
            RiskTier::High
        } else if score >= self.weights.medium_threshold {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// 两阶段分级（原地写入 risk_tier）
    #[instrument(skip(self, summaries), fields(count = summaries.len()))]
    pub fn classify_all(&self, summaries: &mut [CodeSummary]) {
        let max_impact = Self::max_impact(summaries);
        for summary in summaries.iter_mut() {
            summary.risk_tier = Some(self.classify(summary, max_impact));
        }

        let critical = summaries
            .iter()
            .filter(|s| s.risk_tier == Some(RiskTier::Critical))
            .count();
        debug!(max_impact, critical, "风险分级完成");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(code: &str, impact: f64, urgency: f64, estimated: f64) -> CodeSummary {
        CodeSummary {
            code: code.to_string(),
            issuance_set: Vec::new(),
            real_value_total: 0.0,
            estimated_value_total: estimated,
            impact_total: impact,
            total_units_sum: 0.0,
            process_count_sum: 0.0,
            units_without_value_sum: 0.0,
            backed_fraction_avg: 0.0,
            duration_months_avg: 0.0,
            multiple_avg: 0.0,
            pp_percent_avg: 0.0,
            urgency_avg: urgency,
            has_backed_fraction: false,
            has_face_value: false,
            dominant_scenario: String::new(),
            has_multiple_scenarios: false,
            status: String::new(),
            risk_tier: None,
        }
    }

    #[test]
    fn test_critical_short_circuit() {
        let classifier = RiskClassifier::default();
        let s = summary("A", 0.0, 0.0, 0.01);
        assert_eq!(classifier.classify(&s, 1.0), RiskTier::Critical);
    }

    #[test]
    fn test_max_impact_floor() {
        let list = vec![summary("A", 0.0, 0.0, 0.0), summary("B", 0.0, 0.0, 0.0)];
        assert_eq!(RiskClassifier::max_impact(&list), 1.0);
        assert_eq!(RiskClassifier::max_impact(&[]), 1.0);

        let classifier = RiskClassifier::default();
        // impactNorm = 0, urgencyNorm = 0 → Low
        assert_eq!(classifier.classify(&list[0], 1.0), RiskTier::Low);
        assert_eq!(classifier.score(&list[0], 1.0), 0.0);
    }

    #[test]
    fn test_tier_thresholds() {
        let classifier = RiskClassifier::default();
        // 0.65 × 1 + 0.35 × (42/42) = 1.0 → High
        assert_eq!(classifier.classify(&summary("A", 100.0, 42.0, 0.0), 100.0), RiskTier::High);
        // 0.65 × 0.5 + 0.35 × 0 = 0.325 → Low
        assert_eq!(classifier.classify(&summary("B", 50.0, 0.0, 0.0), 100.0), RiskTier::Low);
        // 0.65 × 0 + 0.35 × 1 = 0.35 → Medium
        assert_eq!(classifier.classify(&summary("C", 0.0, 60.0, 0.0), 100.0), RiskTier::Medium);
        // 0.65 × 1 + 0 = 0.65 → Medium
        assert_eq!(classifier.classify(&summary("D", 100.0, 0.0, 0.0), 100.0), RiskTier::Medium);
    }

    #[test]
    fn test_classification_is_relative_to_group_set() {
        let classifier = RiskClassifier::default();
        let mut small_set = vec![summary("A", 100.0, 30.0, 0.0)];
        classifier.classify_all(&mut small_set);
        // 0.65 + 0.35 × 30/42 = 0.9 → High
        assert_eq!(small_set[0].risk_tier, Some(RiskTier::High));

        let mut big_set = vec![summary("A", 100.0, 30.0, 0.0), summary("B", 1000.0, 30.0, 0.0)];
        classifier.classify_all(&mut big_set);
        // 0.065 + 0.25 = 0.315 → Low
        assert_eq!(big_set[0].risk_tier, Some(RiskTier::Low));
        assert_eq!(big_set[1].risk_tier, Some(RiskTier::High));
    }

    #[test]
    fn test_negative_impact_clamped() {
        let classifier = RiskClassifier::default();
        let s = summary("A", -500.0, 0.0, 0.0);
        assert_eq!(classifier.score(&s, 1.0), 0.0);
    }
}
