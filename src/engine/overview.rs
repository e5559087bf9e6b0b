// ==========================================
// 司法资产看板 - 概览与预警指标
// ==========================================
// 职责:
// - 概览: 无过滤时优先使用预聚合指标（逐字段兜底）,有过滤时由持仓计算
// - 预警: 始终由过滤后的持仓计算
// - 过滤选项: 场景（字典序）/ 发行编号与代码（自然排序）
// ==========================================

use crate::domain::indicators::{Indicators, MetricsSource, OverviewMetrics, RiskAlerts};
use crate::domain::position::Position;
use crate::engine::sorting::sort_natural;
use crate::importer::field_resolver::{aliases, resolve};
use crate::importer::unit_coercer::{frac_f64, to_num};
use serde::Serialize;
use std::collections::BTreeSet;

// ==========================================
// FilterOptions - 过滤下拉选项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub scenarios: Vec<String>,
    pub issuances: Vec<String>,
    pub codes: Vec<String>,
}

impl FilterOptions {
    /// 由全量持仓构建（空值不列出）
    pub fn from_positions(positions: &[Position]) -> Self {
        let scenarios = distinct(positions, |p| p.scenario.as_str());
        let mut issuances = distinct(positions, |p| p.issuance_id.as_str());
        let mut codes = distinct(positions, |p| p.code.as_str());
        sort_natural(&mut issuances);
        sort_natural(&mut codes);

        Self {
            scenarios,
            issuances,
            codes,
        }
    }
}

/// 去重并按字典序排列（空值不列出）
fn distinct<'a, F>(positions: &'a [Position], field: F) -> Vec<String>
where
    F: Fn(&'a Position) -> &'a str,
{
    positions
        .iter()
        .map(field)
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ==========================================
// OverviewCalculator - 概览/预警计算器
// ==========================================
#[derive(Debug, Clone)]
pub struct OverviewCalculator {
    active_status: String,
}

impl OverviewCalculator {
    pub fn new(active_status: impl Into<String>) -> Self {
        Self {
            active_status: active_status.into(),
        }
    }

    /// 概览指标
    ///
    /// 仅当 `filter_active == false` 且存在预聚合指标时使用预聚合值；
    /// 预聚合中缺失的字段回退为计算值
    pub fn overview(
        &self,
        filtered: &[Position],
        indicators: Option<&Indicators>,
        filter_active: bool,
    ) -> OverviewMetrics {
        let computed = Self::computed_overview(filtered);

        match indicators {
            Some(ind) if !filter_active => {
                let pre = &ind.overview;
                OverviewMetrics {
                    total_distributed: pre.total_distributed.unwrap_or(computed.total_distributed),
                    real_value_total: pre.real_value_total.unwrap_or(computed.real_value_total),
                    mean_duration_months: pre
                        .mean_duration_months
                        .unwrap_or(computed.mean_duration_months),
                    record_count: pre.record_count.unwrap_or(computed.record_count),
                    source: MetricsSource::PreAggregated,
                }
            }
            _ => computed,
        }
    }

    fn computed_overview(filtered: &[Position]) -> OverviewMetrics {
        let mean_duration_months = if filtered.is_empty() {
            0.0
        } else {
            filtered.iter().map(|p| p.duration_months).sum::<f64>() / filtered.len() as f64
        };

        OverviewMetrics {
            total_distributed: filtered.iter().map(|p| p.total_distributed).sum(),
            real_value_total: filtered.iter().map(|p| p.real_value).sum(),
            mean_duration_months,
            record_count: filtered.len() as u64,
            source: MetricsSource::Computed,
        }
    }

    /// 风险预警
    ///
    /// 基集 = 有效状态 且 预估损失 > 0
    pub fn risk_alerts(&self, filtered: &[Position]) -> RiskAlerts {
        let base: Vec<&Position> = filtered
            .iter()
            .filter(|p| p.is_active(&self.active_status) && p.estimated_value > 0.0)
            .collect();

        let units_without_face_value =
            base.iter().filter(|p| p.current_face_value <= 0.0).count() as u64;

        // 未担保部分的预估损失
        let value_at_risk: f64 = base
            .iter()
            .map(|p| p.estimated_value * (1.0 - frac_f64(p.backed_fraction)))
            .sum();

        let portfolio_total: f64 = filtered.iter().map(|p| p.real_value).sum();
        let portfolio_at_risk_pct = if portfolio_total > 0.0 {
            value_at_risk / portfolio_total * 100.0
        } else {
            0.0
        };

        let folders_to_allocate = base
            .iter()
            .filter_map(|p| resolve(&p.source, &aliases::ESTIMATED_FOLDERS))
            .map(to_num)
            .sum();

        RiskAlerts {
            units_without_face_value,
            value_at_risk,
            portfolio_at_risk_pct,
            folders_to_allocate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicators::OverviewIndicators;
    use crate::domain::types::RawRecord;
    use serde_json::json;
    use std::sync::Arc;

    fn pos(duration: f64, distributed: f64, real: f64) -> Position {
        Position {
            duration_months: duration,
            total_distributed: distributed,
            real_value: real,
            ..Position::default()
        }
    }

    #[test]
    fn test_overview_computed_when_filter_active() {
        let calc = OverviewCalculator::new("ativa");
        let data = vec![pos(10.0, 100.0, 50.0), pos(20.0, 300.0, 150.0)];
        let indicators = Indicators {
            overview: OverviewIndicators {
                total_distributed: Some(9999.0),
                real_value_total: Some(9999.0),
                mean_duration_months: Some(99.0),
                record_count: Some(99),
            },
            ..Indicators::default()
        };

        let m = calc.overview(&data, Some(&indicators), true);
        assert_eq!(m.source, MetricsSource::Computed);
        assert_eq!(m.total_distributed, 400.0);
        assert_eq!(m.real_value_total, 200.0);
        assert_eq!(m.mean_duration_months, 15.0);
        assert_eq!(m.record_count, 2);
    }

    #[test]
    fn test_overview_pre_aggregated_with_field_fallback() {
        let calc = OverviewCalculator::new("ativa");
        let data = vec![pos(10.0, 100.0, 50.0), pos(20.0, 300.0, 150.0)];
        let indicators = Indicators {
            overview: OverviewIndicators {
                total_distributed: Some(1.0),
                real_value_total: None,
                mean_duration_months: None,
                record_count: Some(7),
            },
            ..Indicators::default()
        };

        let m = calc.overview(&data, Some(&indicators), false);
        assert_eq!(m.source, MetricsSource::PreAggregated);
        assert_eq!(m.total_distributed, 1.0);
        assert_eq!(m.real_value_total, 200.0);
        assert_eq!(m.mean_duration_months, 15.0);
        assert_eq!(m.record_count, 7);
    }

    #[test]
    fn test_overview_empty_input() {
        let m = OverviewCalculator::new("ativa").overview(&[], None, false);
        assert_eq!(m.source, MetricsSource::Computed);
        assert_eq!(m.mean_duration_months, 0.0);
        assert_eq!(m.record_count, 0);
    }

    #[test]
    fn test_risk_alerts() {
        let mut folders = RawRecord::new();
        folders.insert("Numero de Pastas Estimado".to_string(), json!(4));

        let data = vec![
            Position {
                status: "Ativa".to_string(),
                estimated_value: 100.0,
                backed_fraction: 0.25,
                current_face_value: 0.0,
                source: Arc::new(folders),
                ..Position::default()
            },
            Position {
                status: "Ativa".to_string(),
                estimated_value: 0.0,
                real_value: 1000.0,
                ..Position::default()
            },
            Position {
                status: "Encerrada".to_string(),
                estimated_value: 500.0,
                ..Position::default()
            },
        ];

        let alerts = OverviewCalculator::new("ativa").risk_alerts(&data);
        assert_eq!(alerts.units_without_face_value, 1);
        assert_eq!(alerts.value_at_risk, 75.0);
        assert!((alerts.portfolio_at_risk_pct - 7.5).abs() < 1e-9);
        assert_eq!(alerts.folders_to_allocate, 4.0);
    }

    #[test]
    fn test_risk_alerts_zero_portfolio() {
        let data = vec![Position {
            status: "ativa".to_string(),
            estimated_value: 10.0,
            ..Position::default()
        }];
        let alerts = OverviewCalculator::new("ativa").risk_alerts(&data);
        assert_eq!(alerts.portfolio_at_risk_pct, 0.0);
    }

    #[test]
    fn test_filter_options() {
        let mk = |issuance: &str, code: &str, scenario: &str| Position {
            issuance_id: issuance.to_string(),
            code: code.to_string(),
            scenario: scenario.to_string(),
            ..Position::default()
        };
        let data = vec![
            mk("EM-10", "A10", "Otimista"),
            mk("EM-2", "A2", "Base"),
            mk("EM-2", "", "Base"),
            mk("", "A1", "Conservador"),
        ];

        let options = FilterOptions::from_positions(&data);
        assert_eq!(options.scenarios, vec!["Base", "Conservador", "Otimista"]);
        assert_eq!(options.issuances, vec!["EM-2", "EM-10"]);
        assert_eq!(options.codes, vec!["A1", "A2", "A10"]);
    }
}
