// ==========================================
// 司法资产看板 - 预聚合指标构建器
// ==========================================
// 职责: 加载时对全量数据计算概览 + 风险预警
// 口径:
// - 概览掩码 = 有效状态 且 面值 > 0
//   （存在"组合估计面值"列时以其为面值,否则用"当前面值"）
// - 预警基集 = 有效状态 且 预估损失 > 0
// 说明: 列是否存在由源记录决定,与单行取值无关
// ==========================================

use crate::domain::indicators::{Indicators, OverviewIndicators, RiskAlertIndicators};
use crate::domain::position::Position;
use crate::importer::field_resolver::{aliases, has_column, resolve};
use crate::importer::unit_coercer::{to_num, to_number};
use tracing::{debug, instrument};

/// 面值口径（按列存在性选择）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaceColumn {
    Portfolio,
    Current,
    Missing,
}

/// 已分配口径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DistributedColumn {
    IndividualValue,
    TotalDistributed,
    Missing,
}

// ==========================================
// IndicatorBuilder - 预聚合指标构建器
// ==========================================
#[derive(Debug, Clone)]
pub struct IndicatorBuilder {
    active_status: String,
}

impl IndicatorBuilder {
    pub fn new(active_status: impl Into<String>) -> Self {
        Self {
            active_status: active_status.into(),
        }
    }

    #[instrument(skip(self, positions), fields(count = positions.len()))]
    pub fn build(&self, positions: &[Position]) -> Indicators {
        let sources = positions.iter().map(|p| p.source.as_ref());

        let face_column = if has_column(sources.clone(), &aliases::PORTFOLIO_FACE_VALUE) {
            FaceColumn::Portfolio
        } else if has_column(sources.clone(), &aliases::CURRENT_FACE_VALUE) {
            FaceColumn::Current
        } else {
            FaceColumn::Missing
        };

        let distributed_column = if has_column(sources.clone(), &aliases::INDIVIDUAL_VALUE) {
            DistributedColumn::IndividualValue
        } else if has_column(sources, &aliases::TOTAL_DISTRIBUTED) {
            DistributedColumn::TotalDistributed
        } else {
            DistributedColumn::Missing
        };

        let indicators = Indicators {
            overview: self.overview(positions, face_column, distributed_column),
            risk_alerts: self.risk_alerts(positions, face_column),
        };

        debug!(
            record_count = ?indicators.overview.record_count,
            value_at_risk = indicators.risk_alerts.value_at_risk,
            "预聚合指标计算完成"
        );
        indicators
    }

    fn has_face(p: &Position, face_column: FaceColumn) -> bool {
        match face_column {
            FaceColumn::Portfolio => p.portfolio_face_value > 0.0,
            FaceColumn::Current => p.current_face_value > 0.0,
            FaceColumn::Missing => false,
        }
    }

    fn overview(
        &self,
        positions: &[Position],
        face_column: FaceColumn,
        distributed_column: DistributedColumn,
    ) -> OverviewIndicators {
        let in_scope: Vec<&Position> = positions
            .iter()
            .filter(|p| p.is_active(&self.active_status) && Self::has_face(p, face_column))
            .collect();

        let total_distributed: f64 = match distributed_column {
            DistributedColumn::IndividualValue => in_scope
                .iter()
                .filter_map(|p| resolve(&p.source, &aliases::INDIVIDUAL_VALUE).and_then(to_number))
                .sum(),
            DistributedColumn::TotalDistributed => {
                in_scope.iter().map(|p| p.total_distributed).sum()
            }
            DistributedColumn::Missing => 0.0,
        };

        let real_value_total: f64 = in_scope.iter().map(|p| p.real_value).sum();

        // 参与比例加权平均期限
        let (weighted, weight) = in_scope
            .iter()
            .filter(|p| p.duration_months > 0.0 && p.participation_fraction > 0.0)
            .fold((0.0, 0.0), |(acc, w), p| {
                (
                    acc + p.duration_months * p.participation_fraction,
                    w + p.participation_fraction,
                )
            });
        let mean_duration_months = if weight > 0.0 {
            Some(weighted / weight)
        } else {
            None
        };

        OverviewIndicators {
            total_distributed: Some(total_distributed),
            real_value_total: Some(real_value_total),
            mean_duration_months,
            record_count: Some(in_scope.len() as u64),
        }
    }

    fn risk_alerts(&self, positions: &[Position], face_column: FaceColumn) -> RiskAlertIndicators {
        let base: Vec<&Position> = positions
            .iter()
            .filter(|p| p.is_active(&self.active_status) && p.estimated_value > 0.0)
            .collect();

        let units_without_face_value = base
            .iter()
            .filter(|p| !Self::has_face(p, face_column))
            .count() as u64;

        let folders: f64 = base
            .iter()
            .filter_map(|p| resolve(&p.source, &aliases::ESTIMATED_FOLDERS))
            .map(to_num)
            .sum();

        RiskAlertIndicators {
            units_without_face_value,
            value_at_risk: base.iter().map(|p| p.estimated_value).sum(),
            unbacked_participation: base.iter().map(|p| p.participation_fraction).sum(),
            folders_to_allocate: folders.max(0.0).trunc() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RawRecord;
    use crate::importer::row_normalizer::RowNormalizer;
    use serde_json::{json, Value};

    fn positions(rows: Vec<Value>) -> Vec<Position> {
        let records: Vec<RawRecord> = rows
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();
        RowNormalizer::new().normalize_all(records)
    }

    #[test]
    fn test_overview_mask_and_sums() {
        let ps = positions(vec![
            json!({"Status": "Ativa", "Valor Atual Face": 1000, "% Lastro": 0.5,
                   "Valor Individual": 300, "Duration": 12, "Participação": 0.25}),
            json!({"Status": "ativa", "Valor Atual Face": 2000, "% Lastro": 0.25,
                   "Valor Individual": "200", "Duration": 24, "Participação": 0.75}),
            // 无面值 → 不计入
            json!({"Status": "Ativa", "Valor Atual Face": 0, "Valor Individual": 999}),
            // 非有效 → 不计入
            json!({"Status": "Encerrada", "Valor Atual Face": 500, "Valor Individual": 999}),
        ]);

        let indicators = IndicatorBuilder::new("ativa").build(&ps);
        let overview = indicators.overview;
        assert_eq!(overview.total_distributed, Some(500.0));
        assert_eq!(overview.real_value_total, Some(1000.0));
        assert_eq!(overview.record_count, Some(2));
        // (12×0.25 + 24×0.75) / 1.0 = 21
        assert_eq!(overview.mean_duration_months, Some(21.0));
    }

    #[test]
    fn test_overview_prefers_portfolio_face_column() {
        let ps = positions(vec![
            json!({"Status": "Ativa", "Valor Atual Face": 1000,
                   "Valor Atual de Face Estimado da Carteira": 0}),
            json!({"Status": "Ativa", "Valor Atual de Face Estimado da Carteira": 10}),
        ]);

        let indicators = IndicatorBuilder::new("ativa").build(&ps);
        assert_eq!(indicators.overview.record_count, Some(1));
    }

    #[test]
    fn test_overview_without_weights_has_no_mean_duration() {
        let ps = positions(vec![json!({"Status": "Ativa", "Valor Atual Face": 1, "Duration": 10})]);
        let indicators = IndicatorBuilder::new("ativa").build(&ps);
        assert_eq!(indicators.overview.mean_duration_months, None);
        assert_eq!(indicators.overview.total_distributed, Some(0.0));
    }

    #[test]
    fn test_total_distributed_fallback_column() {
        let ps = positions(vec![
            json!({"Status": "Ativa", "Valor Atual Face": 1, "Total Distribuido": 70}),
        ]);
        let indicators = IndicatorBuilder::new("ativa").build(&ps);
        assert_eq!(indicators.overview.total_distributed, Some(70.0));
    }

    #[test]
    fn test_risk_alerts() {
        let ps = positions(vec![
            json!({"Status": "Ativa", "Valor Estimado": 100, "Valor Atual Face": 0,
                   "Participação": 0.2, "Numero de Pastas Estimado": 3}),
            json!({"Status": "Ativa", "Valor Estimado": 50, "Valor Atual Face": 10,
                   "Participação": 30, "Numero de Pastas Estimado": 2}),
            json!({"Status": "Ativa", "Valor Estimado": 0, "Numero de Pastas Estimado": 9}),
        ]);

        let alerts = IndicatorBuilder::new("ativa").build(&ps).risk_alerts;
        assert_eq!(alerts.units_without_face_value, 1);
        assert_eq!(alerts.value_at_risk, 150.0);
        assert!((alerts.unbacked_participation - 0.5).abs() < 1e-12);
        assert_eq!(alerts.folders_to_allocate, 5);
    }
}
