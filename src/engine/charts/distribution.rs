// ==========================================
// 司法资产看板 - (e) 按发行的分配百分比柱状
// ==========================================
// 输入: 全部持仓（不限状态）
// 键: 发行编号（为空 → 跳过）
// 值: 源记录"个人金额"（宽松货币解析） + "% 已分配"（≤1 视为比例 ×100）
//     任一缺失/无法解析 → 跳过该行
// 聚合: 正的个人金额求和,百分比取最大
// 输出: 最大百分比 > 0,升序,保留两位小数
// ==========================================

use crate::config::dashboard_config::ChartSettings;
use crate::domain::chart::{DistributionBar, DistributionSeries};
use crate::domain::position::Position;
use crate::engine::charts::color::distribution_color;
use crate::importer::field_resolver::{aliases, resolve};
use crate::importer::unit_coercer::{to_number_flex, to_percent_0_100};
use std::collections::HashMap;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub struct DistributionBuilder<'a> {
    settings: &'a ChartSettings,
}

impl<'a> DistributionBuilder<'a> {
    pub fn new(settings: &'a ChartSettings) -> Self {
        Self { settings }
    }

    pub fn build(&self, positions: &[Position]) -> DistributionSeries {
        // (发行编号, 个人金额合计, 最大百分比)
        let mut groups: Vec<(String, f64, f64)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for p in positions {
            if p.issuance_id.is_empty() {
                continue;
            }
            let issuance = p.issuance_id.clone();

            let individual = resolve(&p.source, &aliases::INDIVIDUAL_VALUE).and_then(to_number_flex);
            let percent =
                resolve(&p.source, &aliases::DISTRIBUTED_FRACTION).and_then(to_percent_0_100);
            let (individual, percent) = match (individual, percent) {
                (Some(i), Some(pct)) => (i, pct),
                _ => continue,
            };

            let slot = match index.get(&issuance) {
                Some(&slot) => slot,
                None => {
                    index.insert(issuance.clone(), groups.len());
                    groups.push((issuance, 0.0, 0.0));
                    groups.len() - 1
                }
            };

            let g = &mut groups[slot];
            if individual > 0.0 {
                g.1 += individual;
            }
            if percent > g.2 {
                g.2 = percent;
            }
        }

        let mut kept: Vec<(String, f64, f64)> =
            groups.into_iter().filter(|(_, _, pct)| *pct > 0.0).collect();
        kept.sort_by(|a, b| a.2.total_cmp(&b.2));

        let bars = kept
            .into_iter()
            .map(|(issuance_id, distributed_value, max_pct)| {
                let percent = round2(max_pct);
                DistributionBar {
                    issuance_id,
                    percent,
                    distributed_value,
                    color: distribution_color(
                        percent,
                        self.settings.distribution_good_pct,
                        self.settings.distribution_fair_pct,
                    ),
                }
            })
            .collect();

        DistributionSeries { bars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RawRecord;
    use crate::engine::charts::color::{DISTRIBUTION_FAIR, DISTRIBUTION_GOOD, DISTRIBUTION_POOR};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn row(issuance: &str, source: Value) -> Position {
        let record: RawRecord = source.as_object().cloned().unwrap();
        Position {
            issuance_id: issuance.to_string(),
            source: Arc::new(record),
            ..Position::default()
        }
    }

    #[test]
    fn test_distribution_max_percent_and_sum() {
        let settings = ChartSettings::default();
        let data = vec![
            row("EM-1", json!({"Valor Individual": "R$ 1.000,50", "% Distribuido": 0.4})),
            row("EM-1", json!({"Valor individual": 500, "% Distribuído": "85"})),
            row("EM-1", json!({"Valor Individual": -10, "% Distribuido": 0.1})),
            row("EM-2", json!({"Valor Individual": 10, "% Distribuido": 0.123456})),
            row("EM-3", json!({"Valor Individual": 10, "% Distribuido": 0.6})),
        ];

        let series = DistributionBuilder::new(&settings).build(&data);
        let ids: Vec<&str> = series.bars.iter().map(|b| b.issuance_id.as_str()).collect();
        assert_eq!(ids, vec!["EM-2", "EM-3", "EM-1"]);

        assert_eq!(series.bars[0].percent, 12.35);
        assert_eq!(series.bars[0].color, DISTRIBUTION_POOR);
        assert_eq!(series.bars[1].color, DISTRIBUTION_FAIR);
        assert_eq!(series.bars[2].percent, 85.0);
        assert_eq!(series.bars[2].distributed_value, 1500.5);
        assert_eq!(series.bars[2].color, DISTRIBUTION_GOOD);
    }

    #[test]
    fn test_distribution_skips_incomplete_rows() {
        let settings = ChartSettings::default();
        let data = vec![
            row("EM-1", json!({"Valor Individual": "", "% Distribuido": 0.5})),
            row("EM-2", json!({"Valor Individual": 10})),
            row("EM-3", json!({"Valor Individual": 10, "% Distribuido": 0})),
            row("", json!({"Valor Individual": 10, "% Distribuido": 0.5})),
        ];

        let series = DistributionBuilder::new(&settings).build(&data);
        assert!(series.bars.is_empty());
    }

    #[test]
    fn test_distribution_issuance_from_normalized_alias() {
        use crate::importer::RowNormalizer;

        let settings = ChartSettings::default();
        let record: RawRecord = json!({
            "Emissao": "EM-9",
            "Valor Individual": 10,
            "% Distribuido": 0.9
        })
        .as_object()
        .cloned()
        .unwrap();
        let data = vec![RowNormalizer::new().normalize(&record)];

        let series = DistributionBuilder::new(&settings).build(&data);
        assert_eq!(series.bars.len(), 1);
        assert_eq!(series.bars[0].issuance_id, "EM-9");
    }
}
