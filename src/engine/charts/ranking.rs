// ==========================================
// 司法资产看板 - (b) 风险排行柱状
// ==========================================
// 输入: 有效状态 且 预估损失 > 0 的持仓
// 键: 代码 → 发行编号 → "—"
// 值: 预估损失求和
// 输出: 取最高的 N 个,升序排列
// 颜色: (v - min) / (max - min),全部相等时 0.5
// ==========================================

use crate::config::dashboard_config::ChartSettings;
use crate::domain::chart::{RankedBar, RiskRanking};
use crate::domain::position::Position;
use crate::engine::charts::color::{heat_border, heat_color};
use std::collections::HashMap;

/// 缺失标签占位
pub const MISSING_LABEL: &str = "—";

pub struct RiskRankingBuilder<'a> {
    settings: &'a ChartSettings,
    active_status: &'a str,
}

impl<'a> RiskRankingBuilder<'a> {
    pub fn new(settings: &'a ChartSettings, active_status: &'a str) -> Self {
        Self {
            settings,
            active_status,
        }
    }

    pub fn build(&self, positions: &[Position]) -> RiskRanking {
        let mut series: Vec<(String, f64)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for p in positions
            .iter()
            .filter(|p| p.is_active(self.active_status) && p.estimated_value > 0.0)
        {
            let key = if !p.code.is_empty() {
                p.code.as_str()
            } else if !p.issuance_id.is_empty() {
                p.issuance_id.as_str()
            } else {
                MISSING_LABEL
            };

            match index.get(key) {
                Some(&slot) => series[slot].1 += p.estimated_value,
                None => {
                    index.insert(key.to_string(), series.len());
                    series.push((key.to_string(), p.estimated_value));
                }
            }
        }

        series.sort_by(|a, b| a.1.total_cmp(&b.1));
        let skip = series.len().saturating_sub(self.settings.ranking_top_n);
        let top: Vec<(String, f64)> = series.into_iter().skip(skip).collect();

        let min = top.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let max = top.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        let norm = |v: f64| if max == min { 0.5 } else { (v - min) / (max - min) };

        let bars = top
            .into_iter()
            .map(|(label, value)| RankedBar {
                color: heat_color(norm(value)),
                border: heat_border(norm(value)),
                label,
                value,
            })
            .collect();

        RiskRanking { bars }
    }
}
