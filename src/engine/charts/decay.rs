// ==========================================
// 司法资产看板 - (d) 按发行的风险衰减柱状
// ==========================================
// 输入: 有效状态 且 可能坏账金额 > 0 的持仓,按发行编号分组（空编号跳过）
// 聚合: 坏账金额求和 / 案件数取最大 / 坏账数量取最大 / 结束日期集合
// 月数: (today - 日期) 天数 / 30.4375
//   存在不同的第二日期时以最晚日期着色,否则以最早日期
// 排序: 着色月数升序（缺失排最后）,再按风险金额升序
// 颜色: heat(clamp01(月数 / 18))
// ==========================================

use crate::config::dashboard_config::ChartSettings;
use crate::domain::chart::{DecayBar, RiskDecay};
use crate::domain::position::Position;
use crate::engine::charts::color::{heat_border, heat_color};
use crate::importer::derivation::parse_date_flex;
use chrono::NaiveDate;
use std::collections::HashMap;

/// 前端口径的平均月长（天）
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// 缺失月数的排序占位
const MISSING_MONTHS_RANK: f64 = 1e9;

#[derive(Debug)]
struct IssuanceGroup {
    issuance_id: String,
    risk_value: f64,
    process_count: f64,
    possible_bad_count: f64,
    closures: Vec<NaiveDate>,
}

pub struct RiskDecayBuilder<'a> {
    settings: &'a ChartSettings,
    active_status: &'a str,
}

impl<'a> RiskDecayBuilder<'a> {
    pub fn new(settings: &'a ChartSettings, active_status: &'a str) -> Self {
        Self {
            settings,
            active_status,
        }
    }

    fn months_between(today: NaiveDate, date: NaiveDate) -> f64 {
        (today - date).num_days() as f64 / DAYS_PER_MONTH
    }

    pub fn build(&self, positions: &[Position], today: NaiveDate) -> RiskDecay {
        let mut groups: Vec<IssuanceGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for p in positions
            .iter()
            .filter(|p| p.is_active(self.active_status) && p.possible_bad_value > 0.0)
        {
            if p.issuance_id.is_empty() {
                continue;
            }

            let slot = match index.get(&p.issuance_id) {
                Some(&slot) => slot,
                None => {
                    groups.push(IssuanceGroup {
                        issuance_id: p.issuance_id.clone(),
                        risk_value: 0.0,
                        process_count: 0.0,
                        possible_bad_count: 0.0,
                        closures: Vec::new(),
                    });
                    index.insert(p.issuance_id.clone(), groups.len() - 1);
                    groups.len() - 1
                }
            };

            let g = &mut groups[slot];
            g.risk_value += p.possible_bad_value;
            g.process_count = g.process_count.max(p.process_count);
            g.possible_bad_count = g.possible_bad_count.max(p.possible_bad_count);
            if let Some(date) = parse_date_flex(&p.closure_date) {
                g.closures.push(date);
            }
        }

        let mut bars: Vec<DecayBar> = groups
            .into_iter()
            .map(|mut g| {
                g.closures.sort();
                let first = g.closures.first().copied();
                let last = g.closures.last().copied();
                let has_second = matches!((first, last), (Some(a), Some(b)) if a != b);

                let months_first = first.map(|d| Self::months_between(today, d));
                let months_last = if has_second {
                    last.map(|d| Self::months_between(today, d))
                } else {
                    None
                };
                let months_for_color = if has_second { months_last } else { months_first };

                let intensity = months_for_color.unwrap_or(0.0) / self.settings.decay_cap_months;

                DecayBar {
                    issuance_id: g.issuance_id,
                    risk_value: g.risk_value,
                    process_count: g.process_count,
                    possible_bad_count: g.possible_bad_count,
                    closure_first: first,
                    closure_last: last,
                    months_first,
                    months_last,
                    months_for_color,
                    color: heat_color(intensity),
                    border: heat_border(intensity),
                }
            })
            .collect();

        bars.sort_by(|a, b| {
            let am = a.months_for_color.unwrap_or(MISSING_MONTHS_RANK);
            let bm = b.months_for_color.unwrap_or(MISSING_MONTHS_RANK);
            am.total_cmp(&bm)
                .then_with(|| a.risk_value.total_cmp(&b.risk_value))
        });

        RiskDecay { bars }
    }
}
