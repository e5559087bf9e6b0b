// ==========================================
// 司法资产看板 - 分组聚合器
// ==========================================
// 职责: Position 序列 → 按代码分组的 CodeSummary
// 规则:
// - 代码去空白后为空的持仓不参与分组
// - 按输入顺序折叠 (场景并列取首个出现者,状态取首个成员)
// - 担保比例按面值加权,PP 按 EAD 加权,权重和为 0 时结果为 0
// - 输出按代码自然排序
// 红线: 纯函数,每次事件整体重建,不做增量更新
// ==========================================

use crate::config::dashboard_config::UrgencyProxyTable;
use crate::domain::position::Position;
use crate::domain::summary::CodeSummary;
use crate::domain::types::NO_SCENARIO_LABEL;
use crate::engine::sorting::natural_cmp;
use crate::engine::urgency::urgency_proxy;
use crate::importer::unit_coercer::finite_or_zero;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// 加权平均：权重和 ≤ 0 或结果非有限时返回 0
pub fn weighted_avg(weighted_sum: f64, weight_sum: f64) -> f64 {
    if weight_sum > 0.0 {
        finite_or_zero(weighted_sum / weight_sum)
    } else {
        0.0
    }
}

// ==========================================
// GroupAccumulator - 单组累加状态
// ==========================================
#[derive(Debug)]
struct GroupAccumulator {
    code: String,
    issuance_set: Vec<String>,
    status: String,
    members: usize,

    real_value_total: f64,
    estimated_value_total: f64,
    impact_total: f64,
    total_units_sum: f64,
    process_count_sum: f64,
    units_without_value_sum: f64,

    backed_weighted: f64,
    backed_weight: f64,
    pp_weighted: f64,
    pp_weight: f64,
    duration_sum: f64,
    multiple_sum: f64,
    urgency_sum: f64,

    has_backed_fraction: bool,
    has_face_value: bool,

    // 场景计数（首次出现顺序）
    scenarios: Vec<(String, usize)>,
}

impl GroupAccumulator {
    fn new(code: String, status: String) -> Self {
        Self {
            code,
            issuance_set: Vec::new(),
            status,
            members: 0,
            real_value_total: 0.0,
            estimated_value_total: 0.0,
            impact_total: 0.0,
            total_units_sum: 0.0,
            process_count_sum: 0.0,
            units_without_value_sum: 0.0,
            backed_weighted: 0.0,
            backed_weight: 0.0,
            pp_weighted: 0.0,
            pp_weight: 0.0,
            duration_sum: 0.0,
            multiple_sum: 0.0,
            urgency_sum: 0.0,
            has_backed_fraction: false,
            has_face_value: false,
            scenarios: Vec::new(),
        }
    }

    fn add(&mut self, p: &Position, proxy: &UrgencyProxyTable) {
        self.members += 1;

        if !p.issuance_id.is_empty() && !self.issuance_set.contains(&p.issuance_id) {
            self.issuance_set.push(p.issuance_id.clone());
        }

        // ===== 求和 =====
        self.real_value_total += p.real_value;
        self.estimated_value_total += p.estimated_value;
        self.impact_total += p.impact();
        self.total_units_sum += p.total_units;
        self.process_count_sum += p.process_count;
        if p.current_face_value <= 0.0 {
            self.units_without_value_sum += p.total_units;
        }

        // ===== 加权 =====
        self.backed_weighted += p.backed_fraction * 100.0 * p.current_face_value;
        self.backed_weight += p.current_face_value;
        self.pp_weighted += p.pp_percent_fraction * 100.0 * p.real_value;
        self.pp_weight += p.real_value;

        // ===== 简单平均 =====
        self.duration_sum += p.duration_months;
        self.multiple_sum += p.multiple;
        self.urgency_sum += urgency_proxy(p.duration_months, &p.scenario, proxy);

        // ===== 标志 =====
        self.has_backed_fraction |= p.backed_fraction > 0.0;
        self.has_face_value |= p.current_face_value > 0.0;

        let label = if p.scenario.is_empty() {
            NO_SCENARIO_LABEL
        } else {
            p.scenario.as_str()
        };
        match self.scenarios.iter_mut().find(|(s, _)| s == label) {
            Some((_, count)) => *count += 1,
            None => self.scenarios.push((label.to_string(), 1)),
        }
    }

    /// 计数最高的场景；并列时取首个出现者
    fn dominant_scenario(&self) -> String {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.scenarios {
            match best {
                Some((_, count)) if entry.1 <= *count => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(s, _)| s.clone())
            .unwrap_or_else(|| NO_SCENARIO_LABEL.to_string())
    }

    fn finish(self) -> CodeSummary {
        let n = self.members.max(1) as f64;
        let dominant_scenario = self.dominant_scenario();

        CodeSummary {
            backed_fraction_avg: weighted_avg(self.backed_weighted, self.backed_weight),
            pp_percent_avg: weighted_avg(self.pp_weighted, self.pp_weight),
            duration_months_avg: finite_or_zero(self.duration_sum / n),
            multiple_avg: finite_or_zero(self.multiple_sum / n),
            urgency_avg: finite_or_zero(self.urgency_sum / n),
            has_multiple_scenarios: self.scenarios.len() > 1,
            dominant_scenario,
            code: self.code,
            issuance_set: self.issuance_set,
            real_value_total: finite_or_zero(self.real_value_total),
            estimated_value_total: finite_or_zero(self.estimated_value_total),
            impact_total: finite_or_zero(self.impact_total),
            total_units_sum: finite_or_zero(self.total_units_sum),
            process_count_sum: finite_or_zero(self.process_count_sum),
            units_without_value_sum: finite_or_zero(self.units_without_value_sum),
            has_backed_fraction: self.has_backed_fraction,
            has_face_value: self.has_face_value,
            status: self.status,
            risk_tier: None,
        }
    }
}

// ==========================================
// GroupAggregator - 分组聚合器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct GroupAggregator {
    proxy: UrgencyProxyTable,
}

impl GroupAggregator {
    pub fn new(proxy: UrgencyProxyTable) -> Self {
        Self { proxy }
    }

    /// 聚合（输出未分级,按代码自然排序）
    #[instrument(skip(self, positions), fields(count = positions.len()))]
    pub fn aggregate(&self, positions: &[Position]) -> Vec<CodeSummary> {
        let mut groups: Vec<GroupAccumulator> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut skipped = 0usize;

        for p in positions {
            let code = p.code.trim();
            if code.is_empty() {
                skipped += 1;
                continue;
            }

            let slot = match index.get(code) {
                Some(slot) => *slot,
                None => {
                    groups.push(GroupAccumulator::new(code.to_string(), p.status.clone()));
                    index.insert(code.to_string(), groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[slot].add(p, &self.proxy);
        }

        let mut summaries: Vec<CodeSummary> =
            groups.into_iter().map(GroupAccumulator::finish).collect();
        summaries.sort_by(|a, b| natural_cmp(&a.code, &b.code));

        debug!(groups = summaries.len(), skipped, "分组聚合完成");
        summaries
    }
}
