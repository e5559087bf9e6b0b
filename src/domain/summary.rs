// ==========================================
// 司法资产看板 - 代码汇总领域模型
// ==========================================
// 职责: 按业务代码聚合后的汇总 (CodeSummary)
// 生命周期: 每次过滤/排序/翻页事件整体重建,不做增量更新
// ==========================================

use crate::domain::types::RiskTier;
use serde::Serialize;

// ==========================================
// CodeSummary - 代码汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeSummary {
    pub code: String,              // 分组键
    pub issuance_set: Vec<String>, // 关联发行编号（去重,首次出现顺序）

    // ===== 求和 =====
    pub real_value_total: f64,       // EAD 合计
    pub estimated_value_total: f64,  // 预估损失合计
    pub impact_total: f64,           // 影响合计
    pub total_units_sum: f64,        // 代币合计
    pub process_count_sum: f64,      // 案件数合计
    pub units_without_value_sum: f64, // 无面值代币合计

    // ===== 平均 =====
    pub backed_fraction_avg: f64, // 面值加权担保比例（百分数）
    pub duration_months_avg: f64, // 期限简单平均
    pub multiple_avg: f64,        // 倍数简单平均
    pub pp_percent_avg: f64,      // EAD 加权 PP（百分数）
    pub urgency_avg: f64,         // 紧迫度代理简单平均

    // ===== 标志 =====
    pub has_backed_fraction: bool,
    pub has_face_value: bool,

    // ===== 场景 =====
    pub dominant_scenario: String,
    pub has_multiple_scenarios: bool,

    pub status: String, // 首个成员状态,不聚合

    /// 由 RiskClassifier 赋值,分级完成后冻结
    pub risk_tier: Option<RiskTier>,
}

impl CodeSummary {
    /// 分级结果（未分级时按 Low 处理）
    pub fn tier(&self) -> RiskTier {
        self.risk_tier.unwrap_or(RiskTier::Low)
    }
}
