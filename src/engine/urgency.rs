// ==========================================
// 司法资产看板 - 紧迫度代理
// ==========================================
// 职责: 月数 / 场景标签 → 紧迫度（月）
// 规则:
// - 月数有限且 > 0 → 直接使用
// - 否则按场景关键字查代理表 (乐观 18 / 基准 30 / 保守 42 / 其他 45)
// 共用方: GroupAggregator, ImpactMatrixBuilder
// ==========================================

use crate::config::dashboard_config::UrgencyProxyTable;
use crate::domain::types::ScenarioBucket;

/// 紧迫度代理值
pub fn urgency_proxy(months: f64, scenario_label: &str, table: &UrgencyProxyTable) -> f64 {
    if months.is_finite() && months > 0.0 {
        return months;
    }
    table.months_for(ScenarioBucket::from_label(scenario_label))
}
