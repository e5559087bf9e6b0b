// ==========================================
// 司法资产看板 - 指标模型
// ==========================================
// 职责: 概览指标 / 风险预警指标
// 来源: 预聚合（后端,无过滤时） 或 由过滤后的持仓计算
// ==========================================

use serde::{Deserialize, Serialize};

/// 预聚合概览（字段缺失时由前端计算值兜底）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewIndicators {
    pub total_distributed: Option<f64>,
    pub real_value_total: Option<f64>,
    pub mean_duration_months: Option<f64>,
    pub record_count: Option<u64>,
}

/// 预聚合风险预警
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAlertIndicators {
    pub units_without_face_value: u64,
    pub value_at_risk: f64,
    pub unbacked_participation: f64,
    pub folders_to_allocate: u64,
}

/// 后端预聚合指标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub overview: OverviewIndicators,
    pub risk_alerts: RiskAlertIndicators,
}

/// 概览指标来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricsSource {
    PreAggregated, // 无过滤,使用预聚合
    Computed,      // 有过滤,由持仓计算
}

/// 看板概览指标（最终展示值）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total_distributed: f64,
    pub real_value_total: f64,
    pub mean_duration_months: f64,
    pub record_count: u64,
    pub source: MetricsSource,
}

/// 看板风险预警（始终由过滤后的持仓计算）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAlerts {
    pub units_without_face_value: u64,
    pub value_at_risk: f64,
    pub portfolio_at_risk_pct: f64,
    pub folders_to_allocate: f64,
}
