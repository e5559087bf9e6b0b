// ==========================================
// 司法资产看板 - 看板配置项
// ==========================================
// 职责: 风险权重 / 紧迫度代理表 / 图表参数 / 分页
// 说明: 所有字段都有默认值,配置文件可只覆写部分字段
// ==========================================

use crate::domain::types::ScenarioBucket;
use serde::{Deserialize, Serialize};

// ==========================================
// RiskWeights - 风险分级权重与阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    /// 影响权重
    pub impact_weight: f64,
    /// 紧迫度权重
    pub urgency_weight: f64,
    /// 紧迫度归一化上限（月）
    pub urgency_cap_months: f64,
    /// score ≥ 该值 → High
    pub high_threshold: f64,
    /// score ≥ 该值 → Medium
    pub medium_threshold: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            impact_weight: 0.65,
            urgency_weight: 0.35,
            urgency_cap_months: 42.0,
            high_threshold: 0.66,
            medium_threshold: 0.35,
        }
    }
}

// ==========================================
// UrgencyProxyTable - 紧迫度代理表
// ==========================================
// 聚合器与影响/紧迫矩阵共用同一张表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyProxyTable {
    pub optimistic_months: f64,
    pub base_months: f64,
    pub conservative_months: f64,
    pub unspecified_months: f64,
}

impl Default for UrgencyProxyTable {
    fn default() -> Self {
        Self {
            optimistic_months: 18.0,
            base_months: 30.0,
            conservative_months: 42.0,
            unspecified_months: 45.0,
        }
    }
}

impl UrgencyProxyTable {
    /// 场景分桶对应的代理月数
    pub fn months_for(&self, bucket: ScenarioBucket) -> f64 {
        match bucket {
            ScenarioBucket::Optimistic => self.optimistic_months,
            ScenarioBucket::Base => self.base_months,
            ScenarioBucket::Conservative => self.conservative_months,
            ScenarioBucket::Unspecified => self.unspecified_months,
        }
    }
}

// ==========================================
// ChartSettings - 图表参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub ranking_top_n: usize,
    pub decay_cap_months: f64,
    pub radius_min: f64,
    pub radius_max: f64,
    pub radius_default: f64,
    pub percentile_low: f64,
    pub percentile_high: f64,
    /// 分配百分比颜色分段: ≥ good → 绿, ≥ fair → 黄, 其余红
    pub distribution_good_pct: f64,
    pub distribution_fair_pct: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            ranking_top_n: 10,
            decay_cap_months: 18.0,
            radius_min: 4.0,
            radius_max: 12.0,
            radius_default: 5.0,
            percentile_low: 0.05,
            percentile_high: 0.95,
            distribution_good_pct: 80.0,
            distribution_fair_pct: 50.0,
        }
    }
}

// ==========================================
// DashboardConfig - 看板配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub risk: RiskWeights,
    pub urgency_proxy: UrgencyProxyTable,
    pub charts: ChartSettings,
    /// 卡片每页数量
    pub page_size: usize,
    /// "有效"状态取值（比较时大小写不敏感）
    pub active_status: String,
    /// 卡片关注阈值：期限 > 全体平均期限 × 该倍数
    pub attention_duration_factor: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            risk: RiskWeights::default(),
            urgency_proxy: UrgencyProxyTable::default(),
            charts: ChartSettings::default(),
            page_size: 12,
            active_status: "ativa".to_string(),
            attention_duration_factor: 1.2,
        }
    }
}
