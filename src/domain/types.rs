// ==========================================
// 司法资产看板 - 领域类型定义
// ==========================================
// 职责: 风险分级 / 场景分桶 / 原始记录类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 原始记录：列名 → 任意值（数据源无模式保证）
///
/// `Value::Null` 视为"字段不存在"。
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// 无场景时的哨兵标签
pub const NO_SCENARIO_LABEL: &str = "Sem Cenário";

// ==========================================
// 风险等级 (Risk Tier)
// ==========================================
// 顺序: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,      // 低
    Medium,   // 中
    High,     // 高
    Critical, // 严重（存在预估损失）
}

impl RiskTier {
    /// 排序权重（risco-desc 排序使用）
    pub fn weight(&self) -> u8 {
        match self {
            RiskTier::Critical => 4,
            RiskTier::High => 3,
            RiskTier::Medium => 2,
            RiskTier::Low => 1,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::Medium => write!(f, "MEDIUM"),
            RiskTier::High => write!(f, "HIGH"),
            RiskTier::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 场景分桶 (Scenario Bucket)
// ==========================================
// 用于紧迫度代理值与影响/紧迫矩阵的分桶标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioBucket {
    Optimistic,   // 乐观
    Base,         // 基准
    Conservative, // 保守
    Unspecified,  // 无场景
}

impl ScenarioBucket {
    /// 按场景标签关键字分桶（大小写不敏感，子串匹配）
    ///
    /// 匹配顺序: 乐观 → 基准 → 保守 → 无场景
    pub fn from_label(label: &str) -> Self {
        let s = label.to_lowercase();
        if s.contains("otim") || s.contains("optim") {
            ScenarioBucket::Optimistic
        } else if s.contains("base") {
            ScenarioBucket::Base
        } else if s.contains("conserv") {
            ScenarioBucket::Conservative
        } else {
            ScenarioBucket::Unspecified
        }
    }

    /// 按月数分桶（≤24 乐观, ≤34 基准, 其余保守）
    ///
    /// 非有限或非正月数返回 None
    pub fn from_months(months: f64) -> Option<Self> {
        if !months.is_finite() || months <= 0.0 {
            return None;
        }
        if months <= 24.0 {
            Some(ScenarioBucket::Optimistic)
        } else if months <= 34.0 {
            Some(ScenarioBucket::Base)
        } else {
            Some(ScenarioBucket::Conservative)
        }
    }
}

impl fmt::Display for ScenarioBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioBucket::Optimistic => write!(f, "OPTIMISTIC"),
            ScenarioBucket::Base => write!(f, "BASE"),
            ScenarioBucket::Conservative => write!(f, "CONSERVATIVE"),
            ScenarioBucket::Unspecified => write!(f, "UNSPECIFIED"),
        }
    }
}
