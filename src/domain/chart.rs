// ==========================================
// 司法资产看板 - 图表数据集模型
// ==========================================
// 职责: 图表构建器输出的点/序列结构（绘制由外部完成）
// ==========================================

use crate::domain::types::ScenarioBucket;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

// ==========================================
// RgbaColor - 颜色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl RgbaColor {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// 同色不同透明度（边框使用 alpha=1）
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

// ==========================================
// (a) 价值 / 敞口散点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposurePoint {
    pub x: f64, // 敞口
    pub y: f64, // 预估损失
    pub label: String,
    pub color_intensity: f64, // y / max(y)
    pub color: RgbaColor,
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExposureScatter {
    pub points: Vec<ExposurePoint>,
    pub p05: f64,
    pub p95: f64,
}

// ==========================================
// (b) 风险排行柱状
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBar {
    pub label: String,
    pub value: f64,
    pub color: RgbaColor,
    pub border: RgbaColor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskRanking {
    pub bars: Vec<RankedBar>, // 升序
}

// ==========================================
// (c) 影响 / 紧迫矩阵
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixPoint {
    pub x: f64, // 影响
    pub y: f64, // 紧迫度（月）
    pub label: String,
    pub color: RgbaColor,
    pub radius: f64,
    pub bucket: ScenarioBucket,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImpactMatrix {
    pub points: Vec<MatrixPoint>,
    pub max_impact: f64,
}

// ==========================================
// (d) 按发行的风险衰减柱状
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecayBar {
    pub issuance_id: String,
    pub risk_value: f64,
    pub process_count: f64,
    pub possible_bad_count: f64,
    pub closure_first: Option<NaiveDate>,
    pub closure_last: Option<NaiveDate>,
    pub months_first: Option<f64>,
    pub months_last: Option<f64>,
    pub months_for_color: Option<f64>,
    pub color: RgbaColor,
    pub border: RgbaColor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskDecay {
    pub bars: Vec<DecayBar>,
}

// ==========================================
// (e) 按发行的分配百分比柱状
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBar {
    pub issuance_id: String,
    pub percent: f64, // 0-100,两位小数
    pub distributed_value: f64,
    pub color: RgbaColor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionSeries {
    pub bars: Vec<DistributionBar>, // 升序
}

// ==========================================
// ChartBundle - 五个数据集
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartBundle {
    pub exposure_scatter: ExposureScatter,
    pub risk_ranking: RiskRanking,
    pub impact_matrix: ImpactMatrix,
    pub risk_decay: RiskDecay,
    pub distribution: DistributionSeries,
}
