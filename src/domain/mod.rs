// ==========================================
// 司法资产看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod chart;
pub mod indicators;
pub mod position;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use chart::{
    ChartBundle, DecayBar, DistributionBar, DistributionSeries, ExposurePoint, ExposureScatter,
    ImpactMatrix, MatrixPoint, RankedBar, RgbaColor, RiskDecay, RiskRanking,
};
pub use indicators::{
    Indicators, MetricsSource, OverviewIndicators, OverviewMetrics, RiskAlertIndicators,
    RiskAlerts,
};
pub use position::Position;
pub use summary::CodeSummary;
pub use types::{RawRecord, RiskTier, ScenarioBucket, NO_SCENARIO_LABEL};
