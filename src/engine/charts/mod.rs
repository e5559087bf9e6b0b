// ==========================================
// 司法资产看板 - 图表数据集构建
// ==========================================
// 职责: 由过滤后的持仓构建五个图表数据集（绘制由外部完成）
//   (a) 价值/敞口散点  (b) 风险排行  (c) 影响/紧迫矩阵
//   (d) 按发行风险衰减  (e) 按发行分配百分比
// 红线: 过滤结果为空时输出空数据集,不回退到全量
// ==========================================

pub mod color;
pub mod decay;
pub mod distribution;
pub mod exposure_scatter;
pub mod impact_matrix;
pub mod percentile;
pub mod ranking;

pub use decay::RiskDecayBuilder;
pub use distribution::DistributionBuilder;
pub use exposure_scatter::ExposureScatterBuilder;
pub use impact_matrix::ImpactMatrixBuilder;
pub use ranking::RiskRankingBuilder;

use crate::config::dashboard_config::DashboardConfig;
use crate::domain::chart::ChartBundle;
use crate::domain::position::Position;
use chrono::NaiveDate;
use tracing::{debug, instrument};

// ==========================================
// ChartBuilder - 五个构建器的门面
// ==========================================
pub struct ChartBuilder<'a> {
    config: &'a DashboardConfig,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, positions), fields(count = positions.len(), today = %today))]
    pub fn build_all(&self, positions: &[Position], today: NaiveDate) -> ChartBundle {
        let settings = &self.config.charts;
        let active = self.config.active_status.as_str();

        let bundle = ChartBundle {
            exposure_scatter: ExposureScatterBuilder::new(settings, active).build(positions),
            risk_ranking: RiskRankingBuilder::new(settings, active).build(positions),
            impact_matrix: ImpactMatrixBuilder::new(settings, &self.config.urgency_proxy, active)
                .build(positions),
            risk_decay: RiskDecayBuilder::new(settings, active).build(positions, today),
            distribution: DistributionBuilder::new(settings).build(positions),
        };

        debug!(
            scatter = bundle.exposure_scatter.points.len(),
            ranking = bundle.risk_ranking.bars.len(),
            matrix = bundle.impact_matrix.points.len(),
            decay = bundle.risk_decay.bars.len(),
            distribution = bundle.distribution.bars.len(),
            "图表数据集构建完成"
        );
        bundle
    }
}
