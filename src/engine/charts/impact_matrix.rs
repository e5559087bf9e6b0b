// ==========================================
// 司法资产看板 - (c) 影响 / 紧迫矩阵
// ==========================================
// 输入: 有效状态 且 影响 > 0 的持仓
// x: 影响（组合估计面值 → 当前面值）
// y: 期限 > 0 时取期限,否则按场景标签查紧迫度代理表
// 分桶: 期限 > 0 按月数（≤24 / ≤34 / 其余）,否则按标签关键字
// 半径: 按参与比例的 5%/95% 分位数映射
// 颜色: heat(impact / max(impact, 1))
// ==========================================

use crate::config::dashboard_config::{ChartSettings, UrgencyProxyTable};
use crate::domain::chart::{ImpactMatrix, MatrixPoint};
use crate::domain::position::Position;
use crate::domain::types::ScenarioBucket;
use crate::engine::charts::color::heat_color;
use crate::engine::charts::percentile::RadiusScale;
use crate::engine::urgency::urgency_proxy;

pub struct ImpactMatrixBuilder<'a> {
    settings: &'a ChartSettings,
    proxy: &'a UrgencyProxyTable,
    active_status: &'a str,
}

impl<'a> ImpactMatrixBuilder<'a> {
    pub fn new(
        settings: &'a ChartSettings,
        proxy: &'a UrgencyProxyTable,
        active_status: &'a str,
    ) -> Self {
        Self {
            settings,
            proxy,
            active_status,
        }
    }

    pub fn build(&self, positions: &[Position]) -> ImpactMatrix {
        let rows: Vec<&Position> = positions
            .iter()
            .filter(|p| p.is_active(self.active_status) && p.impact() > 0.0)
            .collect();

        let max_impact = rows.iter().map(|p| p.impact()).fold(1.0, f64::max);
        let participations: Vec<f64> = rows.iter().map(|p| p.participation_fraction).collect();
        let scale = RadiusScale::from_values(&participations, self.settings);

        let points = rows
            .iter()
            .map(|p| {
                let impact = p.impact();
                let bucket = ScenarioBucket::from_months(p.duration_months)
                    .unwrap_or_else(|| ScenarioBucket::from_label(&p.scenario));

                MatrixPoint {
                    x: impact,
                    y: urgency_proxy(p.duration_months, &p.scenario, self.proxy),
                    label: p.label().to_string(),
                    color: heat_color(impact / max_impact),
                    radius: scale.radius(p.participation_fraction),
                    bucket,
                }
            })
            .collect();

        ImpactMatrix { points, max_impact }
    }
}
