// ==========================================
// 司法资产看板 - (a) 价值 / 敞口散点
// ==========================================
// 输入: 有效状态 且 预估损失 > 0 的持仓
// x: EAD → 组合估计面值 → 当前面值 → 代币数（取第一个正值）,否则 0
// y: 预估损失
// 颜色: heat(y / max(y, 1))
// 半径: 按 x 的 5%/95% 分位数映射
// ==========================================

use crate::config::dashboard_config::ChartSettings;
use crate::domain::chart::{ExposurePoint, ExposureScatter};
use crate::domain::position::Position;
use crate::engine::charts::color::heat_color;
use crate::engine::charts::percentile::RadiusScale;

/// 敞口口径
pub fn exposure_of(p: &Position) -> f64 {
    [
        p.real_value,
        p.portfolio_face_value,
        p.current_face_value,
        p.total_units,
    ]
    .into_iter()
    .find(|v| *v > 0.0)
    .unwrap_or(0.0)
}

pub struct ExposureScatterBuilder<'a> {
    settings: &'a ChartSettings,
    active_status: &'a str,
}

impl<'a> ExposureScatterBuilder<'a> {
    pub fn new(settings: &'a ChartSettings, active_status: &'a str) -> Self {
        Self {
            settings,
            active_status,
        }
    }

    pub fn build(&self, positions: &[Position]) -> ExposureScatter {
        let rows: Vec<&Position> = positions
            .iter()
            .filter(|p| p.is_active(self.active_status) && p.estimated_value > 0.0)
            .collect();

        let max_y = rows.iter().map(|p| p.estimated_value).fold(1.0, f64::max);
        let xs: Vec<f64> = rows.iter().map(|p| exposure_of(p)).collect();
        let scale = RadiusScale::from_values(&xs, self.settings);

        let points = rows
            .iter()
            .zip(xs.iter())
            .map(|(p, &x)| {
                let y = p.estimated_value;
                let intensity = y / max_y;
                ExposurePoint {
                    x,
                    y,
                    label: p.label().to_string(),
                    color_intensity: intensity,
                    color: heat_color(intensity),
                    radius: scale.radius(x),
                }
            })
            .collect();

        ExposureScatter {
            points,
            p05: scale.p_low,
            p95: scale.p_high,
        }
    }
}
