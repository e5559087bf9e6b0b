// ==========================================
// 司法资产看板 - 分位数与点半径
// ==========================================
// 分位数: sorted[min(n-1, floor(t·(n-1)))]（不插值）
// 半径: p05..p95 线性映射到 [radius_min, radius_max]
//       p95 == 0 或 p95 ≤ p05 时使用默认半径
// ==========================================

use crate::config::dashboard_config::ChartSettings;

/// 在已升序的序列上取分位数（空序列为 0）
pub fn pick_percentile(sorted: &[f64], t: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let last = sorted.len() - 1;
    let idx = (t * last as f64).floor().max(0.0) as usize;
    sorted[idx.min(last)]
}

/// 基于分位数的点半径映射
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    pub p_low: f64,
    pub p_high: f64,
    min: f64,
    max: f64,
    default: f64,
}

impl RadiusScale {
    pub fn from_values(values: &[f64], settings: &ChartSettings) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Self {
            p_low: pick_percentile(&sorted, settings.percentile_low),
            p_high: pick_percentile(&sorted, settings.percentile_high),
            min: settings.radius_min,
            max: settings.radius_max,
            default: settings.radius_default,
        }
    }

    pub fn radius(&self, value: f64) -> f64 {
        if self.p_high == 0.0 || self.p_high <= self.p_low {
            return self.default;
        }
        let z = ((value - self.p_low) / (self.p_high - self.p_low)).clamp(0.0, 1.0);
        let z = if z.is_nan() { 0.0 } else { z };
        self.min + z * (self.max - self.min)
    }
}
