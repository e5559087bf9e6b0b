// ==========================================
// 司法资产看板 - 图表配色
// ==========================================
// 热力色阶（两段线性插值）:
// - 0.0 绿 (0,170,0) → 0.5 琥珀 (234,179,8) → 1.0 红 (239,68,68)
// - 填充 alpha 0.85,边框 alpha 1
// ==========================================

use crate::domain::chart::RgbaColor;

pub const FILL_ALPHA: f64 = 0.85;
pub const BORDER_ALPHA: f64 = 1.0;

/// 分配百分比色带
pub const DISTRIBUTION_GOOD: RgbaColor = RgbaColor::new(34, 197, 94, 0.9);
pub const DISTRIBUTION_FAIR: RgbaColor = RgbaColor::new(234, 179, 8, 0.9);
pub const DISTRIBUTION_POOR: RgbaColor = RgbaColor::new(239, 68, 68, 0.9);

fn lerp(from: f64, to: f64, t: f64) -> u8 {
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}

/// 热力填充色（输入先截断到 [0,1],NaN 视为 0）
pub fn heat_color(intensity: f64) -> RgbaColor {
    let x = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };

    if x <= 0.5 {
        let t = x / 0.5;
        RgbaColor::new(lerp(0.0, 234.0, t), lerp(170.0, 179.0, t), lerp(0.0, 8.0, t), FILL_ALPHA)
    } else {
        let t = (x - 0.5) / 0.5;
        RgbaColor::new(
            lerp(234.0, 239.0, t),
            lerp(179.0, 68.0, t),
            lerp(8.0, 68.0, t),
            FILL_ALPHA,
        )
    }
}

/// 热力边框色
pub fn heat_border(intensity: f64) -> RgbaColor {
    heat_color(intensity).with_alpha(BORDER_ALPHA)
}

/// 分配百分比色带（≥ good 绿, ≥ fair 黄, 其余红）
pub fn distribution_color(percent: f64, good: f64, fair: f64) -> RgbaColor {
    if percent >= good {
        DISTRIBUTION_GOOD
    } else if percent >= fair {
        DISTRIBUTION_FAIR
    } else {
        DISTRIBUTION_POOR
    }
}
