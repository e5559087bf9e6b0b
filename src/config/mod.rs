// ==========================================
// 司法资产看板 - 配置层
// ==========================================
// 职责: 看板配置管理,支持文件 + 环境变量覆写
// ==========================================

pub mod config_manager;
pub mod dashboard_config;

// 重导出核心配置类型
pub use config_manager::{
    config_keys, get_default_config_path, validate, ConfigError, ConfigManager, ConfigResult,
};
pub use dashboard_config::{ChartSettings, DashboardConfig, RiskWeights, UrgencyProxyTable};
