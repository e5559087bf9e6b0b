// ==========================================
// 司法资产看板 - 配置管理器
// ==========================================
// 职责: 配置加载（文件 → 环境变量覆写 → 校验）
// 存储: JSON 文件（可选）,缺省使用内置默认值
// ==========================================

use crate::config::dashboard_config::DashboardConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value})")]
    ValueError { key: String, value: String },

    #[error("配置校验失败: {0}")]
    ValidationError(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// 配置键（环境变量）
// ==========================================
pub mod config_keys {
    /// 配置文件路径
    pub const CONFIG_PATH: &str = "JUDICIAL_ASSETS_CONFIG";
    /// 每页卡片数量
    pub const PAGE_SIZE: &str = "JUDICIAL_ASSETS_PAGE_SIZE";
    /// 有效状态取值
    pub const ACTIVE_STATUS: &str = "JUDICIAL_ASSETS_ACTIVE_STATUS";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: DashboardConfig,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用内置默认值
    pub fn with_defaults() -> Self {
        Self {
            config: DashboardConfig::default(),
            source_path: None,
        }
    }

    /// 从指定 JSON 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: DashboardConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        info!(path = %path.display(), "配置文件加载完成");
        Ok(Self {
            config,
            source_path: Some(path.to_path_buf()),
        })
    }

    /// 按优先级加载配置
    ///
    /// 顺序:
    /// 1. 显式路径
    /// 2. 环境变量 JUDICIAL_ASSETS_CONFIG
    /// 3. 用户配置目录下的 judicial-assets/config.json（存在时）
    /// 4. 内置默认值
    ///
    /// 之后应用环境变量覆写并校验
    pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Self> {
        let mut manager = match Self::resolve_path(explicit_path) {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("未找到配置文件,使用默认配置");
                Self::with_defaults()
            }
        };

        manager.apply_env_overrides()?;
        manager.config_validate()?;
        Ok(manager)
    }

    fn resolve_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit_path {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(config_keys::CONFIG_PATH) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        let default_path = get_default_config_path()?;
        if default_path.exists() {
            Some(default_path)
        } else {
            None
        }
    }

    /// 应用环境变量覆写
    fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        if let Ok(value) = std::env::var(config_keys::PAGE_SIZE) {
            let page_size = value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::ValueError {
                    key: config_keys::PAGE_SIZE.to_string(),
                    value: value.clone(),
                })?;
            self.config.page_size = page_size;
        }

        if let Ok(value) = std::env::var(config_keys::ACTIVE_STATUS) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                warn!("{} 为空,忽略", config_keys::ACTIVE_STATUS);
            } else {
                self.config.active_status = trimmed.to_string();
            }
        }

        Ok(())
    }

    fn config_validate(&self) -> ConfigResult<()> {
        validate(&self.config)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn into_config(self) -> DashboardConfig {
        self.config
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

/// 校验配置
///
/// 规则:
/// - 权重非负
/// - 紧迫度上限 > 0
/// - medium_threshold ≤ high_threshold
/// - page_size > 0
/// - 半径区间 radius_min ≤ radius_max
/// - 分位数 0 ≤ low ≤ high ≤ 1
pub fn validate(config: &DashboardConfig) -> ConfigResult<()> {
    let risk = &config.risk;
    if risk.impact_weight < 0.0 || risk.urgency_weight < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "风险权重不能为负: impact={}, urgency={}",
            risk.impact_weight, risk.urgency_weight
        )));
    }
    if risk.urgency_cap_months <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "紧迫度上限必须为正: {}",
            risk.urgency_cap_months
        )));
    }
    if risk.medium_threshold > risk.high_threshold {
        return Err(ConfigError::ValidationError(format!(
            "阈值顺序错误: medium={} > high={}",
            risk.medium_threshold, risk.high_threshold
        )));
    }
    if config.page_size == 0 {
        return Err(ConfigError::ValidationError("page_size 必须大于 0".to_string()));
    }
    if config.attention_duration_factor < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "关注时长系数不能为负: {}",
            config.attention_duration_factor
        )));
    }

    let charts = &config.charts;
    if charts.decay_cap_months <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "衰减月数上限必须为正: {}",
            charts.decay_cap_months
        )));
    }
    if charts.radius_min < 0.0 || charts.radius_default < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "半径不能为负: min={}, default={}",
            charts.radius_min, charts.radius_default
        )));
    }
    if charts.radius_min > charts.radius_max {
        return Err(ConfigError::ValidationError(format!(
            "半径区间错误: min={} > max={}",
            charts.radius_min, charts.radius_max
        )));
    }
    if !(0.0..=1.0).contains(&charts.percentile_low)
        || !(0.0..=1.0).contains(&charts.percentile_high)
        || charts.percentile_low > charts.percentile_high
    {
        return Err(ConfigError::ValidationError(format!(
            "分位数区间错误: low={}, high={}",
            charts.percentile_low, charts.percentile_high
        )));
    }

    Ok(())
}

/// 默认配置文件路径（用户配置目录）
pub fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("judicial-assets").join("config.json"))
}
