// ==========================================
// 司法资产看板 - 核心库
// ==========================================
// 系统定位: 司法资产组合看板的计算核心
// 流水线: 原始记录 → 归一化持仓 → 按代码聚合 → 风险分级 → 卡片/图表/概览
// 红线: 核心阶段为纯函数,不做 I/O,不返回错误（缺省值继续）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 过滤/聚合/分级/图表
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 看板配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 看板接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RawRecord, RiskTier, ScenarioBucket, NO_SCENARIO_LABEL};

// 领域实体
pub use domain::{ChartBundle, CodeSummary, Indicators, OverviewMetrics, Position, RiskAlerts};

// 引擎
pub use engine::{
    ChartBuilder, FilterOptions, GroupAggregator, OverviewCalculator, PositionFilter,
    PositionQuery, RiskClassifier, SortKey,
};

// 导入
pub use importer::{DerivationService, IndicatorBuilder, RowNormalizer, UniversalFileParser};

// 配置
pub use config::{ConfigManager, DashboardConfig};

// API
pub use api::{ApiError, ApiResult, DashboardApi, DashboardState, DashboardView};

// 应用
pub use app::{AppState, LoadedDataset};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "司法资产看板";
