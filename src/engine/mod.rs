// ==========================================
// 司法资产看板 - 引擎层
// ==========================================
// 职责: 过滤 → 聚合 → 分级 → 排序 / 概览 / 图表
// 红线: 纯计算,不做 I/O；每次事件整体重建派生视图
// ==========================================

pub mod aggregator;
pub mod charts;
pub mod filter;
pub mod overview;
pub mod risk;
pub mod sorting;
pub mod urgency;

// 重导出核心引擎
pub use aggregator::{weighted_avg, GroupAggregator};
pub use charts::ChartBuilder;
pub use filter::{PositionFilter, PositionQuery};
pub use overview::{FilterOptions, OverviewCalculator};
pub use risk::RiskClassifier;
pub use sorting::{natural_cmp, sort_natural, sort_summaries, SortKey};
pub use urgency::urgency_proxy;
