// ==========================================
// 司法资产看板 - API 层
// ==========================================
// 职责: 提供看板业务接口,供命令行/宿主界面调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{
    DashboardApi, DashboardState, DashboardView, PageInfo, SummaryCard, HIGH_PP_PCT,
    LOW_BACKING_PCT,
};
pub use error::{validate_page, ApiError, ApiResult};
