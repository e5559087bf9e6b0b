// ==========================================
// 司法资产看板 - 应用层
// ==========================================
// 职责: 装配配置、导入流水线与看板 API
// ==========================================

pub mod state;

// 重导出
pub use state::{AppState, LoadedDataset};
