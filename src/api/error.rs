// ==========================================
// 司法资产看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,把导入/配置错误转换为用户可读的消息
// 说明: 核心计算阶段不产生错误,错误只出现在边界
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效页码: page={page}, total_pages={total_pages}")]
    InvalidPage { page: usize, total_pages: usize },

    #[error("无效排序键: {0}")]
    InvalidSortKey(String),

    // ==========================================
    // 边界错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 输入校验辅助函数
// ==========================================

/// 校验页码
///
/// 页码从 1 开始；无数据时只允许第 1 页
pub fn validate_page(page: usize, total_pages: usize) -> ApiResult<()> {
    if page == 0 || page > total_pages.max(1) {
        Err(ApiError::InvalidPage { page, total_pages })
    } else {
        Ok(())
    }
}
