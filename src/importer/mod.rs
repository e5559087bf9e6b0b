// ==========================================
// 司法资产看板 - 导入层
// ==========================================
// 职责: 外部数据导入,生成归一化持仓
// 流程: 文件解析 → 字段派生 → 行归一化 → 预聚合指标
// 支持: Excel, CSV, JSON
// ==========================================

// 模块声明
pub mod derivation;
pub mod error;
pub mod field_resolver;
pub mod file_parser;
pub mod indicators;
pub mod row_normalizer;
pub mod unit_coercer;

// 重导出核心类型
pub use derivation::{parse_date_flex, DerivationService};
pub use error::{ImportError, ImportResult};
pub use field_resolver::{aliases, resolve, resolve_text, FieldAlias};
pub use file_parser::{CsvParser, ExcelParser, FileParser, JsonParser, UniversalFileParser};
pub use indicators::IndicatorBuilder;
pub use row_normalizer::RowNormalizer;
