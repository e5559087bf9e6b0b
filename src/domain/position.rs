// ==========================================
// 司法资产看板 - 持仓领域模型
// ==========================================
// 职责: 归一化后的单条持仓记录 (Position)
// 红线: 创建后不可变,所有数值字段必须有限
// ==========================================

use crate::domain::types::RawRecord;
use serde::Serialize;
use std::sync::Arc;

// ==========================================
// Position - 归一化持仓
// ==========================================
// 用途: RowNormalizer 输出,过滤/聚合/图表只读
#[derive(Debug, Clone, Serialize)]
pub struct Position {
    // ===== 标识 =====
    pub issuance_id: String, // 发行编号（Emissão）
    pub code: String,        // 业务代码（Codigo），分组键
    pub status: String,      // 状态（Status）
    pub scenario: String,    // 时间场景（Cenário），缺省为哨兵标签

    // ===== 数值 =====
    pub duration_months: f64,      // 期限（月）
    pub multiple: f64,             // 倍数
    pub total_distributed: f64,    // 已分配总额
    pub total_units: f64,          // 代币总数
    pub process_count: f64,        // 案件数
    pub current_face_value: f64,   // 当前面值
    pub portfolio_face_value: f64, // 组合估计面值（影响口径）
    pub estimated_value: f64,      // 预估损失值
    pub real_value: f64,           // 实际价值（EAD 等效）

    // ===== 比例（0-1）=====
    pub backed_fraction: f64,        // 担保比例
    pub distributed_fraction: f64,   // 已分配比例
    pub pp_percent_fraction: f64,    // PP 百分比
    pub participation_fraction: f64, // 参与比例
    pub has_pp: bool,                // 源字段是否显式提供 PP

    // ===== 分阶段风险 =====
    pub possible_bad_value: f64,          // 可能坏账金额
    pub possible_bad_count: f64,          // 可能坏账数量
    pub months_since_closure: Option<f64>, // 距募集结束月数（后端派生）
    pub closure_date: serde_json::Value,  // 募集结束日期（原值，延迟解析）

    // ===== 源记录 =====
    #[serde(skip)]
    pub source: Arc<RawRecord>,
}

impl Position {
    /// 影响口径：组合估计面值 → 当前面值 → 0（取第一个非零值）
    pub fn impact(&self) -> f64 {
        if self.portfolio_face_value != 0.0 {
            self.portfolio_face_value
        } else {
            self.current_face_value
        }
    }

    /// 状态是否为"有效"（大小写不敏感）
    pub fn is_active(&self, active_status: &str) -> bool {
        self.status.to_lowercase() == active_status.to_lowercase()
    }

    /// 图表标签：代码优先，其次发行编号
    pub fn label(&self) -> &str {
        if self.code.is_empty() {
            &self.issuance_id
        } else {
            &self.code
        }
    }

    /// 读取源记录上的原始字段
    pub fn source_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.source.get(key).filter(|v| !v.is_null())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            issuance_id: String::new(),
            code: String::new(),
            status: String::new(),
            scenario: crate::domain::types::NO_SCENARIO_LABEL.to_string(),
            duration_months: 0.0,
            multiple: 0.0,
            total_distributed: 0.0,
            total_units: 0.0,
            process_count: 0.0,
            current_face_value: 0.0,
            portfolio_face_value: 0.0,
            estimated_value: 0.0,
            real_value: 0.0,
            backed_fraction: 0.0,
            distributed_fraction: 0.0,
            pp_percent_fraction: 0.0,
            participation_fraction: 0.0,
            has_pp: false,
            possible_bad_value: 0.0,
            possible_bad_count: 0.0,
            months_since_closure: None,
            closure_date: serde_json::Value::Null,
            source: Arc::new(RawRecord::new()),
        }
    }
}
