// ==========================================
// 司法资产看板 - 字段解析器
// ==========================================
// 职责: 源字段别名 → 标准字段（声明式别名表）
// 规则: 按别名顺序取第一个"存在且非 null"的值
// ==========================================

use crate::domain::types::RawRecord;
use serde_json::Value;

/// 单个标准字段的别名列表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAlias {
    /// 标准字段名
    pub field: &'static str,
    /// 源列名（按优先级排列）
    pub keys: &'static [&'static str],
}

// ==========================================
// 别名表
// ==========================================
// 各导出版本的列名写法并存,表内顺序即优先级
pub mod aliases {
    use super::FieldAlias;

    pub const ISSUANCE_ID: FieldAlias = FieldAlias {
        field: "issuance_id",
        keys: &["Emissão", "Emissao"],
    };
    pub const CODE: FieldAlias = FieldAlias {
        field: "code",
        keys: &["Codigo", "Código"],
    };
    pub const STATUS: FieldAlias = FieldAlias {
        field: "status",
        keys: &["Status"],
    };
    pub const SCENARIO: FieldAlias = FieldAlias {
        field: "scenario",
        keys: &["Cenário", "CENARIO TEMPO"],
    };
    pub const DURATION_MONTHS: FieldAlias = FieldAlias {
        field: "duration_months",
        keys: &["Duration", "MESES"],
    };
    pub const MULTIPLE: FieldAlias = FieldAlias {
        field: "multiple",
        keys: &["Multiplo", "Múltiplo"],
    };
    pub const TOTAL_DISTRIBUTED: FieldAlias = FieldAlias {
        field: "total_distributed",
        keys: &["Total Distribuido", "Total Distribuído"],
    };
    pub const TOTAL_UNITS: FieldAlias = FieldAlias {
        field: "total_units",
        keys: &["Total Tokens"],
    };
    pub const PROCESS_COUNT: FieldAlias = FieldAlias {
        field: "process_count",
        keys: &["Qtd Processos", "Qtdd Processos"],
    };
    pub const CURRENT_FACE_VALUE: FieldAlias = FieldAlias {
        field: "current_face_value",
        keys: &["Valor Atual Face"],
    };
    pub const PORTFOLIO_FACE_VALUE: FieldAlias = FieldAlias {
        field: "portfolio_face_value",
        keys: &["Valor Atual de Face Estimado da Carteira"],
    };
    pub const ESTIMATED_VALUE: FieldAlias = FieldAlias {
        field: "estimated_value",
        keys: &["Valor Estimado"],
    };
    pub const REAL_VALUE: FieldAlias = FieldAlias {
        field: "real_value",
        keys: &["Valor Real"],
    };
    pub const BACKED_FRACTION: FieldAlias = FieldAlias {
        field: "backed_fraction",
        keys: &["% Lastro", "Lastro"],
    };
    pub const DISTRIBUTED_FRACTION: FieldAlias = FieldAlias {
        field: "distributed_fraction",
        keys: &["% Distribuido", "% Distribuído"],
    };
    pub const PP_PERCENT: FieldAlias = FieldAlias {
        field: "pp_percent",
        keys: &["Percentual PP", "PERCENTUAL"],
    };
    pub const PARTICIPATION: FieldAlias = FieldAlias {
        field: "participation",
        keys: &["Participação"],
    };
    pub const POSSIBLE_BAD_VALUE: FieldAlias = FieldAlias {
        field: "possible_bad_value",
        keys: &["Valor Estimado Possivel Ruim"],
    };
    pub const POSSIBLE_BAD_COUNT: FieldAlias = FieldAlias {
        field: "possible_bad_count",
        keys: &["possiveis ruins", "possiveis rui"],
    };
    pub const MONTHS_SINCE_CLOSURE: FieldAlias = FieldAlias {
        field: "months_since_closure",
        keys: &["Meses desde Encerramento"],
    };
    pub const CLOSURE_DATE: FieldAlias = FieldAlias {
        field: "closure_date",
        keys: &["Encerramento"],
    };
    pub const INDIVIDUAL_VALUE: FieldAlias = FieldAlias {
        field: "individual_value",
        keys: &["Valor Individual", "Valor individual"],
    };
    pub const ESTIMATED_FOLDERS: FieldAlias = FieldAlias {
        field: "estimated_folders",
        keys: &["Numero de Pastas Estimado"],
    };

    /// 全部别名（用于测试与诊断）
    pub const ALL: &[FieldAlias] = &[
        ISSUANCE_ID,
        CODE,
        STATUS,
        SCENARIO,
        DURATION_MONTHS,
        MULTIPLE,
        TOTAL_DISTRIBUTED,
        TOTAL_UNITS,
        PROCESS_COUNT,
        CURRENT_FACE_VALUE,
        PORTFOLIO_FACE_VALUE,
        ESTIMATED_VALUE,
        REAL_VALUE,
        BACKED_FRACTION,
        DISTRIBUTED_FRACTION,
        PP_PERCENT,
        PARTICIPATION,
        POSSIBLE_BAD_VALUE,
        POSSIBLE_BAD_COUNT,
        MONTHS_SINCE_CLOSURE,
        CLOSURE_DATE,
        INDIVIDUAL_VALUE,
        ESTIMATED_FOLDERS,
    ];
}

/// 解析字段：返回第一个存在且非 null 的别名值
pub fn resolve<'a>(record: &'a RawRecord, alias: &FieldAlias) -> Option<&'a Value> {
    alias
        .keys
        .iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
}

/// 解析字段,缺失时返回默认值
pub fn resolve_or<'a>(record: &'a RawRecord, alias: &FieldAlias, default: &'a Value) -> &'a Value {
    resolve(record, alias).unwrap_or(default)
}

/// 数据集中是否存在该列（任一记录包含任一别名键,null 也算存在）
pub fn has_column<'a, I>(records: I, alias: &FieldAlias) -> bool
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    records
        .into_iter()
        .any(|r| alias.keys.iter().any(|key| r.contains_key(*key)))
}

/// 值转文本（整数值的浮点不带小数位）
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// 解析文本字段（去首尾空白,缺失为空串）
pub fn resolve_text(record: &RawRecord, alias: &FieldAlias) -> String {
    resolve(record, alias)
        .map(value_to_text)
        .unwrap_or_default()
        .trim()
        .to_string()
}
