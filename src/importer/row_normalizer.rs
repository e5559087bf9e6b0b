// ==========================================
// 司法资产看板 - 行归一化器
// ==========================================
// 职责: RawRecord → Position（全函数,永不失败）
// 流程: 别名解析 → 单位转换 → 派生字段 (real_value / has_pp)
// ==========================================

use crate::domain::position::Position;
use crate::domain::types::{RawRecord, NO_SCENARIO_LABEL};
use crate::importer::field_resolver::{aliases, resolve, resolve_text, FieldAlias};
use crate::importer::unit_coercer::{
    finite_or_zero, frac, is_explicit_number, to_num, to_number,
};
use std::sync::Arc;
use tracing::{debug, instrument};

// ==========================================
// RowNormalizer - 行归一化器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct RowNormalizer;

impl RowNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 归一化单条记录
    pub fn normalize(&self, raw: &RawRecord) -> Position {
        self.normalize_shared(Arc::new(raw.clone()))
    }

    /// 批量归一化（消费原始记录,避免复制）
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn normalize_all(&self, records: Vec<RawRecord>) -> Vec<Position> {
        let positions: Vec<Position> = records
            .into_iter()
            .map(|r| self.normalize_shared(Arc::new(r)))
            .collect();
        debug!(positions = positions.len(), "记录归一化完成");
        positions
    }

    fn normalize_shared(&self, raw: Arc<RawRecord>) -> Position {
        let record = raw.as_ref();

        // ===== 文本字段 =====
        let scenario = match resolve_text(record, &aliases::SCENARIO) {
            s if s.is_empty() => NO_SCENARIO_LABEL.to_string(),
            s => s,
        };

        // ===== 比例字段 =====
        let backed_fraction = fraction(record, &aliases::BACKED_FRACTION);
        let current_face_value = number(record, &aliases::CURRENT_FACE_VALUE);

        // real_value: 显式正值优先,否则由已转换的担保比例推算（溢出 → 0）
        let explicit_real = number(record, &aliases::REAL_VALUE);
        let real_value = if explicit_real > 0.0 {
            explicit_real
        } else {
            finite_or_zero(backed_fraction * current_face_value)
        };

        let months_since_closure = resolve(record, &aliases::MONTHS_SINCE_CLOSURE)
            .filter(|v| is_explicit_number(Some(*v)))
            .and_then(to_number);

        Position {
            issuance_id: resolve_text(record, &aliases::ISSUANCE_ID),
            code: resolve_text(record, &aliases::CODE),
            status: resolve_text(record, &aliases::STATUS),
            scenario,
            duration_months: number(record, &aliases::DURATION_MONTHS),
            multiple: number(record, &aliases::MULTIPLE),
            total_distributed: number(record, &aliases::TOTAL_DISTRIBUTED),
            total_units: number(record, &aliases::TOTAL_UNITS),
            process_count: number(record, &aliases::PROCESS_COUNT),
            current_face_value,
            portfolio_face_value: number(record, &aliases::PORTFOLIO_FACE_VALUE),
            estimated_value: number(record, &aliases::ESTIMATED_VALUE),
            real_value,
            backed_fraction,
            distributed_fraction: fraction(record, &aliases::DISTRIBUTED_FRACTION),
            pp_percent_fraction: fraction(record, &aliases::PP_PERCENT),
            participation_fraction: fraction(record, &aliases::PARTICIPATION),
            has_pp: is_explicit_number(resolve(record, &aliases::PP_PERCENT)),
            possible_bad_value: number(record, &aliases::POSSIBLE_BAD_VALUE),
            possible_bad_count: number(record, &aliases::POSSIBLE_BAD_COUNT),
            months_since_closure,
            closure_date: resolve(record, &aliases::CLOSURE_DATE)
                .cloned()
                .unwrap_or(serde_json::Value::Null),
            source: raw.clone(),
        }
    }
}

fn number(record: &RawRecord, alias: &FieldAlias) -> f64 {
    resolve(record, alias).map(to_num).unwrap_or(0.0)
}

fn fraction(record: &RawRecord, alias: &FieldAlias) -> f64 {
    resolve(record, alias).map(frac).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_empty_record_defaults() {
        let p = RowNormalizer::new().normalize(&RawRecord::new());
        assert_eq!(p.code, "");
        assert_eq!(p.scenario, NO_SCENARIO_LABEL);
        assert_eq!(p.real_value, 0.0);
        assert!(!p.has_pp);
        assert_eq!(p.months_since_closure, None);
        assert!(p.closure_date.is_null());
    }

    #[test]
    fn test_normalize_trims_and_stringifies() {
        let p = RowNormalizer::new().normalize(&record(json!({
            "Emissão": 123,
            "Codigo": "  X1 ",
            "Status": " Ativa",
            "Cenário": "   "
        })));
        assert_eq!(p.issuance_id, "123");
        assert_eq!(p.code, "X1");
        assert_eq!(p.status, "Ativa");
        assert_eq!(p.scenario, NO_SCENARIO_LABEL);
    }

    #[test]
    fn test_real_value_fallback_uses_coerced_fraction() {
        // 50 → 0.5
        let p = RowNormalizer::new().normalize(&record(json!({
            "% Lastro": 50,
            "Valor Atual Face": 1000
        })));
        assert_eq!(p.backed_fraction, 0.5);
        assert_eq!(p.real_value, 500.0);
    }

    #[test]
    fn test_real_value_explicit_positive_wins() {
        let p = RowNormalizer::new().normalize(&record(json!({
            "% Lastro": 0.5,
            "Valor Atual Face": 1000,
            "Valor Real": 42
        })));
        assert_eq!(p.real_value, 42.0);

        let p = RowNormalizer::new().normalize(&record(json!({
            "% Lastro": 0.5,
            "Valor Atual Face": 1000,
            "Valor Real": 0
        })));
        assert_eq!(p.real_value, 500.0);
    }

    #[test]
    fn test_has_pp_distinguishes_zero_from_absent() {
        let n = RowNormalizer::new();
        assert!(n.normalize(&record(json!({"Percentual PP": 0}))).has_pp);
        assert!(n.normalize(&record(json!({"PERCENTUAL": "12"}))).has_pp);
        assert!(!n.normalize(&record(json!({"Percentual PP": ""}))).has_pp);
        assert!(!n.normalize(&record(json!({"Percentual PP": null}))).has_pp);
        assert!(!n.normalize(&record(json!({"Percentual PP": "abc"}))).has_pp);
    }

    #[test]
    fn test_non_finite_and_garbage_become_zero() {
        let p = RowNormalizer::new().normalize(&record(json!({
            "Duration": "NaN",
            "Multiplo": "abc",
            "Total Tokens": "Infinity",
            "Valor Estimado": [1, 2]
        })));
        assert_eq!(p.duration_months, 0.0);
        assert_eq!(p.multiple, 0.0);
        assert_eq!(p.total_units, 0.0);
        assert_eq!(p.estimated_value, 0.0);
    }

    #[test]
    fn test_months_since_closure_optional() {
        let n = RowNormalizer::new();
        let p = n.normalize(&record(json!({"Meses desde Encerramento": 7.5})));
        assert_eq!(p.months_since_closure, Some(7.5));
        let p = n.normalize(&record(json!({"Meses desde Encerramento": ""})));
        assert_eq!(p.months_since_closure, None);
    }

    #[test]
    fn test_normalize_all_keeps_source() {
        let records = vec![record(json!({"Codigo": "A", "extra": "kept"}))];
        let positions = RowNormalizer::new().normalize_all(records);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].source_value("extra"), Some(&json!("kept")));
    }

    #[test]
    fn test_extreme_values_stay_finite() {
        let p = RowNormalizer::new().normalize(&record(json!({
            "Valor Atual Face": 1e300,
            "% Lastro": 1e300,
            "Valor Estimado": "1e999",
            "Duration": f64::MAX
        })));

        // 1e298 × 1e300 溢出
        assert_eq!(p.real_value, 0.0);
        assert_eq!(p.current_face_value, 1e300);
        assert_eq!(p.estimated_value, 0.0);
        assert_eq!(p.duration_months, f64::MAX);
        for n in [
            p.real_value,
            p.backed_fraction,
            p.current_face_value,
            p.estimated_value,
            p.duration_months,
            p.impact(),
        ] {
            assert!(n.is_finite());
        }
    }
}
