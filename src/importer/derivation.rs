// ==========================================
// 司法资产看板 - 字段派生服务实现
// ==========================================
// 职责: 加载后按记录派生
// - Encerramento → ISO 日期 (YYYY-MM-DD),无法解析 → null
// - Meses desde Encerramento = (today - Encerramento) 天数 / 30.44
// - 场景列为空 → "Sem Cenário"
// 说明: today 由调用方注入,派生结果可复现
// ==========================================

use crate::domain::types::{RawRecord, NO_SCENARIO_LABEL};
use crate::importer::field_resolver::aliases;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, instrument};

/// 每月平均天数（后端口径）
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Excel 序列日期的最大合法值（9999-12-31）
const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// 宽松日期解析
///
/// 支持:
/// - ISO 日期 / 日期时间 / RFC 3339
/// - dd/mm/yyyy（及带时间）
/// - Excel 序列日期（数值或数值字符串）
pub fn parse_date_flex(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => n.as_f64().and_then(excel_serial_to_date),
        Value::String(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    text.parse::<f64>().ok().and_then(excel_serial_to_date)
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > EXCEL_SERIAL_MAX {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

// ==========================================
// DerivationService - 派生服务
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DerivationService {
    today: NaiveDate,
}

impl DerivationService {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// 距结束日期的月数
    pub fn months_since(&self, date: NaiveDate) -> f64 {
        (self.today - date).num_days() as f64 / DAYS_PER_MONTH
    }

    /// 派生单条记录（原地修改）
    pub fn derive(&self, record: &mut RawRecord) {
        self.derive_closure(record);
        self.derive_scenario(record);
    }

    /// 批量派生
    #[instrument(skip(self, records), fields(count = records.len(), today = %self.today))]
    pub fn derive_all(&self, records: &mut [RawRecord]) {
        let mut parsed_dates = 0usize;
        for record in records.iter_mut() {
            self.derive(record);
            if record
                .get(aliases::MONTHS_SINCE_CLOSURE.keys[0])
                .is_some_and(|v| v.is_number())
            {
                parsed_dates += 1;
            }
        }
        debug!(parsed_dates, "字段派生完成");
    }

    /// 结束日期 → ISO + 距今月数
    ///
    /// 仅当记录含结束日期列时生效,否则保留已有的月数字段
    fn derive_closure(&self, record: &mut RawRecord) {
        let key = match aliases::CLOSURE_DATE
            .keys
            .iter()
            .find(|k| record.contains_key(**k))
        {
            Some(key) => *key,
            None => return,
        };

        let date = record.get(key).and_then(parse_date_flex);
        let months_key = aliases::MONTHS_SINCE_CLOSURE.keys[0];

        match date {
            Some(date) => {
                record.insert(
                    key.to_string(),
                    Value::String(date.format("%Y-%m-%d").to_string()),
                );
                let months = serde_json::Number::from_f64(self.months_since(date))
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                record.insert(months_key.to_string(), months);
            }
            None => {
                record.insert(key.to_string(), Value::Null);
                record.insert(months_key.to_string(), Value::Null);
            }
        }
    }

    /// 空场景 → 哨兵标签
    fn derive_scenario(&self, record: &mut RawRecord) {
        for key in aliases::SCENARIO.keys {
            if let Some(value) = record.get_mut(*key) {
                let blank = match value {
                    Value::Null => true,
                    Value::String(s) => {
                        let t = s.trim();
                        t.is_empty() || t.eq_ignore_ascii_case("nan")
                    }
                    _ => false,
                };
                if blank {
                    *value = Value::String(NO_SCENARIO_LABEL.to_string());
                }
            }
        }
    }
}
