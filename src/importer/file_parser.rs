// ==========================================
// 司法资产看板 - 文件解析器实现
// ==========================================
// 职责: 文件 → Vec<RawRecord>（无模式保证）
// 支持: Excel (.xlsx/.xls, 首个工作表) / CSV (.csv) / JSON (.json, 对象数组)
// 规则: 表头去空白,空单元格 → null,完全空白行跳过
// ==========================================

use crate::domain::types::RawRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::unit_coercer::parse_comma_decimal;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, instrument};

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    /// 解析文件为原始记录
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 文本单元格 → Value（去空白,空串 → null）
fn text_cell(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

/// 逗号小数单元格 → 数值,其余同 `text_cell`
fn locale_cell(value: &str) -> Value {
    parse_comma_decimal(value)
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| text_cell(value))
}

fn is_blank_row(row: &RawRecord) -> bool {
    row.values().all(|v| v.is_null())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 分隔符探测: 首行 ';' 多于 ',' 时使用 ';'
    fn sniff_delimiter(path: &Path) -> ImportResult<u8> {
        let mut first_line = String::new();
        BufReader::new(File::open(path)?).read_line(&mut first_line)?;
        let semicolons = first_line.matches(';').count();
        let commas = first_line.matches(',').count();
        Ok(if semicolons > commas { b';' } else { b',' })
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let delimiter = Self::sniff_delimiter(file_path)?;
        // ';' 分隔的导出使用逗号小数
        let cell: fn(&str) -> Value = if delimiter == b';' {
            locale_cell
        } else {
            text_cell
        };
        debug!(delimiter = %(delimiter as char), "CSV 分隔符");

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = RawRecord::new();

            for (col_idx, value) in record.iter().enumerate() {
                match headers.get(col_idx) {
                    Some(header) if !header.is_empty() => {
                        row.insert(header.clone(), cell(value));
                    }
                    _ => {}
                }
            }

            if is_blank_row(&row) {
                continue;
            }
            records.push(row);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格 → Value（保留数值类型）
    fn cell_value(cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Null,
            Data::String(s) => text_cell(s),
            Data::Int(i) => Value::from(*i),
            Data::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Data::Bool(b) => Value::Bool(*b),
            // 日期单元格等: 保留文本形式,由派生服务再解析
            other => text_cell(&other.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => return Ok(Vec::new()),
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let mut row = RawRecord::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                match headers.get(col_idx) {
                    Some(header) if !header.is_empty() => {
                        row.insert(header.clone(), Self::cell_value(cell));
                    }
                    _ => {}
                }
            }

            if is_blank_row(&row) {
                continue;
            }
            records.push(row);
        }

        Ok(records)
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
// 格式: 顶层为对象数组
pub struct JsonParser;

impl FileParser for JsonParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;

        let items = match value {
            Value::Array(items) => items,
            _ => {
                return Err(ImportError::JsonParseError(
                    "顶层必须是对象数组".to_string(),
                ))
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => {
                    // 键同样去空白
                    let row: RawRecord = map
                        .into_iter()
                        .map(|(k, v)| (k.trim().to_string(), v))
                        .collect();
                    if !is_blank_row(&row) {
                        records.push(row);
                    }
                }
                other => {
                    return Err(ImportError::RecordShapeError {
                        row: idx + 1,
                        message: format!("期望对象,实际为 {}", json_kind(&other)),
                    })
                }
            }
        }

        Ok(records)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        ensure_exists(path)?;

        let ext = extension_of(path);
        debug!(ext = %ext, "选择解析器");

        let records = match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path)?,
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path)?,
            "json" => JsonParser.parse_to_raw_records(path)?,
            _ => return Err(ImportError::UnsupportedFormat(ext)),
        };

        info!(rows = records.len(), "文件解析完成");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_with_suffix(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = temp_with_suffix(
            ".csv",
            " Codigo ,Status,Valor Atual Face\nX1, Ativa ,1000\n,,\nX2,Ativa,\n",
        );

        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();
        assert_eq!(records.len(), 2); // 空白行被跳过
        assert_eq!(records[0].get("Codigo"), Some(&json!("X1")));
        assert_eq!(records[0].get("Status"), Some(&json!("Ativa")));
        assert_eq!(records[0].get("Valor Atual Face"), Some(&json!("1000")));
        assert_eq!(records[1].get("Valor Atual Face"), Some(&Value::Null));
    }

    #[test]
    fn test_csv_parser_semicolon_delimiter() {
        let file = temp_with_suffix(
            ".csv",
            "Codigo;Valor Real;Valor Atual Face;Encerramento\nA1;1234,5;1.000,25;01/06/2023\n",
        );
        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Codigo"), Some(&json!("A1")));
        assert_eq!(records[0].get("Valor Real"), Some(&json!(1234.5)));
        assert_eq!(records[0].get("Valor Atual Face"), Some(&json!(1000.25)));
        assert_eq!(records[0].get("Encerramento"), Some(&json!("01/06/2023")));
    }

    #[test]
    fn test_csv_parser_comma_delimiter_keeps_text() {
        let file = temp_with_suffix(".csv", "Codigo,Valor Real\nA1,\"1234,5\"\n");
        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();
        assert_eq!(records[0].get("Valor Real"), Some(&json!("1234,5")));
    }

    #[test]
    fn test_csv_parser_wrong_extension() {
        let file = temp_with_suffix(".txt", "a,b\n1,2\n");
        let result = CsvParser.parse_to_raw_records(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_json_parser_array_of_objects() {
        let file = temp_with_suffix(
            ".json",
            r#"[{"Codigo": "A1", "Valor Estimado": 10.5}, {" Status ": "Ativa"}, {}]"#,
        );
        let records = JsonParser.parse_to_raw_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Valor Estimado"), Some(&json!(10.5)));
        assert_eq!(records[1].get("Status"), Some(&json!("Ativa")));
    }

    #[test]
    fn test_json_parser_rejects_non_object_rows() {
        let file = temp_with_suffix(".json", r#"[{"Codigo": "A1"}, 3]"#);
        let result = JsonParser.parse_to_raw_records(file.path());
        assert!(matches!(
            result,
            Err(ImportError::RecordShapeError { row: 2, .. })
        ));
    }

    #[test]
    fn test_json_parser_rejects_top_level_object() {
        let file = temp_with_suffix(".json", r#"{"Codigo": "A1"}"#);
        let result = JsonParser.parse_to_raw_records(file.path());
        assert!(matches!(result, Err(ImportError::JsonParseError(_))));
    }

    #[test]
    fn test_excel_cell_mapping() {
        assert_eq!(ExcelParser::cell_value(&Data::Empty), Value::Null);
        assert_eq!(ExcelParser::cell_value(&Data::Int(7)), json!(7));
        assert_eq!(ExcelParser::cell_value(&Data::Float(1.5)), json!(1.5));
        assert_eq!(
            ExcelParser::cell_value(&Data::String("  X1 ".to_string())),
            json!("X1")
        );
        assert_eq!(ExcelParser::cell_value(&Data::Bool(true)), json!(true));
    }

    #[test]
    fn test_universal_parser_dispatch() {
        let parser = UniversalFileParser;

        let file = temp_with_suffix(".csv", "Codigo\nA1\n");
        assert_eq!(parser.parse(file.path()).unwrap().len(), 1);

        let file = temp_with_suffix(".parquet", "x");
        assert!(matches!(
            parser.parse(file.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            parser.parse("/non/existent/file.csv"),
            Err(ImportError::FileNotFound(_))
        ));
    }
}
