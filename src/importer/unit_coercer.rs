// ==========================================
// 司法资产看板 - 单位转换器
// ==========================================
// 职责: 宽松类型 → 标准数值单位
// - 数值: 非有限/不可解析 → 0
// - 比例: >1 视为百分数 (÷100), <0 → 0
// - 货币文本: "R$ 1.234,56" → 1234.56
// 红线: 全函数,不返回错误
// ==========================================

use serde_json::Value;

/// 严格数值解析（不可解析或非有限 → None）
///
/// - null → 0
/// - bool → 1 / 0
/// - 字符串去首尾空白,空串 → 0
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    if n.is_finite() {
        Some(n)
    } else {
        None
    }
}

/// 数值转换,失败为 0
pub fn to_num(value: &Value) -> f64 {
    to_number(value).unwrap_or(0.0)
}

/// 派生数值的有限性兜底（溢出 / NaN → 0）
pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// 逗号小数写法的严格解析（"1234,5" / "-1.234,56"）
///
/// 必须含小数逗号,整数部分可带 "." 千分位（每组 3 位）;
/// 其他文本（代码、日期、混合文本）→ None
pub fn parse_comma_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let (int_part, frac_part) = unsigned.split_once(',')?;

    if frac_part.is_empty() || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut groups = int_part.split('.');
    let head = groups.next()?;
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits = head.to_string();
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }

    let sign = if trimmed.starts_with('-') { "-" } else { "" };
    format!("{}{}.{}", sign, digits, frac_part)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// 比例归一化（已是数值）
pub fn frac_f64(n: f64) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    if n > 1.0 {
        n / 100.0
    } else if n < 0.0 {
        0.0
    } else {
        n
    }
}

/// 比例转换：接受 0-1（优先）并容忍 0-100
pub fn frac(value: &Value) -> f64 {
    frac_f64(to_num(value))
}

/// 原始值是否为"显式给出的有限数值"
///
/// 用于区分"字段缺失"与"字段为 0"
pub fn is_explicit_number(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) if s.is_empty() => false,
        Some(v) => to_number(v).is_some(),
    }
}

/// 宽松数值解析（货币/本地化文本）
///
/// 规则:
/// - null / 空串 → None
/// - 去除 "R", "$" 与空白
/// - 同时含 "," 与 "." → "." 为千分位, "," 为小数点
/// - 仅含 "," → "," 为小数点
/// - 取最长的合法数值前缀
pub fn to_number_flex(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::Bool(_) => None,
        Value::String(s) => {
            if s.is_empty() {
                return None;
            }
            let mut cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != 'R' && *c != '$' && !c.is_whitespace())
                .collect();
            if cleaned.contains(',') && cleaned.contains('.') {
                cleaned = cleaned.replace('.', "").replacen(',', ".", 1);
            } else {
                cleaned = cleaned.replacen(',', ".", 1);
            }
            parse_float_prefix(&cleaned).filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// 百分比统一为 0-100（≤1 视为比例 ×100）
pub fn to_percent_0_100(value: &Value) -> Option<f64> {
    let n = to_number_flex(value)?;
    if n <= 1.0 {
        Some(n * 100.0)
    } else {
        Some(n)
    }
}

/// 解析字符串开头的十进制浮点数前缀（"12.5abc" → 12.5）
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // 指数部分（必须带数字才计入）
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
