// ==========================================
// 司法资产看板 - 排序
// ==========================================
// 职责: 自然排序 (数字按数值比较) + 卡片列表排序键
// 规则:
// - 数字段按数值比较 ("A2" < "A10")
// - 文本段大小写/重音不敏感
// - 完全相等时以原始字符串兜底,保证全序
// ==========================================

use crate::domain::summary::CodeSummary;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// ==========================================
// 自然排序
// ==========================================

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(make_chunk(&s[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(make_chunk(&s[start..], prev));
    }
    out
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

/// 去重音 + 小写
fn fold_char(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other.to_lowercase().next().unwrap_or(other),
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.chars().map(fold_char).cmp(b.chars().map(fold_char))
}

/// 数字段按数值比较（不转换为整数,避免溢出）
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// 自然排序比较
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ca = chunks(a);
    let cb = chunks(b);

    for (x, y) in ca.iter().zip(cb.iter()) {
        let ord = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
            // 数字排在文本之前
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
            (Chunk::Text(x), Chunk::Text(y)) => cmp_text(x, y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    ca.len().cmp(&cb.len()).then_with(|| a.cmp(b))
}

/// 原地自然排序
pub fn sort_natural(values: &mut [String]) {
    values.sort_by(|a, b| natural_cmp(a, b));
}

// ==========================================
// SortKey - 卡片排序键
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// 代码自然排序
    #[default]
    #[serde(rename = "default")]
    Default,
    /// PP 百分比降序
    #[serde(rename = "perdas-desc")]
    PpDesc,
    /// 平均期限降序
    #[serde(rename = "duration-desc")]
    DurationDesc,
    /// 担保比例升序
    #[serde(rename = "lastro-asc")]
    BackedAsc,
    /// 预估损失降序
    #[serde(rename = "valor-desc")]
    EstimatedDesc,
    /// 风险等级降序
    #[serde(rename = "risco-desc")]
    RiskDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Default,
        SortKey::PpDesc,
        SortKey::DurationDesc,
        SortKey::BackedAsc,
        SortKey::EstimatedDesc,
        SortKey::RiskDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PpDesc => "perdas-desc",
            SortKey::DurationDesc => "duration-desc",
            SortKey::BackedAsc => "lastro-asc",
            SortKey::EstimatedDesc => "valor-desc",
            SortKey::RiskDesc => "risco-desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if key.is_empty() {
            return Ok(SortKey::Default);
        }
        SortKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| key.to_string())
    }
}

/// 按排序键排序（稳定排序,相等项保持输入顺序）
pub fn sort_summaries(summaries: &mut [CodeSummary], key: SortKey) {
    match key {
        SortKey::Default => summaries.sort_by(|a, b| natural_cmp(&a.code, &b.code)),
        SortKey::PpDesc => summaries.sort_by(|a, b| b.pp_percent_avg.total_cmp(&a.pp_percent_avg)),
        SortKey::DurationDesc => {
            summaries.sort_by(|a, b| b.duration_months_avg.total_cmp(&a.duration_months_avg))
        }
        SortKey::BackedAsc => {
            summaries.sort_by(|a, b| a.backed_fraction_avg.total_cmp(&b.backed_fraction_avg))
        }
        SortKey::EstimatedDesc => {
            summaries.sort_by(|a, b| b.estimated_value_total.total_cmp(&a.estimated_value_total))
        }
        SortKey::RiskDesc => summaries.sort_by(|a, b| b.tier().weight().cmp(&a.tier().weight())),
    }
}
