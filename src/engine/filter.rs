// ==========================================
// 司法资产看板 - 过滤/查询层
// ==========================================
// 职责: 按查询条件过滤 Position 序列
// 规则:
// - term: 去空白 + 小写,对发行编号/代码/状态做子串匹配
// - scenario / issuance: 精确匹配
// - 空条件恒通过
// 说明: 过滤结果是聚合/分级/图表的唯一输入
// ==========================================

use crate::domain::position::Position;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// ==========================================
// PositionQuery - 查询条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionQuery {
    pub term: String,
    pub scenario: String,
    pub issuance: String,
}

impl PositionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = scenario.into();
        self
    }

    pub fn with_issuance(mut self, issuance: impl Into<String>) -> Self {
        self.issuance = issuance.into();
        self
    }

    /// 是否存在任一有效条件
    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty() || !self.scenario.is_empty() || !self.issuance.is_empty()
    }

    /// 归一化后的检索词
    fn normalized_term(&self) -> String {
        self.term.trim().to_lowercase()
    }

    fn matches_with_term(&self, p: &Position, term: &str) -> bool {
        let term_ok = term.is_empty()
            || p.issuance_id.to_lowercase().contains(term)
            || p.code.to_lowercase().contains(term)
            || p.status.to_lowercase().contains(term);
        let scenario_ok = self.scenario.is_empty() || p.scenario == self.scenario;
        let issuance_ok = self.issuance.is_empty() || p.issuance_id == self.issuance;

        term_ok && scenario_ok && issuance_ok
    }

    /// 单条持仓是否命中
    pub fn matches(&self, p: &Position) -> bool {
        self.matches_with_term(p, &self.normalized_term())
    }
}

// ==========================================
// PositionFilter - 过滤器
// ==========================================
pub struct PositionFilter;

impl PositionFilter {
    #[instrument(skip(positions, query), fields(count = positions.len(), active = query.is_active()))]
    pub fn apply(positions: &[Position], query: &PositionQuery) -> Vec<Position> {
        let term = query.normalized_term();
        let filtered: Vec<Position> = positions
            .iter()
            .filter(|p| query.matches_with_term(p, &term))
            .cloned()
            .collect();

        debug!(matched = filtered.len(), "过滤完成");
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(issuance: &str, code: &str, status: &str, scenario: &str) -> Position {
        Position {
            issuance_id: issuance.to_string(),
            code: code.to_string(),
            status: status.to_string(),
            scenario: scenario.to_string(),
            ..Position::default()
        }
    }

    fn sample() -> Vec<Position> {
        vec![
            pos("EM-01", "X1", "Ativa", "Base"),
            pos("EM-02", "X2", "Encerrada", "Otimista"),
            pos("EM-10", "Y1", "Ativa", "Base"),
        ]
    }

    #[test]
    fn test_empty_query_passes_all() {
        let query = PositionQuery::new();
        assert!(!query.is_active());
        assert_eq!(PositionFilter::apply(&sample(), &query).len(), 3);
    }

    #[test]
    fn test_whitespace_term_is_inactive() {
        let query = PositionQuery::new().with_term("   ");
        assert!(!query.is_active());
        assert_eq!(PositionFilter::apply(&sample(), &query).len(), 3);
    }

    #[test]
    fn test_term_matches_issuance_code_or_status() {
        let data = sample();
        assert_eq!(PositionFilter::apply(&data, &PositionQuery::new().with_term(" em-1")).len(), 1);
        assert_eq!(PositionFilter::apply(&data, &PositionQuery::new().with_term("x")).len(), 2);
        assert_eq!(
            PositionFilter::apply(&data, &PositionQuery::new().with_term("ENCERR")).len(),
            1
        );
    }

    #[test]
    fn test_scenario_and_issuance_are_exact() {
        let data = sample();
        let query = PositionQuery::new().with_scenario("Base");
        assert_eq!(PositionFilter::apply(&data, &query).len(), 2);

        let query = PositionQuery::new().with_scenario("base");
        assert_eq!(PositionFilter::apply(&data, &query).len(), 0);

        let query = PositionQuery::new().with_issuance("EM-1");
        assert_eq!(PositionFilter::apply(&data, &query).len(), 0);

        let query = PositionQuery::new()
            .with_issuance("EM-10")
            .with_scenario("Base")
            .with_term("y");
        let out = PositionFilter::apply(&data, &query);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, "Y1");
    }
}
