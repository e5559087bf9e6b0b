// ==========================================
// 司法资产看板 - 看板 API
// ==========================================
// 职责: 编排 过滤 → 聚合 → 分级 → 排序 → 分页,并组装看板视图
// 状态: DashboardState 为不可变快照,每个事件返回新快照
//   - 过滤事件: 重建过滤集合与分组,页码重置为 1
//   - 排序事件: 重建分组顺序,页码保持
//   - 翻页事件: 只改页码
// 架构: API 层 → Engine 层（纯计算）
// ==========================================

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::api::error::{validate_page, ApiError, ApiResult};
use crate::config::DashboardConfig;
use crate::domain::chart::ChartBundle;
use crate::domain::indicators::{Indicators, OverviewMetrics, RiskAlerts};
use crate::domain::position::Position;
use crate::domain::summary::CodeSummary;
use crate::domain::types::RiskTier;
use crate::engine::charts::ChartBuilder;
use crate::engine::filter::{PositionFilter, PositionQuery};
use crate::engine::overview::{FilterOptions, OverviewCalculator};
use crate::engine::risk::RiskClassifier;
use crate::engine::sorting::{sort_natural, sort_summaries, SortKey};
use crate::engine::GroupAggregator;

/// 担保比例低于该值（%）时高亮
pub const LOW_BACKING_PCT: f64 = 30.0;

/// PP 高于该值（%）时高亮
pub const HIGH_PP_PCT: f64 = 15.0;

// ==========================================
// DashboardState - 看板状态快照
// ==========================================
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// 快照标识（每个事件生成新值）
    pub snapshot_id: Uuid,
    /// 全量持仓（加载后不变,快照间共享）
    pub base: Arc<Vec<Position>>,
    /// 预聚合指标（仅无过滤时用于概览）
    pub indicators: Option<Arc<Indicators>>,
    pub query: PositionQuery,
    pub sort: SortKey,
    /// 当前页（从 1 开始）
    pub page: usize,
    /// 当前过滤结果
    pub filtered: Arc<Vec<Position>>,
    /// 已分级且已排序的分组
    pub groups: Arc<Vec<CodeSummary>>,
}

impl DashboardState {
    /// 只改页码的后继快照
    fn with_page(&self, page: usize) -> Self {
        Self {
            snapshot_id: Uuid::new_v4(),
            page,
            ..self.clone()
        }
    }

    /// 全体分组的平均期限（关注标记基准）
    pub fn mean_group_duration(&self) -> f64 {
        if self.groups.is_empty() {
            return 0.0;
        }
        self.groups.iter().map(|g| g.duration_months_avg).sum::<f64>() / self.groups.len() as f64
    }
}

// ==========================================
// 视图模型
// ==========================================

/// 分页信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 本页首项序号（从 1 开始,无数据为 0）
    pub first_item: usize,
    /// 本页末项序号
    pub last_item: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let start = page.saturating_sub(1) * page_size;
        let last_item = (start + page_size).min(total_items);
        let first_item = if total_items > 0 && start < total_items {
            start + 1
        } else {
            0
        };

        Self {
            page,
            page_size,
            total_pages,
            total_items,
            first_item,
            last_item,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    /// 本页在分组列表中的下标范围
    fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.page.saturating_sub(1)) * self.page_size).min(self.total_items);
        start..self.last_item.max(start)
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "showing {}-{} of {}",
            self.first_item, self.last_item, self.total_items
        )
    }
}

/// 代码卡片
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub summary: CodeSummary,
    pub tier: RiskTier,
    /// 非分级关注（仅 Low: 无担保 或 期限 > 平均 × 倍数）
    pub attention: bool,
    pub low_backing: bool,
    pub long_duration: bool,
    pub high_pp: bool,
    /// 发行编号（自然排序）
    pub issuances: Vec<String>,
}

/// 看板视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub snapshot_id: Uuid,
    pub query: PositionQuery,
    pub sort: SortKey,
    pub pagination: PageInfo,
    pub pagination_label: String,
    pub cards: Vec<SummaryCard>,
    pub overview: OverviewMetrics,
    pub alerts: RiskAlerts,
    pub charts: ChartBundle,
    pub filter_options: FilterOptions,
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    config: DashboardConfig,
    aggregator: GroupAggregator,
    classifier: RiskClassifier,
    overview: OverviewCalculator,
}

impl DashboardApi {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            aggregator: GroupAggregator::new(config.urgency_proxy.clone()),
            classifier: RiskClassifier::new(config.risk.clone()),
            overview: OverviewCalculator::new(config.active_status.clone()),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// 聚合 → 两阶段分级 → 排序
    fn rebuild_groups(&self, filtered: &[Position], sort: SortKey) -> Vec<CodeSummary> {
        let mut groups = self.aggregator.aggregate(filtered);
        self.classifier.classify_all(&mut groups);
        sort_summaries(&mut groups, sort);
        groups
    }

    /// 总页数
    pub fn total_pages(&self, state: &DashboardState) -> usize {
        state.groups.len().div_ceil(self.config.page_size.max(1))
    }

    // ==========================================
    // 事件
    // ==========================================

    /// 加载完成: 空查询,默认排序,第 1 页
    #[instrument(skip(self, base, indicators), fields(count = base.len()))]
    pub fn initial_state(
        &self,
        base: Vec<Position>,
        indicators: Option<Indicators>,
    ) -> DashboardState {
        let base = Arc::new(base);
        let groups = self.rebuild_groups(&base, SortKey::Default);

        info!(groups = groups.len(), "看板初始化完成");
        DashboardState {
            snapshot_id: Uuid::new_v4(),
            filtered: Arc::clone(&base),
            base,
            indicators: indicators.map(Arc::new),
            query: PositionQuery::default(),
            sort: SortKey::Default,
            page: 1,
            groups: Arc::new(groups),
        }
    }

    /// 过滤事件（页码重置为 1）
    #[instrument(skip(self, state), fields(snapshot = %state.snapshot_id))]
    pub fn apply_filter(&self, state: &DashboardState, query: PositionQuery) -> DashboardState {
        let filtered = PositionFilter::apply(&state.base, &query);
        let groups = self.rebuild_groups(&filtered, state.sort);

        debug!(
            filtered = filtered.len(),
            groups = groups.len(),
            "过滤事件处理完成"
        );
        DashboardState {
            snapshot_id: Uuid::new_v4(),
            base: Arc::clone(&state.base),
            indicators: state.indicators.clone(),
            query,
            sort: state.sort,
            page: 1,
            filtered: Arc::new(filtered),
            groups: Arc::new(groups),
        }
    }

    /// 排序事件
    ///
    /// 空字符串视为默认排序；未知键返回 `InvalidSortKey`
    pub fn set_sort(&self, state: &DashboardState, key: &str) -> ApiResult<DashboardState> {
        let sort: SortKey = key.parse().map_err(ApiError::InvalidSortKey)?;
        Ok(self.with_sort(state, sort))
    }

    /// 排序事件（已解析的排序键）
    pub fn with_sort(&self, state: &DashboardState, sort: SortKey) -> DashboardState {
        let groups = self.rebuild_groups(&state.filtered, sort);
        DashboardState {
            snapshot_id: Uuid::new_v4(),
            sort,
            groups: Arc::new(groups),
            ..state.clone()
        }
    }

    /// 下一页（已是末页时保持不变）
    pub fn next_page(&self, state: &DashboardState) -> DashboardState {
        let page = if state.page < self.total_pages(state) {
            state.page + 1
        } else {
            state.page
        };
        state.with_page(page)
    }

    /// 上一页（已是首页时保持不变）
    pub fn previous_page(&self, state: &DashboardState) -> DashboardState {
        state.with_page(state.page.saturating_sub(1).max(1))
    }

    /// 跳转到指定页
    pub fn goto_page(&self, state: &DashboardState, page: usize) -> ApiResult<DashboardState> {
        validate_page(page, self.total_pages(state))?;
        Ok(state.with_page(page))
    }

    /// 过滤下拉选项（始终来自全量持仓）
    pub fn filter_options(&self, state: &DashboardState) -> FilterOptions {
        FilterOptions::from_positions(&state.base)
    }

    // ==========================================
    // 视图
    // ==========================================

    fn card(&self, summary: &CodeSummary, attention_limit: f64) -> SummaryCard {
        let tier = summary.tier();
        let long_duration = summary.duration_months_avg > attention_limit;
        let mut issuances = summary.issuance_set.clone();
        sort_natural(&mut issuances);

        SummaryCard {
            tier,
            attention: tier == RiskTier::Low && (!summary.has_backed_fraction || long_duration),
            low_backing: summary.backed_fraction_avg < LOW_BACKING_PCT,
            long_duration,
            high_pp: summary.pp_percent_avg > HIGH_PP_PCT,
            issuances,
            summary: summary.clone(),
        }
    }

    /// 组装看板视图
    #[instrument(skip(self, state), fields(snapshot = %state.snapshot_id, page = state.page))]
    pub fn view(&self, state: &DashboardState, today: NaiveDate) -> DashboardView {
        let pagination = PageInfo::new(state.page, self.config.page_size, state.groups.len());
        let attention_limit = state.mean_group_duration() * self.config.attention_duration_factor;

        let cards: Vec<SummaryCard> = state.groups[pagination.range()]
            .iter()
            .map(|g| self.card(g, attention_limit))
            .collect();

        let overview = self.overview.overview(
            &state.filtered,
            state.indicators.as_deref(),
            state.query.is_active(),
        );
        let alerts = self.overview.risk_alerts(&state.filtered);
        let charts = ChartBuilder::new(&self.config).build_all(&state.filtered, today);

        debug!(cards = cards.len(), total = pagination.total_items, "看板视图组装完成");
        DashboardView {
            snapshot_id: state.snapshot_id,
            query: state.query.clone(),
            sort: state.sort,
            pagination_label: pagination.to_string(),
            pagination,
            cards,
            overview,
            alerts,
            charts,
            filter_options: self.filter_options(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicators::{MetricsSource, OverviewIndicators};

    fn pos(code: &str, issuance: &str) -> Position {
        Position {
            code: code.to_string(),
            issuance_id: issuance.to_string(),
            status: "Ativa".to_string(),
            ..Position::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn many(n: usize) -> Vec<Position> {
        (1..=n).map(|i| pos(&format!("C{}", i), "EM-1")).collect()
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::new(1, 12, 30);
        assert_eq!(info.total_pages, 3);
        assert_eq!((info.first_item, info.last_item), (1, 12));
        assert!(!info.has_previous);
        assert!(info.has_next);
        assert_eq!(info.to_string(), "showing 1-12 of 30");

        let info = PageInfo::new(3, 12, 30);
        assert_eq!((info.first_item, info.last_item), (25, 30));
        assert!(info.has_previous);
        assert!(!info.has_next);

        let info = PageInfo::new(1, 12, 0);
        assert_eq!(info.total_pages, 0);
        assert_eq!(info.to_string(), "showing 0-0 of 0");
        assert!(!info.has_next);
    }

    #[test]
    fn test_pagination_events() {
        let api = DashboardApi::new(DashboardConfig::default());
        let state = api.initial_state(many(30), None);
        assert_eq!(api.total_pages(&state), 3);

        let s2 = api.next_page(&state);
        assert_eq!(s2.page, 2);
        assert_ne!(s2.snapshot_id, state.snapshot_id);
        // 原快照不变
        assert_eq!(state.page, 1);

        let s3 = api.next_page(&api.next_page(&s2));
        assert_eq!(s3.page, 3);
        assert_eq!(api.previous_page(&state).page, 1);

        let view = api.view(&s3, today());
        assert_eq!(view.cards.len(), 6);
        assert_eq!(view.cards[0].summary.code, "C25");
        assert_eq!(view.pagination_label, "showing 25-30 of 30");

        assert!(api.goto_page(&state, 2).is_ok());
        assert!(matches!(
            api.goto_page(&state, 4),
            Err(ApiError::InvalidPage { page: 4, total_pages: 3 })
        ));
    }

    #[test]
    fn test_filter_resets_page() {
        let api = DashboardApi::new(DashboardConfig::default());
        let state = api.next_page(&api.initial_state(many(30), None));
        assert_eq!(state.page, 2);

        let filtered = api.apply_filter(&state, PositionQuery::new().with_term("c1"));
        assert_eq!(filtered.page, 1);
        // C1, C10..C19
        assert_eq!(filtered.groups.len(), 11);
        assert_eq!(filtered.base.len(), 30);
    }

    #[test]
    fn test_set_sort() {
        let api = DashboardApi::new(DashboardConfig::default());
        let data = vec![
            Position {
                estimated_value: 5.0,
                ..pos("A1", "EM-1")
            },
            Position {
                estimated_value: 50.0,
                ..pos("A2", "EM-1")
            },
        ];
        let state = api.initial_state(data, None);
        let sorted = api.set_sort(&state, "valor-desc").unwrap();
        assert_eq!(sorted.sort, SortKey::EstimatedDesc);
        assert_eq!(sorted.groups[0].code, "A2");

        assert!(matches!(
            api.set_sort(&state, "bogus"),
            Err(ApiError::InvalidSortKey(_))
        ));
    }

    #[test]
    fn test_card_flags() {
        let api = DashboardApi::new(DashboardConfig::default());
        let data = vec![
            // 无担保 → 关注
            Position {
                duration_months: 10.0,
                ..pos("A1", "EM-10")
            },
            Position {
                duration_months: 10.0,
                backed_fraction: 0.5,
                current_face_value: 1.0,
                ..pos("A2", "EM-2")
            },
            // 期限 40 > 20 × 1.2 → 关注 + 长期限
            Position {
                duration_months: 40.0,
                backed_fraction: 0.1,
                current_face_value: 1.0,
                pp_percent_fraction: 0.2,
                real_value: 1.0,
                ..pos("A3", "EM-3")
            },
            Position {
                issuance_id: "EM-2".to_string(),
                ..pos("A1", "")
            },
        ];
        let state = api.initial_state(data, None);
        let view = api.view(&state, today());
        let by_code = |c: &str| view.cards.iter().find(|k| k.summary.code == c).unwrap();

        let a1 = by_code("A1");
        assert_eq!(a1.issuances, vec!["EM-2", "EM-10"]);
        assert!(a1.low_backing);

        let a2 = by_code("A2");
        assert!(!a2.low_backing);
        assert!(!a2.long_duration);

        let a3 = by_code("A3");
        assert!(a3.long_duration);
        assert!(a3.low_backing);
        assert!(a3.high_pp);
        if a3.tier == RiskTier::Low {
            assert!(a3.attention);
        }
        // 分级徽章优先于关注标记
        for card in &view.cards {
            if card.tier != RiskTier::Low {
                assert!(!card.attention);
            }
        }
    }

    #[test]
    fn test_overview_source_follows_filter() {
        let api = DashboardApi::new(DashboardConfig::default());
        let indicators = Indicators {
            overview: OverviewIndicators {
                record_count: Some(999),
                ..OverviewIndicators::default()
            },
            ..Indicators::default()
        };
        let state = api.initial_state(many(3), Some(indicators));

        let view = api.view(&state, today());
        assert_eq!(view.overview.source, MetricsSource::PreAggregated);
        assert_eq!(view.overview.record_count, 999);

        let filtered = api.apply_filter(&state, PositionQuery::new().with_term("C2"));
        let view = api.view(&filtered, today());
        assert_eq!(view.overview.source, MetricsSource::Computed);
        assert_eq!(view.overview.record_count, 1);
        // 下拉选项来自全量
        assert_eq!(view.filter_options.codes.len(), 3);
    }
}
