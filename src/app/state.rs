// ==========================================
// 司法资产看板 - 应用状态
// ==========================================
// 职责: 管理看板配置与 API 实例,串联加载流水线
// 流水线: 文件解析 → 字段派生 → 行归一化 → 预聚合指标 → 初始快照
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::api::{ApiResult, DashboardApi, DashboardState};
use crate::config::{ConfigManager, DashboardConfig};
use crate::domain::indicators::Indicators;
use crate::domain::position::Position;
use crate::domain::types::RawRecord;
use crate::importer::{DerivationService, IndicatorBuilder, RowNormalizer, UniversalFileParser};

/// 加载完成的数据集
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub positions: Vec<Position>,
    pub indicators: Indicators,
}

/// 应用状态
///
/// 持有配置和看板 API；看板状态本身由调用方以快照形式持有
pub struct AppState {
    pub config: DashboardConfig,
    pub dashboard_api: Arc<DashboardApi>,
    normalizer: RowNormalizer,
    indicator_builder: IndicatorBuilder,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dashboard_api: Arc::new(DashboardApi::new(config.clone())),
            normalizer: RowNormalizer::new(),
            indicator_builder: IndicatorBuilder::new(config.active_status.clone()),
            config,
        }
    }

    /// 按配置查找顺序加载配置后创建
    pub fn from_config_path(config_path: Option<&Path>) -> ApiResult<Self> {
        let manager = ConfigManager::load(config_path)?;
        if let Some(path) = manager.source_path() {
            info!(path = %path.display(), "使用配置文件");
        }
        Ok(Self::new(manager.into_config()))
    }

    /// 内存记录 → 数据集
    #[instrument(skip(self, records), fields(count = records.len(), today = %today))]
    pub fn prepare_records(&self, mut records: Vec<RawRecord>, today: NaiveDate) -> LoadedDataset {
        DerivationService::new(today).derive_all(&mut records);
        let positions = self.normalizer.normalize_all(records);
        let indicators = self.indicator_builder.build(&positions);

        info!(positions = positions.len(), "数据集准备完成");
        LoadedDataset {
            positions,
            indicators,
        }
    }

    /// 文件 → 数据集
    pub fn load_file<P: AsRef<Path>>(&self, path: P, today: NaiveDate) -> ApiResult<LoadedDataset> {
        let records = UniversalFileParser.parse(path)?;
        Ok(self.prepare_records(records, today))
    }

    /// 数据集 → 看板初始快照
    pub fn open_dashboard(&self, dataset: LoadedDataset) -> DashboardState {
        self.dashboard_api
            .initial_state(dataset.positions, Some(dataset.indicators))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_prepare_records_derives_closure_months() {
        let state = AppState::default();
        let today = NaiveDate::from_ymd_opt(2024, 4, 14).unwrap();
        let records = vec![record(json!({
            "Codigo": "A1",
            "Status": "Ativa",
            "Encerramento": "14/01/2024",
            "Cenário": "  ",
            "Valor Atual Face": 100
        }))];

        let dataset = state.prepare_records(records, today);
        let p = &dataset.positions[0];
        assert_eq!(p.closure_date, json!("2024-01-14"));
        assert!((p.months_since_closure.unwrap() - 91.0 / 30.44).abs() < 1e-9);
        assert_eq!(p.scenario, crate::domain::types::NO_SCENARIO_LABEL);
        assert_eq!(dataset.indicators.overview.record_count, Some(1));
    }

    #[test]
    fn test_load_file_missing() {
        let state = AppState::default();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let result = state.load_file("/definitely/not/here.csv", today);
        assert!(matches!(result, Err(ApiError::Import(_))));
    }

    #[test]
    fn test_open_dashboard() {
        let state = AppState::default();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = vec![
            record(json!({"Codigo": "A2", "Status": "Ativa"})),
            record(json!({"Codigo": "A10", "Status": "Ativa"})),
        ];
        let dashboard = state.open_dashboard(state.prepare_records(records, today));
        let codes: Vec<&str> = dashboard.groups.iter().map(|g| g.code.as_str()).collect();
        assert_eq!(codes, vec!["A2", "A10"]);
        assert!(dashboard.indicators.is_some());
    }
}
