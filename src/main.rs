// ==========================================
// 司法资产看板 - 命令行入口
// ==========================================
// 用法:
//   judicial-assets <数据文件> [--config 路径] [--term 词] [--scenario 场景]
//                   [--issuance 发行] [--sort 排序键] [--page 页码]
//                   [--today YYYY-MM-DD] [--json-log]
// 输出: 看板视图 JSON（stdout）
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use judicial_assets::{logging, AppState, PositionQuery};

/// 命令行参数
#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    query: PositionQuery,
    sort: Option<String>,
    page: Option<usize>,
    today: Option<NaiveDate>,
    json_log: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| anyhow!("参数 {} 缺少取值", name))
        };

        match arg.as_str() {
            "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
            "--term" => cli.query.term = value("--term")?,
            "--scenario" => cli.query.scenario = value("--scenario")?,
            "--issuance" => cli.query.issuance = value("--issuance")?,
            "--sort" => cli.sort = Some(value("--sort")?),
            "--page" => {
                let raw = value("--page")?;
                cli.page = Some(raw.parse().with_context(|| format!("无效页码: {}", raw))?);
            }
            "--today" => {
                let raw = value("--today")?;
                cli.today = Some(
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .with_context(|| format!("无效日期: {}", raw))?,
                );
            }
            "--json-log" => cli.json_log = true,
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => {
                if cli.input.is_some() {
                    bail!("只能指定一个数据文件");
                }
                cli.input = Some(PathBuf::from(other));
            }
        }
    }

    Ok(cli)
}

fn main() -> Result<()> {
    let cli = parse_args()?;

    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", judicial_assets::APP_NAME, judicial_assets::VERSION);

    let input = cli
        .input
        .clone()
        .ok_or_else(|| anyhow!("用法: judicial-assets <数据文件> [选项]"))?;
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let app = AppState::from_config_path(cli.config.as_deref()).context("加载配置失败")?;
    let dataset = app
        .load_file(&input, today)
        .with_context(|| format!("加载数据文件失败: {}", input.display()))?;

    let api = &app.dashboard_api;
    let mut state = app.open_dashboard(dataset);

    if cli.query != PositionQuery::default() {
        state = api.apply_filter(&state, cli.query.clone());
    }
    if let Some(sort) = &cli.sort {
        state = api.set_sort(&state, sort)?;
    }
    if let Some(page) = cli.page {
        state = api.goto_page(&state, page)?;
    }

    let view = api.view(&state, today);
    let json = serde_json::to_string_pretty(&view).context("序列化看板视图失败")?;
    println!("{}", json);
    Ok(())
}
