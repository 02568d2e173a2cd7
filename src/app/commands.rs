// ==========================================
// quickLOG 质量模块 - 命令行命令
// ==========================================
// 职责: 解析命令行参数并调用 API, 输出纯文本结果
// ==========================================

use chrono::{Local, NaiveDate};

use crate::api::{
    ApiError, ApiResult, AtpQuery, ComplaintFilter, RecordQuery, ResourceKind,
};
use crate::app::state::AppState;
use crate::domain::environmental::AtpSampleInput;
use crate::domain::thresholds::{RateThresholds, ThresholdConfig};
use crate::domain::types::{SampleTiming, Zone};
use crate::engine::{RateClassifier, SwabClassifier};
use crate::i18n::{rate_status_label, swab_status_label, t};

pub const USAGE: &str = "\
用法: quicklog <命令> [参数]

  login <token>                        保存令牌并登录
  logout                               清除本地令牌
  whoami                               显示当前角色
  complaints [from] [to] [--capa]      投诉列表 (日期 YYYY-MM-DD)
  dashboard                            投诉率趋势
  thresholds <greenMax> <amberMax>     保存投诉率阈值
  classify-rate <rate> <greenMax> <amberMax>
  classify-swab <rlu> <zone>           按后端 ATP 配置判定
  atp-overview [from] [to]             ATP 区域汇总与待复测
  atp-record <locationId> <rlu> <PRE_OP|POST_CLEAN|IN_PROCESS>
  records <kind> [search]              products|orders|inventory|traceability-logs|logs|users|labor-monthly";

/// 命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login(String),
    Logout,
    WhoAmI,
    Complaints(ComplaintFilter),
    Dashboard,
    SaveThresholds(ThresholdConfig),
    ClassifyRate { rate: Option<f64>, thresholds: RateThresholds },
    ClassifySwab { rlu: Option<f64>, zone: Zone },
    AtpOverview(AtpQuery),
    AtpRecord { location_id: i64, rlu: Option<f64>, timing: SampleTiming },
    Records { kind: ResourceKind, query: RecordQuery },
}

impl Command {
    /// 解析参数 (不含程序名)
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let (name, rest) = args.split_first().ok_or_else(|| USAGE.to_string())?;
        match name.as_str() {
            "login" => Ok(Command::Login(arg(rest, 0, "token")?.to_string())),
            "logout" => Ok(Command::Logout),
            "whoami" => Ok(Command::WhoAmI),
            "complaints" => {
                let capa_only = rest.iter().any(|a| a == "--capa");
                let dates: Vec<&String> = rest.iter().filter(|a| !a.starts_with("--")).collect();
                Ok(Command::Complaints(ComplaintFilter {
                    from: dates.first().map(|s| parse_date(s)).transpose()?,
                    to: dates.get(1).map(|s| parse_date(s)).transpose()?,
                    capa_only,
                    ..Default::default()
                }))
            }
            "dashboard" => Ok(Command::Dashboard),
            "thresholds" => Ok(Command::SaveThresholds(ThresholdConfig {
                complaints_per_10k: RateThresholds::new(
                    parse_number(arg(rest, 0, "greenMax")?)?,
                    parse_number(arg(rest, 1, "amberMax")?)?,
                ),
            })),
            "classify-rate" => Ok(Command::ClassifyRate {
                // 非数值的投诉率按缺失处理
                rate: arg(rest, 0, "rate")?.trim().parse().ok(),
                thresholds: RateThresholds::new(
                    parse_number(arg(rest, 1, "greenMax")?)?,
                    parse_number(arg(rest, 2, "amberMax")?)?,
                ),
            }),
            "classify-swab" => Ok(Command::ClassifySwab {
                rlu: AtpSampleInput::parse_rlu(arg(rest, 0, "rlu")?),
                zone: parse_zone(arg(rest, 1, "zone")?)?,
            }),
            "atp-overview" => Ok(Command::AtpOverview(AtpQuery {
                from: rest.first().map(|s| parse_date(s)).transpose()?,
                to: rest.get(1).map(|s| parse_date(s)).transpose()?,
                location_id: None,
            })),
            "atp-record" => Ok(Command::AtpRecord {
                location_id: arg(rest, 0, "locationId")?
                    .parse()
                    .map_err(|_| "locationId 必须为整数".to_string())?,
                rlu: AtpSampleInput::parse_rlu(arg(rest, 1, "rlu")?),
                timing: parse_timing(arg(rest, 2, "timing")?)?,
            }),
            "records" => {
                let kind_raw = arg(rest, 0, "kind")?;
                let kind = ResourceKind::parse(kind_raw)
                    .ok_or_else(|| format!("未知记录种类: {}", kind_raw))?;
                Ok(Command::Records {
                    kind,
                    query: RecordQuery {
                        search: rest.get(1).cloned(),
                        ..Default::default()
                    },
                })
            }
            other => Err(format!("未知命令: {}\n\n{}", other, USAGE)),
        }
    }
}

fn arg<'a>(rest: &'a [String], i: usize, what: &str) -> Result<&'a str, String> {
    rest.get(i)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("缺少参数: {}", what))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("日期格式错误 {}: {}", s, e))
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("不是数值: {}", s))
}

fn parse_zone(s: &str) -> Result<Zone, String> {
    let n: u8 = s.trim().parse().map_err(|_| format!("区域必须为 1-4: {}", s))?;
    Zone::try_from(n)
}

fn parse_timing(s: &str) -> Result<SampleTiming, String> {
    match s.trim().to_uppercase().as_str() {
        "PRE_OP" => Ok(SampleTiming::PreOp),
        "POST_CLEAN" => Ok(SampleTiming::PostClean),
        "IN_PROCESS" => Ok(SampleTiming::InProcess),
        other => Err(format!("未知取样时机: {}", other)),
    }
}

fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.is_finite() => format!("{:.2}", r),
        _ => "—".to_string(),
    }
}

/// 执行命令, 返回输出文本
pub async fn run(state: &mut AppState, command: Command) -> ApiResult<String> {
    match command {
        Command::Login(token) => {
            let session = state.login(&token)?;
            Ok(format!("role={}", session.role))
        }
        Command::Logout => {
            state.logout()?;
            Ok(t("banner.logged_out"))
        }
        Command::WhoAmI => {
            let session = state.require_session()?;
            Ok(format!(
                "role={} subject={}",
                session.role,
                session.subject.as_deref().unwrap_or("-")
            ))
        }
        Command::Complaints(filter) => {
            state.require_session()?;
            let complaints = state.complaint_api.list_complaints(&filter).await?;
            let lines: Vec<String> = complaints
                .iter()
                .map(|c| {
                    format!(
                        "#{}\t{}\t{}\tS{}\tCAPA={}\t{}",
                        c.id,
                        c.complaint_date,
                        c.risk_type,
                        c.severity_level,
                        if c.capa_required { "Y" } else { "N" },
                        c.source
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        }
        Command::Dashboard => {
            state.require_session()?;
            let categories = state.complaint_api.list_categories().await?;
            let dashboard = state.complaint_api.load_dashboard(&categories).await?;
            let mut lines = vec![format!(
                "greenMax={} amberMax={}",
                dashboard.thresholds.complaints_per_10k.green_max,
                dashboard.thresholds.complaints_per_10k.amber_max
            )];
            for p in &dashboard.trend.points {
                lines.push(format!(
                    "{}\t{}\t{}\t{}",
                    p.month,
                    p.complaints,
                    fmt_rate(p.rate),
                    rate_status_label(p.status)
                ));
            }
            for c in &dashboard.trend.categories {
                lines.push(format!("{}\t{}\t{:.0}%", c.label, c.count, c.share * 100.0));
            }
            Ok(lines.join("\n"))
        }
        Command::SaveThresholds(config) => {
            let session = state.require_session()?.clone();
            state.complaint_api.save_thresholds(&session, &config).await?;
            Ok(t("banner.saved"))
        }
        Command::ClassifyRate { rate, thresholds } => {
            let status = RateClassifier::classify(rate, &thresholds);
            Ok(format!("{}\t{}", fmt_rate(rate), rate_status_label(status)))
        }
        Command::ClassifySwab { rlu, zone } => {
            state.require_session()?;
            let rlu = rlu.ok_or_else(|| ApiError::InvalidInput("RLU 读数不是数值".to_string()))?;
            let config = state.environmental_api.load_config().await?;
            let c = SwabClassifier::classify(rlu, zone, &config)?;
            Ok(format!(
                "{}\tthreshold={}",
                swab_status_label(c.status),
                c.threshold_used
            ))
        }
        Command::AtpOverview(query) => {
            state.require_session()?;
            let overview = state.environmental_api.overview(&query).await?;
            let mut lines = Vec::new();
            for (zone, summary) in &overview.zones {
                lines.push(format!(
                    "zone {}\t{}/{} failed\tpass={}",
                    zone,
                    summary.failed,
                    summary.total,
                    fmt_rate(summary.pass_rate().map(|r| r * 100.0))
                ));
            }
            for f in &overview.failures {
                lines.push(format!(
                    "retest #{}\t{}\trlu={}>{}\tdue={}",
                    f.sample_id,
                    f.location_code,
                    f.rlu,
                    f.threshold_used,
                    f.retest_due_at
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string())
                ));
            }
            Ok(lines.join("\n"))
        }
        Command::AtpRecord {
            location_id,
            rlu,
            timing,
        } => {
            let session = state.require_session()?.clone();
            let (locations, config) = futures::try_join!(
                state.environmental_api.list_locations(false),
                state.environmental_api.load_config(),
            )?;
            let input = AtpSampleInput {
                sample_date: Local::now().naive_local(),
                location_id,
                rlu,
                timing,
                notes: None,
            };
            let recorded = state
                .environmental_api
                .record_sample(&session, &input, &locations, &config)
                .await?;
            Ok(format!(
                "#{}\t{}\tthreshold={}{}",
                recorded.sample.id,
                swab_status_label(recorded.classification.status),
                recorded.classification.threshold_used,
                recorded
                    .retest_due_at
                    .map(|d| format!("\tretest by {}", d))
                    .unwrap_or_default()
            ))
        }
        Command::Records { kind, query } => {
            state.require_session()?;
            let records = state.resource_api.list(kind, &query).await?;
            let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
            Ok(lines.join("\n"))
        }
    }
}
