// ==========================================
// AppState / 令牌存储 / 命令分发 测试
// ==========================================

mod helpers;

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use helpers::mock_transport::{session_factory, MockTransport};
use helpers::test_data_builder::{complaint_json, token_for};
use quicklog_quality::api::endpoints;
use quicklog_quality::api::{ApiError, Method, RecordQuery, ResourceKind};
use quicklog_quality::app::{run, AppState, Command};
use quicklog_quality::config::ClientConfig;
use quicklog_quality::domain::UserRole;
use quicklog_quality::repository::TokenRepository;

struct Env {
    _dir: TempDir,
    config: ClientConfig,
    token_repo: Arc<TokenRepository>,
    transport: Arc<MockTransport>,
}

fn env() -> Env {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session.db").to_string_lossy().to_string();
    let config = ClientConfig {
        token_db_path: db_path.clone(),
        ..Default::default()
    };
    Env {
        token_repo: Arc::new(TokenRepository::new(&db_path).unwrap()),
        transport: Arc::new(MockTransport::new()),
        config,
        _dir: dir,
    }
}

fn state(env: &Env) -> AppState {
    AppState::with_transport(env.config.clone(), env.token_repo.clone(), env.transport.clone())
        .unwrap()
}

#[test]
fn test_token_persists_across_restarts() {
    let env = env();
    let mut first = state(&env);
    assert!(first.session.is_none());

    let session = first.login(&token_for("manager", "u-17")).unwrap();
    assert_eq!(session.role, UserRole::Manager);

    // 同一存储文件重新打开即恢复会话
    let reopened = TokenRepository::new(&env.config.token_db_path).unwrap();
    let second =
        AppState::with_transport(env.config.clone(), Arc::new(reopened), env.transport.clone())
            .unwrap();
    let restored = second.require_session().unwrap();
    assert_eq!(restored.role, UserRole::Manager);
    assert_eq!(restored.subject.as_deref(), Some("u-17"));
}

#[test]
fn test_logout_clears_token() {
    let env = env();
    env.token_repo.save(&token_for("OPERATOR", "u-1")).unwrap();

    let mut app = state(&env);
    assert!(app.require_session().is_ok());

    app.logout().unwrap();
    assert!(matches!(
        app.require_session(),
        Err(ApiError::Unauthorized(_))
    ));
    assert_eq!(env.token_repo.load().unwrap(), None);
    assert_eq!(app.visible_banners().len(), 1);
}

#[test]
fn test_garbage_token_treated_as_logged_out() {
    let env = env();
    env.token_repo.save("not-a-jwt").unwrap();

    let mut app = state(&env);
    assert!(app.session.is_none());
    assert!(app.login("still.not").is_err());
}

#[tokio::test]
async fn test_commands_require_session() {
    let env = env();
    let mut app = state(&env);

    let err = run(&mut app, Command::parse(&["complaints".to_string()]).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    app.report(&err);
    assert_eq!(app.visible_banners().len(), 1);
    assert!(env.transport.requests().is_empty());
}

#[tokio::test]
async fn test_complaints_command_lists_newest_first() {
    let env = env();
    env.token_repo.save(&token_for("VIEWER", "u-2")).unwrap();
    env.transport.respond(
        Method::Get,
        endpoints::COMPLAINTS,
        json!([
            complaint_json(1, chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(), 1, false),
            complaint_json(2, chrono::NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(), 3, true),
        ]),
    );

    let mut app = state(&env);
    let output = run(&mut app, Command::parse(&["complaints".to_string()]).unwrap())
        .await
        .unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#2"));
    assert!(lines[0].contains("CAPA=Y"));
}

#[tokio::test]
async fn test_classify_rate_works_offline() {
    let env = env();
    let mut app = state(&env);

    let args: Vec<String> = ["classify-rate", "1.5", "1", "2"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let output = run(&mut app, Command::parse(&args).unwrap()).await.unwrap();
    assert!(output.starts_with("1.50"));
    assert!(env.transport.requests().is_empty());
}

#[tokio::test]
async fn test_logout_stops_sending_token() {
    let env = env();
    let token = token_for("OPERATOR", "u-5");
    env.token_repo.save(&token).unwrap();
    env.transport
        .respond(Method::Get, endpoints::COMPLAINT_CATEGORIES, json!([]));

    let mut app = AppState::with_transport_factory(
        env.config.clone(),
        env.token_repo.clone(),
        session_factory(env.transport.clone()),
    )
    .unwrap();

    app.complaint_api.list_categories().await.unwrap();
    app.logout().unwrap();
    app.complaint_api.list_categories().await.unwrap();
    app.environmental_api.list_locations(false).await.ok();
    app.resource_api
        .list(ResourceKind::Products, &RecordQuery::default())
        .await
        .ok();

    let requests = env.transport.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].bearer, Some(format!("Bearer {}", token)));
    assert!(requests[1..].iter().all(|r| r.bearer.is_none()));
}

#[tokio::test]
async fn test_login_keeps_injected_transport() {
    let env = env();
    env.transport
        .respond(Method::Get, endpoints::COMPLAINT_CATEGORIES, json!([]));

    let mut app = AppState::with_transport_factory(
        env.config.clone(),
        env.token_repo.clone(),
        session_factory(env.transport.clone()),
    )
    .unwrap();

    let token = token_for("ADMIN", "u-9");
    app.login(&token).unwrap();
    app.complaint_api.list_categories().await.unwrap();

    let requests = env.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer, Some(format!("Bearer {}", token)));
}

#[test]
fn test_oversized_banner_ttl_does_not_panic() {
    let mut env = env();
    env.config.banner_ttl_secs = u64::MAX;
    let app = state(&env);

    app.report(&ApiError::Transport("connection refused".to_string()));
    assert_eq!(app.visible_banners().len(), 1);
}
