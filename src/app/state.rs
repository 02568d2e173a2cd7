// ==========================================
// quickLOG 质量模块 - 应用状态
// ==========================================
// 职责: 管理应用级共享资源与 API 实例
// 会话对象显式持有, 需要鉴权的调用由此传入
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::api::{
    ApiError, ApiResult, ApiTransport, ComplaintApi, EnvironmentalApi, HttpTransport, ResourceApi,
};
use crate::app::banner::{Banner, BannerQueue};
use crate::config::config_manager::{DEFAULT_BANNER_TTL_SECS, MAX_BANNER_TTL_SECS};
use crate::config::ClientConfig;
use crate::domain::session::Session;
use crate::i18n::t;
use crate::repository::TokenRepository;

/// 按会话构造传输层
///
/// 登录/登出时重新调用, 保证 API 实例携带的令牌与当前会话一致
pub type TransportFactory =
    Arc<dyn Fn(Option<&Session>) -> ApiResult<Arc<dyn ApiTransport>> + Send + Sync>;

/// HTTP 传输层工厂
pub fn http_transport_factory(config: ClientConfig) -> TransportFactory {
    Arc::new(move |session: Option<&Session>| -> ApiResult<Arc<dyn ApiTransport>> {
        let transport: Arc<dyn ApiTransport> =
            Arc::new(HttpTransport::new(config.clone(), session.cloned())?);
        Ok(transport)
    })
}

/// 应用状态
pub struct AppState {
    /// 客户端配置
    pub config: ClientConfig,

    /// 当前会话 (未登录为 None)
    pub session: Option<Session>,

    /// 投诉 API
    pub complaint_api: Arc<ComplaintApi>,

    /// 环境监测 API
    pub environmental_api: Arc<EnvironmentalApi>,

    /// 通用记录 API
    pub resource_api: Arc<ResourceApi>,

    /// 提示条
    pub banners: Mutex<BannerQueue>,

    token_repo: Arc<TokenRepository>,
    transport_factory: TransportFactory,
}

impl AppState {
    /// 创建 AppState (HTTP 传输)
    ///
    /// 1. 打开令牌存储并恢复会话
    /// 2. 按会话构造传输层
    /// 3. 创建所有 API 实例
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        tracing::info!("初始化AppState, 后端: {}", config.api_base);

        let token_repo = Arc::new(TokenRepository::new(&config.token_db_path)?);
        let factory = http_transport_factory(config.clone());
        Self::with_transport_factory(config, token_repo, factory)
    }

    /// 使用指定传输层工厂创建
    pub fn with_transport_factory(
        config: ClientConfig,
        token_repo: Arc<TokenRepository>,
        transport_factory: TransportFactory,
    ) -> ApiResult<Self> {
        let session = restore_session(&token_repo)?;
        let transport = transport_factory(session.as_ref())?;

        Ok(Self {
            config,
            session,
            complaint_api: Arc::new(ComplaintApi::new(transport.clone())),
            environmental_api: Arc::new(EnvironmentalApi::new(transport.clone())),
            resource_api: Arc::new(ResourceApi::new(transport)),
            banners: Mutex::new(BannerQueue::new()),
            token_repo,
            transport_factory,
        })
    }

    /// 使用固定传输层创建 (不随会话切换, 嵌入使用)
    pub fn with_transport(
        config: ClientConfig,
        token_repo: Arc<TokenRepository>,
        transport: Arc<dyn ApiTransport>,
    ) -> ApiResult<Self> {
        let factory: TransportFactory =
            Arc::new(move |_: Option<&Session>| -> ApiResult<Arc<dyn ApiTransport>> {
                Ok(transport.clone())
            });
        Self::with_transport_factory(config, token_repo, factory)
    }

    // 会话变化后重建所有 API 实例
    fn rebuild_apis(&mut self) -> ApiResult<()> {
        let transport = (self.transport_factory)(self.session.as_ref())?;
        self.complaint_api = Arc::new(ComplaintApi::new(transport.clone()));
        self.environmental_api = Arc::new(EnvironmentalApi::new(transport.clone()));
        self.resource_api = Arc::new(ResourceApi::new(transport));
        Ok(())
    }

    /// 登录: 校验令牌格式, 保存令牌, 并重建传输层
    pub fn login(&mut self, token: &str) -> ApiResult<&Session> {
        let session = Session::from_token(token)?;
        self.token_repo.save(session.token())?;
        tracing::info!(role = %session.role, "signed in");

        self.session = Some(session);
        self.rebuild_apis()?;
        self.session
            .as_ref()
            .ok_or_else(|| ApiError::InternalError("登录后会话丢失".to_string()))
    }

    /// 登出: 清除本地令牌, 重建不带令牌的传输层
    pub fn logout(&mut self) -> ApiResult<()> {
        self.token_repo.clear()?;
        self.session = None;
        self.rebuild_apis()?;
        self.notify_success(t("banner.logged_out"));
        Ok(())
    }

    /// 需要登录的操作取会话
    pub fn require_session(&self) -> ApiResult<&Session> {
        match &self.session {
            Some(s) if !s.is_expired_at(Utc::now()) => Ok(s),
            Some(_) => Err(ApiError::Unauthorized("会话已过期".to_string())),
            None => Err(ApiError::Unauthorized(t("cli.not_logged_in"))),
        }
    }

    fn banner_ttl(&self) -> Duration {
        let secs = self.config.banner_ttl_secs.min(MAX_BANNER_TTL_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_BANNER_TTL_SECS as i64))
    }

    /// 把错误转为提示条
    pub fn report(&self, err: &ApiError) {
        let banner = Banner::from_error(err, Utc::now(), self.banner_ttl());
        if let Ok(mut queue) = self.banners.lock() {
            queue.push(banner);
        }
    }

    pub fn notify_success(&self, message: String) {
        let banner = Banner::success(message, Utc::now(), self.banner_ttl());
        if let Ok(mut queue) = self.banners.lock() {
            queue.push(banner);
        }
    }

    /// 当前可见提示条的文本
    pub fn visible_banners(&self) -> Vec<String> {
        match self.banners.lock() {
            Ok(mut queue) => queue
                .visible(Utc::now())
                .iter()
                .map(|b| b.message.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

// 已保存但无法解码的令牌视为未登录
fn restore_session(token_repo: &TokenRepository) -> ApiResult<Option<Session>> {
    let token = match token_repo.load()? {
        Some(t) => t,
        None => return Ok(None),
    };
    match Session::from_token(&token) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!("已保存的令牌无效, 按未登录处理: {}", e);
            Ok(None)
        }
    }
}
