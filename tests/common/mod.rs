#![allow(dead_code)]

//! Shared fixtures: in-memory repository implementations and an app
//! harness exercising the real router, middleware and click worker
//! without a database.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum::routing::get;
use axum::{Router, middleware};
use axum_test::TestServer;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::mpsc;

use shortly::api::handlers::{health_handler, redirect_handler};
use shortly::api::middleware::auth;
use shortly::api::routes::protected_routes;
use shortly::application::services::{AuthService, LinkService, StatsService};
use shortly::domain::click_event::ClickEvent;
use shortly::domain::click_worker::{ClickRecorder, run_click_worker};
use shortly::domain::entities::{Click, NewClick, NewShortLink, ShortLink, User};
use shortly::domain::repositories::{
    ApiToken, ClickRepository, DailyCount, LinkRepository, LinkTotals, TokenRepository,
    UserRepository,
};
use shortly::error::AppError;
use shortly::infrastructure::geoip::GeoResolver;
use shortly::infrastructure::page_title::NullTitleProber;
use shortly::state::AppState;

pub const BASE_URL: &str = "http://sho.rt";
pub const SIGNING_SECRET: &str = "integration-signing-secret";

#[derive(Default)]
struct StoreInner {
    users: Vec<User>,
    tokens: Vec<ApiToken>,
    links: Vec<ShortLink>,
    clicks: Vec<Click>,
    next_id: i64,
}

/// Shared in-memory backing store for all fake repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore(Arc<Mutex<StoreInner>>);

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        let mut inner = self.0.lock().unwrap();
        inner.next_id += 1;
        inner.next_id
    }

    pub fn add_user(&self, username: &str) -> User {
        let user = User {
            id: self.next_id(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.0.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn add_link(&self, user_id: i64, code: &str, url: &str) -> ShortLink {
        self.add_link_full(user_id, code, url, true, None)
    }

    pub fn add_link_full(
        &self,
        user_id: i64,
        code: &str,
        url: &str,
        is_active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> ShortLink {
        let now = Utc::now();
        let link = ShortLink {
            id: self.next_id(),
            user_id,
            original_url: url.to_string(),
            short_code: code.to_string(),
            title: None,
            click_count: 0,
            last_clicked_at: None,
            is_active,
            expires_at,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().unwrap().links.push(link.clone());
        link
    }

    /// Inserts a click with an explicit timestamp, for time-series tests.
    pub fn add_click_at(&self, url_id: i64, created_at: DateTime<Utc>) {
        let click = Click {
            id: self.next_id(),
            url_id,
            ip_address: None,
            user_agent: None,
            referer: None,
            country: None,
            device_type: None,
            created_at,
        };
        self.0.lock().unwrap().clicks.push(click);
    }

    pub fn clicks_for(&self, url_id: i64) -> Vec<Click> {
        self.0
            .lock()
            .unwrap()
            .clicks
            .iter()
            .filter(|c| c.url_id == url_id)
            .cloned()
            .collect()
    }

    pub fn link_by_id(&self, id: i64) -> Option<ShortLink> {
        self.0
            .lock()
            .unwrap()
            .links
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }
}

pub struct InMemoryLinkRepository(pub InMemoryStore);

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        {
            let inner = self.0.0.lock().unwrap();
            if inner
                .links
                .iter()
                .any(|l| l.short_code == new_link.short_code)
            {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    serde_json::json!({}),
                ));
            }
        }

        let now = Utc::now();
        let link = ShortLink {
            id: self.0.next_id(),
            user_id: new_link.user_id,
            original_url: new_link.original_url,
            short_code: new_link.short_code,
            title: new_link.title,
            click_count: 0,
            last_clicked_at: None,
            is_active: true,
            expires_at: new_link.expires_at,
            created_at: now,
            updated_at: now,
        };
        self.0.0.lock().unwrap().links.push(link.clone());
        Ok(link)
    }

    async fn find_resolvable(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .0
            .0
            .lock()
            .unwrap()
            .links
            .iter()
            .find(|l| l.short_code == code && l.is_resolvable())
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Ok(self.0.link_by_id(id))
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self
            .0
            .0
            .lock()
            .unwrap()
            .links
            .iter()
            .any(|l| l.short_code == code))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self
            .0
            .0
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| std::cmp::Reverse(l.id));
        Ok(links)
    }

    async fn recent_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let mut links = self.list_by_user(user_id).await?;
        links.truncate(limit as usize);
        Ok(links)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.0.0.lock().unwrap();
        let before = inner.links.len();
        inner.links.retain(|l| l.id != id);
        // Foreign-key cascade.
        inner.clicks.retain(|c| c.url_id != id);
        Ok(inner.links.len() < before)
    }

    async fn register_click(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.0.0.lock().unwrap();
        if let Some(link) = inner.links.iter_mut().find(|l| l.id == id) {
            link.click_count += 1;
            link.last_clicked_at = Some(Utc::now());
            link.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn totals_by_user(&self, user_id: i64) -> Result<LinkTotals, AppError> {
        let inner = self.0.0.lock().unwrap();
        let mine: Vec<&ShortLink> = inner
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .collect();

        Ok(LinkTotals {
            total_urls: mine.len() as i64,
            total_clicks: mine.iter().map(|l| l.click_count).sum(),
            active_urls: mine.iter().filter(|l| l.is_resolvable()).count() as i64,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct InMemoryClickRepository(pub InMemoryStore);

impl InMemoryClickRepository {
    fn user_clicks(&self, user_id: i64) -> Vec<Click> {
        let inner = self.0.0.lock().unwrap();
        let mine: Vec<i64> = inner
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.id)
            .collect();
        inner
            .clicks
            .iter()
            .filter(|c| mine.contains(&c.url_id))
            .cloned()
            .collect()
    }
}

fn group_daily(clicks: impl Iterator<Item = Click>) -> Vec<DailyCount> {
    let mut by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for click in clicks {
        *by_day.entry(click.created_at.date_naive()).or_default() += 1;
    }
    let mut counts: Vec<DailyCount> = by_day
        .into_iter()
        .map(|(day, count)| DailyCount { day, count })
        .collect();
    counts.sort_by_key(|c| c.day);
    counts
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let click = Click {
            id: self.0.next_id(),
            url_id: new_click.url_id,
            ip_address: new_click.ip_address,
            user_agent: new_click.user_agent,
            referer: new_click.referer,
            country: new_click.country,
            device_type: new_click.device_type,
            created_at: Utc::now(),
        };
        self.0.0.lock().unwrap().clicks.push(click.clone());
        Ok(click)
    }

    async fn count_since(&self, user_id: i64, from: DateTime<Utc>) -> Result<i64, AppError> {
        Ok(self
            .user_clicks(user_id)
            .iter()
            .filter(|c| c.created_at >= from)
            .count() as i64)
    }

    async fn count_by_link(&self, url_id: i64) -> Result<i64, AppError> {
        Ok(self.0.clicks_for(url_id).len() as i64)
    }

    async fn daily_counts_by_user(
        &self,
        user_id: i64,
        from: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError> {
        Ok(group_daily(
            self.user_clicks(user_id)
                .into_iter()
                .filter(|c| c.created_at >= from),
        ))
    }

    async fn daily_counts_by_link(&self, url_id: i64) -> Result<Vec<DailyCount>, AppError> {
        Ok(group_daily(self.0.clicks_for(url_id).into_iter()))
    }

    async fn recent_by_link(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let mut clicks = self.0.clicks_for(url_id);
        clicks.sort_by_key(|c| std::cmp::Reverse(c.id));
        clicks.truncate(limit as usize);
        Ok(clicks)
    }
}

pub struct InMemoryUserRepository(pub InMemoryStore);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, username: &str) -> Result<User, AppError> {
        {
            let inner = self.0.0.lock().unwrap();
            if inner.users.iter().any(|u| u.username == username) {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    serde_json::json!({}),
                ));
            }
        }
        Ok(self.0.add_user(username))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self
            .0
            .0
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .0
            .0
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.0.0.lock().unwrap().users.clone())
    }
}

pub struct InMemoryTokenRepository(pub InMemoryStore);

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_valid(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .0
            .0
            .lock()
            .unwrap()
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .cloned())
    }

    async fn touch_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut inner = self.0.0.lock().unwrap();
        if let Some(token) = inner.tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let token = ApiToken {
            id: self.0.next_id(),
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        self.0.0.lock().unwrap().tokens.push(token.clone());
        Ok(token)
    }

    async fn list(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.0.0.lock().unwrap().tokens.clone())
    }

    async fn revoke(&self, name: &str) -> Result<bool, AppError> {
        let mut inner = self.0.0.lock().unwrap();
        if let Some(token) = inner
            .tokens
            .iter_mut()
            .find(|t| t.name == name && t.revoked_at.is_none())
        {
            token.revoked_at = Some(Utc::now());
            return Ok(true);
        }
        Ok(false)
    }
}

/// Geolocation fake returning a fixed country for every lookup.
pub struct FakeGeoResolver;

#[async_trait]
impl GeoResolver for FakeGeoResolver {
    async fn country_code(&self, _ip: IpAddr) -> Option<String> {
        Some("US".to_string())
    }
}

/// Injects a fixed peer address so `ConnectInfo` extraction works under
/// the in-memory test transport.
#[derive(Clone)]
pub struct TestConnectInfoLayer;

impl<S> tower::Layer<S> for TestConnectInfoLayer {
    type Service = TestConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TestConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct TestConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for TestConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// A fully wired application over the in-memory store.
pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub state: AppState,
}

impl TestApp {
    /// Creates a user and issues a bearer token for it.
    pub async fn user_with_token(&self, username: &str) -> (User, String) {
        let user = self.store.add_user(username);
        let (raw_token, _) = self
            .state
            .auth_service
            .issue_token(user.id, &format!("{username}-token"))
            .await
            .unwrap();
        (user, raw_token)
    }
}

/// Builds the full application: real router, auth middleware and click
/// worker over the in-memory repositories.
pub fn spawn_app() -> TestApp {
    let store = InMemoryStore::new();

    let links: Arc<dyn LinkRepository> = Arc::new(InMemoryLinkRepository(store.clone()));
    let clicks: Arc<dyn ClickRepository> = Arc::new(InMemoryClickRepository(store.clone()));
    let tokens = Arc::new(InMemoryTokenRepository(store.clone()));
    let users = Arc::new(InMemoryUserRepository(store.clone()));

    let link_service = Arc::new(LinkService::new(
        links.clone(),
        Arc::new(NullTitleProber),
        BASE_URL.to_string(),
    ));
    let stats_service = Arc::new(StatsService::new(links.clone(), clicks.clone()));
    let auth_service = Arc::new(AuthService::new(
        tokens,
        users,
        SIGNING_SECRET.to_string(),
    ));

    let (click_tx, click_rx) = mpsc::channel::<ClickEvent>(100);
    let recorder = ClickRecorder::new(links, clicks, Arc::new(FakeGeoResolver));
    tokio::spawn(run_click_worker(click_rx, recorder));

    let state = AppState {
        link_service,
        stats_service,
        auth_service,
        click_sender: click_tx,
        trust_proxy_headers: true,
    };

    let api_router = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state.clone())
        .layer(TestConnectInfoLayer);

    TestApp {
        server: TestServer::new(app).unwrap(),
        store,
        state,
    }
}
