use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::domain::click_event::ClickEvent;

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    /// Bounded channel feeding the click worker; full queue drops events.
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// When true, client IPs for analytics are read from proxy headers.
    pub trust_proxy_headers: bool,
}
