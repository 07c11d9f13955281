//! Click event passed from the redirect handler to the background worker.

use std::net::IpAddr;

/// Request metadata captured at redirect time.
///
/// The handler resolves the link and extracts the client address, then
/// hands everything else (device classification, geolocation, persistence)
/// to the worker so the redirect response is never delayed by the
/// analytics path.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub url_id: i64,
    pub ip: IpAddr,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    pub fn new(
        url_id: i64,
        ip: IpAddr,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            url_id,
            ip,
            user_agent: user_agent.map(str::to_owned),
            referer: referer.map(str::to_owned),
        }
    }
}
