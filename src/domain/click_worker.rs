//! Background worker turning click events into analytics rows.
//!
//! One worker task drains the bounded channel fed by the redirect handler.
//! Every failure on this path is logged and swallowed; the redirect has
//! already been served by the time an event is processed.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::geoip::GeoResolver;
use crate::utils::client_ip::is_public;
use crate::utils::device::classify_device;

/// Dependencies of the click recording pipeline.
#[derive(Clone)]
pub struct ClickRecorder {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
    geo: Arc<dyn GeoResolver>,
}

impl ClickRecorder {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        geo: Arc<dyn GeoResolver>,
    ) -> Self {
        Self { links, clicks, geo }
    }

    /// Processes one click event end to end.
    ///
    /// Derives the device class and country, inserts the analytics row
    /// (with a bounded retry) and bumps the link's click counter. The two
    /// writes are independent: a failed insert does not prevent the
    /// counter bump, mirroring the redirect-time behavior where the
    /// counter reflects served redirects.
    pub async fn process(&self, event: ClickEvent) {
        let device = classify_device(event.user_agent.as_deref());

        // Private and reserved addresses are never sent to the geolocation
        // service; they cannot resolve to a country.
        let country = if is_public(event.ip) {
            self.geo.country_code(event.ip).await
        } else {
            None
        };

        let new_click = NewClick {
            url_id: event.url_id,
            ip_address: Some(event.ip.to_string()),
            user_agent: event.user_agent.clone(),
            referer: event.referer.clone(),
            country,
            device_type: Some(device.as_str().to_string()),
        };

        let strategy = FixedInterval::from_millis(200).take(2);
        let recorded = Retry::spawn(strategy, || {
            let clicks = self.clicks.clone();
            let new_click = new_click.clone();
            async move { clicks.record(new_click).await }
        })
        .await;

        match recorded {
            Ok(click) => debug!(url_id = click.url_id, device = %device, "Recorded click"),
            Err(e) => warn!(url_id = event.url_id, "Failed to record click: {e}"),
        }

        if let Err(e) = self.links.register_click(event.url_id).await {
            warn!(url_id = event.url_id, "Failed to bump click counter: {e}");
        }
    }
}

/// Runs the click worker until the channel closes.
pub async fn run_click_worker(mut rx: mpsc::Receiver<ClickEvent>, recorder: ClickRecorder) {
    while let Some(event) = rx.recv().await {
        recorder.process(event).await;
    }
    debug!("Click worker shutting down: channel closed");
}
