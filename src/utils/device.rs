//! Coarse device classification from the User-Agent header.

use regex::Regex;
use std::sync::LazyLock;

static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"mobile|android|iphone|ipad|phone|blackberry|opera mini|iemobile").unwrap()
});

static TABLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tablet|ipad").unwrap());

static BOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bot|crawler|spider|scraper").unwrap());

/// Coarse device category of a visiting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Bot,
    Desktop,
    Unknown,
}

impl DeviceClass {
    /// Stable label stored in the analytics table.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Bot => "bot",
            DeviceClass::Desktop => "desktop",
            DeviceClass::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a user agent into a [`DeviceClass`].
///
/// Tablet patterns take precedence over mobile patterns (an iPad matches
/// both). Bots are detected only when no handset pattern matched, so
/// in-app webviews advertising both are counted as devices.
pub fn classify_device(user_agent: Option<&str>) -> DeviceClass {
    let Some(ua) = user_agent else {
        return DeviceClass::Unknown;
    };
    let ua = ua.to_ascii_lowercase();

    if MOBILE_RE.is_match(&ua) {
        if TABLET_RE.is_match(&ua) {
            return DeviceClass::Tablet;
        }
        return DeviceClass::Mobile;
    }

    if TABLET_RE.is_match(&ua) {
        return DeviceClass::Tablet;
    }

    if BOT_RE.is_match(&ua) {
        return DeviceClass::Bot;
    }

    DeviceClass::Desktop
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_agent() {
        assert_eq!(classify_device(None), DeviceClass::Unknown);
    }

    #[test]
    fn test_desktop() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0";
        assert_eq!(classify_device(Some(ua)), DeviceClass::Desktop);
    }

    #[test]
    fn test_mobile() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
        assert_eq!(classify_device(Some(ua)), DeviceClass::Mobile);

        let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Chrome/120.0 Mobile Safari/537.36";
        assert_eq!(classify_device(Some(ua)), DeviceClass::Mobile);
    }

    #[test]
    fn test_tablet_precedence_over_mobile() {
        // iPad UA matches both the mobile and tablet patterns.
        let ua = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) Mobile/15E148";
        assert_eq!(classify_device(Some(ua)), DeviceClass::Tablet);

        let ua = "Mozilla/5.0 (Linux; Android 14; SM-X910) Tablet Safari/537.36 Mobile";
        assert_eq!(classify_device(Some(ua)), DeviceClass::Tablet);
    }

    #[test]
    fn test_bot() {
        for ua in [
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
            "my-crawler/1.0",
            "SomeSpider",
            "data-scraper 2.0",
        ] {
            assert_eq!(classify_device(Some(ua)), DeviceClass::Bot, "{ua}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify_device(Some("GOOGLEBOT")), DeviceClass::Bot);
        assert_eq!(classify_device(Some("ANDROID MOBILE")), DeviceClass::Mobile);
    }

    #[test]
    fn test_labels() {
        assert_eq!(DeviceClass::Mobile.as_str(), "mobile");
        assert_eq!(DeviceClass::Tablet.as_str(), "tablet");
        assert_eq!(DeviceClass::Bot.as_str(), "bot");
        assert_eq!(DeviceClass::Desktop.as_str(), "desktop");
        assert_eq!(DeviceClass::Unknown.as_str(), "unknown");
    }
}
