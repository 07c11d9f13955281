//! Client IP extraction from proxy and CDN headers.
//!
//! Headers are consulted in priority order; a candidate is accepted only
//! when it parses as an IP address and is publicly routable. When nothing
//! usable is found the socket peer address is used as-is.

use axum::http::HeaderMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Proxy/CDN headers consulted for the client address, highest priority first.
const IP_HEADERS: &[&str] = &[
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "forwarded",
];

/// Extracts the client IP address for click analytics.
///
/// When `trust_headers` is false (service exposed directly), headers are
/// ignored and the socket address is returned. Otherwise each header in
/// [`IP_HEADERS`] is checked in order and the first public candidate wins;
/// the socket address remains the fallback.
pub fn extract_client_ip(headers: &HeaderMap, socket_addr: IpAddr, trust_headers: bool) -> IpAddr {
    if !trust_headers {
        return socket_addr;
    }

    for name in IP_HEADERS {
        let Some(value) = headers.get(*name).and_then(|v| v.to_str().ok()) else {
            continue;
        };

        let candidate = match *name {
            "forwarded" => parse_forwarded(value),
            // Comma-separated chains list the original client first.
            _ => value.split(',').next().and_then(|s| s.trim().parse().ok()),
        };

        if let Some(ip) = candidate {
            if is_public(ip) {
                return ip;
            }
        }
    }

    socket_addr
}

/// Parses the `for=` parameter of an RFC 7239 `Forwarded` header.
fn parse_forwarded(value: &str) -> Option<IpAddr> {
    for element in value.split(',') {
        for param in element.split(';') {
            let param = param.trim();
            if let Some(raw) = param.strip_prefix("for=") {
                let raw = raw.trim_matches('"');
                // Bracketed IPv6, optionally with a port.
                let ip_str = if let Some(rest) = raw.strip_prefix('[') {
                    rest.split(']').next().unwrap_or(rest)
                } else {
                    raw.split(':').next().unwrap_or(raw)
                };

                if let Ok(ip) = ip_str.parse() {
                    return Some(ip);
                }
            }
        }
    }

    None
}

/// Returns true when the address is publicly routable.
///
/// Loopback, private, link-local, multicast, unspecified and other reserved
/// ranges are rejected so spoofed or proxy-internal addresses never reach
/// the analytics store.
pub fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => is_public_v6(v6),
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    // Carrier-grade NAT, 100.64.0.0/10.
    let shared = octets[0] == 100 && (octets[1] & 0xc0) == 64;

    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_unspecified()
        || ip.is_multicast()
        || shared)
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    let segments = ip.segments();
    // Unique local fc00::/7 and link-local fe80::/10.
    let unique_local = (segments[0] & 0xfe00) == 0xfc00;
    let link_local = (segments[0] & 0xffc0) == 0xfe80;
    // Documentation range 2001:db8::/32.
    let documentation = segments[0] == 0x2001 && segments[1] == 0xdb8;

    !(ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        || unique_local
        || link_local
        || documentation)
}
