//! 客户端 IP 解析
//!
//! 只有当连接来自可信代理时才采信 X-Forwarded-For / X-Real-IP；未配置
//! `server.trusted_proxies` 时，来自私有地址的连接视为经过反向代理。

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;
use tracing::trace;

/// 私有地址、链路本地或回环地址
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            let head = v6.segments()[0];
            v6.is_loopback() || (head & 0xfe00) == 0xfc00 || (head & 0xffc0) == 0xfe80
        }
    }
}

fn parse_peer(addr: &str) -> Option<IpAddr> {
    addr.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| addr.parse::<IpAddr>())
        .ok()
}

/// `proxies` 中的条目可以是单个 IP 或 CIDR
pub fn is_trusted_proxy(peer: &str, proxies: &[String]) -> bool {
    let Some(ip) = parse_peer(peer) else {
        return false;
    };
    proxies.iter().any(|entry| {
        if entry.contains('/') {
            ip_in_cidr(&ip, entry)
        } else {
            entry.parse::<IpAddr>().is_ok_and(|p| p == ip)
        }
    })
}

pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix)) = cidr.split_once('/') else {
        return false;
    };
    let (Ok(prefix), Ok(network)) = (prefix.parse::<u32>(), network.parse::<IpAddr>()) else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            u32::from(*ip) & mask == u32::from(net) & mask
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix).unwrap_or(0);
            u128::from(*ip) & mask == u128::from(net) & mask
        }
        _ => false,
    }
}

/// X-Forwarded-For 的第一个地址，其次 X-Real-IP
pub fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let from_xff = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    from_xff
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
        })
        .map(String::from)
}

/// 根据连接地址和代理头确定客户端 IP
pub fn resolve_client_ip(
    peer: Option<&str>,
    headers: &HeaderMap,
    trusted_proxies: &[String],
) -> Option<String> {
    let peer = peer?;
    let peer_ip = parse_peer(peer).map(|ip| ip.to_string());

    let behind_proxy = if trusted_proxies.is_empty() {
        parse_peer(peer).is_some_and(|ip| is_private_or_local(&ip))
    } else {
        is_trusted_proxy(peer, trusted_proxies)
    };

    if behind_proxy && let Some(real) = forwarded_ip(headers) {
        trace!("Client IP {} via proxy {}", real, peer);
        return Some(real);
    }

    peer_ip.or_else(|| Some(peer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(HeaderName::from_static(k), HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_private_ranges() {
        assert!(is_private_or_local(&"10.1.2.3".parse().unwrap()));
        assert!(is_private_or_local(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"fd12::1".parse().unwrap()));
        assert!(!is_private_or_local(&"9.9.9.9".parse().unwrap()));
        assert!(!is_private_or_local(&"2606:4700::1111".parse().unwrap()));
    }

    #[test]
    fn test_cidr_matching() {
        let ip: IpAddr = "172.20.3.4".parse().unwrap();
        assert!(ip_in_cidr(&ip, "172.16.0.0/12"));
        assert!(!ip_in_cidr(&ip, "172.32.0.0/12"));
        assert!(!ip_in_cidr(&ip, "172.16.0.0/40"));
        let v6: IpAddr = "2001:db8::42".parse().unwrap();
        assert!(ip_in_cidr(&v6, "2001:db8::/48"));
        assert!(!ip_in_cidr(&v6, "10.0.0.0/8"));
    }

    #[test]
    fn test_trusted_proxy_list() {
        let proxies = vec!["203.0.113.7".to_string(), "10.0.0.0/8".to_string()];
        assert!(is_trusted_proxy("203.0.113.7:443", &proxies));
        assert!(is_trusted_proxy("10.9.8.7", &proxies));
        assert!(!is_trusted_proxy("203.0.113.8", &proxies));
        assert!(!is_trusted_proxy("garbage", &proxies));
    }

    #[test]
    fn test_forwarded_header_only_trusted_from_proxy() {
        let h = headers(&[("x-forwarded-for", "198.51.100.9, 10.0.0.2")]);

        // 公网直连：忽略伪造的头
        assert_eq!(
            resolve_client_ip(Some("8.8.4.4:5000"), &h, &[]).as_deref(),
            Some("8.8.4.4")
        );
        // 私有地址自动识别为代理
        assert_eq!(
            resolve_client_ip(Some("127.0.0.1:5000"), &h, &[]).as_deref(),
            Some("198.51.100.9")
        );
        // 显式配置后只信任列表内代理
        let proxies = vec!["192.0.2.1".to_string()];
        assert_eq!(
            resolve_client_ip(Some("127.0.0.1:5000"), &h, &proxies).as_deref(),
            Some("127.0.0.1")
        );
        assert_eq!(
            resolve_client_ip(Some("192.0.2.1:80"), &h, &proxies).as_deref(),
            Some("198.51.100.9")
        );
    }

    #[test]
    fn test_real_ip_fallback() {
        let h = headers(&[("x-real-ip", "198.51.100.20")]);
        assert_eq!(forwarded_ip(&h).as_deref(), Some("198.51.100.20"));
        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }
}
