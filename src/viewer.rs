//! Hosted viewer selection.
//!
//! A hosted viewer can only preview documents it can fetch itself, so it
//! is used only for sources on public HTTPS hosts. Everything else (file
//! paths, intranet hosts, plain HTTP) goes through the local pipeline.

use crate::error::Result;
use log::debug;
use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Handle to an external slide viewer service.
///
/// Constructing one is the explicit opt-in; without it every document
/// renders locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedViewer {
    embed_base: Url,
}

impl HostedViewer {
    /// Create a viewer handle from its embed endpoint.
    pub fn new(embed_base: Url) -> Self {
        Self { embed_base }
    }

    /// Create a viewer handle from an endpoint string.
    pub fn parse(embed_base: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(embed_base)?))
    }

    /// The URL that embeds the given document in this viewer.
    pub fn embed_url(&self, document: &Url) -> Url {
        let mut url = self.embed_base.clone();
        url.query_pairs_mut()
            .append_pair("src", document.as_str())
            .append_pair("embedded", "true");
        url
    }
}

/// How a given document source should be previewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerMode {
    /// Frame the hosted viewer at this URL.
    Hosted(Url),
    /// Fetch, parse, and render in-process.
    Local,
}

/// Pick the preview mode for a document source.
///
/// Hosted mode needs both a configured viewer and a source the viewer's
/// servers can reach: an HTTPS URL on a public host.
pub fn select_mode(source: &str, viewer: Option<&HostedViewer>) -> ViewerMode {
    match (viewer, Url::parse(source)) {
        (Some(viewer), Ok(url)) if is_publicly_reachable(&url) => {
            debug!("previewing {} through the hosted viewer", url);
            ViewerMode::Hosted(viewer.embed_url(&url))
        }
        _ => ViewerMode::Local,
    }
}

fn is_publicly_reachable(url: &Url) -> bool {
    if url.scheme() != "https" {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => is_public_domain(domain),
        Some(Host::Ipv4(addr)) => is_public_ipv4(addr),
        Some(Host::Ipv6(addr)) => is_public_ipv6(addr),
        None => false,
    }
}

fn is_public_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() || domain == "localhost" {
        return false;
    }
    if domain.ends_with(".localhost") || domain.ends_with(".local") {
        return false;
    }
    // single-label names only resolve inside the local network
    domain.contains('.')
}

fn is_public_ipv4(addr: Ipv4Addr) -> bool {
    !(addr.is_loopback()
        || addr.is_private()
        || addr.is_link_local()
        || addr.is_unspecified()
        || addr.is_broadcast())
}

fn is_public_ipv6(addr: Ipv6Addr) -> bool {
    if addr.is_loopback() || addr.is_unspecified() {
        return false;
    }
    if let Some(mapped) = addr.to_ipv4_mapped() {
        return is_public_ipv4(mapped);
    }
    let first = addr.segments()[0];
    // fc00::/7 unique local, fe80::/10 link local
    if (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80 {
        return false;
    }
    true
}
