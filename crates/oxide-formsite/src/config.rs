//! Site configuration.

use std::net::{Ipv4Addr, SocketAddr};

use oxide_forms::FormId;

/// Where the site listens and how it links to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Address to bind.
    pub addr: SocketAddr,
    /// Public origin used in shareable form links.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl SiteConfig {
    /// Creates a config. `base_url` defaults to `http://<addr>`.
    pub fn new(addr: SocketAddr, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| format!("http://{addr}"));
        Self { addr, base_url }
    }

    /// Returns the shareable link of a form.
    pub fn public_url(&self, id: &FormId) -> String {
        format!("{}/form/{id}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(
            config.public_url(&FormId::new("abc")),
            "http://localhost:3000/form/abc"
        );
    }

    #[test]
    fn test_base_url_falls_back_to_addr() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        assert_eq!(SiteConfig::new(addr, None).base_url, "http://0.0.0.0:8080");

        let config = SiteConfig::new(addr, Some("https://forms.example.com/".into()));
        assert_eq!(
            config.public_url(&FormId::new("x")),
            "https://forms.example.com/form/x"
        );
    }
}
