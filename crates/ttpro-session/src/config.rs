//! Session configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// Connection settings for one session.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Server URL: the site root, the `ttsoapcgi.exe` CGI URL, or the
    /// `ttsoapcgi.wsdl` URL itself
    pub endpoint: String,
    /// Project (database) name to log into
    pub project: String,
    pub username: String,
    pub password: String,
}

impl SessionConfig {
    pub fn new(
        endpoint: impl Into<String>,
        project: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            project: project.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Resolve the configured endpoint to the WSDL URL the transport talks to.
    ///
    /// Accepts the three spellings seen in the wild: an explicit wsdl URL
    /// passes through, a CGI executable URL is rewritten to its site root
    /// first, and anything else is treated as a site root that gets the
    /// `ttsoapcgi.wsdl` suffix.
    pub fn wsdl_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)?;

        if url.path().ends_with("ttsoapcgi.wsdl") {
            return Ok(url);
        }

        if url.path().ends_with("ttsoapcgi.exe") {
            url.set_path("/");
            url.set_query(None);
            url.set_fragment(None);
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url.join("ttsoapcgi.wsdl")?)
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wsdl(endpoint: &str) -> String {
        SessionConfig::new(endpoint, "Widgets", "alice", "secret")
            .wsdl_url()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_site_root_gains_wsdl_suffix() {
        assert_eq!(wsdl("http://tt.example.com/"), "http://tt.example.com/ttsoapcgi.wsdl");
        assert_eq!(wsdl("http://tt.example.com"), "http://tt.example.com/ttsoapcgi.wsdl");
        assert_eq!(
            wsdl("http://tt.example.com/testtrack"),
            "http://tt.example.com/testtrack/ttsoapcgi.wsdl"
        );
    }

    #[test]
    fn test_wsdl_url_passes_through() {
        assert_eq!(
            wsdl("http://tt.example.com/ttsoapcgi.wsdl"),
            "http://tt.example.com/ttsoapcgi.wsdl"
        );
    }

    #[test]
    fn test_cgi_url_is_rewritten() {
        assert_eq!(
            wsdl("http://tt.example.com/ttsoapcgi.exe?x=1"),
            "http://tt.example.com/ttsoapcgi.wsdl"
        );
    }

    #[test]
    fn test_garbage_endpoint_is_rejected() {
        let config = SessionConfig::new("not a url", "Widgets", "alice", "secret");
        assert!(config.wsdl_url().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = SessionConfig::new("http://tt.example.com/", "Widgets", "alice", "secret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret"));
    }
}
