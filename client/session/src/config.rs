/// Runtime configuration for the backend API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL relative endpoints are joined onto, without a trailing slash.
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_endpoints_regardless_of_slashes() {
        let config = ApiConfig::new("http://api.example.test/");
        assert_eq!(config.base_url, "http://api.example.test");
        assert_eq!(
            config.endpoint("users/me/"),
            "http://api.example.test/users/me/"
        );
        assert_eq!(
            config.endpoint("/orders"),
            "http://api.example.test/orders"
        );
    }
}
