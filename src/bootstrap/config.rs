use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub directory_base_url: String,
    pub search_path: String,
    pub install_path: String,
    pub registration_timeout_ms: u64,
    pub registration_poll_ms: u64,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let directory_base_url =
            env::var("BLOCKDIR_BASE_URL").unwrap_or_else(|_| "https://api.wordpress.org".into());
        let search_path = env::var("BLOCKDIR_SEARCH_PATH")
            .unwrap_or_else(|_| "/__experimental/block-directory/search".into());
        let install_path = env::var("BLOCKDIR_INSTALL_PATH")
            .unwrap_or_else(|_| "/__experimental/block-directory/install".into());
        let registration_timeout_ms = env::var("BLOCKDIR_REGISTRATION_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10_000);
        let registration_poll_ms = env::var("BLOCKDIR_REGISTRATION_POLL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50);
        let http_timeout_secs = env::var("BLOCKDIR_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        if !directory_base_url.starts_with("http://") && !directory_base_url.starts_with("https://")
        {
            anyhow::bail!(
                "BLOCKDIR_BASE_URL must be a full origin (e.g., https://api.wordpress.org)"
            );
        }
        if registration_poll_ms == 0 || registration_poll_ms >= registration_timeout_ms {
            anyhow::bail!(
                "BLOCKDIR_REGISTRATION_POLL_MS must be non-zero and shorter than the registration timeout"
            );
        }

        Ok(Self {
            directory_base_url,
            search_path,
            install_path,
            registration_timeout_ms,
            registration_poll_ms,
            http_timeout_secs,
        })
    }
}
