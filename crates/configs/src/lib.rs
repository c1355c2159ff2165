use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: None,
        }
    }
}

/// Hosted Postgres + object storage endpoint (a Supabase project).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub service_role_key: String,
}

/// Expected Basic-auth credentials for the admin console.
///
/// Both values may legitimately be empty here; the access gate then rejects
/// every request rather than startup failing.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` if present (missing file falls back to an empty
    /// config), fill gaps from the environment, then validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.store.normalize_from_env();
        self.store.validate()?;
        self.admin.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow!("SERVER_PORT must be a port number"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("SUPABASE_URL") {
                self.url = url;
            }
        }
        if self.service_role_key.trim().is_empty() {
            if let Ok(key) = std::env::var("SUPABASE_SERVICE_ROLE_KEY") {
                self.service_role_key = key;
            }
        }
        // PostgREST paths are joined onto the base, so a trailing slash
        // would produce `//rest/v1`.
        while self.url.ends_with('/') {
            self.url.pop();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "store.url is empty; set it in config.toml or via SUPABASE_URL"
            ));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("store.url must start with http:// or https://"));
        }
        if self.service_role_key.trim().is_empty() {
            return Err(anyhow!(
                "store.service_role_key is empty; set it in config.toml or via SUPABASE_SERVICE_ROLE_KEY"
            ));
        }
        Ok(())
    }
}

impl AdminConfig {
    pub fn normalize_from_env(&mut self) {
        if self.user.trim().is_empty() {
            if let Ok(user) = std::env::var("ADMIN_USER") {
                self.user = user;
            }
        }
        if self.pass.trim().is_empty() {
            if let Ok(pass) = std::env::var("ADMIN_PASS") {
                self.pass = pass;
            }
        }
        self.user = self.user.trim().to_string();
        self.pass = self.pass.trim().to_string();
    }
}
