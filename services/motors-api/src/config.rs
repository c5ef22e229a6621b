//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The JWT signing secret is loaded from the JWT_SECRET env var or
//! jwt_secret_file, never stored in the TOML directly to avoid leaking
//! secrets.

use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

/// HTTP listener settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Return full internal error detail to callers. Development only.
    #[serde(default)]
    pub expose_internal_errors: bool,
}

/// Session-store settings
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// Credential settings
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    #[serde(skip)]
    pub jwt_secret: Option<Secret<String>>,
    /// Path to a file containing the signing secret (alternative to the
    /// JWT_SECRET env var)
    #[serde(default)]
    pub jwt_secret_file: Option<PathBuf>,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
    /// Mark the refresh cookie Secure (HTTPS-only deployments)
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_max_connections() -> usize {
    1000
}

fn default_access_ttl() -> i64 {
    900
}

fn default_refresh_ttl() -> i64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_purge_interval() -> u64 {
    3600
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment
    /// variables.
    ///
    /// Signing-secret resolution order:
    /// 1. JWT_SECRET env var
    /// 2. jwt_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        if config.auth.access_token_ttl_secs <= 0 {
            return Err(common::Error::Config(
                "access_token_ttl_secs must be greater than 0".into(),
            ));
        }

        if config.auth.refresh_token_ttl_days <= 0 {
            return Err(common::Error::Config(
                "refresh_token_ttl_days must be greater than 0".into(),
            ));
        }

        // bcrypt only accepts this range; reject at startup, not mid-request
        if !(4..=31).contains(&config.auth.bcrypt_cost) {
            return Err(common::Error::Config(format!(
                "bcrypt_cost must be between 4 and 31, got: {}",
                config.auth.bcrypt_cost
            )));
        }

        if config.auth.purge_interval_secs == 0 {
            return Err(common::Error::Config(
                "purge_interval_secs must be greater than 0".into(),
            ));
        }

        // Resolve signing secret: env var takes precedence over file
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.is_empty() {
                config.auth.jwt_secret = Some(Secret::new(secret));
            }
        } else if let Some(ref secret_file) = config.auth.jwt_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read jwt_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.auth.jwt_secret = Some(Secret::new(secret));
            }
        }

        if config.auth.jwt_secret.is_none() {
            return Err(common::Error::Config(
                "JWT signing secret not set — provide JWT_SECRET or jwt_secret_file".into(),
            ));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("m-motors-api.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that mutate environment variables, preventing
    /// data races when tests run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    fn valid_toml() -> &'static str {
        r#"
[server]
listen_addr = "127.0.0.1:8080"

[store]
path = "data/store.json"

[auth]
"#
    }

    #[test]
    fn load_valid_config_with_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("motors-api-test-valid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        unsafe { set_env("JWT_SECRET", "env-signing-secret") };
        let config = Config::load(&path).unwrap();
        unsafe { remove_env("JWT_SECRET") };

        assert_eq!(config.server.listen_addr.port(), 8080);
        assert_eq!(config.server.max_connections, 1000);
        assert!(!config.server.expose_internal_errors);
        assert_eq!(config.store.path, PathBuf::from("data/store.json"));
        assert_eq!(config.auth.access_token_ttl_secs, 900);
        assert_eq!(config.auth.refresh_token_ttl_days, 7);
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert_eq!(config.auth.purge_interval_secs, 3600);
        assert!(!config.auth.cookie_secure);
        assert_eq!(
            config.auth.jwt_secret.as_ref().unwrap().expose(),
            "env-signing-secret"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_missing_file_errors() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_invalid_toml_errors() {
        let dir = std::env::temp_dir().join("motors-api-test-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "not valid {{{{ toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_secret_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("motors-api-test-nosecret");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        unsafe { remove_env("JWT_SECRET") };
        let result = Config::load(&path);
        assert!(matches!(result, Err(common::Error::Config(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn secret_from_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("motors-api-test-secretfile");
        std::fs::create_dir_all(&dir).unwrap();
        let secret_path = dir.join("jwt_secret");
        std::fs::write(&secret_path, "file-signing-secret\n").unwrap();

        let toml_content = format!(
            r#"
[server]
listen_addr = "127.0.0.1:8080"

[store]
path = "data/store.json"

[auth]
jwt_secret_file = "{}"
"#,
            secret_path.display()
        );
        let config_path = dir.join("config.toml");
        std::fs::write(&config_path, &toml_content).unwrap();

        unsafe { remove_env("JWT_SECRET") };
        let config = Config::load(&config_path).unwrap();
        assert_eq!(
            config.auth.jwt_secret.as_ref().unwrap().expose(),
            "file-signing-secret"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn env_secret_overrides_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("motors-api-test-override");
        std::fs::create_dir_all(&dir).unwrap();
        let secret_path = dir.join("jwt_secret");
        std::fs::write(&secret_path, "file-signing-secret").unwrap();

        let toml_content = format!(
            r#"
[server]
listen_addr = "127.0.0.1:8080"

[store]
path = "data/store.json"

[auth]
jwt_secret_file = "{}"
"#,
            secret_path.display()
        );
        let config_path = dir.join("config.toml");
        std::fs::write(&config_path, &toml_content).unwrap();

        unsafe { set_env("JWT_SECRET", "env-wins") };
        let config = Config::load(&config_path).unwrap();
        unsafe { remove_env("JWT_SECRET") };

        assert_eq!(config.auth.jwt_secret.as_ref().unwrap().expose(), "env-wins");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn out_of_range_bcrypt_cost_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("motors-api-test-cost");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
listen_addr = "127.0.0.1:8080"

[store]
path = "data/store.json"

[auth]
bcrypt_cost = 3
"#,
        )
        .unwrap();

        unsafe { set_env("JWT_SECRET", "env-signing-secret") };
        let result = Config::load(&path);
        unsafe { remove_env("JWT_SECRET") };

        assert!(matches!(result, Err(common::Error::Config(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn zero_ttl_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = std::env::temp_dir().join("motors-api-test-ttl");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
listen_addr = "127.0.0.1:8080"

[store]
path = "data/store.json"

[auth]
access_token_ttl_secs = 0
"#,
        )
        .unwrap();

        unsafe { set_env("JWT_SECRET", "env-signing-secret") };
        let result = Config::load(&path);
        unsafe { remove_env("JWT_SECRET") };

        assert!(matches!(result, Err(common::Error::Config(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resolve_path_prefers_cli_arg() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("CONFIG_PATH", "/from/env.toml") };
        assert_eq!(
            Config::resolve_path(Some("/from/cli.toml")),
            PathBuf::from("/from/cli.toml")
        );
        assert_eq!(
            Config::resolve_path(None),
            PathBuf::from("/from/env.toml")
        );
        unsafe { remove_env("CONFIG_PATH") };
        assert_eq!(
            Config::resolve_path(None),
            PathBuf::from("m-motors-api.toml")
        );
    }
}
