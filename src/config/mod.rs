// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file, looked up as `config.toml` in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources in order of precedence: `BOARD_` environment variables
    /// (`__` separates nested keys), the config file, built-in defaults.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, None)
    }

    /// Same as `load_from`, reading variables from `env` instead of the
    /// process environment when given
    fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BOARD")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "feedboard")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("board.title", "Bulletin Board")?
            .set_default("board.upload_dir", "uploads")?
            .set_default("board.upload_url_prefix", "/uploads")?
            .set_default("board.public_dir", "public")?
            .set_default("board.max_upload_size", 5_242_880)? // 5MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("definitely-missing-config").unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.board.upload_url_prefix, "/uploads");
        assert_eq!(cfg.board.max_upload_size, 5 * 1024 * 1024);
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(
            &path,
            "[server]\nport = 4100\n\n[board]\ntitle = \"Notes\"\nmax_upload_size = 1024\n",
        )
        .unwrap();

        let stem = dir.path().join("board");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 4100);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.board.title, "Notes");
        assert_eq!(cfg.board.max_upload_size, 1024);
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("board.toml"),
            "[server]\nport = 4100\n\n[board]\ntitle = \"Notes\"\nmax_upload_size = 1024\n",
        )
        .unwrap();

        let env: config::Map<String, String> = [
            ("BOARD_SERVER__PORT", "4200"),
            ("BOARD_BOARD__TITLE", "Env Board"),
            ("BOARD_LOGGING__ACCESS_LOG_FORMAT", "json"),
            ("OTHER_SERVER__PORT", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let stem = dir.path().join("board");
        let cfg = Config::load_with_env(stem.to_str().unwrap(), Some(env)).unwrap();
        assert_eq!(cfg.server.port, 4200);
        assert_eq!(cfg.board.title, "Env Board");
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.board.max_upload_size, 1024);
        assert_eq!(cfg.server.host, "127.0.0.1");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("definitely-missing-config").unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 3000);
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
