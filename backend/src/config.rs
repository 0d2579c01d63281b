use serde::Deserialize;
use std::env;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CHART_LIMIT: usize = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// `None` runs the service against the in-memory store
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub ranking: RankingConfig,
    /// JSON fixture applied to the store at startup
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub rust_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    /// Number of leaders plotted in the evolution series
    pub chart_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => {
                let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
                    Ok(value) => value.parse()?,
                    Err(_) => DEFAULT_MAX_CONNECTIONS,
                };
                Some(DatabaseConfig { url, max_connections })
            }
            _ => None,
        };

        let port: u16 = env::var("PORT")?.parse()?;
        let host = env::var("HOST")?;
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let chart_limit = match env::var("RANKING_CHART_LIMIT") {
            Ok(value) => value.parse()?,
            Err(_) => DEFAULT_CHART_LIMIT,
        };

        let seed_file = env::var("SEED_FILE")
            .ok()
            .filter(|path| !path.trim().is_empty());

        Ok(Config {
            database,
            server: ServerConfig { port, host, rust_log },
            ranking: RankingConfig { chart_limit },
            seed_file,
        })
    }

    /// Filter used when `RUST_LOG` holds a bare level rather than directives
    pub fn log_filter(&self) -> String {
        let level = self.server.rust_log.trim();
        if level.contains('=') || level.contains(',') {
            level.to_string()
        } else {
            format!("bolao_backend={}", level)
        }
    }
}
