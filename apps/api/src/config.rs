// Process configuration
// Read once at startup from the environment (after `.env` is loaded)

use std::env;
use std::net::SocketAddr;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("either DATABASE_URL or DB_HOST must be set")]
    MissingDatabase,

    #[error("{0} environment variable is required when DB_HOST is set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: PgConnectOptions,
    pub server_port: u16,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    ///
    /// `DATABASE_URL` wins over the discrete `DB_*` variables. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database = match (var("DATABASE_URL"), var("DB_HOST")) {
            (Some(url), _) => url.parse::<PgConnectOptions>().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_URL",
                expected: "PostgreSQL connection URL",
                value: url,
            })?,
            (None, Some(host)) => {
                let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));
                let port: u16 = parse("DB_PORT", required("DB_PORT")?, "port number")?;

                // Credentials are passed as-is; no URL encoding involved
                PgConnectOptions::new()
                    .host(&host)
                    .port(port)
                    .username(&required("DB_USER")?)
                    .password(&required("DB_PASSWORD")?)
                    .database(&required("DB_NAME")?)
            }
            (None, None) => return Err(ConfigError::MissingDatabase),
        };

        let server_port = match var("SERVER_PORT") {
            Some(value) => parse("SERVER_PORT", value, "port number")?,
            None => DEFAULT_SERVER_PORT,
        };

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse("DATABASE_MAX_CONNECTIONS", value, "number")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let run_migrations = match var("RUN_MIGRATIONS") {
            Some(value) => parse("RUN_MIGRATIONS", value, "boolean")?,
            None => true,
        };

        Ok(Config {
            database,
            server_port,
            max_connections,
            run_migrations,
        })
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.server_port))
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn database_is_required() {
        let err = config_from(&[("SERVER_PORT", "9090")]).unwrap_err();

        assert_eq!(err, ConfigError::MissingDatabase);
    }

    #[test]
    fn defaults_with_database_url() {
        let config = config_from(&[("DATABASE_URL", "postgres://app@db:5433/reviews")]).unwrap();

        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_port(), 5433);
        assert_eq!(config.database.get_username(), "app");
        assert_eq!(config.database.get_database(), Some("reviews"));
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
        assert_eq!(config.bind_address().port(), 8080);
    }

    #[test]
    fn database_url_wins_over_discrete_vars() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://app@db/reviews"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.database.get_host(), "db");
    }

    #[test]
    fn malformed_database_url_is_rejected() {
        let err = config_from(&[("DATABASE_URL", "not a url")]).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { name: "DATABASE_URL", .. }));
    }

    #[test]
    fn discrete_vars_build_connect_options() {
        let config = config_from(&[
            ("DB_HOST", "localhost"),
            ("DB_PORT", "5433"),
            ("DB_USER", "review"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "assigner"),
            ("SERVER_PORT", "9090"),
        ])
        .unwrap();

        assert_eq!(config.database.get_host(), "localhost");
        assert_eq!(config.database.get_port(), 5433);
        assert_eq!(config.database.get_username(), "review");
        assert_eq!(config.database.get_database(), Some("assigner"));
        assert_eq!(config.server_port, 9090);
    }

    #[test]
    fn credentials_with_url_delimiters_are_kept_verbatim() {
        let config = config_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "5432"),
            ("DB_USER", "ops@team"),
            ("DB_PASSWORD", "p@ss:w/rd#1"),
            ("DB_NAME", "assigner"),
        ])
        .unwrap();

        assert_eq!(config.database.get_host(), "db.internal");
        assert_eq!(config.database.get_port(), 5432);
        assert_eq!(config.database.get_username(), "ops@team");
        assert_eq!(config.database.get_database(), Some("assigner"));
    }

    #[test]
    fn discrete_vars_must_be_complete() {
        let err = config_from(&[("DB_HOST", "localhost"), ("DB_PORT", "5432")]).unwrap_err();

        assert_eq!(err, ConfigError::Missing("DB_USER"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://app@db/reviews"),
            ("SERVER_PORT", "eighty"),
        ])
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { name: "SERVER_PORT", .. }));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[
            ("DATABASE_URL", "  "),
            ("DB_HOST", "localhost"),
            ("DB_PORT", "5432"),
            ("DB_USER", "review"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "assigner"),
            ("RUN_MIGRATIONS", "false"),
        ])
        .unwrap();

        assert_eq!(config.database.get_host(), "localhost");
        assert!(!config.run_migrations);
    }
}
