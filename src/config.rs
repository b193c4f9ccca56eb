use std::env;
use std::path::PathBuf;

/// Runtime configuration, read from the environment with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub public_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: String::from("localhost"),
            port: 8080,
            data_dir: PathBuf::from("data"),
            public_url: String::from("http://localhost:8080"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let host = env::var("WAITLINE_HOST").unwrap_or(defaults.host);
        let port = env::var("WAITLINE_PORT")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    log::warn!("ignoring unparseable WAITLINE_PORT={raw}");
                    None
                }
            })
            .unwrap_or(defaults.port);
        let data_dir = env::var("WAITLINE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let public_url =
            env::var("WAITLINE_PUBLIC_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));

        Config {
            host,
            port,
            data_dir,
            public_url,
        }
    }

    /// The user-facing join URL for a queue, the one the QR image encodes.
    pub fn join_url(&self, queue_id: &str) -> String {
        format!("{}/queue/{}", self.public_url.trim_end_matches('/'), queue_id)
    }
}
