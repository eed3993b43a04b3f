use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RANKINGS_PATH: &str = ".data/rankings.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub rankings_path: String,
    pub session_seed: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidRankingsPath,
    InvalidSessionSeed,
    NonUnicodeListenAddr,
    NonUnicodeRankingsPath,
    NonUnicodeSessionSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "GAME_SERVER_ADDR is not a valid socket address: {err}")
            }
            Self::InvalidRankingsPath => {
                write!(f, "GAME_RANKINGS_PATH must not be empty or whitespace")
            }
            Self::InvalidSessionSeed => {
                write!(f, "GAME_SESSION_SEED must be an unsigned 64-bit integer")
            }
            Self::NonUnicodeListenAddr => {
                write!(f, "GAME_SERVER_ADDR contains non-unicode data")
            }
            Self::NonUnicodeRankingsPath => {
                write!(f, "GAME_RANKINGS_PATH contains non-unicode data")
            }
            Self::NonUnicodeSessionSeed => {
                write!(f, "GAME_SESSION_SEED contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            Self::InvalidRankingsPath => None,
            Self::InvalidSessionSeed => None,
            Self::NonUnicodeListenAddr => None,
            Self::NonUnicodeRankingsPath => None,
            Self::NonUnicodeSessionSeed => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var("GAME_SERVER_ADDR") {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeListenAddr);
            }
        };

        let rankings_path = match env::var("GAME_RANKINGS_PATH") {
            Ok(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidRankingsPath);
                }
                value
            }
            Err(env::VarError::NotPresent) => DEFAULT_RANKINGS_PATH.to_owned(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeRankingsPath);
            }
        };

        let session_seed = match env::var("GAME_SESSION_SEED") {
            Ok(value) => Some(
                value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSessionSeed)?,
            ),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeSessionSeed);
            }
        };

        Ok(Self {
            listen_addr,
            rankings_path,
            session_seed,
        })
    }
}
