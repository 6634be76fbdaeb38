use std::env;
use tracing::warn;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8001";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_NOTIFICATION_BUFFER: usize = 32;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub bind_address: String,
    pub notification_buffer: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            jwt_expiration_hours: parse_or_default("JWT_EXPIRATION_HOURS", DEFAULT_TOKEN_TTL_HOURS),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using default");
                    DEFAULT_BIND_ADDRESS.to_string()
                }),
            notification_buffer: parse_or_default("NOTIFICATION_BUFFER", DEFAULT_NOTIFICATION_BUFFER),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - JWT_SECRET is missing, authentication will fail");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    /// True when both PostgREST coordinates are present; otherwise documents stay in memory.
    pub fn uses_remote_store(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_hours: DEFAULT_TOKEN_TTL_HOURS,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            notification_buffer: DEFAULT_NOTIFICATION_BUFFER,
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value ({}), using default {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", key, default);
            default
        }
    }
}
