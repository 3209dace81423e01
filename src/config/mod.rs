use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub cloudinary: CloudinaryConfig,
    pub email: EmailConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
    pub enable_query_logging: bool,
}

/// Static credentials for the `/admin` Basic-Auth gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub realm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub property_folder: String,
    pub agent_folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub resend_api_key: String,
    pub from_address: String,
    pub inquiry_recipients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_per_page: i64,
    pub max_per_page: i64,
    pub featured_limit: i64,
    pub debug_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Environment presets first, specific env vars override
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging =
                v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // Admin gate overrides
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.admin.username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.admin.password = v;
        }
        if let Ok(v) = env::var("ADMIN_REALM") {
            self.admin.realm = v;
        }

        // Cloudinary overrides
        if let Ok(v) = env::var("CLOUDINARY_CLOUD_NAME") {
            self.cloudinary.cloud_name = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_KEY") {
            self.cloudinary.api_key = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_SECRET") {
            self.cloudinary.api_secret = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_PROPERTY_FOLDER") {
            self.cloudinary.property_folder = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_AGENT_FOLDER") {
            self.cloudinary.agent_folder = v;
        }

        // Email overrides
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.email.resend_api_key = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM_ADDRESS") {
            self.email.from_address = v;
        }
        if let Ok(v) = env::var("EMAIL_INQUIRY_RECIPIENTS") {
            self.email.inquiry_recipients = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Search overrides
        if let Ok(v) = env::var("SEARCH_DEFAULT_PER_PAGE") {
            self.search.default_per_page = v.parse().unwrap_or(self.search.default_per_page);
        }
        if let Ok(v) = env::var("SEARCH_MAX_PER_PAGE") {
            self.search.max_per_page = v.parse().unwrap_or(self.search.max_per_page);
        }
        if let Ok(v) = env::var("SEARCH_FEATURED_LIMIT") {
            self.search.featured_limit = v.parse().unwrap_or(self.search.featured_limit);
        }
        if let Ok(v) = env::var("SEARCH_DEBUG_LOGGING") {
            self.search.debug_logging = v.parse().unwrap_or(self.search.debug_logging);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
                enable_query_logging: true,
            },
            admin: AdminConfig {
                username: String::new(),
                password: String::new(),
                realm: "Admin Area".to_string(),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                property_folder: "immokraini_properties".to_string(),
                agent_folder: "immokraini_agents".to_string(),
            },
            email: EmailConfig {
                resend_api_key: String::new(),
                from_address: "ImmoKraini Inquiry <onboarding@resend.dev>".to_string(),
                inquiry_recipients: vec![],
            },
            search: SearchConfig {
                default_per_page: 12,
                max_per_page: 100,
                featured_limit: 4,
                debug_logging: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout_secs: 5,
                enable_query_logging: false,
            },
            admin: AdminConfig {
                username: String::new(),
                password: String::new(),
                realm: "Admin Area".to_string(),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                property_folder: "immokraini_properties".to_string(),
                agent_folder: "immokraini_agents".to_string(),
            },
            email: EmailConfig {
                resend_api_key: String::new(),
                from_address: "ImmoKraini Inquiry <onboarding@resend.dev>".to_string(),
                inquiry_recipients: vec![],
            },
            search: SearchConfig {
                default_per_page: 12,
                max_per_page: 50,
                featured_limit: 4,
                debug_logging: false,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.search.default_per_page, 12);
        assert_eq!(config.search.max_per_page, 100);
        assert!(config.database.enable_query_logging);
    }

    #[test]
    fn production_tightens_limits() {
        let config = AppConfig::production();
        assert_eq!(config.search.max_per_page, 50);
        assert!(!config.database.enable_query_logging);
        assert!(!config.search.debug_logging);
    }
}
