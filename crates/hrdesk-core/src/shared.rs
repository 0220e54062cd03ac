//! Shared configuration used by the core and the gateway.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on live chat sessions held by the gateway.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

/// Global application configuration (gateway + HR desk identity). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown by the status endpoint (e.g. "Chatbot RH").
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// CSV file holding the knowledge base (`profil,domaine,question,reponse`).
    pub knowledge_base_path: String,
    /// Base directory for Sled DBs (the feedback log path is derived from this).
    pub storage_path: String,
    /// Number of history entries returned per session (newest first).
    pub history_limit: usize,
    /// Live chat sessions kept by the gateway; the least recently active one is evicted beyond this.
    pub max_sessions: usize,
    /// HR contact shown alongside escalated answers.
    pub escalation_email: String,
    pub escalation_phone: String,
    pub escalation_intranet: String,

    /// If true, the gateway accepts browser requests from the UI port range.
    #[serde(default)]
    pub frontend_enabled: bool,
}

/// Human channel a user is routed to when the engine escalates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationContact {
    pub email: String,
    pub phone: String,
    pub intranet: String,
}

impl CoreConfig {
    /// Escalation contact block built from the `escalation_*` fields.
    pub fn escalation_contact(&self) -> EscalationContact {
        EscalationContact {
            email: self.escalation_email.clone(),
            phone: self.escalation_phone.clone(),
            intranet: self.escalation_intranet.clone(),
        }
    }

    /// Load config from file and environment. Precedence: env `HRDESK__*` > file at `HRDESK_CONFIG`
    /// (default `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("HRDESK_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        Self::load_from(&config_path)
    }

    /// Same as [`CoreConfig::load`] with an explicit file path (extension optional).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("app_name", "Chatbot RH")?
            .set_default("port", 8001_i64)?
            .set_default("knowledge_base_path", "RH_infos.csv")?
            .set_default("storage_path", "./data")?
            .set_default("history_limit", crate::session::DEFAULT_HISTORY_LIMIT as i64)?
            .set_default("max_sessions", DEFAULT_MAX_SESSIONS as i64)?
            .set_default("escalation_email", "rh@example.com")?
            .set_default("escalation_phone", "+33 1 00 00 00 00")?
            .set_default("escalation_intranet", "Intranet RH")?
            .set_default("frontend_enabled", false)?;

        let path = Path::new(config_path);
        let with_ext = path.with_extension("toml");
        let builder = if path.is_file() {
            builder.add_source(config::File::from(path))
        } else if with_ext.is_file() {
            builder.add_source(config::File::from(with_ext.as_path()))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("HRDESK").separator("__"))
            .build()?;

        built.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_file_is_missing() {
        let config = CoreConfig::load_from("/nonexistent/hrdesk/gateway").unwrap();
        assert_eq!(config.app_name, "Chatbot RH");
        assert_eq!(config.port, 8001);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert!(!config.frontend_enabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        std::fs::write(
            &path,
            "app_name = \"Desk Test\"\nport = 8042\nknowledge_base_path = \"kb.csv\"\nescalation_email = \"hr@corp.test\"\nfrontend_enabled = true\nmax_sessions = 12\n",
        )
        .unwrap();

        let config = CoreConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.app_name, "Desk Test");
        assert_eq!(config.port, 8042);
        assert_eq!(config.knowledge_base_path, "kb.csv");
        assert!(config.frontend_enabled);
        assert_eq!(config.max_sessions, 12);
        assert_eq!(config.escalation_contact().email, "hr@corp.test");
        assert_eq!(config.escalation_contact().intranet, "Intranet RH");
    }
}
