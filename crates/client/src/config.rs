use adapter::{HttpConfig, Session};
use config::ConfigError;
use domain::User;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub transport: TransportSettings,
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    // 图片引用是相对路径时拼在这个前缀后面
    pub media_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TransportSettings {
    pub mode: TransportMode,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Http,
    Memory,
}

/// The externally provided login. Without a token every call is refused
/// with `Unauthorized`.
#[derive(Deserialize, Clone)]
pub struct SessionSettings {
    pub user_id: String,
    pub email: String,
    pub avatar: Option<String>,
    pub token: Option<String>,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("avatar", &self.avatar)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let s = config::Config::builder()
            .set_default("api.base_url", "http://localhost:3000")?
            .set_default("api.media_base_url", "http://localhost:3000/")?
            .set_default("api.timeout_secs", 30)?
            .set_default("transport.mode", "http")?
            .set_default("session.user_id", "guest")?
            .set_default("session.email", "")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(
                config::Environment::with_prefix("BLOGSPACE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    pub fn session(&self) -> Session {
        let user = User {
            avatar: self.session.avatar.clone().filter(|a| !a.is_empty()),
            ..User::new(self.session.user_id.as_str(), self.session.email.as_str())
        };
        Session::new(user, self.session.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>) -> Settings {
        Settings {
            api: ApiSettings {
                base_url: "http://localhost:3000".into(),
                media_base_url: "http://localhost:3000/".into(),
                timeout_secs: 5,
            },
            transport: TransportSettings {
                mode: TransportMode::Memory,
            },
            session: SessionSettings {
                user_id: "u1".into(),
                email: "ann@example.com".into(),
                avatar: Some(String::new()),
                token: token.map(str::to_string),
            },
        }
    }

    #[test]
    fn session_is_built_from_settings() {
        let session = settings(Some("abc")).session();
        assert_eq!(session.user_id().as_str(), "u1");
        assert_eq!(session.user().avatar, None);
        assert!(session.is_authenticated());

        assert!(!settings(None).session().is_authenticated());
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", settings(Some("secret-token")));
        assert!(!rendered.contains("secret-token"));
        assert_eq!(settings(None).http_config().timeout, Duration::from_secs(5));
    }
}
