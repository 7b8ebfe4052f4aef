use domain::{ClientError, Result, User, UserId};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

// 当前用户和凭证，构造时显式传入
#[derive(Debug, Clone)]
pub struct Session {
    user: User,
    token: Option<BearerToken>,
}

impl Session {
    pub fn new(user: User, token: Option<String>) -> Self {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .map(BearerToken::new);
        Self { user, token }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn bearer(&self) -> Result<&BearerToken> {
        self.token
            .as_ref()
            .ok_or_else(|| ClientError::Unauthorized("session carries no credential".to_string()))
    }
}
