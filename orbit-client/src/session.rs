//! 访客会话
//!
//! 匿名访客在本次客户端会话中自动以内置访客账号登录一次，
//! 已有令牌时不做任何事。

use async_trait::async_trait;
use shared::client::LoginResponse;

use crate::{ClientResult, HttpClient};

/// Something that can hold a token and sign in as the guest account
#[async_trait]
pub trait GuestLogin: Send {
    fn has_token(&self) -> bool;
    async fn guest_login(&mut self) -> ClientResult<LoginResponse>;
}

#[async_trait]
impl GuestLogin for HttpClient {
    fn has_token(&self) -> bool {
        self.token().is_some()
    }

    async fn guest_login(&mut self) -> ClientResult<LoginResponse> {
        HttpClient::guest_login(self).await
    }
}

#[derive(Debug, Default)]
pub struct GuestSession {
    attempted: bool,
}

impl GuestSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 确保存在会话；返回本次是否完成了访客登录
    ///
    /// 只尝试一次，失败后本会话不再重试。
    pub async fn ensure_session<C: GuestLogin + ?Sized>(&mut self, client: &mut C) -> ClientResult<bool> {
        if client.has_token() || self.attempted {
            return Ok(false);
        }
        self.attempted = true;

        let response = client.guest_login().await?;
        tracing::info!(user_id = response.user.id, "Signed in as guest");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use shared::client::UserInfo;
    use shared::models::Role;

    #[derive(Default)]
    struct FakeClient {
        token: Option<String>,
        logins: usize,
        fail: bool,
    }

    #[async_trait]
    impl GuestLogin for FakeClient {
        fn has_token(&self) -> bool {
            self.token.is_some()
        }

        async fn guest_login(&mut self) -> ClientResult<LoginResponse> {
            self.logins += 1;
            if self.fail {
                return Err(ClientError::Unauthorized("guest disabled".into()));
            }
            self.token = Some("guest-token".into());
            Ok(LoginResponse {
                token: "guest-token".into(),
                user: UserInfo {
                    id: 7,
                    username: "guest".into(),
                    email: None,
                    role: Role::User,
                },
            })
        }
    }

    #[tokio::test]
    async fn test_logs_in_once() {
        let mut session = GuestSession::new();
        let mut client = FakeClient::default();

        assert!(session.ensure_session(&mut client).await.unwrap());
        assert!(!session.ensure_session(&mut client).await.unwrap());
        assert_eq!(client.logins, 1);
        assert_eq!(client.token.as_deref(), Some("guest-token"));
    }

    #[tokio::test]
    async fn test_existing_token_is_kept() {
        let mut session = GuestSession::new();
        let mut client = FakeClient {
            token: Some("user-token".into()),
            ..Default::default()
        };

        assert!(!session.ensure_session(&mut client).await.unwrap());
        assert_eq!(client.logins, 0);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let mut session = GuestSession::new();
        let mut client = FakeClient {
            fail: true,
            ..Default::default()
        };

        assert!(session.ensure_session(&mut client).await.is_err());
        assert!(!session.ensure_session(&mut client).await.unwrap());
        assert_eq!(client.logins, 1);
    }
}
