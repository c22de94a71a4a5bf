use chrono::{DateTime, Utc};

use crate::aggregate::Aggregate;
use crate::domain_event::EventRecorder;
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct UserLoggedIn {
    pub user_id: String,
    pub email: String,
    pub ip_address: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(UserLoggedIn, |e| {
    "user_id" => e.user_id,
    "email" => e.email,
    "ip_address" => e.ip_address,
});

#[derive(Debug, Clone, PartialEq)]
pub struct UserLoggedOut {
    pub user_id: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(UserLoggedOut, |e| {
    "user_id" => e.user_id,
});

#[derive(Debug, Clone, PartialEq)]
pub struct UserPasswordChanged {
    pub user_id: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(UserPasswordChanged, |e| {
    "user_id" => e.user_id,
});

/// 密码重置请求
///
/// 载荷中不含重置令牌：令牌的签发与持久化不属于事件中继。
#[derive(Debug, Clone, PartialEq)]
pub struct UserPasswordResetRequested {
    pub user_id: String,
    pub email: String,
    pub occurred_at: DateTime<Utc>,
}

domain_event!(UserPasswordResetRequested, |e| {
    "user_id" => e.user_id,
    "email" => e.email,
});

/// 用户聚合（仅会话与凭据相关的事件）
#[derive(Debug, Clone)]
pub struct User {
    id: String,
    email: String,
    password_hash: String,
    logged_in: bool,
    events: EventRecorder,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            logged_in: false,
            events: EventRecorder::new(),
        }
    }

    pub fn login(&mut self, ip_address: Option<String>) {
        self.logged_in = true;
        self.events.record(UserLoggedIn {
            user_id: self.id.clone(),
            email: self.email.clone(),
            ip_address,
            occurred_at: Utc::now(),
        });
    }

    pub fn logout(&mut self) -> DomainResult<()> {
        if !self.logged_in {
            return Err(DomainError::invalid_state(format!(
                "user {} is not logged in",
                self.id
            )));
        }

        self.logged_in = false;
        self.events.record(UserLoggedOut {
            user_id: self.id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    /// 更换密码哈希；与当前相同或为空时拒绝
    pub fn change_password(&mut self, new_hash: impl Into<String>) -> DomainResult<()> {
        let new_hash = new_hash.into();
        if new_hash.is_empty() {
            return Err(DomainError::invalid_value("password hash must not be empty"));
        }
        if new_hash == self.password_hash {
            return Err(DomainError::invalid_value(
                "new password must differ from the current one",
            ));
        }

        self.password_hash = new_hash;
        self.events.record(UserPasswordChanged {
            user_id: self.id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    pub fn request_password_reset(&mut self) {
        self.events.record(UserPasswordResetRequested {
            user_id: self.id.clone(),
            email: self.email.clone(),
            occurred_at: Utc::now(),
        });
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

impl Aggregate for User {
    const TYPE: &'static str = "user";
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn event_recorder(&self) -> &EventRecorder {
        &self.events
    }

    fn event_recorder_mut(&mut self) -> &mut EventRecorder {
        &mut self.events
    }
}
