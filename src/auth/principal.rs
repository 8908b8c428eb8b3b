use crate::models::common::UserRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Principal {
    User { user_id: i32 },
    Provider { provider_id: i32 },
}

impl Principal {
    pub fn from_role(id: i32, role: UserRole) -> Self {
        match role {
            UserRole::User => Principal::User { user_id: id },
            UserRole::Provider => Principal::Provider { provider_id: id },
        }
    }

    /// The `users.user_id` behind the session, whatever the role.
    pub fn id(&self) -> i32 {
        match self {
            Principal::User { user_id } => *user_id,
            Principal::Provider { provider_id } => *provider_id,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            Principal::User { .. } => UserRole::User,
            Principal::Provider { .. } => UserRole::Provider,
        }
    }
}
