//! User provisioning from identity-provider tokens.

use chrono::Utc;
use hushboard_common::AppResult;
use hushboard_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An authenticated identity as asserted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub is_anonymous: bool,
    pub display_name: Option<String>,
}

/// User service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    admin_uids: Vec<String>,
}

impl UserService {
    /// Create a user service. Uids in `admin_uids` are provisioned as admins.
    #[must_use]
    pub const fn new(user_repo: UserRepository, admin_uids: Vec<String>) -> Self {
        Self {
            user_repo,
            admin_uids,
        }
    }

    fn is_allowlisted(&self, uid: &str) -> bool {
        self.admin_uids.iter().any(|a| a == uid)
    }

    /// Fetch or create the user row for `identity`, refreshing `last_seen_at`.
    ///
    /// An allowlisted uid is promoted to admin. The role is never demoted
    /// here, so admins granted out of band keep their role.
    pub async fn ensure_user(&self, identity: &Identity) -> AppResult<user::Model> {
        let allowlisted = self.is_allowlisted(&identity.uid);

        if let Some(existing) = self.user_repo.find_by_id(&identity.uid).await? {
            return self.refresh(existing, identity, allowlisted).await;
        }

        let now = Utc::now();
        let role = if allowlisted {
            UserRole::Admin
        } else {
            UserRole::User
        };
        let model = user::ActiveModel {
            id: Set(identity.uid.clone()),
            display_name: Set(identity.display_name.clone()),
            is_anonymous: Set(identity.is_anonymous),
            role: Set(role),
            created_at: Set(now.into()),
            last_seen_at: Set(now.into()),
        };

        match self.user_repo.create(model).await {
            Ok(created) => {
                info!(user_id = %created.id, role = ?created.role, "Provisioned user");
                Ok(created)
            }
            Err(e) => {
                // A concurrent first request provisioned the same uid.
                let Some(existing) = self.user_repo.find_by_id(&identity.uid).await? else {
                    return Err(e);
                };
                debug!(user_id = %existing.id, "User provisioned concurrently");
                self.refresh(existing, identity, allowlisted).await
            }
        }
    }

    async fn refresh(
        &self,
        existing: user::Model,
        identity: &Identity,
        allowlisted: bool,
    ) -> AppResult<user::Model> {
        let now = Utc::now();

        let promote = allowlisted && !existing.is_admin();
        let mut active: user::ActiveModel = existing.into();
        active.last_seen_at = Set(now.into());
        active.is_anonymous = Set(identity.is_anonymous);
        if identity.display_name.is_some() {
            active.display_name = Set(identity.display_name.clone());
        }
        if promote {
            active.role = Set(UserRole::Admin);
        }

        let updated = self.user_repo.update(active).await?;
        if promote {
            info!(user_id = %updated.id, "Promoted allowlisted user to admin");
        }
        Ok(updated)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hushboard_common::AppError;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};
    use std::sync::Arc;

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            display_name: None,
            is_anonymous: false,
            role,
            created_at: Utc::now().into(),
            last_seen_at: Utc::now().into(),
        }
    }

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: uid.to_string(),
            is_anonymous: false,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_ensure_user_provisions_admin() {
        let created = create_test_user("uid-admin", UserRole::Admin);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[created]])
            .into_connection();
        let service = UserService::new(
            UserRepository::new(Arc::new(db)),
            vec!["uid-admin".to_string()],
        );

        let user = service.ensure_user(&identity("uid-admin")).await.unwrap();

        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_ensure_user_refreshes_existing() {
        let existing = create_test_user("uid1", UserRole::User);
        let updated = existing.clone();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_query_results([[updated]])
            .into_connection();
        let service = UserService::new(UserRepository::new(Arc::new(db)), Vec::new());

        let user = service.ensure_user(&identity("uid1")).await.unwrap();

        assert_eq!(user.id, "uid1");
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_ensure_user_concurrent_first_request() {
        let winner = create_test_user("uid1", UserRole::User);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \"user_pkey\"".to_string(),
            ))])
            .append_query_results([[winner.clone()]])
            .append_query_results([[winner]])
            .into_connection();
        let service = UserService::new(UserRepository::new(Arc::new(db)), Vec::new());

        let user = service.ensure_user(&identity("uid1")).await.unwrap();

        assert_eq!(user.id, "uid1");
    }

    #[tokio::test]
    async fn test_ensure_user_insert_failure_propagates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "connection reset".to_string(),
            ))])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = UserService::new(UserRepository::new(Arc::new(db)), Vec::new());

        let result = service.ensure_user(&identity("uid1")).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
