//! User entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub profile_name: Option<String>,
    pub avatar_url: Option<String>,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::essays::Entity")]
    Essays,
}

impl Related<super::essays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Essays.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Convert the database model into the business model
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{User, UserProfile, UserStatus};
        use chrono::{DateTime, Utc};

        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            status: self
                .status
                .parse::<UserStatus>()
                .unwrap_or(UserStatus::Inactive),
            profile: UserProfile {
                profile_name: self.profile_name,
                avatar_url: self.avatar_url,
            },
            last_login: self
                .last_login
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
