//! Essay entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "essays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub theme: Option<String>,
    pub image_path: String,
    pub image_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub raw_transcription: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub transcription: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Convert the database model into the business model
impl Model {
    pub fn into_essay(self) -> crate::models::essays::entities::Essay {
        use crate::models::essays::entities::{Essay, EssayStatus};
        use chrono::{DateTime, Utc};

        Essay {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            theme: self.theme,
            image_path: self.image_path,
            image_url: self.image_url,
            raw_transcription: self.raw_transcription,
            transcription: self.transcription,
            status: self
                .status
                .parse::<EssayStatus>()
                .unwrap_or(EssayStatus::Uploaded),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
