//! Evaluation entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub essay_id: i64,
    pub overall_score: i32,
    pub competency_1_score: i32,
    pub competency_2_score: i32,
    pub competency_3_score: i32,
    pub competency_4_score: i32,
    pub competency_5_score: i32,
    #[sea_orm(column_type = "Text")]
    pub competency_1_feedback: String,
    #[sea_orm(column_type = "Text")]
    pub competency_2_feedback: String,
    #[sea_orm(column_type = "Text")]
    pub competency_3_feedback: String,
    #[sea_orm(column_type = "Text")]
    pub competency_4_feedback: String,
    #[sea_orm(column_type = "Text")]
    pub competency_5_feedback: String,
    #[sea_orm(column_type = "Text")]
    pub general_feedback: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::essays::Entity",
        from = "Column::EssayId",
        to = "super::essays::Column::Id"
    )]
    Essay,
}

impl Related<super::essays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Essay.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Convert the database model into the business model
impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::Evaluation;
        use chrono::{DateTime, Utc};

        Evaluation {
            id: self.id,
            essay_id: self.essay_id,
            overall_score: self.overall_score,
            competency_1_score: self.competency_1_score,
            competency_2_score: self.competency_2_score,
            competency_3_score: self.competency_3_score,
            competency_4_score: self.competency_4_score,
            competency_5_score: self.competency_5_score,
            competency_1_feedback: self.competency_1_feedback,
            competency_2_feedback: self.competency_2_feedback,
            competency_3_feedback: self.competency_3_feedback,
            competency_4_feedback: self.competency_4_feedback,
            competency_5_feedback: self.competency_5_feedback,
            general_feedback: self.general_feedback,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
