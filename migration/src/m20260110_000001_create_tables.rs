use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::ProfileName).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Essays table
        manager
            .create_table(
                Table::create()
                    .table(Essays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Essays::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Essays::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Essays::Title).string().not_null())
                    .col(ColumnDef::new(Essays::Theme).string().null())
                    .col(ColumnDef::new(Essays::ImagePath).string().not_null())
                    .col(ColumnDef::new(Essays::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Essays::RawTranscription).text().null())
                    .col(ColumnDef::new(Essays::Transcription).text().null())
                    .col(ColumnDef::new(Essays::Status).string().not_null())
                    .col(ColumnDef::new(Essays::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Essays::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Essays::Table, Essays::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_essays_user_id")
                    .table(Essays::Table)
                    .col(Essays::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_essays_user_id_status")
                    .table(Essays::Table)
                    .col(Essays::UserId)
                    .col(Essays::Status)
                    .to_owned(),
            )
            .await?;

        // Evaluations table
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EssayId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::OverallScore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency1Score)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency2Score)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency3Score)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency4Score)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency5Score)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency1Feedback)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency2Feedback)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency3Feedback)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency4Feedback)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Competency5Feedback)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::GeneralFeedback)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::EssayId)
                            .to(Essays::Table, Essays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_essay_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::EssayId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Essays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Status,
    ProfileName,
    AvatarUrl,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Essays {
    Table,
    Id,
    UserId,
    Title,
    Theme,
    ImagePath,
    ImageUrl,
    RawTranscription,
    Transcription,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    Table,
    Id,
    EssayId,
    OverallScore,
    Competency1Score,
    Competency2Score,
    Competency3Score,
    Competency4Score,
    Competency5Score,
    Competency1Feedback,
    Competency2Feedback,
    Competency3Feedback,
    Competency4Feedback,
    Competency5Feedback,
    GeneralFeedback,
    CreatedAt,
}
