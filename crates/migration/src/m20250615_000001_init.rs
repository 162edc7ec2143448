use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum BusinessArea {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Manager {
    Table,
    Id,
    Name,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
    Username,
    Role,
    ManagerId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Contract {
    Table,
    Id,
    ContractNumber,
    CustomerName,
    WbsCode,
    ProjectName,
    BusinessAreaId,
    ManagerId,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ContractHistory {
    Table,
    Id,
    ContractId,
    PreviousStatus,
    NewStatus,
    ModifiedBy,
    ModificationDate,
}

#[derive(DeriveIden)]
enum ContractManager {
    Table,
    ContractId,
    ManagerId,
}

#[derive(DeriveIden)]
enum ContractStatusEnum {
    #[sea_orm(iden = "contract_status")]
    Table,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

const CONTRACT_STATUS_VALUES: &[&str] = &["DRAFT", "ACTIVE", "EXPIRED", "CANCELLED"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let create_enum_sql = format!(
            "DO $$ BEGIN IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'contract_status') THEN CREATE TYPE contract_status AS ENUM ({}); END IF; END $$;",
            CONTRACT_STATUS_VALUES
                .iter()
                .map(|v| format!("'{}'", v))
                .collect::<Vec<_>>()
                .join(", ")
        );
        manager
            .get_connection()
            .execute_unprepared(&create_enum_sql)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessArea::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessArea::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(BusinessArea::Name)
                            .string_len(256)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Manager::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Manager::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Manager::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Manager::Email).string_len(320))
                    .col(
                        ColumnDef::new(Manager::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppUser::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(AppUser::Username)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AppUser::Role).string_len(16).not_null())
                    .col(ColumnDef::new(AppUser::ManagerId).uuid())
                    .col(
                        ColumnDef::new(AppUser::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AppUser::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_app_user_manager")
                            .from(AppUser::Table, AppUser::ManagerId)
                            .to(Manager::Table, Manager::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_app_user_username")
                    .table(AppUser::Table)
                    .col(AppUser::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contract::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contract::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(Contract::ContractNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contract::CustomerName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contract::WbsCode).string_len(64))
                    .col(ColumnDef::new(Contract::ProjectName).string_len(256))
                    .col(ColumnDef::new(Contract::BusinessAreaId).uuid().not_null())
                    .col(ColumnDef::new(Contract::ManagerId).uuid())
                    .col(ColumnDef::new(Contract::StartDate).date().not_null())
                    .col(ColumnDef::new(Contract::EndDate).date())
                    .col(
                        ColumnDef::new(Contract::Status)
                            .custom(ContractStatusEnum::Table)
                            .not_null()
                            .default(Expr::cust("'DRAFT'::contract_status")),
                    )
                    .col(
                        ColumnDef::new(Contract::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_business_area")
                            .from(Contract::Table, Contract::BusinessAreaId)
                            .to(BusinessArea::Table, BusinessArea::Id)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_manager")
                            .from(Contract::Table, Contract::ManagerId)
                            .to(Manager::Table, Manager::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contract_number")
                    .table(Contract::Table)
                    .col(Contract::ContractNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contract_status")
                    .table(Contract::Table)
                    .col(Contract::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contract_manager")
                    .table(Contract::Table)
                    .col(Contract::ManagerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContractHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContractHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(ContractHistory::ContractId).uuid().not_null())
                    .col(
                        ColumnDef::new(ContractHistory::PreviousStatus)
                            .custom(ContractStatusEnum::Table)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContractHistory::NewStatus)
                            .custom(ContractStatusEnum::Table)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContractHistory::ModifiedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ContractHistory::ModificationDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_history_contract")
                            .from(ContractHistory::Table, ContractHistory::ContractId)
                            .to(Contract::Table, Contract::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_history_user")
                            .from(ContractHistory::Table, ContractHistory::ModifiedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contract_history_contract")
                    .table(ContractHistory::Table)
                    .col(ContractHistory::ContractId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContractManager::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContractManager::ContractId).uuid().not_null())
                    .col(ColumnDef::new(ContractManager::ManagerId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ContractManager::ContractId)
                            .col(ContractManager::ManagerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_manager_contract")
                            .from(ContractManager::Table, ContractManager::ContractId)
                            .to(Contract::Table, Contract::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContractManager::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContractHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contract::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Manager::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessArea::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS contract_status;")
            .await?;
        Ok(())
    }
}
