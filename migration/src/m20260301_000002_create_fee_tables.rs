use sea_orm_migration::prelude::*;

use crate::common::{Common, TableExt, tenant_index};
use crate::m20260301_000001_create_core_tables::Students;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 费用结构
        manager
            .create_table(
                Table::create()
                    .table(FeeStructures::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(FeeStructures::AcademicYearId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(FeeStructures::ClassId).big_integer().null())
                    .col(ColumnDef::new(FeeStructures::Name).string().not_null())
                    .col(ColumnDef::new(FeeStructures::FeeType).string().not_null())
                    .col(ColumnDef::new(FeeStructures::Amount).double().not_null())
                    .col(ColumnDef::new(FeeStructures::Description).text().null())
                    .col(
                        ColumnDef::new(FeeStructures::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        // 学生费用分配
        manager
            .create_table(
                Table::create()
                    .table(FeeAssignments::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(FeeAssignments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeAssignments::FeeStructureId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeAssignments::AcademicYearId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(FeeAssignments::ClassId).big_integer().null())
                    .col(
                        ColumnDef::new(FeeAssignments::OriginalAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeAssignments::AssignedAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeAssignments::PaidAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(FeeAssignments::RemainingAmount)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeAssignments::DueDate).date().not_null())
                    .col(ColumnDef::new(FeeAssignments::Status).string().not_null())
                    .col(ColumnDef::new(FeeAssignments::Notes).text().null())
                    .timestamps()
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeAssignments::Table, FeeAssignments::StudentId)
                            .to(Students::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeAssignments::Table, FeeAssignments::FeeStructureId)
                            .to(FeeStructures::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 缴费记录
        manager
            .create_table(
                Table::create()
                    .table(FeePayments::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(FeePayments::FeeAssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeePayments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(FeePayments::Amount).double().not_null())
                    .col(ColumnDef::new(FeePayments::PaymentDate).date().not_null())
                    .col(
                        ColumnDef::new(FeePayments::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeePayments::ReferenceNo).string().null())
                    .col(ColumnDef::new(FeePayments::ReceivedBy).big_integer().null())
                    .col(ColumnDef::new(FeePayments::Notes).text().null())
                    .col(ColumnDef::new(Common::CreatedAt).big_integer().not_null())
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeePayments::Table, FeePayments::FeeAssignmentId)
                            .to(FeeAssignments::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 费用减免
        manager
            .create_table(
                Table::create()
                    .table(FeeExceptions::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(FeeExceptions::FeeAssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeExceptions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeExceptions::ExceptionType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeExceptions::Value).double().not_null())
                    .col(
                        ColumnDef::new(FeeExceptions::ExceptionAmount)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeExceptions::Reason).text().not_null())
                    .col(ColumnDef::new(FeeExceptions::ApprovedBy).big_integer().null())
                    .col(
                        ColumnDef::new(FeeExceptions::ApprovedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeExceptions::ValidFrom).date().not_null())
                    .col(ColumnDef::new(FeeExceptions::ValidTo).date().null())
                    .col(
                        ColumnDef::new(FeeExceptions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .timestamps()
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeExceptions::Table, FeeExceptions::FeeAssignmentId)
                            .to(FeeAssignments::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 捐赠
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Donations::DonorName).string().not_null())
                    .col(ColumnDef::new(Donations::DonorEmail).string().null())
                    .col(ColumnDef::new(Donations::DonorPhone).string().null())
                    .col(ColumnDef::new(Donations::Amount).double().not_null())
                    .col(ColumnDef::new(Donations::DonationType).string().not_null())
                    .col(ColumnDef::new(Donations::Purpose).string().null())
                    .col(ColumnDef::new(Donations::DonationDate).date().not_null())
                    .col(
                        ColumnDef::new(Donations::TransactionId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Donations::ReceiptGenerated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Donations::Notes).text().null())
                    .col(ColumnDef::new(Donations::ReceivedBy).big_integer().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(tenant_index("idx_fee_structures_tenant", FeeStructures::Table))
            .await?;
        manager
            .create_index(tenant_index(
                "idx_fee_assignments_tenant",
                FeeAssignments::Table,
            ))
            .await?;
        manager
            .create_index(tenant_index("idx_fee_payments_tenant", FeePayments::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_fee_exceptions_tenant", FeeExceptions::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_donations_tenant", Donations::Table))
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fee_assignments_student")
                    .table(FeeAssignments::Table)
                    .col(FeeAssignments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fee_assignments_status")
                    .table(FeeAssignments::Table)
                    .col(FeeAssignments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fee_payments_assignment")
                    .table(FeePayments::Table)
                    .col(FeePayments::FeeAssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fee_payments_date")
                    .table(FeePayments::Table)
                    .col(FeePayments::PaymentDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeExceptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeStructures::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum FeeStructures {
    Table,
    AcademicYearId,
    ClassId,
    Name,
    FeeType,
    Amount,
    Description,
    IsActive,
}

#[derive(DeriveIden)]
enum FeeAssignments {
    Table,
    StudentId,
    FeeStructureId,
    AcademicYearId,
    ClassId,
    OriginalAmount,
    AssignedAmount,
    PaidAmount,
    RemainingAmount,
    DueDate,
    Status,
    Notes,
}

#[derive(DeriveIden)]
enum FeePayments {
    Table,
    FeeAssignmentId,
    StudentId,
    Amount,
    PaymentDate,
    PaymentMethod,
    ReferenceNo,
    ReceivedBy,
    Notes,
}

#[derive(DeriveIden)]
enum FeeExceptions {
    Table,
    FeeAssignmentId,
    StudentId,
    ExceptionType,
    Value,
    ExceptionAmount,
    Reason,
    ApprovedBy,
    ApprovedAt,
    ValidFrom,
    ValidTo,
    IsActive,
}

#[derive(DeriveIden)]
enum Donations {
    Table,
    DonorName,
    DonorEmail,
    DonorPhone,
    Amount,
    DonationType,
    Purpose,
    DonationDate,
    TransactionId,
    ReceiptGenerated,
    Notes,
    ReceivedBy,
}
