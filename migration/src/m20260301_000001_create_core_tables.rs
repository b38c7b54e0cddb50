use sea_orm_migration::prelude::*;

use crate::common::{Common, TableExt, tenant_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 组织与学校 ====================
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .id()
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .col(
                        ColumnDef::new(Organizations::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Organizations::Email).string().null())
                    .col(ColumnDef::new(Organizations::Phone).string().null())
                    .col(ColumnDef::new(Organizations::Address).text().null())
                    .col(
                        ColumnDef::new(Organizations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .id()
                    .col(
                        ColumnDef::new(Common::OrganizationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Schools::Name).string().not_null())
                    .col(ColumnDef::new(Schools::Code).string().not_null())
                    .col(ColumnDef::new(Schools::Address).text().null())
                    .col(ColumnDef::new(Schools::Phone).string().null())
                    .col(ColumnDef::new(Schools::Email).string().null())
                    .col(ColumnDef::new(Schools::PrincipalName).string().null())
                    .col(
                        ColumnDef::new(Schools::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .timestamps()
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(Schools::Table, Common::OrganizationId)
                            .to(Organizations::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 用户 ====================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .id()
                    .col(ColumnDef::new(Common::OrganizationId).big_integer().null())
                    .col(ColumnDef::new(Users::DefaultSchoolId).big_integer().null())
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
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .timestamps()
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Common::OrganizationId)
                            .to(Organizations::Table, Common::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 教务基础 ====================
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(AcademicYears::Name).string().not_null())
                    .col(ColumnDef::new(AcademicYears::StartDate).date().not_null())
                    .col(ColumnDef::new(AcademicYears::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(AcademicYears::IsCurrent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Buildings::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Buildings::Name).string().not_null())
                    .col(ColumnDef::new(Buildings::Description).text().null())
                    .col(ColumnDef::new(Buildings::Floors).integer().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Rooms::BuildingId).big_integer().null())
                    .col(ColumnDef::new(Rooms::RoomNumber).string().not_null())
                    .col(ColumnDef::new(Rooms::Capacity).integer().null())
                    .col(ColumnDef::new(Rooms::RoomType).string().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Classes::AcademicYearId).big_integer().null())
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::Section).string().null())
                    .col(ColumnDef::new(Classes::GradeLevel).integer().null())
                    .col(ColumnDef::new(Classes::ClassTeacherId).big_integer().null())
                    .col(ColumnDef::new(Classes::RoomId).big_integer().null())
                    .col(ColumnDef::new(Classes::Capacity).integer().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        // ==================== 学生与教职工 ====================
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Students::ClassId).big_integer().null())
                    .col(ColumnDef::new(Students::AdmissionNo).string().not_null())
                    .col(ColumnDef::new(Students::FullName).string().not_null())
                    .col(ColumnDef::new(Students::FatherName).string().null())
                    .col(ColumnDef::new(Students::Gender).string().not_null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().null())
                    .col(ColumnDef::new(Students::GuardianName).string().null())
                    .col(ColumnDef::new(Students::GuardianPhone).string().null())
                    .col(ColumnDef::new(Students::Address).text().null())
                    .col(ColumnDef::new(Students::AdmissionDate).date().null())
                    .col(ColumnDef::new(Students::Status).string().not_null())
                    .timestamps()
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Common::SchoolId)
                            .to(Schools::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Staff::UserId).big_integer().null())
                    .col(ColumnDef::new(Staff::EmployeeId).string().not_null())
                    .col(ColumnDef::new(Staff::FullName).string().not_null())
                    .col(ColumnDef::new(Staff::Email).string().null())
                    .col(ColumnDef::new(Staff::Phone).string().null())
                    .col(ColumnDef::new(Staff::Department).string().null())
                    .col(ColumnDef::new(Staff::Designation).string().null())
                    .col(ColumnDef::new(Staff::HireDate).date().null())
                    .col(ColumnDef::new(Staff::Salary).double().null())
                    .col(ColumnDef::new(Staff::Status).string().not_null())
                    .timestamps()
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(Staff::Table, Staff::UserId)
                            .to(Users::Table, Common::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 课表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Timetables::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(Timetables::AcademicYearId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Timetables::Name).string().not_null())
                    .col(
                        ColumnDef::new(Timetables::TimetableType)
                            .string()
                            .not_null()
                            .default("teaching"),
                    )
                    .col(ColumnDef::new(Timetables::Description).text().null())
                    .col(
                        ColumnDef::new(Timetables::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Timetables::CreatedBy).big_integer().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TimetableEntries::Table)
                    .if_not_exists()
                    .id()
                    .col(
                        ColumnDef::new(TimetableEntries::TimetableId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimetableEntries::RoomId).big_integer().null())
                    .col(
                        ColumnDef::new(TimetableEntries::DayOfWeek)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::PeriodOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimetableEntries::StartTime)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimetableEntries::EndTime).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(TimetableEntries::Table, TimetableEntries::TimetableId)
                            .to(Timetables::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeacherPreferences::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(TeacherPreferences::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPreferences::AcademicYearId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPreferences::PreferredDays)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPreferences::UnavailablePeriods)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPreferences::MaxPeriodsPerDay)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(TeacherPreferences::Notes).text().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        // ==================== 考勤与考试 ====================
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(AttendanceRecords::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Date).date().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Status).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Remarks).text().null())
                    .col(
                        ColumnDef::new(AttendanceRecords::MarkedBy)
                            .big_integer()
                            .null(),
                    )
                    .timestamps()
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::StudentId)
                            .to(Students::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Exams::AcademicYearId).big_integer().null())
                    .col(ColumnDef::new(Exams::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Exams::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Exams::Name).string().not_null())
                    .col(ColumnDef::new(Exams::ExamType).string().not_null())
                    .col(ColumnDef::new(Exams::ExamDate).date().null())
                    .col(ColumnDef::new(Exams::TotalMarks).double().not_null())
                    .col(ColumnDef::new(Exams::PassMarks).double().not_null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExamResults::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(ExamResults::ExamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ExamResults::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamResults::MarksObtained)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamResults::Percentage).double().not_null())
                    .col(ColumnDef::new(ExamResults::Grade).string().not_null())
                    .col(ColumnDef::new(ExamResults::IsPass).boolean().not_null())
                    .col(ColumnDef::new(ExamResults::Remarks).text().null())
                    .timestamps()
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamResults::Table, ExamResults::ExamId)
                            .to(Exams::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 图书馆 ====================
        manager
            .create_table(
                Table::create()
                    .table(LibraryBooks::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(LibraryBooks::Title).string().not_null())
                    .col(ColumnDef::new(LibraryBooks::Author).string().null())
                    .col(ColumnDef::new(LibraryBooks::Isbn).string().null())
                    .col(ColumnDef::new(LibraryBooks::Category).string().null())
                    .col(ColumnDef::new(LibraryBooks::Publisher).string().null())
                    .col(
                        ColumnDef::new(LibraryBooks::TotalCopies)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryBooks::AvailableCopies)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LibraryBooks::ShelfLocation).string().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LibraryLoans::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(LibraryLoans::BookId).big_integer().not_null())
                    .col(
                        ColumnDef::new(LibraryLoans::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LibraryLoans::IssueDate).date().not_null())
                    .col(ColumnDef::new(LibraryLoans::DueDate).date().not_null())
                    .col(ColumnDef::new(LibraryLoans::ReturnDate).date().null())
                    .col(ColumnDef::new(LibraryLoans::Status).string().not_null())
                    .col(
                        ColumnDef::new(LibraryLoans::FineAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(LibraryLoans::Notes).text().null())
                    .timestamps()
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(LibraryLoans::Table, LibraryLoans::BookId)
                            .to(LibraryBooks::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 宿舍 ====================
        manager
            .create_table(
                Table::create()
                    .table(HostelRooms::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(HostelRooms::HostelName).string().not_null())
                    .col(ColumnDef::new(HostelRooms::RoomNumber).string().not_null())
                    .col(ColumnDef::new(HostelRooms::Floor).integer().null())
                    .col(ColumnDef::new(HostelRooms::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(HostelRooms::Occupied)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HostelRooms::RoomType).string().null())
                    .col(ColumnDef::new(HostelRooms::MonthlyFee).double().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HostelAllocations::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(
                        ColumnDef::new(HostelAllocations::RoomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HostelAllocations::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HostelAllocations::AllocatedOn)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HostelAllocations::CheckoutOn).date().null())
                    .col(ColumnDef::new(HostelAllocations::Status).string().not_null())
                    .col(ColumnDef::new(HostelAllocations::Notes).text().null())
                    .timestamps()
                    .soft_delete()
                    .foreign_key(
                        ForeignKey::create()
                            .from(HostelAllocations::Table, HostelAllocations::RoomId)
                            .to(HostelRooms::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 公告、活动、消息 ====================
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Announcements::Title).string().not_null())
                    .col(ColumnDef::new(Announcements::Content).text().not_null())
                    .col(ColumnDef::new(Announcements::Priority).string().not_null())
                    .col(
                        ColumnDef::new(Announcements::TargetAudience)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Announcements::PublishDate).date().not_null())
                    .col(ColumnDef::new(Announcements::ExpiresOn).date().null())
                    .col(
                        ColumnDef::new(Announcements::PublishedBy)
                            .big_integer()
                            .null(),
                    )
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .id()
                    .tenant()
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(ColumnDef::new(Events::Category).string().null())
                    .col(ColumnDef::new(Events::Location).string().null())
                    .col(ColumnDef::new(Events::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Events::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Events::Status).string().not_null())
                    .col(ColumnDef::new(Events::CreatedBy).big_integer().null())
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .id()
                    .col(
                        ColumnDef::new(Common::OrganizationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Messages::SenderId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Messages::RecipientId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Messages::Subject).string().not_null())
                    .col(ColumnDef::new(Messages::Body).text().not_null())
                    .col(
                        ColumnDef::new(Messages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Messages::ReadAt).big_integer().null())
                    .col(
                        ColumnDef::new(Messages::SenderDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Messages::RecipientDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .timestamps()
                    .to_owned(),
            )
            .await?;

        // ==================== 文件 ====================
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .id()
                    .col(
                        ColumnDef::new(Files::DownloadToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Common::OrganizationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Common::SchoolId).big_integer().null())
                    .col(ColumnDef::new(Files::OriginalName).string().not_null())
                    .col(ColumnDef::new(Files::StoredName).string().not_null())
                    .col(ColumnDef::new(Files::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Files::FileType).string().not_null())
                    .col(ColumnDef::new(Files::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Common::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Files::Table, Files::UserId)
                            .to(Users::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schools_organization")
                    .table(Schools::Table)
                    .col(Common::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_organization")
                    .table(Users::Table)
                    .col(Common::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(tenant_index("idx_academic_years_tenant", AcademicYears::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_buildings_tenant", Buildings::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_rooms_tenant", Rooms::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_classes_tenant", Classes::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_subjects_tenant", Subjects::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_students_tenant", Students::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_staff_tenant", Staff::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_timetables_tenant", Timetables::Table))
            .await?;
        manager
            .create_index(tenant_index(
                "idx_teacher_preferences_tenant",
                TeacherPreferences::Table,
            ))
            .await?;
        manager
            .create_index(tenant_index("idx_exams_tenant", Exams::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_library_books_tenant", LibraryBooks::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_library_loans_tenant", LibraryLoans::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_hostel_rooms_tenant", HostelRooms::Table))
            .await?;
        manager
            .create_index(tenant_index(
                "idx_hostel_allocations_tenant",
                HostelAllocations::Table,
            ))
            .await?;
        manager
            .create_index(tenant_index("idx_announcements_tenant", Announcements::Table))
            .await?;
        manager
            .create_index(tenant_index("idx_events_tenant", Events::Table))
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class")
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_timetable_entries_timetable")
                    .table(TimetableEntries::Table)
                    .col(TimetableEntries::TimetableId)
                    .to_owned(),
            )
            .await?;

        // 每个学生每天一条考勤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_student_date")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::StudentId)
                    .col(AttendanceRecords::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_class_date")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::ClassId)
                    .col(AttendanceRecords::Date)
                    .to_owned(),
            )
            .await?;

        // 每场考试每个学生一条成绩
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_results_exam_student")
                    .table(ExamResults::Table)
                    .col(ExamResults::ExamId)
                    .col(ExamResults::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_messages_recipient")
                    .table(Messages::Table)
                    .col(Messages::RecipientId)
                    .col(Messages::IsRead)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_messages_sender")
                    .table(Messages::Table)
                    .col(Messages::SenderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HostelAllocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HostelRooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryLoans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryBooks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherPreferences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TimetableEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Timetables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Buildings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Organizations {
    Table,
    Name,
    Slug,
    Email,
    Phone,
    Address,
    IsActive,
}

#[derive(DeriveIden)]
pub(crate) enum Schools {
    Table,
    Name,
    Code,
    Address,
    Phone,
    Email,
    PrincipalName,
    IsActive,
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    DefaultSchoolId,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    FullName,
    Phone,
    AvatarUrl,
    LastLogin,
}

#[derive(DeriveIden)]
enum AcademicYears {
    Table,
    Name,
    StartDate,
    EndDate,
    IsCurrent,
}

#[derive(DeriveIden)]
enum Buildings {
    Table,
    Name,
    Description,
    Floors,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    BuildingId,
    RoomNumber,
    Capacity,
    RoomType,
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    AcademicYearId,
    Name,
    Section,
    GradeLevel,
    ClassTeacherId,
    RoomId,
    Capacity,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Name,
    Code,
    Description,
}

#[derive(DeriveIden)]
pub(crate) enum Students {
    Table,
    ClassId,
    AdmissionNo,
    FullName,
    FatherName,
    Gender,
    DateOfBirth,
    GuardianName,
    GuardianPhone,
    Address,
    AdmissionDate,
    Status,
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    UserId,
    EmployeeId,
    FullName,
    Email,
    Phone,
    Department,
    Designation,
    HireDate,
    Salary,
    Status,
}

#[derive(DeriveIden)]
enum Timetables {
    Table,
    AcademicYearId,
    Name,
    TimetableType,
    Description,
    IsActive,
    CreatedBy,
}

#[derive(DeriveIden)]
enum TimetableEntries {
    Table,
    TimetableId,
    ClassId,
    SubjectId,
    TeacherId,
    RoomId,
    DayOfWeek,
    PeriodOrder,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
enum TeacherPreferences {
    Table,
    TeacherId,
    AcademicYearId,
    PreferredDays,
    UnavailablePeriods,
    MaxPeriodsPerDay,
    Notes,
}

#[derive(DeriveIden)]
enum AttendanceRecords {
    Table,
    ClassId,
    StudentId,
    Date,
    Status,
    Remarks,
    MarkedBy,
}

#[derive(DeriveIden)]
enum Exams {
    Table,
    AcademicYearId,
    ClassId,
    SubjectId,
    Name,
    ExamType,
    ExamDate,
    TotalMarks,
    PassMarks,
}

#[derive(DeriveIden)]
enum ExamResults {
    Table,
    ExamId,
    StudentId,
    MarksObtained,
    Percentage,
    Grade,
    IsPass,
    Remarks,
}

#[derive(DeriveIden)]
enum LibraryBooks {
    Table,
    Title,
    Author,
    Isbn,
    Category,
    Publisher,
    TotalCopies,
    AvailableCopies,
    ShelfLocation,
}

#[derive(DeriveIden)]
enum LibraryLoans {
    Table,
    BookId,
    StudentId,
    IssueDate,
    DueDate,
    ReturnDate,
    Status,
    FineAmount,
    Notes,
}

#[derive(DeriveIden)]
enum HostelRooms {
    Table,
    HostelName,
    RoomNumber,
    Floor,
    Capacity,
    Occupied,
    RoomType,
    MonthlyFee,
}

#[derive(DeriveIden)]
enum HostelAllocations {
    Table,
    RoomId,
    StudentId,
    AllocatedOn,
    CheckoutOn,
    Status,
    Notes,
}

#[derive(DeriveIden)]
enum Announcements {
    Table,
    Title,
    Content,
    Priority,
    TargetAudience,
    PublishDate,
    ExpiresOn,
    PublishedBy,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Title,
    Description,
    Category,
    Location,
    StartTime,
    EndTime,
    Status,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    SenderId,
    RecipientId,
    Subject,
    Body,
    IsRead,
    ReadAt,
    SenderDeleted,
    RecipientDeleted,
}

#[derive(DeriveIden)]
enum Files {
    Table,
    DownloadToken,
    OriginalName,
    StoredName,
    FileSize,
    FileType,
    UserId,
}
