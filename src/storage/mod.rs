//! 存储层接口
//!
//! 按业务域拆分为若干子 trait，`Storage` 聚合全部子 trait。
//! 学校级数据的所有读写都必须带上 `TenantScope`，存储层负责按
//! organization_id / school_id / deleted_at 过滤。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{
    OrgScope, TenantScope,
    academic::{
        AcademicListParams, AcademicYear, Building, BuildingListResponse, Class, ClassListParams,
        ClassListResponse, CreateAcademicYearRequest, CreateBuildingRequest, CreateClassRequest,
        CreateRoomRequest, CreateSubjectRequest, Room, RoomListParams, RoomListResponse, Subject,
        SubjectListResponse, UpdateAcademicYearRequest, UpdateBuildingRequest,
        UpdateClassRequest, UpdateRoomRequest, UpdateSubjectRequest,
    },
    activity_logs::{ActivityLogListParams, ActivityLogListResponse, NewActivityLog},
    attendance::{
        AttendanceListParams, AttendanceListResponse, AttendanceRecord, MarkAttendanceRequest,
        MarkAttendanceResponse,
    },
    communications::{
        Announcement, AnnouncementListParams, AnnouncementListResponse,
        CreateAnnouncementRequest, CreateEventRequest, Event, EventListParams,
        EventListResponse, Message, MessageListParams, MessageListResponse, SendMessageRequest,
        UpdateAnnouncementRequest, UpdateEventRequest,
    },
    donations::{
        CreateDonationRequest, Donation, DonationListParams, DonationListResponse,
        UpdateDonationRequest,
    },
    exams::{
        CreateExamRequest, Exam, ExamListParams, ExamListResponse, ExamResult, GradedResult,
        UpdateExamRequest,
    },
    fees::{
        FeeAssignment, FeeAssignmentListResponse, FeeException, FeeExceptionListResponse,
        FeePayment, FeePaymentListResponse, FeeStructure, FeeStructureListResponse,
        requests::{
            BulkAssignRequest, BulkAssignResponse, CreateFeeAssignmentRequest,
            CreateFeeExceptionRequest, CreateFeePaymentRequest, CreateFeeStructureRequest,
            FeeAssignmentListParams, FeeExceptionListParams, FeePaymentListParams,
            FeeReportFilter, FeeStructureListParams, UpdateFeeAssignmentRequest,
            UpdateFeeExceptionRequest, UpdateFeeStructureRequest,
        },
    },
    files::entities::{File, NewFile},
    hostel::{
        AllocateRoomRequest, AllocationListParams, AllocationListResponse,
        CreateHostelRoomRequest, HostelAllocation, HostelRoom, HostelRoomListParams,
        HostelRoomListResponse, UpdateHostelRoomRequest,
    },
    library::{
        Book, BookListParams, BookListResponse, CreateBookRequest, IssueBookRequest, Loan,
        LoanListParams, LoanListResponse, UpdateBookRequest,
    },
    organizations::{
        CreateOrganizationRequest, Organization, OrganizationListParams,
        OrganizationListResponse, UpdateOrganizationRequest,
    },
    schools::{
        CreateSchoolRequest, School, SchoolListParams, SchoolListResponse, UpdateSchoolRequest,
    },
    staff::{
        CreateStaffRequest, StaffListParams, StaffListResponse, StaffMember, UpdateStaffRequest,
    },
    students::{
        CreateStudentRequest, Student, StudentListParams, StudentListResponse,
        UpdateStudentRequest,
    },
    timetables::{
        CreateTimetableRequest, TeacherPreference, TeacherPreferenceListParams,
        TeacherPreferenceListResponse, Timetable, TimetableDetail, TimetableEntryInput,
        TimetableListParams, TimetableListResponse, UpdateTimetableRequest,
        UpsertTeacherPreferenceRequest,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

pub mod sea_orm_storage;

/// 常用导入
pub mod prelude {
    pub use super::{
        AcademicStorage, ActivityLogStorage, AttendanceStorage, CommunicationStorage,
        DonationStorage, ExamStorage, FeeStorage, FileStorage, HostelStorage, LibraryStorage,
        OrganizationStorage, SchoolStorage, StaffStorage, Storage, StudentStorage,
        TimetableStorage, UserStorage,
    };
}

#[async_trait::async_trait]
pub trait OrganizationStorage: Send + Sync {
    async fn list_organizations(
        &self,
        params: &OrganizationListParams,
    ) -> Result<OrganizationListResponse>;
    async fn get_organization(&self, id: i64) -> Result<Option<Organization>>;
    // slug 重复返回 Conflict
    async fn create_organization(&self, req: CreateOrganizationRequest) -> Result<Organization>;
    async fn update_organization(
        &self,
        id: i64,
        req: UpdateOrganizationRequest,
    ) -> Result<Option<Organization>>;
    // 仍有未删除的学校时返回 Conflict
    async fn delete_organization(&self, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait SchoolStorage: Send + Sync {
    async fn list_schools(
        &self,
        scope: &OrgScope,
        params: &SchoolListParams,
    ) -> Result<SchoolListResponse>;
    async fn get_school(&self, scope: &OrgScope, id: i64) -> Result<Option<School>>;
    // 不限组织，供租户中间件校验归属
    async fn find_school(&self, id: i64) -> Result<Option<School>>;
    async fn create_school(&self, scope: &OrgScope, req: CreateSchoolRequest) -> Result<School>;
    async fn update_school(
        &self,
        scope: &OrgScope,
        id: i64,
        req: UpdateSchoolRequest,
    ) -> Result<Option<School>>;
    // 仍有在读学生时返回 Conflict
    async fn delete_school(&self, scope: &OrgScope, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait UserStorage: Send + Sync {
    // req.password 必须已是哈希值
    async fn create_user(&self, req: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;
}

#[async_trait::async_trait]
pub trait StudentStorage: Send + Sync {
    async fn list_students(
        &self,
        scope: &TenantScope,
        params: &StudentListParams,
    ) -> Result<StudentListResponse>;
    // 报表与统计用，不分页
    async fn list_all_students(
        &self,
        scope: &TenantScope,
        class_id: Option<i64>,
    ) -> Result<Vec<Student>>;
    async fn get_student(&self, scope: &TenantScope, id: i64) -> Result<Option<Student>>;
    async fn create_student(
        &self,
        scope: &TenantScope,
        req: CreateStudentRequest,
    ) -> Result<Student>;
    // 整批在一个事务内写入
    async fn import_students(
        &self,
        scope: &TenantScope,
        rows: Vec<CreateStudentRequest>,
    ) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, scope: &TenantScope, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait StaffStorage: Send + Sync {
    async fn list_staff(
        &self,
        scope: &TenantScope,
        params: &StaffListParams,
    ) -> Result<StaffListResponse>;
    async fn get_staff(&self, scope: &TenantScope, id: i64) -> Result<Option<StaffMember>>;
    async fn create_staff(
        &self,
        scope: &TenantScope,
        req: CreateStaffRequest,
    ) -> Result<StaffMember>;
    async fn update_staff(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateStaffRequest,
    ) -> Result<Option<StaffMember>>;
    async fn delete_staff(&self, scope: &TenantScope, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait AcademicStorage: Send + Sync {
    // 学年
    async fn list_academic_years(&self, scope: &TenantScope) -> Result<Vec<AcademicYear>>;
    async fn get_academic_year(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<AcademicYear>>;
    async fn create_academic_year(
        &self,
        scope: &TenantScope,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear>;
    async fn update_academic_year(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>>;
    async fn set_current_academic_year(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<AcademicYear>>;
    async fn delete_academic_year(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    // 班级
    async fn list_classes(
        &self,
        scope: &TenantScope,
        params: &ClassListParams,
    ) -> Result<ClassListResponse>;
    async fn list_all_classes(&self, scope: &TenantScope) -> Result<Vec<Class>>;
    async fn get_class(&self, scope: &TenantScope, id: i64) -> Result<Option<Class>>;
    async fn create_class(&self, scope: &TenantScope, req: CreateClassRequest) -> Result<Class>;
    async fn update_class(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    // 科目
    async fn list_subjects(
        &self,
        scope: &TenantScope,
        params: &AcademicListParams,
    ) -> Result<SubjectListResponse>;
    async fn list_all_subjects(&self, scope: &TenantScope) -> Result<Vec<Subject>>;
    async fn create_subject(
        &self,
        scope: &TenantScope,
        req: CreateSubjectRequest,
    ) -> Result<Subject>;
    async fn update_subject(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    // 教学楼
    async fn list_buildings(
        &self,
        scope: &TenantScope,
        params: &AcademicListParams,
    ) -> Result<BuildingListResponse>;
    async fn create_building(
        &self,
        scope: &TenantScope,
        req: CreateBuildingRequest,
    ) -> Result<Building>;
    async fn update_building(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateBuildingRequest,
    ) -> Result<Option<Building>>;
    async fn delete_building(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    // 教室
    async fn list_rooms(
        &self,
        scope: &TenantScope,
        params: &RoomListParams,
    ) -> Result<RoomListResponse>;
    async fn create_room(&self, scope: &TenantScope, req: CreateRoomRequest) -> Result<Room>;
    async fn update_room(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateRoomRequest,
    ) -> Result<Option<Room>>;
    async fn delete_room(&self, scope: &TenantScope, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait TimetableStorage: Send + Sync {
    async fn list_timetables(
        &self,
        scope: &TenantScope,
        params: &TimetableListParams,
    ) -> Result<TimetableListResponse>;
    async fn get_timetable(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<TimetableDetail>>;
    async fn create_timetable(
        &self,
        scope: &TenantScope,
        created_by: i64,
        req: CreateTimetableRequest,
    ) -> Result<TimetableDetail>;
    async fn update_timetable(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateTimetableRequest,
    ) -> Result<Option<Timetable>>;
    async fn replace_timetable_entries(
        &self,
        scope: &TenantScope,
        id: i64,
        entries: Vec<TimetableEntryInput>,
    ) -> Result<Option<TimetableDetail>>;
    async fn delete_timetable(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    async fn list_teacher_preferences(
        &self,
        scope: &TenantScope,
        params: &TeacherPreferenceListParams,
    ) -> Result<TeacherPreferenceListResponse>;
    async fn upsert_teacher_preference(
        &self,
        scope: &TenantScope,
        req: UpsertTeacherPreferenceRequest,
    ) -> Result<TeacherPreference>;
    async fn delete_teacher_preference(&self, scope: &TenantScope, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait AttendanceStorage: Send + Sync {
    async fn mark_attendance(
        &self,
        scope: &TenantScope,
        marked_by: i64,
        req: MarkAttendanceRequest,
    ) -> Result<MarkAttendanceResponse>;
    async fn list_attendance(
        &self,
        scope: &TenantScope,
        params: &AttendanceListParams,
    ) -> Result<AttendanceListResponse>;
    async fn list_class_attendance(
        &self,
        scope: &TenantScope,
        class_id: i64,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn delete_attendance(&self, scope: &TenantScope, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait ExamStorage: Send + Sync {
    async fn list_exams(
        &self,
        scope: &TenantScope,
        params: &ExamListParams,
    ) -> Result<ExamListResponse>;
    async fn get_exam(&self, scope: &TenantScope, id: i64) -> Result<Option<Exam>>;
    async fn create_exam(&self, scope: &TenantScope, req: CreateExamRequest) -> Result<Exam>;
    async fn update_exam(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateExamRequest,
    ) -> Result<Option<Exam>>;
    async fn delete_exam(&self, scope: &TenantScope, id: i64) -> Result<bool>;
    // 按 (exam_id, student_id) 插入或更新
    async fn save_exam_results(
        &self,
        scope: &TenantScope,
        exam_id: i64,
        results: Vec<GradedResult>,
    ) -> Result<Vec<ExamResult>>;
    async fn list_exam_results(
        &self,
        scope: &TenantScope,
        exam_id: i64,
    ) -> Result<Vec<ExamResult>>;
    // 学生全部成绩及对应考试
    async fn list_student_results(
        &self,
        scope: &TenantScope,
        student_id: i64,
        academic_year_id: Option<i64>,
    ) -> Result<Vec<(ExamResult, Exam)>>;
}

#[async_trait::async_trait]
pub trait LibraryStorage: Send + Sync {
    async fn list_books(
        &self,
        scope: &TenantScope,
        params: &BookListParams,
    ) -> Result<BookListResponse>;
    async fn get_book(&self, scope: &TenantScope, id: i64) -> Result<Option<Book>>;
    async fn create_book(&self, scope: &TenantScope, req: CreateBookRequest) -> Result<Book>;
    async fn update_book(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateBookRequest,
    ) -> Result<Option<Book>>;
    async fn delete_book(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    async fn issue_book(
        &self,
        scope: &TenantScope,
        req: IssueBookRequest,
        due_date: NaiveDate,
    ) -> Result<Loan>;
    async fn return_book(
        &self,
        scope: &TenantScope,
        loan_id: i64,
        return_date: NaiveDate,
        fine_amount: f64,
    ) -> Result<Loan>;
    async fn mark_loan_lost(&self, scope: &TenantScope, loan_id: i64) -> Result<Loan>;
    async fn get_loan(&self, scope: &TenantScope, id: i64) -> Result<Option<Loan>>;
    async fn list_loans(
        &self,
        scope: &TenantScope,
        params: &LoanListParams,
        today: NaiveDate,
    ) -> Result<LoanListResponse>;
    async fn list_all_books(&self, scope: &TenantScope) -> Result<Vec<Book>>;
    async fn list_all_loans(&self, scope: &TenantScope) -> Result<Vec<Loan>>;
}

#[async_trait::async_trait]
pub trait HostelStorage: Send + Sync {
    async fn list_hostel_rooms(
        &self,
        scope: &TenantScope,
        params: &HostelRoomListParams,
    ) -> Result<HostelRoomListResponse>;
    async fn list_all_hostel_rooms(&self, scope: &TenantScope) -> Result<Vec<HostelRoom>>;
    async fn create_hostel_room(
        &self,
        scope: &TenantScope,
        req: CreateHostelRoomRequest,
    ) -> Result<HostelRoom>;
    async fn update_hostel_room(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateHostelRoomRequest,
    ) -> Result<Option<HostelRoom>>;
    async fn delete_hostel_room(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    async fn allocate_room(
        &self,
        scope: &TenantScope,
        req: AllocateRoomRequest,
        allocated_on: NaiveDate,
    ) -> Result<HostelAllocation>;
    async fn checkout_allocation(
        &self,
        scope: &TenantScope,
        id: i64,
        checkout_on: NaiveDate,
    ) -> Result<HostelAllocation>;
    async fn list_allocations(
        &self,
        scope: &TenantScope,
        params: &AllocationListParams,
    ) -> Result<AllocationListResponse>;
}

#[async_trait::async_trait]
pub trait FeeStorage: Send + Sync {
    // 收费项目
    async fn list_fee_structures(
        &self,
        scope: &TenantScope,
        params: &FeeStructureListParams,
    ) -> Result<FeeStructureListResponse>;
    async fn list_all_fee_structures(&self, scope: &TenantScope) -> Result<Vec<FeeStructure>>;
    async fn get_fee_structure(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<FeeStructure>>;
    async fn create_fee_structure(
        &self,
        scope: &TenantScope,
        req: CreateFeeStructureRequest,
    ) -> Result<FeeStructure>;
    async fn update_fee_structure(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateFeeStructureRequest,
    ) -> Result<Option<FeeStructure>>;
    async fn delete_fee_structure(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    // 学生应收
    async fn list_fee_assignments(
        &self,
        scope: &TenantScope,
        params: &FeeAssignmentListParams,
    ) -> Result<FeeAssignmentListResponse>;
    async fn list_fee_assignments_for_report(
        &self,
        scope: &TenantScope,
        filter: &FeeReportFilter,
    ) -> Result<Vec<FeeAssignment>>;
    async fn get_fee_assignment(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<FeeAssignment>>;
    async fn create_fee_assignment(
        &self,
        scope: &TenantScope,
        req: CreateFeeAssignmentRequest,
        today: NaiveDate,
    ) -> Result<FeeAssignment>;
    async fn bulk_assign_fees(
        &self,
        scope: &TenantScope,
        req: BulkAssignRequest,
        today: NaiveDate,
    ) -> Result<BulkAssignResponse>;
    async fn update_fee_assignment(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateFeeAssignmentRequest,
        today: NaiveDate,
    ) -> Result<Option<FeeAssignment>>;
    // 已有缴费时返回 Conflict
    async fn delete_fee_assignment(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    // 缴费
    async fn list_fee_payments(
        &self,
        scope: &TenantScope,
        params: &FeePaymentListParams,
    ) -> Result<FeePaymentListResponse>;
    // 不含已取消或已删除应收上的缴费
    async fn list_fee_payments_between(
        &self,
        scope: &TenantScope,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<FeePayment>>;
    async fn record_fee_payment(
        &self,
        scope: &TenantScope,
        received_by: i64,
        req: CreateFeePaymentRequest,
        today: NaiveDate,
    ) -> Result<(FeePayment, FeeAssignment)>;
    async fn delete_fee_payment(
        &self,
        scope: &TenantScope,
        id: i64,
        today: NaiveDate,
    ) -> Result<bool>;

    // 减免
    async fn list_fee_exceptions(
        &self,
        scope: &TenantScope,
        params: &FeeExceptionListParams,
    ) -> Result<FeeExceptionListResponse>;
    // 仅统计未删除应收上的生效减免
    async fn list_active_fee_exceptions(&self, scope: &TenantScope) -> Result<Vec<FeeException>>;
    async fn get_fee_exception(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<FeeException>>;
    async fn create_fee_exception(
        &self,
        scope: &TenantScope,
        approved_by: i64,
        req: CreateFeeExceptionRequest,
        today: NaiveDate,
    ) -> Result<(FeeException, FeeAssignment)>;
    /// 换挂应收或启停时在同一事务内撤销并重新应用减免，返回被改动的应收
    async fn update_fee_exception(
        &self,
        scope: &TenantScope,
        actor: i64,
        id: i64,
        req: UpdateFeeExceptionRequest,
        today: NaiveDate,
    ) -> Result<Option<(FeeException, Vec<FeeAssignment>)>>;
    async fn delete_fee_exception(
        &self,
        scope: &TenantScope,
        actor: i64,
        id: i64,
        today: NaiveDate,
    ) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait DonationStorage: Send + Sync {
    async fn list_donations(
        &self,
        scope: &TenantScope,
        params: &DonationListParams,
    ) -> Result<DonationListResponse>;
    async fn list_all_donations(&self, scope: &TenantScope) -> Result<Vec<Donation>>;
    async fn get_donation(&self, scope: &TenantScope, id: i64) -> Result<Option<Donation>>;
    async fn create_donation(
        &self,
        scope: &TenantScope,
        received_by: i64,
        req: CreateDonationRequest,
        transaction_id: String,
        donation_date: NaiveDate,
    ) -> Result<Donation>;
    async fn update_donation(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateDonationRequest,
    ) -> Result<Option<Donation>>;
    async fn mark_receipt_generated(
        &self,
        scope: &TenantScope,
        id: i64,
    ) -> Result<Option<Donation>>;
    async fn delete_donation(&self, scope: &TenantScope, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait CommunicationStorage: Send + Sync {
    async fn list_announcements(
        &self,
        scope: &TenantScope,
        params: &AnnouncementListParams,
        today: NaiveDate,
    ) -> Result<AnnouncementListResponse>;
    async fn create_announcement(
        &self,
        scope: &TenantScope,
        published_by: i64,
        req: CreateAnnouncementRequest,
        publish_date: NaiveDate,
    ) -> Result<Announcement>;
    async fn update_announcement(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    async fn list_events(
        &self,
        scope: &TenantScope,
        params: &EventListParams,
    ) -> Result<EventListResponse>;
    async fn get_event(&self, scope: &TenantScope, id: i64) -> Result<Option<Event>>;
    async fn create_event(
        &self,
        scope: &TenantScope,
        created_by: i64,
        req: CreateEventRequest,
    ) -> Result<Event>;
    async fn update_event(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateEventRequest,
    ) -> Result<Option<Event>>;
    async fn delete_event(&self, scope: &TenantScope, id: i64) -> Result<bool>;

    // 消息按组织隔离
    async fn send_message(
        &self,
        scope: &OrgScope,
        sender_id: i64,
        req: SendMessageRequest,
    ) -> Result<Message>;
    async fn list_messages(
        &self,
        scope: &OrgScope,
        user_id: i64,
        params: &MessageListParams,
    ) -> Result<MessageListResponse>;
    async fn mark_message_read(
        &self,
        scope: &OrgScope,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Message>>;
    async fn count_unread_messages(&self, scope: &OrgScope, user_id: i64) -> Result<i64>;
    // 仅对调用者隐藏
    async fn delete_message(&self, scope: &OrgScope, user_id: i64, id: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait FileStorage: Send + Sync {
    async fn create_file(&self, file: NewFile) -> Result<File>;
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;
}

#[async_trait::async_trait]
pub trait ActivityLogStorage: Send + Sync {
    /// 单独写入一条日志；收费减免的日志在各自事务内写入
    async fn record_activity(&self, scope: &TenantScope, log: NewActivityLog) -> Result<()>;
    async fn list_activity_logs(
        &self,
        scope: &TenantScope,
        params: &ActivityLogListParams,
    ) -> Result<ActivityLogListResponse>;
}

/// 聚合全部业务存储
pub trait Storage:
    OrganizationStorage
    + SchoolStorage
    + UserStorage
    + StudentStorage
    + StaffStorage
    + AcademicStorage
    + TimetableStorage
    + AttendanceStorage
    + ExamStorage
    + LibraryStorage
    + HostelStorage
    + FeeStorage
    + DonationStorage
    + CommunicationStorage
    + FileStorage
    + ActivityLogStorage
{
}

impl<T> Storage for T where
    T: OrganizationStorage
        + SchoolStorage
        + UserStorage
        + StudentStorage
        + StaffStorage
        + AcademicStorage
        + TimetableStorage
        + AttendanceStorage
        + ExamStorage
        + LibraryStorage
        + HostelStorage
        + FeeStorage
        + DonationStorage
        + CommunicationStorage
        + FileStorage
        + ActivityLogStorage
{
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
