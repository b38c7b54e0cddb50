//! 数据模型
//!
//! 每个业务域按 `entities`（业务实体）、`requests`（请求参数）、
//! `responses`（响应结构）拆分，所有对外结构通过 ts-rs 导出 TypeScript 类型。

#[macro_use]
pub mod macros;

pub mod academic;
pub mod activity_logs;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod communications;
pub mod donations;
pub mod exams;
pub mod fees;
pub mod files;
pub mod hostel;
pub mod library;
pub mod organizations;
pub mod realtime;
pub mod schools;
pub mod staff;
pub mod students;
pub mod timetables;
pub mod users;

pub use common::{
    ApiResponse, OrgScope, PaginatedResponse, PaginationInfo, PaginationQuery, TenantScope,
};

/// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证；3xxx 组织/学校/用户；
/// 4xxx 学籍与教务；5xxx 收费与捐赠；6xxx 文件；9xxx 服务端错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    AuthFailed = 2000,
    UserInactive = 2001,
    TokenInvalid = 2002,

    OrganizationNotFound = 3000,
    OrganizationSlugExists = 3001,
    OrganizationHasSchools = 3002,
    OrganizationRequired = 3003,
    SchoolNotFound = 3100,
    SchoolCodeExists = 3101,
    SchoolRequired = 3102,
    SchoolInUse = 3103,
    UserNotFound = 3200,
    UserNameInvalid = 3201,
    UserEmailInvalid = 3202,
    UserPasswordInvalid = 3203,
    UserAlreadyExists = 3204,
    UserEmailAlreadyExists = 3205,
    UserCreationFailed = 3206,
    UserUpdateFailed = 3207,
    UserDeleteFailed = 3208,
    CanNotDeleteCurrentUser = 3209,

    StudentNotFound = 4000,
    StudentAdmissionNoExists = 4001,
    StudentImportFailed = 4002,
    StaffNotFound = 4100,
    StaffEmployeeIdExists = 4101,
    AcademicRecordNotFound = 4200,
    AcademicRecordInUse = 4201,
    TimetableNotFound = 4300,
    TimetableConflict = 4301,
    AttendanceInvalid = 4400,
    ExamNotFound = 4500,
    ExamMarksInvalid = 4501,
    BookNotFound = 4600,
    BookUnavailable = 4601,
    LoanNotFound = 4602,
    LoanAlreadyClosed = 4603,
    HostelRoomNotFound = 4700,
    HostelRoomFull = 4701,
    HostelAllocationExists = 4702,
    MessageNotFound = 4800,

    FeeStructureNotFound = 5000,
    FeeStructureInUse = 5001,
    FeeAssignmentNotFound = 5100,
    FeeAssignmentHasPayments = 5101,
    FeePaymentInvalid = 5200,
    FeePaymentNotFound = 5201,
    FeeExceptionNotFound = 5300,
    FeeExceptionStudentMismatch = 5301,
    DonationNotFound = 5400,

    FileNotFound = 6000,
    FileUploadFailed = 6001,
    FileTypeNotAllowed = 6002,
    FileSizeExceeded = 6003,
    MultifileUploadNotAllowed = 6004,

    InternalServerError = 9000,
    ExportFailed = 9001,
}
