//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间戳统一以 Unix 秒存储，日期使用 `Date` 列。

pub mod prelude;

pub mod academic_years;
pub mod activity_logs;
pub mod announcements;
pub mod attendance_records;
pub mod buildings;
pub mod classes;
pub mod donations;
pub mod events;
pub mod exam_results;
pub mod exams;
pub mod fee_assignments;
pub mod fee_exceptions;
pub mod fee_payments;
pub mod fee_structures;
pub mod files;
pub mod hostel_allocations;
pub mod hostel_rooms;
pub mod library_books;
pub mod library_loans;
pub mod messages;
pub mod organizations;
pub mod rooms;
pub mod schools;
pub mod staff;
pub mod students;
pub mod subjects;
pub mod teacher_preferences;
pub mod timetable_entries;
pub mod timetables;
pub mod users;

/// Unix 秒转换为 UTC 时间
pub(crate) fn timestamp_to_datetime(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
