//! 预导入模块，方便使用

pub use super::academic_years::Entity as AcademicYears;
pub use super::activity_logs::Entity as ActivityLogs;
pub use super::announcements::Entity as Announcements;
pub use super::attendance_records::Entity as AttendanceRecords;
pub use super::buildings::Entity as Buildings;
pub use super::classes::Entity as Classes;
pub use super::donations::Entity as Donations;
pub use super::events::Entity as Events;
pub use super::exam_results::Entity as ExamResults;
pub use super::exams::Entity as Exams;
pub use super::fee_assignments::Entity as FeeAssignments;
pub use super::fee_exceptions::Entity as FeeExceptions;
pub use super::fee_payments::Entity as FeePayments;
pub use super::fee_structures::Entity as FeeStructures;
pub use super::files::Entity as Files;
pub use super::hostel_allocations::Entity as HostelAllocations;
pub use super::hostel_rooms::Entity as HostelRooms;
pub use super::library_books::Entity as LibraryBooks;
pub use super::library_loans::Entity as LibraryLoans;
pub use super::messages::Entity as Messages;
pub use super::organizations::Entity as Organizations;
pub use super::rooms::Entity as Rooms;
pub use super::schools::Entity as Schools;
pub use super::staff::Entity as Staff;
pub use super::students::Entity as Students;
pub use super::subjects::Entity as Subjects;
pub use super::teacher_preferences::Entity as TeacherPreferences;
pub use super::timetable_entries::Entity as TimetableEntries;
pub use super::timetables::Entity as Timetables;
pub use super::users::Entity as Users;
