pub mod auth;

pub mod users;

pub mod organizations;

pub mod schools;

pub mod students;

pub mod staff;

pub mod academic;

pub mod timetables;

pub mod attendance;

pub mod exams;

pub mod library;

pub mod hostel;

pub mod fees;

pub mod donations;

pub mod communications;

pub mod files;

pub mod realtime;

pub use academic::configure_academic_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use communications::{
    configure_announcement_routes, configure_event_routes, configure_message_routes,
};
pub use donations::configure_donation_routes;
pub use exams::configure_exam_routes;
pub use fees::configure_fee_routes;
pub use files::configure_file_routes;
pub use hostel::configure_hostel_routes;
pub use library::configure_library_routes;
pub use organizations::configure_organization_routes;
pub use realtime::configure_realtime_routes;
pub use schools::configure_school_routes;
pub use staff::configure_staff_routes;
pub use students::configure_student_routes;
pub use timetables::configure_timetable_routes;
pub use users::configure_user_routes;
