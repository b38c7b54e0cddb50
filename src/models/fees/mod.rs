//! 收费：收费项目、学生应收、缴费记录、减免与报表

pub mod calc;
pub mod entities;
pub mod reports;
pub mod requests;

pub use entities::*;
