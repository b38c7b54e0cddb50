pub mod entities;
pub mod permissions;
pub mod requests;
pub mod responses;
