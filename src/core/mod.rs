pub mod access;
pub mod appointment;
pub mod call;
pub mod client;
pub mod dates;
pub mod paging;
pub mod permissions;
pub mod project;
pub mod status;
pub mod task;
pub mod user;
pub mod validation;
