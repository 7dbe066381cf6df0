pub mod job;
pub mod session;
pub mod upload;
