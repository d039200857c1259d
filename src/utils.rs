pub mod logs;
pub mod notify;
