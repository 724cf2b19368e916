pub mod access;
pub mod report_service;
pub mod token_service;
pub mod user_service;

pub use report_service::*;
pub use token_service::*;
pub use user_service::*;
