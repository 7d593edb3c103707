mod command_result;
pub mod context;
pub mod extract;
pub mod helper;
pub mod init;
pub mod migrate;
pub mod validate;

pub use command_result::*;
