//! Command implementations.

pub mod backup;
pub mod completion;
pub mod init;
pub mod services;
