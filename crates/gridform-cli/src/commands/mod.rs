pub mod build;
pub mod init;
