pub mod chat;
pub mod generate;
pub mod init;
pub mod parse;
pub mod serve;
