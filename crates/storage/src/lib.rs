#![forbid(unsafe_code)]

pub mod bank_file;
pub mod repository;
