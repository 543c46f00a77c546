#![forbid(unsafe_code)]

mod mapping;
pub mod repository;
pub mod sqlite;
