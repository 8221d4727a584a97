pub mod config;
pub mod consts;
pub mod csv;
pub mod error;
pub mod lab;
pub mod misc;
pub mod photometer;
pub mod raw;
pub mod sqlite;
pub mod tabulate;
pub mod template;
pub mod validators;
