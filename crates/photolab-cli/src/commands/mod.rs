pub mod info;
pub mod pair;
pub mod poll;
pub mod query;
pub mod stats;
