//! SeaORM entities, one module per table.

pub mod category;
pub mod comment;
pub mod enums;
pub mod post;
pub mod report;
pub mod user;
