pub mod base;
pub mod pull_request;
pub mod team;
pub mod user;

pub use base::{BaseDao, DaoError, DaoResult};
