pub mod assignment;
pub mod dao;
pub mod store;

pub use assignment::{AssignmentError, AssignmentService, ReassignOutcome};
pub use store::{InMemoryStore, MongoStore, ReviewStore};
