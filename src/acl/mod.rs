pub mod evaluator;
pub mod store;

pub use evaluator::{AdmissionEvaluator, AdmissionPolicy};
pub use store::{AclStore, ListQuery, Page};
