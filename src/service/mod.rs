//! CrudService: generic CRUD using the safe SQL builder.

mod crud;
mod form;
mod validation;
pub use crud::CrudService;
pub use form::Submission;
pub use validation::{RequestValidator, WriteMode};
