pub mod registry;
pub mod settings;
pub mod validator;

pub use registry::*;
pub use settings::*;
pub use validator::*;
