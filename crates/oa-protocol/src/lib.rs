pub mod error;
pub mod query;
pub mod reading;
pub mod risk;

pub use error::*;
pub use query::*;
pub use reading::*;
pub use risk::*;
