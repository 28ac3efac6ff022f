pub mod error;
pub mod schedule;
pub mod types;
pub mod won;

pub use error::AgriLoanError;
pub use types::*;

/// Standard result type for all agri-loan operations
pub type AgriLoanResult<T> = Result<T, AgriLoanError>;
