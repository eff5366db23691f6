//! Request Validation
//!
//! Validators accumulate into a per-request [`ValidationErrors`] set. Only
//! identifier parsing through [`GuidParser::parse`] aborts a request.

pub mod errors;
pub mod guid;
pub mod patterns;
pub mod validators;

pub use errors::{field_path, ValidationErrors};
pub use guid::GuidParser;
pub use patterns::Pattern;
pub use validators::{
    DateValidator, EnumValidator, IdValidator, ParameterValidator, RegExValidator,
    RequiredValidator,
};
