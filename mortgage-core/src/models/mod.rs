mod calculation_result;
mod form_input;
mod mortgage_type;

pub use calculation_result::CalculationResult;
pub use form_input::{FormInput, parse_field};
pub use mortgage_type::MortgageType;
