//! Middleware for operator identification.

mod operator;

pub use operator::{operator_middleware, CurrentOperator, OPERATOR_ROLE_HEADER};
