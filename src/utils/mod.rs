//! Small shared helpers: code generation, request metadata parsing,
//! target URL validation.

pub mod client_ip;
pub mod code_generator;
pub mod device;
pub mod url_validator;
