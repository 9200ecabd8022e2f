pub mod delay;
pub mod error;
pub mod html;
pub mod logger;
pub mod validation;
