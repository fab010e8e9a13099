pub mod execute;
pub mod movegen;
pub(crate) mod rays;
pub mod square_control;
pub mod types;
