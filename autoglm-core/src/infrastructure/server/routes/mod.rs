pub mod session;
pub mod spa;
