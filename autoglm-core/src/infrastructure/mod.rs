pub mod device;
pub mod model;
pub mod phone;
pub mod server;
