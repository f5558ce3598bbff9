// Domain layer: catalog payload models and the port the AWS adapter implements.

pub mod model;
pub mod ports;
