// Domain layer: layout models and the command channel port.

pub mod model;
pub mod ports;
