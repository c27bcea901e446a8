// Domain layer: order models and the ports the batch talks through.

pub mod model;
pub mod ports;
