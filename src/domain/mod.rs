// Domain layer: file and section models plus the delivery port. Adapters live under src/adapters.

pub mod model;
pub mod ports;
