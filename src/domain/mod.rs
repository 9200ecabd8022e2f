// Domain layer: records, table layouts and the ports the pipeline is built from.

pub mod model;
pub mod ports;
