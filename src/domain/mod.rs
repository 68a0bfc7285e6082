// Domain layer: value records and ports for every external boundary.

pub mod model;
pub mod ports;
