// Domain layer: analysis models and ports (interfaces). Nothing here talks to the network or disk.

pub mod model;
pub mod ports;
