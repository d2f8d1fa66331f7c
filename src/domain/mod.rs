// Domain layer: auction models, the OpenRTB wire schema, and ports (interfaces).

pub mod model;
pub mod openrtb;
pub mod ports;
