// Domain layer: the person entity, trigger and response shapes, and the ports
// implemented by adapters.

pub mod event;
pub mod model;
pub mod ports;
