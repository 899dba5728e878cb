//! Gateway events - dispatches applied to the client's registry

mod gateway_event;

pub use gateway_event::{DispatchFrame, GatewayEvent};
