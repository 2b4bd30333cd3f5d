//! Seams to the hosting service's control and runtime APIs

mod control;
mod invoker;
mod status;

pub use control::EndpointControl;
pub use invoker::{EndpointInvoker, InvocationTarget, JSON_CONTENT_TYPE};
pub use status::EndpointStatus;

#[cfg(test)]
pub use control::MockEndpointControl;
#[cfg(test)]
pub use invoker::mock;
