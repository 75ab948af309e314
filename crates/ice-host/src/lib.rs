pub mod controller;
pub mod pipeline;

pub use controller::{HostController, HostControllerBuilder};
pub use ice_core::{ControllerContext, HostConfig};
pub use pipeline::{CommandPool, Doorbell};
