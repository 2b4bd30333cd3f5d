//! Model references and serving container selection

mod container;
mod reference;

pub use container::{container_environment, ContainerImage, ServingOptions};
pub use reference::ModelReference;
