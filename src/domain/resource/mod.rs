//! Service resource names and resource requests

mod name;
mod request;
mod validation;

pub use name::ResourceName;
pub use request::ResourceRequest;
pub use validation::{
    validate_resource_name, ResourceValidationError, MAX_RESOURCE_NAME_LENGTH,
};
