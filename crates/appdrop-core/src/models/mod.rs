//! Data models
//!
//! Local descriptors plus the request/response shapes of the MDM REST API.

mod application;
pub mod descriptor;
mod group;
mod upload;

pub use application::*;
pub use descriptor::*;
pub use group::*;
pub use upload::*;
