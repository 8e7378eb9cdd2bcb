mod authority;
mod identity;
mod name;
mod organization;
mod role;

pub use authority::*;
pub use identity::*;
pub use name::*;
pub use organization::*;
pub use role::*;
