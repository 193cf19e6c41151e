mod profile;
mod recipe;
mod session;


pub use profile::*;
pub use recipe::*;
pub use session::*;
