mod error;
mod layout;
mod page;
mod profile;

pub use error::*;
pub use layout::*;
pub use page::*;
pub use profile::*;
