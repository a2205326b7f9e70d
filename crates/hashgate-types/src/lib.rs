//! Foundation types for hashgate.
//!
//! Every other hashgate crate depends on `hashgate-types`.
//!
//! # Key Types
//!
//! - [`ObjectKey`] — `"<hex digest>.<extension>"` key under which a blob is stored
//! - [`WriteStatus`] — outcome of an existence-gated write (`created` / `exists`)

pub mod error;
pub mod object;
pub mod status;

pub use error::TypeError;
pub use object::ObjectKey;
pub use status::WriteStatus;
