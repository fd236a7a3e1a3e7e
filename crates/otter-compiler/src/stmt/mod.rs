//! Statement callbacks.
//!
//! - [`conditions`]: `if`/`unless`/`else` and bare gotos
//! - [`loops`]: `while` and `for`
//! - [`io`]: `read` and `write`
//! - [`returns`]: `return`

mod conditions;
mod io;
mod loops;
mod returns;
