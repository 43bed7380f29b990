//! DOI parsing and validation
//!
//! Accepts a Digital Object Identifier in any of its common presentation
//! forms and splits it into a registrant prefix and an opaque suffix:
//! - bare identifiers (`10.1000/xyz123`)
//! - `doi:` URIs (`doi:10.1000/xyz123`, marker case-insensitive)
//! - resolver URLs (`https://doi.org/10.1000/xyz123`, `http://dx.doi.org/...`)
//!
//! The suffix is kept exactly as written: no case folding, no
//! percent-decoding.

pub mod doi;
pub mod error;
pub mod report;
pub mod validators;

pub use doi::*;
pub use error::*;
pub use report::*;
pub use validators::*;
