//! Label verification engine: compares OCR text from a product label with the
//! values declared on the application form.

pub mod api;
pub mod extract;
pub mod fuzzy;
pub mod highlight;
pub mod normalize;
pub mod verify;
pub mod warning;

pub use fuzzy::{find_fuzzy, fuzzy_match, FuzzyHit};
pub use normalize::normalize;
pub use verify::{verify, verify_with};
pub use warning::check_warning;
