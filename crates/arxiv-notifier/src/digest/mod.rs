//! arXiv digest handling: parsing the mail body and picking the right mail.

mod parser;
mod select;

pub use parser::{normalize_text, parse_digest, split_authors};
pub use select::{DigestMessage, select_digest};
