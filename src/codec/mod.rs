//! # Codec
//!
//! Request body decoding, response JSON encoding and the date-time wire
//! format.

mod body;
mod datetime;
mod errors;
mod json;

pub use body::BodyParams;
pub use datetime::{format_date_time, parse_date_time};
pub use errors::{CodecError, CodecResult};
pub use json::{is_confusable, quote, to_json, EscapingFormatter};
