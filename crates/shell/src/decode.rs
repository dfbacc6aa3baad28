use crate::{Result, ShellError};
use encoding_rs::Encoding;

/// Encoding of the zh-CN console tools this crate was written against.
pub const DEFAULT_ENCODING_LABEL: &str = "gb18030";

pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ShellError::UnknownEncoding(label.to_string()))
}

/// Transcodes raw tool output to UTF-8.
///
/// Never fails: malformed sequences become U+FFFD so one garbled banner
/// does not cost the whole listing.
#[must_use]
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        log::debug!(
            "output is not valid {}; malformed sequences replaced",
            encoding.name()
        );
    }
    text.into_owned()
}
