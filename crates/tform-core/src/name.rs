#![forbid(unsafe_code)]

//! Parsing and formatting of `<prefix><index>` field names.

use crate::error::FieldError;

/// Parse the index out of a field name.
///
/// Accepts exactly `prefix` followed by one or more ASCII digits that fit a
/// `u32`. Signs, whitespace, and trailing text are rejected.
pub fn parse_field_index(prefix: &str, name: &str) -> Result<u32, FieldError> {
    let malformed = || FieldError::Parse {
        name: name.to_owned(),
    };
    let digits = name.strip_prefix(prefix).ok_or_else(malformed)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    digits.parse::<u32>().map_err(|_| malformed())
}

/// Format the exposed name for `index`.
#[must_use]
pub fn format_field_name(prefix: &str, index: u32) -> String {
    format!("{prefix}{index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PREFIX: &str = "track_image_";

    #[test]
    fn parses_plain_index() {
        assert_eq!(parse_field_index(PREFIX, "track_image_0"), Ok(0));
        assert_eq!(parse_field_index(PREFIX, "track_image_42"), Ok(42));
    }

    #[test]
    fn leading_zeros_are_accepted() {
        assert_eq!(parse_field_index(PREFIX, "track_image_007"), Ok(7));
    }

    #[test]
    fn rejects_malformed_names() {
        for name in [
            "",
            "track_image_",
            "track_image_-1",
            "track_image_+1",
            "track_image_1a",
            "track_image_ 1",
            "image_1",
            "track_images_1",
            "TRACK_IMAGE_1",
        ] {
            assert_eq!(
                parse_field_index(PREFIX, name),
                Err(FieldError::Parse {
                    name: name.to_owned()
                }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflowing_index() {
        assert!(parse_field_index(PREFIX, "track_image_4294967295").is_ok());
        assert!(parse_field_index(PREFIX, "track_image_4294967296").is_err());
    }

    #[test]
    fn format_then_parse() {
        let name = format_field_name(PREFIX, 19);
        assert_eq!(name, "track_image_19");
        assert_eq!(parse_field_index(PREFIX, &name), Ok(19));
    }
}
