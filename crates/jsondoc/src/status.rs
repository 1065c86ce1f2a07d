use std::fmt;

/// Terminal outcome of a parse attempt.
///
/// Every way a parse can end maps to exactly one enumerator, and every
/// enumerator has a stable lowercase name used by tests and diagnostics.
/// [`Status::AbsentValue`] doubles as the public report for input that
/// contains nothing but whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    BadDouble,
    AbsentValue,
    BadNegative,
    BadExponent,
    MissingComma,
    MissingColon,
    MalformedUtf8,
    DepthExceeded,
    StackOverflow,
    UnexpectedEof,
    OverlongAscii,
    UnexpectedComma,
    UnexpectedColon,
    UnexpectedOctal,
    TrailingContent,
    IllegalCharacter,
    InvalidHexEscape,
    OverlongUtf8_0x7ff,
    OverlongUtf8_0xffff,
    ObjectMissingValue,
    IllegalUtf8Character,
    InvalidUnicodeEscape,
    Utf16SurrogateInUtf8,
    UnexpectedEndOfArray,
    HexEscapeNotPrintable,
    InvalidEscapeCharacter,
    Utf8ExceedsUtf16Range,
    UnexpectedEndOfString,
    UnexpectedEndOfObject,
    ObjectKeyMustBeString,
    C1ControlCodeInString,
    NonDelC0ControlCodeInString,
}

impl Status {
    /// The stable name of this outcome.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::BadDouble => "bad_double",
            Status::AbsentValue => "absent_value",
            Status::BadNegative => "bad_negative",
            Status::BadExponent => "bad_exponent",
            Status::MissingComma => "missing_comma",
            Status::MissingColon => "missing_colon",
            Status::MalformedUtf8 => "malformed_utf8",
            Status::DepthExceeded => "depth_exceeded",
            Status::StackOverflow => "stack_overflow",
            Status::UnexpectedEof => "unexpected_eof",
            Status::OverlongAscii => "overlong_ascii",
            Status::UnexpectedComma => "unexpected_comma",
            Status::UnexpectedColon => "unexpected_colon",
            Status::UnexpectedOctal => "unexpected_octal",
            Status::TrailingContent => "trailing_content",
            Status::IllegalCharacter => "illegal_character",
            Status::InvalidHexEscape => "invalid_hex_escape",
            Status::OverlongUtf8_0x7ff => "overlong_utf8_0x7ff",
            Status::OverlongUtf8_0xffff => "overlong_utf8_0xffff",
            Status::ObjectMissingValue => "object_missing_value",
            Status::IllegalUtf8Character => "illegal_utf8_character",
            Status::InvalidUnicodeEscape => "invalid_unicode_escape",
            Status::Utf16SurrogateInUtf8 => "utf16_surrogate_in_utf8",
            Status::UnexpectedEndOfArray => "unexpected_end_of_array",
            Status::HexEscapeNotPrintable => "hex_escape_not_printable",
            Status::InvalidEscapeCharacter => "invalid_escape_character",
            Status::Utf8ExceedsUtf16Range => "utf8_exceeds_utf16_range",
            Status::UnexpectedEndOfString => "unexpected_end_of_string",
            Status::UnexpectedEndOfObject => "unexpected_end_of_object",
            Status::ObjectKeyMustBeString => "object_key_must_be_string",
            Status::C1ControlCodeInString => "c1_control_code_in_string",
            Status::NonDelC0ControlCodeInString => "non_del_c0_control_code_in_string",
        }
    }

    /// `true` only for [`Status::Success`].
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn names_are_stable() {
        assert_eq!(Status::Success.as_str(), "success");
        assert_eq!(Status::UnexpectedOctal.as_str(), "unexpected_octal");
        assert_eq!(Status::OverlongUtf8_0x7ff.as_str(), "overlong_utf8_0x7ff");
        assert_eq!(
            Status::NonDelC0ControlCodeInString.as_str(),
            "non_del_c0_control_code_in_string"
        );
        assert_eq!(Status::DepthExceeded.to_string(), "depth_exceeded");
    }
}
