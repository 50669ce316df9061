//! Unpadded URL-safe base64 (RFC 4648 §5), safe in forms, query strings and clipboards.

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig},
        DecodePaddingMode,
    },
    Engine as _,
};

use super::CodecError;

/// Emits no `=`; accepts input with or without trailing padding.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode `bytes` as unpadded base64url. Empty input yields an empty string.
pub fn encode(bytes: &[u8]) -> String {
    ENGINE.encode(bytes)
}

/// Decode base64url text back to bytes.
///
/// # Errors
///
/// Returns [`CodecError::InvalidEncoding`] if `text` contains characters
/// outside the URL-safe alphabet (including `+` and `/`), has an impossible
/// length, or has non-zero trailing bits.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    ENGINE.decode(text).map_err(CodecError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_round_trip() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn uses_url_safe_alphabet_without_padding() {
        // Standard base64 of these bytes is "+/8=".
        assert_eq!(encode(&[0xfb, 0xff]), "-_8");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn accepts_padded_input() {
        assert_eq!(decode("-_8=").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode("QQ==").unwrap(), b"A");
    }

    #[test]
    fn rejects_standard_alphabet() {
        assert!(matches!(decode("+/8"), Err(CodecError::InvalidEncoding(_))));
    }

    #[test]
    fn rejects_whitespace_and_junk() {
        assert!(decode("QU JD").is_err());
        assert!(decode("QUJD!").is_err());
    }

    #[test]
    fn rejects_impossible_length() {
        // A single trailing symbol cannot encode a whole byte.
        assert!(decode("QUJDR").is_err());
    }

    proptest! {
        #[test]
        fn round_trips_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..=512)) {
            let text = encode(&data);
            prop_assert!(text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            prop_assert_eq!(decode(&text).unwrap(), data);
        }
    }
}
