//! Vehicle identity fragment interpretation
//!
//! Identity records share one op-code pair; the first payload byte selects
//! the fragment kind. Manufacturer fragments carry a 3-byte world
//! manufacturer identifier after four filler bytes that must be zero.

use super::{InterpretError, Interpreter};
use crate::types::RenderedValue;

/// Primary op-code of identity records
pub const OP_IDENTITY: u16 = 0x3C05;

/// High-bit variant of the identity op-code, seen in the same logs
pub const OP_IDENTITY_ALT: u16 = 0xBC05;

const KIND_MANUFACTURER: u8 = 0x10;
const KIND_MODEL: u8 = 0x11;
const KIND_SERIAL: u8 = 0x12;

/// Decodes model, serial and manufacturer string fragments.
pub struct IdentityInterpreter;

impl Interpreter for IdentityInterpreter {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn interpret(&self, payload: &[u8; 8]) -> Result<RenderedValue, InterpretError> {
        match payload[0] {
            KIND_MODEL => Ok(RenderedValue::Model(string_fragment(&payload[1..]))),
            KIND_SERIAL => Ok(RenderedValue::SerialNumber(string_fragment(&payload[1..]))),
            KIND_MANUFACTURER => {
                if payload[1..5].iter().any(|&b| b != 0) {
                    return Err(InterpretError::MalformedManufacturerField);
                }
                Ok(RenderedValue::Manufacturer(string_fragment(&payload[5..])))
            }
            kind => Err(InterpretError::UnknownIdentityKind(kind)),
        }
    }
}

/// Cut the fragment at the first NUL and decode it leniently
fn string_fragment(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_fragment() {
        let payload = [0x11, b'M', b'o', b'd', b'e', b'l', b'Y', 0x00];
        assert_eq!(
            IdentityInterpreter.interpret(&payload),
            Ok(RenderedValue::Model("ModelY".to_string()))
        );
    }

    #[test]
    fn test_serial_fragment_without_terminator() {
        // All 7 bytes used: printed verbatim
        let payload = [0x12, b'1', b'2', b'3', b'4', b'5', b'6', b'7'];
        assert_eq!(
            IdentityInterpreter.interpret(&payload),
            Ok(RenderedValue::SerialNumber("1234567".to_string()))
        );
    }

    #[test]
    fn test_manufacturer_fragment() {
        let payload = [0x10, 0x00, 0x00, 0x00, 0x00, b'5', b'Y', b'J'];
        assert_eq!(
            IdentityInterpreter.interpret(&payload),
            Ok(RenderedValue::Manufacturer("5YJ".to_string()))
        );
    }

    #[test]
    fn test_manufacturer_with_non_zero_filler_fails() {
        let payload = [0x10, 0x01, 0x00, 0x00, 0x00, b'5', b'Y', b'J'];
        assert_eq!(
            IdentityInterpreter.interpret(&payload),
            Err(InterpretError::MalformedManufacturerField)
        );
    }

    #[test]
    fn test_unknown_sub_kind_fails() {
        let payload = [0x13, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            IdentityInterpreter.interpret(&payload),
            Err(InterpretError::UnknownIdentityKind(0x13))
        );
    }
}
