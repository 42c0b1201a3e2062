//! Timestamp record interpretation

use byteorder::{BigEndian, ByteOrder};
use chrono::DateTime;

use super::{InterpretError, Interpreter};
use crate::types::RenderedValue;

/// Op-code of timestamp records
pub const OP_TIMESTAMP: u16 = 0x1D28;

/// Decodes the payload as two big-endian u32 fields: a unix timestamp
/// followed by a reserved word that must be zero.
pub struct TimestampInterpreter;

impl Interpreter for TimestampInterpreter {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn interpret(&self, payload: &[u8; 8]) -> Result<RenderedValue, InterpretError> {
        let ts = BigEndian::read_u32(&payload[0..4]);
        let reserved = BigEndian::read_u32(&payload[4..8]);

        if reserved != 0 {
            return Err(InterpretError::NonZeroReserved(reserved));
        }

        let when = DateTime::from_timestamp(i64::from(ts), 0)
            .ok_or(InterpretError::TimestampOutOfRange)?;
        Ok(RenderedValue::Timestamp(when))
    }
}
