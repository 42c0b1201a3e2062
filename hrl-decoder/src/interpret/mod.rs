//! Op-code interpreter registry
//!
//! Maps a record's 2-byte op-code to a decoding strategy that renders the
//! 8-byte payload as a typed value. The registry is built once, before any
//! decoding begins, and never changes afterwards. Lookup is by exact op-code
//! match.
//!
//! Most op-codes observed in real logs are unknown. Unregistered codes and
//! failed interpretations both degrade to [`RenderedValue::Raw`]; rendering
//! never aborts the decoding pass.

pub(crate) mod identity;
pub(crate) mod timestamp;

use std::collections::HashMap;

use crate::types::RenderedValue;

pub use identity::{OP_IDENTITY, OP_IDENTITY_ALT};
pub use timestamp::OP_TIMESTAMP;

/// A payload decode failure, local to a single record
///
/// These are downgraded to the raw fallback rendering, never propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InterpretError {
    #[error("reserved word is 0x{0:08X}, expected zero")]
    NonZeroReserved(u32),

    #[error("manufacturer fragment has non-zero filler bytes")]
    MalformedManufacturerField,

    #[error("unknown identity sub-kind 0x{0:02X}")]
    UnknownIdentityKind(u8),

    #[error("timestamp value is not representable")]
    TimestampOutOfRange,
}

/// A named decoding strategy for one op-code's payload
///
/// Stateless; looked up per record.
pub trait Interpreter: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Render the payload as a typed value, or fail with a decode error
    fn interpret(&self, payload: &[u8; 8]) -> Result<RenderedValue, InterpretError>;
}

/// Immutable op-code to interpreter mapping
pub struct InterpreterRegistry {
    map: HashMap<u16, Box<dyn Interpreter>>,
}

impl InterpreterRegistry {
    /// Build the registry with all built-in interpreters
    pub fn with_builtins() -> Self {
        let mut map: HashMap<u16, Box<dyn Interpreter>> = HashMap::new();
        map.insert(OP_TIMESTAMP, Box::new(timestamp::TimestampInterpreter));
        map.insert(OP_IDENTITY, Box::new(identity::IdentityInterpreter));
        map.insert(OP_IDENTITY_ALT, Box::new(identity::IdentityInterpreter));
        Self { map }
    }

    /// Number of registered op-codes
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no interpreters are registered
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render a record's payload
    ///
    /// Total: unknown op-codes and interpreter failures fall back to the raw
    /// rendering. Failures are logged at debug level since they are the
    /// expected outcome for unknown device firmware variants.
    pub fn render(&self, op: u16, payload: &[u8; 8]) -> RenderedValue {
        match self.map.get(&op) {
            Some(interpreter) => match interpreter.interpret(payload) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!(
                        "{} interpreter failed for op 0x{op:04X} ({e}), rendering raw",
                        interpreter.name()
                    );
                    RenderedValue::Raw(*payload)
                }
            },
            None => RenderedValue::Raw(*payload),
        }
    }
}
