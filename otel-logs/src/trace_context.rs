//! Trace correlation identifiers attached to log records.
use std::fmt;
use std::num::ParseIntError;

/// W3C trace flags carried alongside a [TraceContext].
///
/// Only [`TraceFlags::SAMPLED`] is defined by the W3C
/// [trace-flags](https://www.w3.org/TR/trace-context/#trace-flags) section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TraceFlags(u8);

impl TraceFlags {
    /// No flags set.
    pub const NOT_SAMPLED: TraceFlags = TraceFlags(0x00);

    /// The `sampled` bit.
    pub const SAMPLED: TraceFlags = TraceFlags(0x01);

    /// Construct new trace flags
    pub const fn new(flags: u8) -> Self {
        TraceFlags(flags)
    }

    /// Returns `true` if the `sampled` flag is set
    pub fn is_sampled(&self) -> bool {
        self.0 & Self::SAMPLED.0 == Self::SAMPLED.0
    }

    /// Returns the flags as a `u8`
    pub fn to_u8(self) -> u8 {
        self.0
    }
}

macro_rules! correlation_id {
    ($(#[$doc:meta])* $name:ident, $repr:ty, $bytes:literal, $width:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name($repr);

        impl $name {
            /// The all-zero, invalid id.
            pub const INVALID: $name = $name(0);

            /// Create an id from its big-endian byte representation.
            pub const fn from_bytes(bytes: [u8; $bytes]) -> Self {
                $name(<$repr>::from_be_bytes(bytes))
            }

            /// Big-endian byte representation of this id.
            pub const fn to_bytes(self) -> [u8; $bytes] {
                self.0.to_be_bytes()
            }

            /// Parses a base 16 string.
            pub fn from_hex(hex: &str) -> Result<Self, ParseIntError> {
                <$repr>::from_str_radix(hex, 16).map($name)
            }

            /// An id is valid when at least one byte is non-zero.
            pub const fn is_valid(&self) -> bool {
                self.0 != 0
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                $name(value)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:0width$x}", self.0, width = $width)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:0width$x}", self.0, width = $width)
            }
        }
    };
}

correlation_id!(
    /// A 16-byte value which identifies a trace.
    TraceId,
    u128,
    16,
    32
);

correlation_id!(
    /// An 8-byte value which identifies a span.
    SpanId,
    u64,
    8,
    16
);

/// The trace correlation pair of a log record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TraceContext {
    /// Trace the record belongs to.
    pub trace_id: TraceId,
    /// Span active when the record was produced.
    pub span_id: SpanId,
    /// Flags propagated with the trace.
    pub trace_flags: TraceFlags,
}

impl TraceContext {
    /// Create a new correlation pair.
    pub fn new(trace_id: TraceId, span_id: SpanId, trace_flags: TraceFlags) -> Self {
        TraceContext {
            trace_id,
            span_id,
            trace_flags,
        }
    }

    /// Valid only when both the trace id and the span id are non-zero.
    pub fn is_valid(&self) -> bool {
        self.trace_id.is_valid() && self.span_id.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    fn trace_ids() -> Vec<(TraceId, &'static str, [u8; 16])> {
        vec![
            (TraceId(0), "00000000000000000000000000000000", [0; 16]),
            (TraceId(255), "000000000000000000000000000000ff", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 255]),
            (TraceId(0x4bf92f3577b34da6a3ce929d0e0e4736), "4bf92f3577b34da6a3ce929d0e0e4736", [75, 249, 47, 53, 119, 179, 77, 166, 163, 206, 146, 157, 14, 14, 71, 54]),
        ]
    }

    #[test]
    fn trace_id_formats() {
        for (id, hex, bytes) in trace_ids() {
            assert_eq!(id.to_string(), hex);
            assert_eq!(id.to_bytes(), bytes);
            assert_eq!(TraceId::from_hex(hex).unwrap(), id);
            assert_eq!(TraceId::from_bytes(bytes), id);
        }
    }

    #[test]
    fn span_id_formats() {
        let id = SpanId::from(0x00f067aa0ba902b7);
        assert_eq!(id.to_string(), "00f067aa0ba902b7");
        assert_eq!(SpanId::from_hex("00f067aa0ba902b7").unwrap(), id);
        assert!(SpanId::from_hex("not_hex").is_err());
    }

    #[test]
    fn context_valid_only_when_both_ids_set() {
        let trace_id = TraceId::from(7);
        let span_id = SpanId::from(9);
        assert!(TraceContext::new(trace_id, span_id, TraceFlags::SAMPLED).is_valid());
        assert!(!TraceContext::new(trace_id, SpanId::INVALID, TraceFlags::SAMPLED).is_valid());
        assert!(!TraceContext::new(TraceId::INVALID, span_id, TraceFlags::default()).is_valid());
        assert!(!TraceContext::default().is_valid());
    }
}
