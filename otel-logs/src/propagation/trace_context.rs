//! W3C `traceparent` codec.
use crate::propagation::{Extractor, Injector};
use crate::{SpanId, TraceContext, TraceFlags, TraceId};

const SUPPORTED_VERSION: u8 = 0;
const MAX_VERSION: u8 = 254;
const TRACEPARENT_HEADER: &str = "traceparent";

/// Reads and writes a [`TraceContext`] in [W3C TraceContext] format.
///
/// `traceparent: 00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01`
///
/// [W3C TraceContext]: https://www.w3.org/TR/trace-context/
#[derive(Clone, Debug, Default)]
pub struct TraceContextPropagator {
    _private: (),
}

impl TraceContextPropagator {
    /// Create a new `TraceContextPropagator`.
    pub fn new() -> Self {
        TraceContextPropagator { _private: () }
    }

    /// Header names this propagator reads and writes.
    pub fn fields(&self) -> &'static [&'static str] {
        &[TRACEPARENT_HEADER]
    }

    /// Writes `traceparent` into the carrier; invalid contexts are skipped.
    pub fn inject(&self, trace_context: &TraceContext, injector: &mut dyn Injector) {
        if !trace_context.is_valid() {
            return;
        }
        let flags = trace_context.trace_flags.to_u8() & TraceFlags::SAMPLED.to_u8();
        injector.set(
            TRACEPARENT_HEADER,
            format!(
                "{:02x}-{}-{}-{:02x}",
                SUPPORTED_VERSION, trace_context.trace_id, trace_context.span_id, flags
            ),
        );
    }

    /// Reads `traceparent` from the carrier.
    ///
    /// Returns `None` when the header is missing, malformed or carries
    /// all-zero ids.
    pub fn extract(&self, extractor: &dyn Extractor) -> Option<TraceContext> {
        let header = extractor.get(TRACEPARENT_HEADER)?;
        let parts: Vec<&str> = header.trim().split_terminator('-').collect();
        if parts.len() < 4 {
            return None;
        }

        let version = u8::from_str_radix(parts[0], 16).ok()?;
        if version > MAX_VERSION || (version == 0 && parts.len() != 4) {
            return None;
        }

        let trace_id = parse_lower_hex(parts[1], 32).and_then(|s| TraceId::from_hex(s).ok())?;
        let span_id = parse_lower_hex(parts[2], 16).and_then(|s| SpanId::from_hex(s).ok())?;

        let flags = u8::from_str_radix(parts[3], 16).ok()?;
        if version == 0 && flags > 2 {
            return None;
        }

        let trace_context = TraceContext::new(
            trace_id,
            span_id,
            TraceFlags::new(flags & TraceFlags::SAMPLED.to_u8()),
        );
        trace_context.is_valid().then_some(trace_context)
    }
}

fn parse_lower_hex(field: &str, width: usize) -> Option<&str> {
    let valid = field.len() == width
        && field
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    valid.then_some(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::MessageHeaders;
    use rstest::rstest;
    use std::collections::HashMap;

    #[rstest]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01", true)]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-00", false)]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-02", false)]
    fn extracts_valid_headers(#[case] header: &str, #[case] sampled: bool) {
        let mut carrier = HashMap::new();
        carrier.insert(TRACEPARENT_HEADER.to_string(), header.to_string());

        let trace_context = TraceContextPropagator::new().extract(&carrier).unwrap();
        assert_eq!(
            trace_context.trace_id,
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
        assert_eq!(
            trace_context.span_id,
            SpanId::from_hex("00f067aa0ba902b7").unwrap()
        );
        assert_eq!(trace_context.trace_flags.is_sampled(), sampled);
    }

    #[rstest]
    #[case("")]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7")]
    #[case("00-4BF92F3577B34DA6A3CE929D0E0E4736-00f067aa0ba902b7-01")]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-00F067AA0BA902B7-01")]
    #[case("00-00000000000000000000000000000000-00f067aa0ba902b7-01")]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-0000000000000000-01")]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-09")]
    #[case("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-extra")]
    #[case("ff-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01")]
    #[case("00-4bf92f3577b34da6-00f067aa0ba902b7-01")]
    fn rejects_invalid_headers(#[case] header: &str) {
        let mut carrier = HashMap::new();
        carrier.insert(TRACEPARENT_HEADER.to_string(), header.to_string());
        assert_eq!(TraceContextPropagator::new().extract(&carrier), None);
    }

    #[test]
    fn future_versions_may_carry_extra_fields() {
        let mut carrier = HashMap::new();
        carrier.insert(
            TRACEPARENT_HEADER.to_string(),
            "01-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01-extra".to_string(),
        );
        assert!(TraceContextPropagator::new().extract(&carrier).is_some());
    }

    #[test]
    fn inject_writes_traceparent() {
        let trace_context = TraceContext::new(
            TraceId::from(0x4bf92f3577b34da6a3ce929d0e0e4736),
            SpanId::from(0x00f067aa0ba902b7),
            TraceFlags::new(0xff),
        );
        let mut headers = MessageHeaders::new();
        TraceContextPropagator::new().inject(&trace_context, &mut headers);
        assert_eq!(
            headers.get(TRACEPARENT_HEADER).as_deref(),
            Some("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01")
        );
    }

    #[test]
    fn inject_skips_invalid_context() {
        let mut carrier = HashMap::new();
        TraceContextPropagator::new().inject(&TraceContext::default(), &mut carrier);
        assert!(carrier.is_empty());
    }

    #[test]
    fn record_picks_up_trace_context_from_carrier() {
        let mut headers = MessageHeaders::new();
        headers.set(
            TRACEPARENT_HEADER,
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01".to_string(),
        );
        let mut record = crate::logs::LogRecord::new();
        assert!(record.set_trace_context_from(&headers));
        assert!(record.trace_context.is_valid());

        let mut untouched = crate::logs::LogRecord::new();
        assert!(!untouched.set_trace_context_from(&MessageHeaders::new()));
        assert!(!untouched.trace_context.is_valid());
    }
}
