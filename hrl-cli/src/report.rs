//! Decoded report rendering
//!
//! Turns the decoder's event stream into the textual report: per-file
//! banners, per-block lines, per-frame lines and the closing op-code
//! histogram summary. A JSON-lines mode serializes the same events for
//! downstream tooling.

use anyhow::Result;
use serde_json::json;
use std::io::Write;

use hrl_decoder::{hex_with_ascii, DecodedEvent, OpCodeStats};

/// Write the textual report for an event stream
///
/// Decode errors (corrupt blocks) become `[!!]` lines; the stream itself
/// already abandoned the affected file, so rendering just continues.
pub fn write_text<W, I>(out: &mut W, events: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = hrl_decoder::Result<DecodedEvent>>,
{
    for event in events {
        match event {
            Ok(DecodedEvent::FileStart { name, byte_len, created }) => {
                writeln!(out, "[++] {name} is {byte_len} bytes long")?;
                writeln!(
                    out,
                    "[++] Creation date:      {} GMT",
                    created.format("%Y-%m-%d %H:%M:%S")
                )?;
            }
            Ok(DecodedEvent::BlockStart { block_index, offset, .. }) => {
                writeln!(out, "block {block_index} (offset 0x{offset:06x})")?;
            }
            Ok(DecodedEvent::ControlMarker { frame_index, raw, .. }) => {
                writeln!(out, "  {frame_index:4} ctrl {}", hex_with_ascii(&raw))?;
            }
            Ok(DecodedEvent::Record {
                frame_index,
                counting,
                op,
                value,
                anomalies,
                ..
            }) => {
                writeln!(
                    out,
                    "  {frame_index:4} rec  counting=0x{counting:02x} op=0x{op:04x}  {value}"
                )?;
                for anomaly in &anomalies {
                    writeln!(out, "       [anomaly] {anomaly}")?;
                }
            }
            Err(e) => {
                writeln!(out, "[!!] {e}")?;
            }
        }
    }
    Ok(())
}

/// Write the closing op-code histogram summary
pub fn write_stats<W: Write>(out: &mut W, stats: &OpCodeStats) -> Result<()> {
    if stats.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "op-code statistics (first payload byte):")?;
    for entry in stats.summary() {
        writeln!(out, "  op 0x{:04x}: {} record(s)", entry.op, entry.total)?;
        for (byte, count) in &entry.top {
            writeln!(out, "    0x{byte:02x}  {count}")?;
        }
        if entry.elided > 0 {
            writeln!(out, "    ... {} more value(s)", entry.elided)?;
        }
    }
    Ok(())
}

/// Write events as JSON lines
pub fn write_json<W, I>(out: &mut W, events: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = hrl_decoder::Result<DecodedEvent>>,
{
    for event in events {
        match event {
            Ok(ev) => writeln!(out, "{}", serde_json::to_string(&ev)?)?,
            Err(e) => writeln!(
                out,
                "{}",
                json!({ "event": "decode_error", "message": e.to_string() })
            )?,
        }
    }
    Ok(())
}

/// Write the statistics summary as one JSON line
pub fn write_stats_json<W: Write>(out: &mut W, stats: &OpCodeStats) -> Result<()> {
    writeln!(
        out,
        "{}",
        serde_json::to_string(&json!({ "event": "stats", "ops": stats.summary() }))?
    )?;
    Ok(())
}
