//! Line-oriented output of query results.

use std::io::Write;

use anyhow::Result;
use storage::{Message, MessageRecord};

/// One JSON object per record.
pub fn write_records(out: &mut impl Write, records: &[MessageRecord]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    Ok(())
}

/// `[adapter] plain text` per message.
pub fn write_messages(out: &mut impl Write, messages: &[Message]) -> Result<()> {
    for message in messages {
        writeln!(out, "[{}] {}", message.adapter(), message.extract_plain_text())?;
    }
    Ok(())
}

pub fn write_plain_text(out: &mut impl Write, texts: &[String]) -> Result<()> {
    for text in texts {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}
