use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Write a serializable value as JSON, or its human rendering.
pub fn output<T, F>(
    value: &T,
    format: OutputFormat,
    writer: &mut dyn Write,
    human: F,
) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, value)?;
            writeln!(writer)?;
        }
        OutputFormat::Human => {
            writeln!(writer, "{}", human(value))?;
        }
    }
    Ok(())
}
