use crate::data::Ticket;

/// JSON exporter for the consolidated tickets: one indented array, non-ASCII
/// text written as is, no trailing newline.
pub(crate) fn write_tickets<W: std::io::Write>(
    mut writer: W,
    tickets: &[Ticket],
) -> Result<(), std::io::Error> {
    serde_json::to_writer_pretty(&mut writer, tickets)?;
    writer.flush()?;
    Ok(())
}
