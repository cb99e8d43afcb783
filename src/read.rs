use crate::data::{ArticleError, RowError, Ticket, DELIMITER};
use crate::parse::{parse_row, ParsedRow};
use csv::Position;

/// Trait for doing something with the tickets read from a CSV export, and
/// with the rows and article groups that had to be skipped. Used to feed the
/// `Consolidation`, but also by mock tests checking what the reader produces.
pub(crate) trait TicketUser {
    fn use_ticket(&mut self, ticket: Ticket);
    fn skip_row(&mut self, line: u64, error: RowError);
    fn skip_article(&mut self, line: u64, error: ArticleError);
}

/// CSV importer for `Ticket`s: semicolon separated, no header line, rows of
/// any width, leading UTF-8 BOM dropped. Bad rows go to `skip_row`; an I/O or
/// encoding error stops the file and is returned, tickets already handed out
/// stay handed out.
pub(crate) fn read_tickets<R: std::io::Read, U: TicketUser>(
    reader: R,
    user: &mut U,
) -> Result<(), csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, Position::line);
        match parse_row(&record) {
            Ok(ParsedRow { ticket, skipped }) => {
                for error in skipped {
                    user.skip_article(line, error);
                }
                user.use_ticket(ticket);
            }
            Err(error) => user.skip_row(line, error),
        }
    }
    Ok(())
}
