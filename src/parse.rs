use crate::data::{
    Article, ArticleError, ClientId, Quantity, RowError, Ticket, TicketId, ARTICLE_COLUMNS,
    CLIENT, DATE, HEADER_COLUMNS, STORE, TICKET_ID, TIME,
};
use csv::StringRecord;
use rust_decimal::prelude::*;

const REQUIRED: [(usize, &str); 4] = [
    (DATE, "date"),
    (STORE, "magasin"),
    (TICKET_ID, "id_ticket"),
    (TIME, "time"),
];

/// A ticket built from one row, along with the article groups that had to
/// be dropped on the way.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedRow {
    pub ticket: Ticket,
    pub skipped: Vec<ArticleError>,
}

/// Turns one export row into a ticket.
///
/// The first five columns are the ticket header, everything after is read in
/// groups of four as articles. A bad header rejects the row; a bad group only
/// loses that article. A row left with no article at all is rejected too.
pub(crate) fn parse_row(record: &StringRecord) -> Result<ParsedRow, RowError> {
    if record.len() < HEADER_COLUMNS {
        return Err(RowError::TooFewColumns(record.len()));
    }
    let field = |index: usize| record[index].trim();
    if let Some((_, name)) = REQUIRED.iter().find(|(index, _)| field(*index).is_empty()) {
        return Err(RowError::EmptyField(*name));
    }
    let id: TicketId = field(TICKET_ID)
        .parse()
        .map_err(|_| RowError::InvalidTicketId(field(TICKET_ID).to_owned()))?;
    let client = parse_client(field(CLIENT))?;

    let mut articles = Vec::new();
    let mut skipped = Vec::new();
    for start in (HEADER_COLUMNS..record.len()).step_by(ARTICLE_COLUMNS) {
        // trailing empty groups are padding, not articles
        if record[start].trim().is_empty() {
            continue;
        }
        match parse_article(record, start) {
            Ok(article) => articles.push(article),
            Err(e) => skipped.push(e),
        }
    }
    if articles.is_empty() {
        return Err(RowError::NoArticles { id, skipped });
    }

    Ok(ParsedRow {
        ticket: Ticket {
            magasin: field(STORE).to_owned(),
            timestamp: format!("{} {}", field(DATE), field(TIME)),
            client,
            id,
            articles,
        },
        skipped,
    })
}

/// Client numbers are optional: anything that is not plain digits means
/// "no client". Digits that overflow are a real error though.
pub(crate) fn parse_client(text: &str) -> Result<Option<ClientId>, RowError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| RowError::InvalidClient(text.to_owned()))
}

/// Reads the article group starting at column `start`.
pub(crate) fn parse_article(record: &StringRecord, start: usize) -> Result<Article, ArticleError> {
    let column = |offset: usize| record.get(start + offset);
    let produit = column(0).map(str::trim).unwrap_or_default();
    if produit.is_empty() {
        return Err(ArticleError::MissingProduct(start));
    }
    if column(ARTICLE_COLUMNS - 1).is_none() {
        return Err(ArticleError::Truncated(start));
    }
    let categorie = column(1).map(str::trim).unwrap_or_default();
    let price = column(2).unwrap_or("0");
    let quantity = column(3).unwrap_or("0");

    Ok(Article {
        produit: produit.to_owned(),
        categorie: categorie.to_owned(),
        prix_u: parse_price(price)
            .ok_or_else(|| ArticleError::InvalidPrice(start, price.to_owned()))?,
        qte: parse_quantity(quantity)
            .ok_or_else(|| ArticleError::InvalidQuantity(start, quantity.to_owned()))?,
    })
}

/// Prices come with a decimal comma (`12,50`).
pub(crate) fn parse_price(text: &str) -> Option<Decimal> {
    parse_number(&text.replace(',', "."))
}

/// Quantities may be written as decimals (`3.0`); the fraction is dropped.
pub(crate) fn parse_quantity(text: &str) -> Option<Quantity> {
    parse_number(text)?.trunc().to_i64()
}

fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
