use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub type ClientId = i64;
pub type TicketId = i64;
pub type Quantity = i64;

/// Column layout of an export row: five header columns, then article groups.
pub const DATE: usize = 0;
pub const STORE: usize = 1;
pub const TICKET_ID: usize = 2;
pub const TIME: usize = 3;
pub const CLIENT: usize = 4;
pub const HEADER_COLUMNS: usize = 5;
pub const ARTICLE_COLUMNS: usize = 4;

pub const DELIMITER: u8 = b';';
pub const OUTPUT_FILE_NAME: &str = "tickets_consolidated.json";

/// One point-of-sale transaction. A `Ticket` only leaves the parser with at
/// least one article, so the output never contains empty tickets.
///
/// Field order is the key order of the JSON document, and `"id ticket"` keeps
/// the space the downstream consumers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Ticket {
    pub magasin: String,
    pub timestamp: String,
    pub client: Option<ClientId>,
    #[serde(rename = "id ticket")]
    pub id: TicketId,
    pub articles: Vec<Article>,
}

/// One line item of a ticket. Prices are exact decimals in memory but are
/// written as plain JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Article {
    pub produit: String,
    pub categorie: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub prix_u: Decimal,
    pub qte: Quantity,
}

/// Why a row did not produce a ticket. The row is skipped, the file goes on.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RowError {
    #[error("Row has {0} columns, at least 5 expected")]
    TooFewColumns(usize),
    #[error("Required field `{0}` is empty")]
    EmptyField(&'static str),
    #[error("Invalid ticket id {0:?}")]
    InvalidTicketId(String),
    #[error("Invalid client number {0:?}")]
    InvalidClient(String),
    #[error("Ticket #{id} has no valid article ({} skipped)", .skipped.len())]
    NoArticles {
        id: TicketId,
        skipped: Vec<ArticleError>,
    },
}

impl RowError {
    /// Article groups that were rejected before the row itself was dropped.
    pub fn skipped_articles(&self) -> &[ArticleError] {
        match self {
            RowError::NoArticles { skipped, .. } => skipped,
            _ => &[],
        }
    }
}

/// Why one article group was dropped; the rest of the ticket is kept.
/// The `usize` is the column where the group starts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArticleError {
    #[error("Article at column {0} has no product name")]
    MissingProduct(usize),
    #[error("Article at column {0} is truncated")]
    Truncated(usize),
    #[error("Invalid unit price {1:?} for article at column {0}")]
    InvalidPrice(usize, String),
    #[error("Invalid quantity {1:?} for article at column {0}")]
    InvalidQuantity(usize, String),
}

/// Conditions that stop a whole conversion run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot create output directory {}: {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Input directory {} does not exist", .0.display())]
    MissingInputDir(PathBuf),
    #[error("Cannot list input directory {}: {source}", .path.display())]
    ReadInputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No valid ticket found in the CSV files")]
    EmptyResult,
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
