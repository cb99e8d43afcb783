use crate::{
    data::{ArticleError, RowError, Ticket},
    read::TicketUser,
};
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What happened to one CSV file of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileReport {
    pub path: PathBuf,
    pub tickets: usize,
    pub skipped_rows: usize,
    pub skipped_articles: usize,
    /// Set when the file could not be read to the end.
    pub error: Option<String>,
}

impl FileReport {
    pub fn rows(&self) -> usize {
        self.tickets + self.skipped_rows
    }
}

/// Outcome of a successful conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConversionReport {
    pub output_path: PathBuf,
    pub tickets: usize,
    pub stores: usize,
    pub articles: usize,
    pub files: Vec<FileReport>,
}

impl ConversionReport {
    pub fn failed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| file.error.is_some())
    }

    pub fn skipped_rows(&self) -> usize {
        self.files.iter().map(|file| file.skipped_rows).sum()
    }

    pub fn skipped_articles(&self) -> usize {
        self.files.iter().map(|file| file.skipped_articles).sum()
    }
}

/// Every ticket of the run, in reading order, plus the counters the final
/// report is made of. Single-threaded, owned by one `convert` call.
#[derive(Debug, Default)]
pub(crate) struct Consolidation {
    pub tickets: Vec<Ticket>,
    stores: HashSet<String>,
    articles: usize,
    files: Vec<FileReport>,
}

impl Consolidation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Following tickets and skips are accounted to `path`.
    pub fn begin_file(&mut self, path: &Path) {
        self.files.push(FileReport {
            path: path.to_owned(),
            tickets: 0,
            skipped_rows: 0,
            skipped_articles: 0,
            error: None,
        });
    }

    /// Marks the current file as aborted.
    pub fn fail_file(&mut self, error: &dyn std::fmt::Display) {
        if let Some(file) = self.files.last_mut() {
            file.error = Some(error.to_string());
        }
    }

    pub fn report(self, output_path: PathBuf) -> ConversionReport {
        ConversionReport {
            output_path,
            tickets: self.tickets.len(),
            stores: self.stores.len(),
            articles: self.articles,
            files: self.files,
        }
    }
}

impl TicketUser for Consolidation {
    fn use_ticket(&mut self, ticket: Ticket) {
        if !self.stores.contains(&ticket.magasin) {
            self.stores.insert(ticket.magasin.clone());
        }
        self.articles += ticket.articles.len();
        if let Some(file) = self.files.last_mut() {
            file.tickets += 1;
        }
        self.tickets.push(ticket);
    }

    fn skip_row(&mut self, line: u64, error: RowError) {
        for article in error.skipped_articles() {
            debug!("line {line}: {article}");
        }
        debug!("line {line}: row skipped: {error}");
        if let Some(file) = self.files.last_mut() {
            file.skipped_rows += 1;
            file.skipped_articles += error.skipped_articles().len();
        }
    }

    fn skip_article(&mut self, line: u64, error: ArticleError) {
        debug!("line {line}: {error}");
        if let Some(file) = self.files.last_mut() {
            file.skipped_articles += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        data::{Article, ArticleError, RowError, Ticket},
        read::TicketUser,
    };
    use rust_decimal_macros::dec;
    use std::path::{Path, PathBuf};

    use super::{Consolidation, FileReport};

    fn ticket(magasin: &str, id: i64, articles: usize) -> Ticket {
        Ticket {
            magasin: magasin.to_owned(),
            timestamp: "2024-01-01 10:15".to_owned(),
            client: None,
            id,
            articles: vec![
                Article {
                    produit: "Bread".to_owned(),
                    categorie: "Food".to_owned(),
                    prix_u: dec!(2.5),
                    qte: 1,
                };
                articles
            ],
        }
    }

    #[test]
    fn test_statistics() {
        let mut consolidation = Consolidation::new();
        consolidation.use_ticket(ticket("StoreA", 1, 2));
        consolidation.use_ticket(ticket("StoreB", 2, 1));
        consolidation.use_ticket(ticket("StoreA", 3, 3));
        consolidation.use_ticket(ticket("storea", 4, 1));
        let report = consolidation.report(PathBuf::from("out.json"));
        assert_eq!(report.tickets, 4);
        assert_eq!(report.stores, 3);
        assert_eq!(report.articles, 7);
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_tickets_keep_order() {
        let mut consolidation = Consolidation::new();
        for id in [3, 1, 2] {
            consolidation.use_ticket(ticket("StoreA", id, 1));
        }
        let ids: Vec<_> = consolidation.tickets.iter().map(|t| t.id).collect();
        assert_eq!(ids, [3, 1, 2]);
    }

    #[test]
    fn test_file_accounting() {
        let mut consolidation = Consolidation::new();
        consolidation.begin_file(Path::new("a.csv"));
        consolidation.use_ticket(ticket("StoreA", 1, 1));
        consolidation.skip_article(1, ArticleError::Truncated(9));
        consolidation.skip_row(2, RowError::TooFewColumns(3));
        consolidation.skip_row(
            3,
            RowError::NoArticles {
                id: 7,
                skipped: vec![
                    ArticleError::InvalidPrice(5, "x".to_owned()),
                    ArticleError::InvalidQuantity(9, "y".to_owned()),
                ],
            },
        );
        consolidation.begin_file(Path::new("b.csv"));
        consolidation.use_ticket(ticket("StoreB", 2, 2));
        consolidation.fail_file(&"invalid UTF-8");

        let report = consolidation.report(PathBuf::from("out.json"));
        assert_eq!(
            report.files,
            [
                FileReport {
                    path: PathBuf::from("a.csv"),
                    tickets: 1,
                    skipped_rows: 2,
                    skipped_articles: 3,
                    error: None,
                },
                FileReport {
                    path: PathBuf::from("b.csv"),
                    tickets: 1,
                    skipped_rows: 0,
                    skipped_articles: 0,
                    error: Some("invalid UTF-8".to_owned()),
                },
            ]
        );
        assert_eq!(report.files[0].rows(), 3);
        assert_eq!(report.skipped_rows(), 2);
        assert_eq!(report.skipped_articles(), 3);
        let failed: Vec<_> = report.failed_files().map(|f| f.path.clone()).collect();
        assert_eq!(failed, [PathBuf::from("b.csv")]);
        assert_eq!(report.articles, 3);
    }
}
