use crate::{
    compute::{Consolidation, ConversionReport},
    data::{Error, Ticket, OUTPUT_FILE_NAME},
    read::read_tickets,
    write::write_tickets,
};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Where to look for exports and where to put the consolidated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Runs one conversion: every `.csv` file of the input directory is read,
/// the valid tickets of all files are merged and written to
/// `tickets_consolidated.json` in the output directory.
///
/// Bad rows, article groups and files are skipped and show up in the report.
/// Only a missing input directory, an empty result or a write failure stop
/// the run, and none of them leaves an output file behind (a failed write
/// may leave a partial one).
pub(crate) fn convert(config: &Config) -> Result<ConversionReport, Error> {
    fs::create_dir_all(&config.output_dir).map_err(|source| Error::CreateOutputDir {
        path: config.output_dir.clone(),
        source,
    })?;
    if !config.input_dir.exists() {
        return Err(Error::MissingInputDir(config.input_dir.clone()));
    }

    let mut consolidation = Consolidation::new();
    for path in csv_files(&config.input_dir)? {
        info!("Processing {}", path.display());
        consolidation.begin_file(&path);
        let result = File::open(&path)
            .map_err(csv::Error::from)
            .and_then(|file| read_tickets(file, &mut consolidation));
        if let Err(e) = result {
            error!("Failed to read {}: {e}", path.display());
            consolidation.fail_file(&e);
        }
    }
    if consolidation.tickets.is_empty() {
        return Err(Error::EmptyResult);
    }

    let output_path = config.output_dir.join(OUTPUT_FILE_NAME);
    write_file(&output_path, &consolidation.tickets).map_err(|source| Error::Write {
        path: output_path.clone(),
        source,
    })?;
    Ok(consolidation.report(output_path))
}

/// CSV files of `dir`, in listing order.
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|source| Error::ReadInputDir {
        path: dir.to_owned(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) if is_csv(&entry.path()) => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable entry of {}: {e}", dir.display()),
        }
    }
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".csv"))
        .unwrap_or(false)
}

fn write_file(path: &Path, tickets: &[Ticket]) -> Result<(), std::io::Error> {
    write_tickets(BufWriter::new(File::create(path)?), tickets)
}
