//! Dataset loading.
//!
//! The format is FASTA-like. Blank lines are skipped and a line starting
//! with `>` opens a record whose following lines are joined into one
//! sequence. Lines that appear before the first header are each a sequence
//! of their own, so a plain one-per-line file also works.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{bail, Context, Result};

/// Reads every sequence from `reader`.
pub fn read_sequences<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut sequences = Vec::new();
    let mut record = String::new();
    let mut seen_header = false;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            seen_header = true;
            if !record.is_empty() {
                sequences.push(std::mem::take(&mut record));
            }
            continue;
        }
        if seen_header {
            record.push_str(&line);
        } else {
            sequences.push(line);
        }
    }
    if !record.is_empty() {
        sequences.push(record);
    }
    Ok(sequences)
}

/// Loads the sequences in the file at `path`. A file without any sequence
/// is an error.
pub fn load_sequences(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;
    let sequences = read_sequences(BufReader::new(file))
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    if sequences.is_empty() {
        bail!("dataset {} did not contain any sequences", path.display());
    }
    log::debug!("loaded {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Used when no dataset is given and the inputs are DNA.
pub fn dna_smoke_set() -> Vec<String> {
    vec!["ACGTACGT".to_string(), "TTTTACGT".to_string(), "GGGGCCCC".to_string()]
}

/// Used when no dataset is given and the inputs are dot-bracket strings.
pub fn rna_smoke_set() -> Vec<String> {
    vec!["((..))".to_string(), "(()())".to_string(), "(.)".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Vec<String> {
        read_sequences(io::Cursor::new(text)).unwrap()
    }

    #[test]
    fn fasta_records_are_joined() {
        let text = ">seq1 first\nACGT\nTTGA\n\n>seq2\nGGCC\n";
        assert_eq!(read(text), vec!["ACGTTTGA", "GGCC"]);
    }

    #[test]
    fn plain_lines_are_separate_sequences() {
        assert_eq!(read("ACGT\n\nTTTT\r\n"), vec!["ACGT", "TTTT"]);
    }

    #[test]
    fn lines_before_a_header_stand_alone() {
        assert_eq!(read("AAAA\n>x\nCC\nGG\n"), vec!["AAAA", "CCGG"]);
    }

    #[test]
    fn header_without_body_is_dropped() {
        assert_eq!(read(">empty\n>full\nAC\n"), vec!["AC"]);
        assert!(read(">only\n\n").is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_sequences(Path::new("/nonexistent/reads.fa")).unwrap_err();
        assert!(err.to_string().contains("failed to open dataset"));
    }

    #[test]
    fn smoke_sets() {
        assert_eq!(dna_smoke_set().len(), 3);
        assert!(rna_smoke_set().iter().all(|s| seqautomata::validate_dot_bracket(s.as_bytes())));
    }
}
