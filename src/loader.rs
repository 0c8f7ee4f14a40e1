use std::io;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::category::normalize_label;
use crate::error::{LoadError, MalformedQuestion};
use crate::question::QuestionRow;

/// Header names accepted for each column, compared after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub question: Vec<String>,
    /// Every column whose header starts with one of these is an option.
    pub option_prefix: Vec<String>,
    pub answer: Vec<String>,
    pub category: Vec<String>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|n| n.to_string()).collect()
        }
        Self {
            question: owned(&["Pregunta", "Question"]),
            option_prefix: owned(&["Opción", "Option"]),
            answer: owned(&["Resp.", "Respuesta", "Answer"]),
            category: owned(&["Categoría", "Category", "Tema", "Topic"]),
        }
    }
}

/// Rows that made it through, plus the ones that were dropped and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: Vec<QuestionRow>,
    /// `(line number, reason)` for every excluded row.
    pub skipped: Vec<(usize, MalformedQuestion)>,
}

struct Columns {
    question: usize,
    options: Vec<usize>,
    answer: usize,
    category: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, layout: &ColumnLayout) -> Result<Self, LoadError> {
        let normalized: Vec<String> = headers.iter().map(normalize_label).collect();
        let aliases = |names: &[String]| -> Vec<String> {
            names
                .iter()
                .map(|n| normalize_label(n))
                .filter(|n| !n.is_empty())
                .collect()
        };
        let find = |names: &[String]| -> Option<usize> {
            let wanted = aliases(names);
            normalized.iter().position(|h| wanted.contains(h))
        };

        let question = find(&layout.question)
            .ok_or_else(|| LoadError::MissingColumn(layout.question.join(" / ")))?;
        let answer = find(&layout.answer)
            .ok_or_else(|| LoadError::MissingColumn(layout.answer.join(" / ")))?;
        let category = find(&layout.category);

        let prefixes = aliases(&layout.option_prefix);
        let options: Vec<usize> = normalized
            .iter()
            .enumerate()
            .filter(|(i, h)| {
                *i != question
                    && *i != answer
                    && Some(*i) != category
                    && prefixes.iter().any(|p| h.starts_with(p.as_str()))
            })
            .map(|(i, _)| i)
            .collect();
        if options.is_empty() {
            return Err(LoadError::MissingColumn(layout.option_prefix.join(" / ")));
        }

        Ok(Self {
            question,
            options,
            answer,
            category,
        })
    }
}

pub fn load_from_path(path: &Path, layout: &ColumnLayout) -> Result<LoadReport, LoadError> {
    info!("Loading questions from: {}", path.display());
    let reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_rows(reader, layout)
}

pub fn load_from_reader<R: io::Read>(source: R, layout: &ColumnLayout) -> Result<LoadReport, LoadError> {
    let reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    read_rows(reader, layout)
}

fn read_rows<R: io::Read>(mut reader: Reader<R>, layout: &ColumnLayout) -> Result<LoadReport, LoadError> {
    let columns = Columns::resolve(reader.headers()?, layout)?;

    let mut rows = Vec::new();
    let mut skipped = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = i + 2;
        let cell = |col: usize| record.get(col).unwrap_or("");

        let options = columns.options.iter().map(|&col| cell(col).to_string()).collect();
        let answer = parse_answer_index(cell(columns.answer));
        if answer.is_none() && !cell(columns.answer).is_empty() {
            warn!("Row {}: unreadable answer index {:?}", line, cell(columns.answer));
        }

        match QuestionRow::new(cell(columns.question), options, answer) {
            Ok(row) => {
                let category = columns.category.map(|col| cell(col).to_string());
                rows.push(row.with_category(category));
            }
            Err(reason) => {
                warn!("Row {} skipped: {}", line, reason);
                skipped.push((line, reason));
            }
        }
    }

    if rows.is_empty() {
        return Err(LoadError::NoQuestions);
    }

    info!("Loaded {} questions, skipped {} rows", rows.len(), skipped.len());
    Ok(LoadReport { rows, skipped })
}

/// Reads a 1-based answer index, accepting spreadsheet floats like `"2.0"`.
///
/// Anything that is not a positive whole number yields `None`.
pub fn parse_answer_index(cell: &str) -> Option<usize> {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<usize>() {
        return (n >= 1).then_some(n);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as usize)
    } else {
        None
    }
}
