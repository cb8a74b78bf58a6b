use crate::align::structs::ViterbiPath;
use crate::classify::Classification;

use anyhow::Context;
use std::io::Write;
use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Field {
    Name,
    Score,
    ScorePerState,
    Label,
    Path,
}

impl Field {
    pub fn all() -> Vec<Field> {
        Field::iter().collect()
    }

    fn value(&self, path: &ViterbiPath, label: bool) -> String {
        match self {
            Field::Name => path.name.clone(),
            Field::Score => format!("{:.4}", path.score),
            Field::ScorePerState => format!("{:.4}", path.score_per_state()),
            Field::Label => label.to_string(),
            Field::Path => path.state_string(),
        }
    }
}

#[derive(Clone)]
pub struct TableFormat {
    pub fields: Vec<Field>,
    pub labels: Vec<Vec<String>>,
    pub widths: Vec<usize>,
}

impl TableFormat {
    pub fn new(fields: &[Field]) -> anyhow::Result<Self> {
        let mut labels = vec![];
        let mut widths = vec![];

        // this regex matches CamelCaseWords
        let label_regex =
            regex::Regex::new(r"[A-Z][a-z]*").context("failed to build field label regex")?;

        // this closure extracts the words & minimum column width for a field
        let label_fn = |field: &Field| -> anyhow::Result<(Vec<_>, usize)> {
            // the Debug string for an enum produces the variant name
            let field_name = format!("{:?}", field);

            let (label_words, lengths): (Vec<_>, Vec<_>) = label_regex
                .find_iter(&field_name)
                .map(|m| (m.as_str().to_lowercase(), m.len()))
                .unzip();

            // the length of the longest word
            // is the min width of the column
            let min_width = *lengths
                .iter()
                .max()
                .context("failed to produce max field label width")?;
            Ok((label_words, min_width))
        };

        let first = fields.first().context("no output fields")?;

        // the first field needs at least +2 to its
        // width to accommodate the "# " prefix
        let (mut label_words, mut min_width) = label_fn(first)?;
        labels.push(label_words);
        widths.push(min_width + 2);

        for field in fields.iter().skip(1) {
            (label_words, min_width) = label_fn(field)?;
            labels.push(label_words);
            widths.push(min_width);
        }

        Ok(Self {
            fields: fields.to_vec(),
            labels,
            widths,
        })
    }

    pub fn update_widths(&mut self, path: &ViterbiPath, label: bool) {
        self.fields.iter().enumerate().for_each(|(idx, field)| {
            let width = field.value(path, label).len();
            self.widths[idx] = self.widths[idx].max(width);
        });
    }

    pub fn header(&self) -> anyhow::Result<String> {
        // the number of rows in the header is
        // the max number of words in a field
        let num_rows = self
            .labels
            .iter()
            .map(|l| l.len())
            .max()
            .context("field headers are empty")?;

        let mut header_row_strings: Vec<String> = vec!["# ".to_string(); num_rows + 1];

        // this function appends the field labels to the header
        let header_append_fn = |words: &Vec<String>, width: usize, rows: &mut Vec<String>| {
            let offset = num_rows - words.len();
            let mut words_padded = vec![""; offset];
            words.iter().for_each(|w| words_padded.push(w));

            words_padded.iter().enumerate().for_each(|(row, token)| {
                let row_string = &mut rows[row];
                *row_string = format!("{row_string}{:width$} ", token, width = width);
            });

            if let Some(last_row_string) = rows.last_mut() {
                *last_row_string = format!("{last_row_string}{} ", "-".repeat(width));
            }
        };

        // the first column gets -2 to its width to account for the "# "
        header_append_fn(&self.labels[0], self.widths[0] - 2, &mut header_row_strings);

        self.labels
            .iter()
            // skip the first column
            .skip(1)
            .zip(self.widths.iter().skip(1))
            .for_each(|(words, &width)| {
                header_append_fn(words, width, &mut header_row_strings);
            });

        Ok(header_row_strings
            .iter()
            .map(|row| row.trim_end())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub fn row(&self, path: &ViterbiPath, label: bool) -> String {
        let line = self
            .fields
            .iter()
            .zip(&self.widths)
            .map(|(field, &width)| match field {
                // numbers are right aligned
                Field::Score | Field::ScorePerState => {
                    format!("{:>width$}", field.value(path, label), width = width)
                }
                _ => format!("{:width$}", field.value(path, label), width = width),
            })
            .collect::<Vec<_>>()
            .join(" ");

        line.trim_end().to_string()
    }
}

/// Writes one whitespace aligned row per path, preceded by a header.
pub fn write_tabular_output(
    paths: &[ViterbiPath],
    classification: &Classification,
    fields: &[Field],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut format = TableFormat::new(fields)?;

    paths
        .iter()
        .zip(&classification.labels)
        .for_each(|(path, &label)| format.update_widths(path, label));

    writeln!(out, "{}", format.header()?)?;

    for (path, &label) in paths.iter().zip(&classification.labels) {
        writeln!(out, "{}", format.row(path, label))?;
    }

    Ok(())
}
