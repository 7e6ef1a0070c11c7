//! CSV export of filtered rows.
//!
//! Exports cover the filtered, sorted, unpaginated row set projected onto the
//! visible columns. Fields containing the delimiter, quotes or line breaks are
//! quoted per RFC 4180; records are separated by `\n` with no trailing
//! terminator.
//!
//! Saving the text (file name, download prompt) is up to the caller; see
//! [`FILE_NAME`] and [`MIME_TYPE`] for the conventional values.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ExportError;
use crate::model::Column;
use crate::model::Row;

/// Default file name for exported tables.
pub const FILE_NAME: &str = "table_data.csv";

/// Media type of exported tables.
pub const MIME_TYPE: &str = "text/csv";

/// What the header record contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// Column keys.
    #[default]
    Keys,
    /// Column labels (falling back to keys).
    Labels,
}

/// Options for [`to_csv_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Header record contents.
    pub header: HeaderStyle,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header: HeaderStyle::Keys,
        }
    }
}

impl CsvOptions {
    /// Creates options with a comma delimiter and key headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the header style.
    pub fn with_header(mut self, header: HeaderStyle) -> Self {
        self.header = header;
        self
    }
}

/// Serializes rows to CSV over the given column keys.
///
/// The header record lists the keys in order. Each data record holds the
/// row's display value per key; absent and null cells are empty.
///
/// # Example
///
/// ```
/// use datagrid_lib::export::to_csv;
/// use datagrid_lib::model::Row;
///
/// let rows = vec![
///     Row::new().set("name", "Ann").set("age", 25),
///     Row::new().set("name", "Smith, Bob"),
/// ];
///
/// let csv = to_csv(&rows, &["name", "age"]).unwrap();
/// assert_eq!(csv, "name,age\nAnn,25\n\"Smith, Bob\",");
/// ```
pub fn to_csv<'a, I, K>(rows: I, keys: &[K]) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Row>,
    K: AsRef<str>,
{
    let keys: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
    write_csv(rows, &keys, &keys, b',')
}

/// Serializes rows to CSV over the given columns with explicit options.
pub fn to_csv_with<'a, I>(
    rows: I,
    columns: &[&Column],
    options: &CsvOptions,
) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Row>,
{
    let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
    let header: Vec<&str> = match options.header {
        HeaderStyle::Keys => keys.clone(),
        HeaderStyle::Labels => columns.iter().map(|c| c.header()).collect(),
    };
    write_csv(rows, &keys, &header, options.delimiter)
}

fn write_csv<'a, I>(
    rows: I,
    keys: &[&str],
    header: &[&str],
    delimiter: u8,
) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Row>,
{
    // A record with no fields cannot be written, so mirror the plain
    // join: one empty line per record.
    if keys.is_empty() {
        let count = rows.into_iter().count();
        return Ok("\n".repeat(count));
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;

    let mut count = 0usize;
    for row in rows {
        let cells: Vec<_> = keys.iter().map(|key| row.display(key)).collect();
        writer.write_record(cells.iter().map(|cell| cell.as_bytes()))?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::flush(e.to_string()))?;
    let mut out = String::from_utf8(bytes)?;
    if out.ends_with('\n') {
        out.pop();
    }

    log::debug!("exported {} rows x {} columns to CSV", count, keys.len());
    Ok(out)
}
