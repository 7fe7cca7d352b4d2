//! CSV output for product records.

use crate::config::ColumnOrder;
use crate::error::ScrapeError;
use crate::models::ProductRecord;
use std::io::Write;
use std::path::Path;
use tracing::info;

impl ColumnOrder {
    /// Header row for this order.
    pub fn header(&self) -> [&'static str; 4] {
        match self {
            ColumnOrder::NamePriceUrlImage => ["Name", "Price", "URL", "Image"],
            ColumnOrder::UrlImageNamePrice => ["URL", "Image", "Name", "Price"],
        }
    }

    /// Record fields in header order.
    pub fn row<'a>(&self, record: &'a ProductRecord) -> [&'a str; 4] {
        match self {
            ColumnOrder::NamePriceUrlImage => [
                record.name.as_str(),
                record.price.as_str(),
                record.url.as_str(),
                record.image.as_str(),
            ],
            ColumnOrder::UrlImageNamePrice => [
                record.url.as_str(),
                record.image.as_str(),
                record.name.as_str(),
                record.price.as_str(),
            ],
        }
    }
}

/// Writes records as CSV rows after a header row.
pub struct CsvWriter {
    order: ColumnOrder,
}

impl CsvWriter {
    pub fn new(order: ColumnOrder) -> Self {
        Self { order }
    }

    /// Creates (or truncates) `path` and writes all records to it.
    pub fn write_file(&self, path: &Path, records: &[ProductRecord]) -> Result<(), ScrapeError> {
        let to_error = |source| ScrapeError::Output { path: path.to_path_buf(), source };

        let file = csv::Writer::from_path(path).map_err(to_error)?;
        self.write_to(file, records).map_err(to_error)?;

        info!("Wrote {} products to {}", records.len(), path.display());
        Ok(())
    }

    /// Writes the header and records to any writer, flushing at the end.
    pub fn write_to<W: Write>(
        &self,
        mut writer: csv::Writer<W>,
        records: &[ProductRecord],
    ) -> Result<(), csv::Error> {
        writer.write_record(self.order.header())?;

        for record in records {
            writer.write_record(self.order.row(record))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Renders records to a string.
    pub fn render(&self, records: &[ProductRecord]) -> Result<String, csv::Error> {
        let mut buf = Vec::new();
        self.write_to(csv::Writer::from_writer(&mut buf), records)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
