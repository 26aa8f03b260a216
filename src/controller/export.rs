use chrono::SecondsFormat;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use crate::common::Result;
use crate::ledger::{self, Category};
use crate::store::KeyValueStore;

#[derive(Serialize)]
struct ExportRow<'a> {
    category: String,
    name: &'a str,
    amount: f64,
    date: String,
}

/// Export the whole ledger to a csv file, incomes first, each list in stored order
pub(crate) fn execute_export<S: KeyValueStore>(store: &S, file_path: &str) -> Result<usize> {
    let incomes = ledger::incomes(store)?;
    let expenses = ledger::expenses(store)?;

    let mut csv_writer = WriterBuilder::new().has_headers(true).from_path(file_path)?;
    let rows = incomes.iter().map(|t| (Category::Income, t))
        .chain(expenses.iter().map(|t| (Category::Expense, t)));

    let mut exported = 0;
    for (category, t) in rows {
        csv_writer.serialize(ExportRow {
            category: category.to_string(),
            name: &t.name,
            amount: t.amount,
            date: t.date.to_rfc3339_opts(SecondsFormat::Millis, true),
        })?;
        exported += 1;
    }
    csv_writer.flush()?;

    info!("Exported {exported} transactions to {file_path}");
    Ok(exported)
}
