use std::fmt;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use crate::common::{Error, Result};
use crate::store::{get_json, set_json, KeyValueStore, EXPENSES_KEY, INCOMES_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    Income,
    Expense,
}

impl Category {
    /// Store key holding the list for this category
    pub(crate) fn key(&self) -> &'static str {
        match self {
            Category::Income => INCOMES_KEY,
            Category::Expense => EXPENSES_KEY,
        }
    }

    pub(crate) fn sign(&self) -> char {
        match self {
            Category::Income => '+',
            Category::Expense => '-',
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Category::Income => write!(f, "income"),
            Category::Expense => write!(f, "expense"),
        }
    }
}

/// An income or expense entry. Entries are only ever appended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) name: String,
    pub(crate) amount: f64,
    #[serde(with = "iso_timestamp")]
    pub(crate) date: DateTime<Utc>,
}

/// `2026-10-16T09:30:00.000Z` on write, any RFC 3339 timestamp on read.
mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) fn add_income<S: KeyValueStore>(store: &mut S, name: &str, amount: f64) -> Result<Transaction> {
    append(store, Category::Income, name, amount, Utc::now())
}

pub(crate) fn add_expense<S: KeyValueStore>(store: &mut S, name: &str, amount: f64) -> Result<Transaction> {
    append(store, Category::Expense, name, amount, Utc::now())
}

/// Validate then append one entry. Nothing is written when validation fails.
pub(crate) fn append<S: KeyValueStore>(store: &mut S, category: Category, name: &str, amount: f64, date: DateTime<Utc>) -> Result<Transaction> {
    let t = Transaction { name: name.to_string(), amount, date };
    append_all(store, category, vec![t.clone()])?;

    info!("Added {category} '{}' {:.2}", t.name, t.amount);
    Ok(t)
}

/// Append several entries with a single write. One invalid entry rejects the whole batch.
pub(crate) fn append_all<S: KeyValueStore>(store: &mut S, category: Category, batch: Vec<Transaction>) -> Result<()> {
    if let Some(t) = batch.iter().find(|t| t.name.is_empty() || !t.amount.is_finite()) {
        warn!("Rejected {category} entry name={:?} amount={}", t.name, t.amount);
        return Err(Error::InvalidEntry(category));
    }

    let mut entries = transactions(store, category)?;
    entries.extend(batch);
    set_json(store, category.key(), &entries)
}

/// All entries of a category in insertion order. A missing list reads as empty.
pub(crate) fn transactions<S: KeyValueStore>(store: &S, category: Category) -> Result<Vec<Transaction>> {
    Ok(get_json(store, category.key())?.unwrap_or_default())
}

pub(crate) fn incomes<S: KeyValueStore>(store: &S) -> Result<Vec<Transaction>> {
    transactions(store, Category::Income)
}

pub(crate) fn expenses<S: KeyValueStore>(store: &S) -> Result<Vec<Transaction>> {
    transactions(store, Category::Expense)
}

/// Parse an amount typed by the user. Anything that is not a number becomes NaN so `append` rejects it.
pub(crate) fn parse_amount(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}
