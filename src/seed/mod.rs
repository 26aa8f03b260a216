use std::ops::Range;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::common::Result;
use crate::ledger::{self, Category, Transaction};
use crate::store::KeyValueStore;
use crate::util::YearMonth;

/// Months of sample data, current month included
pub(crate) const SEED_MONTHS: usize = 6;

const INCOME_NAMES: [&str; 9] = [
    "Salary", "Freelance", "Investment", "Bonus", "Rental Income",
    "Side Business", "Consulting", "Online Sales", "Commission",
];

const EXPENSE_NAMES: [&str; 20] = [
    "Food & Dining", "Transportation", "Housing", "Utilities", "Entertainment",
    "Healthcare", "Shopping", "Education", "Travel", "Insurance",
    "Groceries", "Restaurants", "Gas", "Public Transport", "Rent",
    "Electricity", "Internet", "Phone", "Movies", "Gym",
];

/// Entries per month, inclusive bounds
const INCOMES_PER_MONTH: (usize, usize) = (2, 5);
const EXPENSES_PER_MONTH: (usize, usize) = (8, 15);

const INCOME_AMOUNTS: Range<f64> = 1000.0..15000.0;
const EXPENSE_AMOUNTS: Range<f64> = 50.0..2000.0;

/// Days 29 to 31 are skipped so every month has the same choice
const LAST_SEED_DAY: u32 = 28;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeedSummary {
    pub(crate) seed: u64,
    pub(crate) months: Vec<YearMonth>,
    pub(crate) incomes: Vec<Transaction>,
    pub(crate) expenses: Vec<Transaction>,
}

impl SeedSummary {
    pub(crate) fn total_income(&self) -> f64 {
        self.incomes.iter().fold(0.0, |total, t| total + t.amount)
    }

    pub(crate) fn total_expense(&self) -> f64 {
        self.expenses.iter().fold(0.0, |total, t| total + t.amount)
    }
}

pub(crate) fn random_seed() -> u64 {
    rand::rng().random()
}

/// Generate sample entries for the last `SEED_MONTHS` months and append them to the ledger.
/// The same seed always generates the same names, amounts and days.
pub(crate) fn populate_sample_data<S: KeyValueStore>(store: &mut S, seed: u64) -> Result<SeedSummary> {
    let summary = generate(seed, YearMonth::current());

    ledger::append_all(store, Category::Income, summary.incomes.clone())?;
    ledger::append_all(store, Category::Expense, summary.expenses.clone())?;

    info!("Seeded {} incomes and {} expenses with seed {seed}", summary.incomes.len(), summary.expenses.len());
    Ok(summary)
}

fn generate(seed: u64, current: YearMonth) -> SeedSummary {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let months = current.trailing(SEED_MONTHS);
    let mut incomes = vec![];
    let mut expenses = vec![];

    for month in &months {
        let count = rng.random_range(INCOMES_PER_MONTH.0..=INCOMES_PER_MONTH.1);
        incomes.extend((0..count).filter_map(|_| sample(&mut rng, *month, &INCOME_NAMES, INCOME_AMOUNTS)));

        let count = rng.random_range(EXPENSES_PER_MONTH.0..=EXPENSES_PER_MONTH.1);
        expenses.extend((0..count).filter_map(|_| sample(&mut rng, *month, &EXPENSE_NAMES, EXPENSE_AMOUNTS)));
    }

    SeedSummary { seed, months, incomes, expenses }
}

fn sample(rng: &mut ChaCha8Rng, month: YearMonth, names: &[&str], amounts: Range<f64>) -> Option<Transaction> {
    let name = names[rng.random_range(0..names.len())];
    let amount = (rng.random_range(amounts) * 100.0).round() / 100.0;
    let date = month.at_day(rng.random_range(1..=LAST_SEED_DAY))?;
    Some(Transaction { name: name.to_string(), amount, date })
}
