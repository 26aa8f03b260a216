use std::collections::{BTreeMap, BTreeSet};
use log::debug;
use crate::common::{Error, Result};
use crate::credential::current_user;
use crate::ledger::{self, Category, Transaction};
use crate::store::KeyValueStore;
use crate::util::YearMonth;

/// Number of months shown by the trend and heatmap views, current month included
pub(crate) const TREND_MONTHS: usize = 6;

/// Buckets per category in the amount histogram
pub(crate) const HISTOGRAM_BINS: usize = 10;

/// Everything the dashboard shows, already formatted
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dashboard {
    pub(crate) username: String,
    pub(crate) total_income: String,
    pub(crate) total_expenses: String,
    pub(crate) net_balance: String,
    pub(crate) report: MonthlyReport,
}

/// Rendered list of one month's entries. Rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthlyReport {
    pub(crate) month: YearMonth,
    pub(crate) lines: Vec<String>,
}

/// Per-name totals for one month
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Breakdown {
    pub(crate) month: YearMonth,
    pub(crate) incomes: BTreeMap<String, f64>,
    pub(crate) expenses: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrendPoint {
    pub(crate) month: YearMonth,
    pub(crate) income: f64,
    pub(crate) expense: f64,
}

/// One name's all-time income against expense
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Comparison {
    pub(crate) name: String,
    pub(crate) income: f64,
    pub(crate) expense: f64,
}

/// Name by month totals. Each row has one value per month, months oldest first.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Heatmap {
    pub(crate) months: Vec<YearMonth>,
    pub(crate) rows: Vec<(String, Vec<f64>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bin {
    pub(crate) lower: f64,
    pub(crate) upper: f64,
    pub(crate) count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Histogram {
    pub(crate) month: YearMonth,
    pub(crate) incomes: Vec<Bin>,
    pub(crate) expenses: Vec<Bin>,
}

pub(crate) struct DashboardRenderer {
    currency_symbol: String,
}

impl DashboardRenderer {
    pub(crate) fn new(currency_symbol: &str) -> DashboardRenderer {
        DashboardRenderer { currency_symbol: currency_symbol.to_string() }
    }

    pub(crate) fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Totals over everything stored plus the report for the current month
    pub(crate) fn load_dashboard<S: KeyValueStore>(&self, store: &S) -> Result<Dashboard> {
        self.load_dashboard_for(store, YearMonth::current())
    }

    /// Same as `load_dashboard` but with the report for `month`. Totals stay all-time.
    pub(crate) fn load_dashboard_for<S: KeyValueStore>(&self, store: &S, month: YearMonth) -> Result<Dashboard> {
        let user = current_user(store)?.ok_or(Error::NoUser)?;
        let incomes = ledger::incomes(store)?;
        let expenses = ledger::expenses(store)?;

        let total_income = sum(&incomes);
        let total_expenses = sum(&expenses);
        let net_balance = total_income - total_expenses;
        debug!("Dashboard for {}: {} incomes, {} expenses", user.username, incomes.len(), expenses.len());

        Ok(Dashboard {
            username: user.username,
            total_income: format_amount(total_income),
            total_expenses: format_amount(total_expenses),
            net_balance: format_amount(net_balance),
            report: self.generate_monthly_report(&incomes, &expenses, month),
        })
    }

    /// One line per entry dated in `month`, incomes first, each under its own header
    pub(crate) fn generate_monthly_report(&self, incomes: &[Transaction], expenses: &[Transaction], month: YearMonth) -> MonthlyReport {
        let mut lines = vec!["Incomes:".to_string()];
        lines.extend(in_month(incomes, month).map(|t| self.report_line(Category::Income, t)));
        lines.push("Expenses:".to_string());
        lines.extend(in_month(expenses, month).map(|t| self.report_line(Category::Expense, t)));

        MonthlyReport { month, lines }
    }

    fn report_line(&self, category: Category, t: &Transaction) -> String {
        format!("{} {}{} - {}", category.sign(), self.currency_symbol, t.amount, t.name)
    }
}

/// Months that have at least one entry, plus the current month. Newest first.
pub(crate) fn available_months<S: KeyValueStore>(store: &S) -> Result<Vec<YearMonth>> {
    let mut months = BTreeSet::new();
    for t in ledger::incomes(store)?.iter().chain(ledger::expenses(store)?.iter()) {
        months.insert(YearMonth::of(&t.date));
    }
    months.insert(YearMonth::current());

    Ok(months.into_iter().rev().collect())
}

/// Totals per transaction name within a month
pub(crate) fn category_breakdown<S: KeyValueStore>(store: &S, month: YearMonth) -> Result<Breakdown> {
    Ok(Breakdown {
        month,
        incomes: group_by_name(&ledger::incomes(store)?, month),
        expenses: group_by_name(&ledger::expenses(store)?, month),
    })
}

/// Income and expense totals for the last `TREND_MONTHS` months, oldest first
pub(crate) fn monthly_trend<S: KeyValueStore>(store: &S) -> Result<Vec<TrendPoint>> {
    let incomes = ledger::incomes(store)?;
    let expenses = ledger::expenses(store)?;

    Ok(YearMonth::current().trailing(TREND_MONTHS).into_iter().map(|month| TrendPoint {
        month,
        income: in_month(&incomes, month).map(|t| t.amount).fold(0.0, |total, amount| total + amount),
        expense: in_month(&expenses, month).map(|t| t.amount).fold(0.0, |total, amount| total + amount),
    }).collect())
}

/// All-time income and expense totals per name, names in alphabetical order
pub(crate) fn category_comparison<S: KeyValueStore>(store: &S) -> Result<Vec<Comparison>> {
    let incomes = total_by_name(ledger::incomes(store)?.iter());
    let expenses = total_by_name(ledger::expenses(store)?.iter());

    let names: BTreeSet<&String> = incomes.keys().chain(expenses.keys()).collect();
    Ok(names.into_iter().map(|name| Comparison {
        name: name.clone(),
        income: incomes.get(name).copied().unwrap_or(0.0),
        expense: expenses.get(name).copied().unwrap_or(0.0),
    }).collect())
}

/// Per-name totals for each of the last `TREND_MONTHS` months. Income and expense entries sharing a name add up.
pub(crate) fn monthly_heatmap<S: KeyValueStore>(store: &S) -> Result<Heatmap> {
    let months = YearMonth::current().trailing(TREND_MONTHS);
    let incomes = ledger::incomes(store)?;
    let expenses = ledger::expenses(store)?;

    let mut rows: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (column, month) in months.iter().enumerate() {
        for t in in_month(&incomes, *month).chain(in_month(&expenses, *month)) {
            rows.entry(t.name.clone()).or_insert_with(|| vec![0.0; months.len()])[column] += t.amount;
        }
    }

    Ok(Heatmap { months, rows: rows.into_iter().collect() })
}

/// Distribution of the month's amounts over `bins` equal-width buckets, per category
pub(crate) fn amount_histogram<S: KeyValueStore>(store: &S, month: YearMonth, bins: usize) -> Result<Histogram> {
    let incomes: Vec<f64> = in_month(&ledger::incomes(store)?, month).map(|t| t.amount).collect();
    let expenses: Vec<f64> = in_month(&ledger::expenses(store)?, month).map(|t| t.amount).collect();
    Ok(Histogram {
        month,
        incomes: histogram_bins(&incomes, bins),
        expenses: histogram_bins(&expenses, bins),
    })
}

/// Buckets span min to max of `amounts`, the last one closed. A single distinct value gets one bucket.
fn histogram_bins(amounts: &[f64], bins: usize) -> Vec<Bin> {
    if amounts.is_empty() || bins == 0 {
        return vec![];
    }

    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![Bin { lower: min, upper: max, count: amounts.len() }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<Bin> = (0..bins).map(|i| Bin {
        lower: min + width * i as f64,
        upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
        count: 0,
    }).collect();
    for amount in amounts {
        let index = (((amount - min) / width) as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

fn in_month(transactions: &[Transaction], month: YearMonth) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(move |t| month.contains(&t.date))
}

fn group_by_name(transactions: &[Transaction], month: YearMonth) -> BTreeMap<String, f64> {
    total_by_name(in_month(transactions, month))
}

fn total_by_name<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for t in transactions {
        *totals.entry(t.name.clone()).or_insert(0.0) += t.amount;
    }
    totals
}

fn sum(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|t| t.amount).fold(0.0, |total, amount| total + amount)
}

/// Format $ amount
pub(crate) fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;
    use crate::credential::signup;
    use crate::ledger::append;
    use crate::store::LocalStore;
    use super::*;

    fn mid_month(month: YearMonth) -> DateTime<Utc> {
        month.at_day(15).unwrap()
    }

    fn store_with_user() -> LocalStore {
        let mut store = LocalStore::in_memory();
        signup(&mut store, "ren", "ren@example.com", "pw").unwrap();
        store
    }

    fn renderer() -> DashboardRenderer {
        DashboardRenderer::new("₹")
    }

    #[test]
    fn totals_and_net_balance() {
        let mut store = store_with_user();
        ledger::add_income(&mut store, "Salary", 5000.0).unwrap();
        ledger::add_expense(&mut store, "Rent", 1200.0).unwrap();

        let dashboard = renderer().load_dashboard(&store).unwrap();
        assert_eq!(dashboard.username, "ren");
        assert_eq!(dashboard.total_income, "5000.00");
        assert_eq!(dashboard.total_expenses, "1200.00");
        assert_eq!(dashboard.net_balance, "3800.00");
    }

    #[test]
    fn empty_ledger_shows_zeroes() {
        let store = store_with_user();
        let dashboard = renderer().load_dashboard(&store).unwrap();
        assert_eq!(dashboard.total_income, "0.00");
        assert_eq!(dashboard.total_expenses, "0.00");
        assert_eq!(dashboard.net_balance, "0.00");
        assert_eq!(dashboard.report.lines, vec!["Incomes:", "Expenses:"]);
    }

    #[test]
    fn missing_user_fails() {
        let mut store = LocalStore::in_memory();
        ledger::add_income(&mut store, "Salary", 5000.0).unwrap();
        assert!(matches!(renderer().load_dashboard(&store), Err(Error::NoUser)));
    }

    #[test]
    fn totals_include_every_month_but_report_only_current() {
        let mut store = store_with_user();
        let this_month = YearMonth::current();
        let last_month = this_month.previous();
        append(&mut store, Category::Income, "Salary", 5000.0, mid_month(this_month)).unwrap();
        append(&mut store, Category::Income, "Old bonus", 700.0, mid_month(last_month)).unwrap();
        append(&mut store, Category::Expense, "Rent", 1200.0, mid_month(this_month)).unwrap();
        append(&mut store, Category::Expense, "Old rent", 1100.0, mid_month(last_month)).unwrap();

        let dashboard = renderer().load_dashboard(&store).unwrap();
        assert_eq!(dashboard.total_income, "5700.00");
        assert_eq!(dashboard.total_expenses, "2300.00");
        assert_eq!(dashboard.net_balance, "3400.00");
        assert_eq!(dashboard.report.month, this_month);
        assert_eq!(dashboard.report.lines, vec!["Incomes:", "+ ₹5000 - Salary", "Expenses:", "- ₹1200 - Rent"]);
    }

    #[test]
    fn report_for_selected_month() {
        let mut store = store_with_user();
        let last_month = YearMonth::current().previous();
        append(&mut store, Category::Expense, "Groceries", 80.5, mid_month(last_month)).unwrap();
        ledger::add_expense(&mut store, "Coffee", 4.0).unwrap();

        let dashboard = renderer().load_dashboard_for(&store, last_month).unwrap();
        assert_eq!(dashboard.report.lines, vec!["Incomes:", "Expenses:", "- ₹80.5 - Groceries"]);
        assert_eq!(dashboard.total_expenses, "84.50");
    }

    #[test]
    fn same_month_of_another_year_is_excluded() {
        let this_month = YearMonth::current();
        let a_year_ago = this_month.trailing(13)[0];
        let incomes = vec![
            Transaction { name: "Now".to_string(), amount: 1.0, date: mid_month(this_month) },
            Transaction { name: "Then".to_string(), amount: 2.0, date: mid_month(a_year_ago) },
        ];

        let report = renderer().generate_monthly_report(&incomes, &[], this_month);
        assert_eq!(report.lines, vec!["Incomes:", "+ ₹1 - Now", "Expenses:"]);
    }

    #[test]
    fn report_uses_configured_currency() {
        let month = YearMonth::current();
        let expenses = vec![Transaction { name: "Taxi".to_string(), amount: 12.25, date: mid_month(month) }];
        let report = DashboardRenderer::new("$").generate_monthly_report(&[], &expenses, month);
        assert_eq!(report.lines[2], "- $12.25 - Taxi");
    }

    #[test]
    fn available_months_newest_first_with_current() {
        let mut store = store_with_user();
        let this_month = YearMonth::current();
        let older = this_month.trailing(3)[0];
        append(&mut store, Category::Income, "Salary", 1.0, mid_month(older)).unwrap();
        append(&mut store, Category::Expense, "Rent", 1.0, mid_month(older)).unwrap();

        assert_eq!(available_months(&store).unwrap(), vec![this_month, older]);
    }

    #[test]
    fn breakdown_groups_by_name_within_month() {
        let mut store = store_with_user();
        let month = YearMonth::current();
        append(&mut store, Category::Expense, "Food", 10.0, mid_month(month)).unwrap();
        append(&mut store, Category::Expense, "Food", 15.5, mid_month(month)).unwrap();
        append(&mut store, Category::Expense, "Rent", 900.0, mid_month(month)).unwrap();
        append(&mut store, Category::Expense, "Food", 99.0, mid_month(month.previous())).unwrap();
        append(&mut store, Category::Income, "Salary", 3000.0, mid_month(month)).unwrap();

        let breakdown = category_breakdown(&store, month).unwrap();
        assert_eq!(breakdown.expenses.get("Food"), Some(&25.5));
        assert_eq!(breakdown.expenses.get("Rent"), Some(&900.0));
        assert_eq!(breakdown.incomes.len(), 1);
    }

    #[test]
    fn trend_covers_six_months() {
        let mut store = store_with_user();
        let month = YearMonth::current();
        append(&mut store, Category::Income, "Salary", 3000.0, mid_month(month.previous())).unwrap();
        append(&mut store, Category::Expense, "Rent", 900.0, mid_month(month)).unwrap();
        append(&mut store, Category::Expense, "Ancient", 5.0, mid_month(month.trailing(7)[0])).unwrap();

        let trend = monthly_trend(&store).unwrap();
        assert_eq!(trend.len(), TREND_MONTHS);
        assert_eq!(trend[5], TrendPoint { month, income: 0.0, expense: 900.0 });
        assert_eq!(trend[4], TrendPoint { month: month.previous(), income: 3000.0, expense: 0.0 });
        assert_eq!(trend.iter().map(|p| p.expense).fold(0.0, |a, b| a + b), 900.0);
    }

    #[test]
    fn comparison_covers_every_name_all_time() {
        let mut store = store_with_user();
        let month = YearMonth::current();
        append(&mut store, Category::Income, "Salary", 3000.0, mid_month(month)).unwrap();
        append(&mut store, Category::Income, "Salary", 2000.0, mid_month(month.trailing(12)[0])).unwrap();
        append(&mut store, Category::Expense, "Rent", 900.0, mid_month(month.previous())).unwrap();
        append(&mut store, Category::Income, "Rent", 150.0, mid_month(month)).unwrap();

        let comparison = category_comparison(&store).unwrap();
        assert_eq!(comparison, vec![
            Comparison { name: "Rent".to_string(), income: 150.0, expense: 900.0 },
            Comparison { name: "Salary".to_string(), income: 5000.0, expense: 0.0 },
        ]);
    }

    #[test]
    fn heatmap_rows_are_names_and_columns_months() {
        let mut store = store_with_user();
        let month = YearMonth::current();
        append(&mut store, Category::Expense, "Food", 10.0, mid_month(month)).unwrap();
        append(&mut store, Category::Expense, "Food", 5.0, mid_month(month)).unwrap();
        append(&mut store, Category::Income, "Food", 1.0, mid_month(month)).unwrap();
        append(&mut store, Category::Expense, "Rent", 900.0, mid_month(month.trailing(6)[0])).unwrap();
        append(&mut store, Category::Expense, "Ancient", 7.0, mid_month(month.trailing(7)[0])).unwrap();

        let heatmap = monthly_heatmap(&store).unwrap();
        assert_eq!(heatmap.months, month.trailing(TREND_MONTHS));
        assert_eq!(heatmap.rows, vec![
            ("Food".to_string(), vec![0.0, 0.0, 0.0, 0.0, 0.0, 16.0]),
            ("Rent".to_string(), vec![900.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        ]);
    }

    #[test]
    fn histogram_counts_every_amount_of_the_month() {
        let mut store = store_with_user();
        let month = YearMonth::current();
        for amount in [10.0, 20.0, 30.0, 110.0] {
            append(&mut store, Category::Expense, "Shopping", amount, mid_month(month)).unwrap();
        }
        append(&mut store, Category::Expense, "Shopping", 5000.0, mid_month(month.previous())).unwrap();
        append(&mut store, Category::Income, "Salary", 3000.0, mid_month(month)).unwrap();

        let histogram = amount_histogram(&store, month, 4).unwrap();
        assert_eq!(histogram.expenses.iter().map(|b| b.count).collect::<Vec<usize>>(), vec![3, 0, 0, 1]);
        assert_eq!(histogram.expenses[0].lower, 10.0);
        assert_eq!(histogram.expenses[3].upper, 110.0);
        assert_eq!(histogram.incomes, vec![Bin { lower: 3000.0, upper: 3000.0, count: 1 }]);
    }

    #[test]
    fn histogram_of_empty_month_has_no_bins() {
        let store = store_with_user();
        let histogram = amount_histogram(&store, YearMonth::current(), HISTOGRAM_BINS).unwrap();
        assert!(histogram.incomes.is_empty());
        assert!(histogram.expenses.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: totals are the sum of stored amounts and loading twice changes nothing.
        #[test]
        fn totals_equal_stored_sums(
            incomes in prop::collection::vec(-1.0e5f64..1.0e5f64, 0..10),
            expenses in prop::collection::vec(-1.0e5f64..1.0e5f64, 0..10),
        ) {
            let mut store = store_with_user();
            for amount in &incomes {
                ledger::add_income(&mut store, "in", *amount).unwrap();
            }
            for amount in &expenses {
                ledger::add_expense(&mut store, "out", *amount).unwrap();
            }

            // Expected totals come from the generated inputs, not from the store
            let stored_income = incomes.iter().fold(0.0, |total, amount| total + amount);
            let stored_expense = expenses.iter().fold(0.0, |total, amount| total + amount);

            let first = renderer().load_dashboard(&store).unwrap();
            let second = renderer().load_dashboard(&store).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.total_income, format_amount(stored_income));
            prop_assert_eq!(first.total_expenses, format_amount(stored_expense));
            prop_assert_eq!(first.net_balance, format_amount(stored_income - stored_expense));
        }
    }
}
