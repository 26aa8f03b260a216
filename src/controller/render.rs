use comfy_table::{Cell, CellAlignment, Color, Table, TableComponent};
use crate::dashboard::{format_amount, Bin, Breakdown, Comparison, Dashboard, Heatmap, Histogram, TrendPoint};
use crate::seed::SeedSummary;
use crate::util::YearMonth;

fn new_table() -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table
}

/// Totals table followed by the monthly report
pub(crate) fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut totals = new_table();
    totals.set_header(vec!["Total income", "Total expenses", "Net balance"]);
    let net = Cell::new(&dashboard.net_balance).set_alignment(CellAlignment::Right);
    let net = if dashboard.net_balance.starts_with('-') { net.fg(Color::Red) } else { net.fg(Color::Green) };
    totals.add_row(vec![
        Cell::new(&dashboard.total_income).set_alignment(CellAlignment::Right),
        Cell::new(&dashboard.total_expenses).set_alignment(CellAlignment::Right),
        net,
    ]);

    let mut report = new_table();
    report.set_header(vec![format!("Report for {}", dashboard.report.month)]);
    for line in &dashboard.report.lines {
        report.add_row(vec![line.as_str()]);
    }

    format!("Welcome, {}\n{totals}\n{report}", dashboard.username)
}

pub(crate) fn render_months(months: &[YearMonth]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Month"]);
    for month in months {
        table.add_row(vec![month.to_string()]);
    }
    table.to_string()
}

/// One table per category, names in alphabetical order
pub(crate) fn render_breakdown(breakdown: &Breakdown, currency_symbol: &str) -> String {
    let mut table = new_table();
    table.set_header(vec!["Category", "Name", "Amount"]);
    let groups = [("Income", &breakdown.incomes), ("Expense", &breakdown.expenses)];
    for (category, totals) in groups {
        for (name, amount) in totals {
            table.add_row(vec![
                Cell::new(category),
                Cell::new(name),
                Cell::new(format!("{currency_symbol}{}", format_amount(*amount))).set_alignment(CellAlignment::Right),
            ]);
        }
    }

    format!("Breakdown for {}\n{table}", breakdown.month)
}

pub(crate) fn render_trend(trend: &[TrendPoint], currency_symbol: &str) -> String {
    let mut table = new_table();
    table.set_header(vec!["Month", "Income", "Expenses", "Net"]);
    for point in trend {
        table.add_row(vec![
            Cell::new(point.month),
            Cell::new(format!("{currency_symbol}{}", format_amount(point.income))).set_alignment(CellAlignment::Right),
            Cell::new(format!("{currency_symbol}{}", format_amount(point.expense))).set_alignment(CellAlignment::Right),
            Cell::new(format_amount(point.income - point.expense)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// Names with an all-time income and expense column. The larger side is coloured.
pub(crate) fn render_comparison(comparison: &[Comparison], currency_symbol: &str) -> String {
    let mut table = new_table();
    table.set_header(vec!["Name", "Income", "Expenses"]);
    for c in comparison {
        let income = Cell::new(format!("{currency_symbol}{}", format_amount(c.income))).set_alignment(CellAlignment::Right);
        let expense = Cell::new(format!("{currency_symbol}{}", format_amount(c.expense))).set_alignment(CellAlignment::Right);
        let (income, expense) = if c.income >= c.expense {
            (income.fg(Color::Green), expense)
        } else {
            (income, expense.fg(Color::Red))
        };
        table.add_row(vec![Cell::new(&c.name), income, expense]);
    }

    format!("Income vs expenses by name (all time)\n{table}")
}

pub(crate) fn render_heatmap(heatmap: &Heatmap) -> String {
    let mut table = new_table();
    let mut header = vec!["Name".to_string()];
    header.extend(heatmap.months.iter().map(|m| m.to_string()));
    table.set_header(header);

    for (name, totals) in &heatmap.rows {
        let mut row = vec![Cell::new(name)];
        row.extend(totals.iter().map(|total| {
            let cell = Cell::new(format!("{total:.0}")).set_alignment(CellAlignment::Right);
            if *total == 0.0 { cell.fg(Color::DarkGrey) } else { cell }
        }));
        table.add_row(row);
    }
    table.to_string()
}

pub(crate) fn render_histogram(histogram: &Histogram, currency_symbol: &str) -> String {
    let mut table = new_table();
    table.set_header(vec!["Category", "From", "To", "Count"]);
    let groups = [("Income", &histogram.incomes), ("Expense", &histogram.expenses)];
    for (category, bins) in groups {
        for Bin { lower, upper, count } in bins.iter() {
            table.add_row(vec![
                Cell::new(category),
                Cell::new(format!("{currency_symbol}{}", format_amount(*lower))).set_alignment(CellAlignment::Right),
                Cell::new(format!("{currency_symbol}{}", format_amount(*upper))).set_alignment(CellAlignment::Right),
                Cell::new(format!("{count} {}", "#".repeat(*count))),
            ]);
        }
    }

    format!("Amount distribution for {}\n{table}", histogram.month)
}

pub(crate) fn render_seed_summary(summary: &SeedSummary, currency_symbol: &str) -> String {
    let total_income = summary.total_income();
    let total_expense = summary.total_expense();
    let span = match (summary.months.first(), summary.months.last()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "-".to_string(),
    };

    [
        format!("Sample data added with seed {}:", summary.seed),
        format!("- Incomes: {} totalling {currency_symbol}{}", summary.incomes.len(), format_amount(total_income)),
        format!("- Expenses: {} totalling {currency_symbol}{}", summary.expenses.len(), format_amount(total_expense)),
        format!("- Net balance: {currency_symbol}{}", format_amount(total_income - total_expense)),
        format!("- Data spans: {span}"),
    ].join("\n")
}
