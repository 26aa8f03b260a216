use log::{debug, warn};
use crate::common::{Error, Result};
use crate::credential;
use crate::dashboard::{self, DashboardRenderer, HISTOGRAM_BINS};
use crate::ledger::{self, Category};
use crate::parser;
use crate::parser::Statement;
use crate::seed;
use crate::store::KeyValueStore;
use crate::util::YearMonth;

mod export;
mod render;

/// Parse one command line and run it. Returns the text to show the user.
pub(crate) fn parse_and_run_command<S: KeyValueStore>(store: &mut S, renderer: &DashboardRenderer, command: &str) -> Result<String> {
    let statement = parser::parse(command)?;
    debug!("{statement:?}");
    run_statement(store, renderer, statement)
}

fn run_statement<S: KeyValueStore>(store: &mut S, renderer: &DashboardRenderer, statement: Statement) -> Result<String> {
    match statement {
        Statement::Signup(username, email, password) => {
            credential::signup(store, &username, &email, &password)?;
            Ok("Sign up successful! You can LOGIN now.".to_string())
        }
        Statement::Login(email, password) => {
            credential::login(store, &email, &password)?;
            match renderer.load_dashboard(store) {
                Ok(dashboard) => Ok(format!("Login successful!\n{}", render::render_dashboard(&dashboard))),
                Err(e) => {
                    warn!("Logged in but the dashboard failed to load: {e}");
                    Ok(format!("Login successful!\n{e}"))
                }
            }
        }
        Statement::Logout => {
            credential::logout(store)?;
            Ok("Logged out!".to_string())
        }
        Statement::Add(category, name, amount) => {
            let amount = ledger::parse_amount(&amount);
            let t = match category {
                Category::Income => ledger::add_income(store, &name, amount)?,
                Category::Expense => ledger::add_expense(store, &name, amount)?,
            };
            refresh_after_add(store, renderer, category, &t.name)
        }
        Statement::Dashboard(month) => {
            credential::require_session(store)?;
            let dashboard = match month {
                Some(month) => renderer.load_dashboard_for(store, month)?,
                None => renderer.load_dashboard(store)?,
            };
            Ok(render::render_dashboard(&dashboard))
        }
        Statement::Months => {
            credential::require_session(store)?;
            Ok(render::render_months(&dashboard::available_months(store)?))
        }
        Statement::Breakdown(month) => {
            credential::require_session(store)?;
            let breakdown = dashboard::category_breakdown(store, month.unwrap_or_else(YearMonth::current))?;
            Ok(render::render_breakdown(&breakdown, renderer.currency_symbol()))
        }
        Statement::Trend => {
            credential::require_session(store)?;
            Ok(render::render_trend(&dashboard::monthly_trend(store)?, renderer.currency_symbol()))
        }
        Statement::Compare => {
            credential::require_session(store)?;
            Ok(render::render_comparison(&dashboard::category_comparison(store)?, renderer.currency_symbol()))
        }
        Statement::Heatmap => {
            credential::require_session(store)?;
            Ok(render::render_heatmap(&dashboard::monthly_heatmap(store)?))
        }
        Statement::Histogram(month) => {
            credential::require_session(store)?;
            let histogram = dashboard::amount_histogram(store, month.unwrap_or_else(YearMonth::current), HISTOGRAM_BINS)?;
            Ok(render::render_histogram(&histogram, renderer.currency_symbol()))
        }
        Statement::Seed(number) => {
            credential::require_session(store)?;
            let summary = seed::populate_sample_data(store, number.unwrap_or_else(seed::random_seed))?;
            Ok(render::render_seed_summary(&summary, renderer.currency_symbol()))
        }
        Statement::Export(file_path) => {
            credential::require_session(store)?;
            let exported = export::execute_export(store, &file_path)?;
            Ok(format!("{exported} transactions exported to {file_path}"))
        }
    }
}

/// The entry is already stored. Show the refreshed dashboard when logged in, otherwise a short confirmation.
fn refresh_after_add<S: KeyValueStore>(store: &S, renderer: &DashboardRenderer, category: Category, name: &str) -> Result<String> {
    match credential::require_session(store) {
        Ok(_) => Ok(render::render_dashboard(&renderer.load_dashboard(store)?)),
        Err(Error::NotLoggedIn) => Ok(format!("Added {category} '{name}'")),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{LocalStore, EXPENSES_KEY, INCOMES_KEY, LOGGED_IN_KEY};
    use super::*;

    fn run(store: &mut LocalStore, command: &str) -> Result<String> {
        parse_and_run_command(store, &DashboardRenderer::new("₹"), command)
    }

    fn logged_in_store() -> LocalStore {
        let mut store = LocalStore::in_memory();
        run(&mut store, "signup ren ren@example.com hunter2").unwrap();
        run(&mut store, "login ren@example.com hunter2").unwrap();
        store
    }

    #[test]
    fn test_signup_login_flow() {
        let mut store = LocalStore::in_memory();
        assert!(run(&mut store, "signup ren ren@example.com hunter2").unwrap().starts_with("Sign up successful!"));

        let err = run(&mut store, "login ren@example.com wrong").unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials!");
        assert_eq!(store.get_item(LOGGED_IN_KEY), None);

        let output = run(&mut store, "login ren@example.com hunter2").unwrap();
        assert!(output.starts_with("Login successful!"));
        assert!(output.contains("Welcome, ren"));
        assert_eq!(store.get_item(LOGGED_IN_KEY), Some("true".to_string()));
    }

    #[test]
    fn test_add_refreshes_dashboard() {
        let mut store = logged_in_store();
        run(&mut store, "income Salary 5000").unwrap();
        let output = run(&mut store, "expense Rent 1200").unwrap();

        assert!(output.contains("5000.00"));
        assert!(output.contains("1200.00"));
        assert!(output.contains("3800.00"));
        assert!(output.contains("+ ₹5000 - Salary"));
        assert!(output.contains("- ₹1200 - Rent"));
    }

    #[test]
    fn test_invalid_entry_shows_error_and_writes_nothing() {
        let mut store = logged_in_store();
        let err = run(&mut store, "income '' abc").unwrap_err();
        assert_eq!(err.to_string(), "Enter valid income!");
        let err = run(&mut store, "expense Rent lots").unwrap_err();
        assert_eq!(err.to_string(), "Enter valid expense!");

        assert_eq!(store.get_item(INCOMES_KEY), None);
        assert_eq!(store.get_item(EXPENSES_KEY), None);
    }

    #[test]
    fn test_add_without_account_still_stores() {
        let mut store = LocalStore::in_memory();
        assert_eq!(run(&mut store, "expense Coffee 4.5").unwrap(), "Added expense 'Coffee'");
        assert_eq!(ledger::expenses(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_add_without_session_hides_dashboard() {
        let mut store = LocalStore::in_memory();
        run(&mut store, "signup ren ren@example.com hunter2").unwrap();
        run(&mut store, "income Salary 5000").unwrap();

        let output = run(&mut store, "expense Rent 1").unwrap();
        assert_eq!(output, "Added expense 'Rent'");
        assert!(!output.contains("Welcome"));
        assert_eq!(ledger::expenses(&store).unwrap().len(), 1);

        run(&mut store, "login ren@example.com hunter2").unwrap();
        run(&mut store, "logout").unwrap();
        assert_eq!(run(&mut store, "income Bonus 10").unwrap(), "Added income 'Bonus'");
    }

    #[test]
    fn test_login_succeeds_even_if_dashboard_fails() {
        let mut store = LocalStore::in_memory();
        run(&mut store, "signup ren ren@example.com hunter2").unwrap();
        store.set_item(INCOMES_KEY, "not json").unwrap();

        let output = run(&mut store, "login ren@example.com hunter2").unwrap();
        assert!(output.starts_with("Login successful!"));
        assert!(output.contains(INCOMES_KEY));
        assert_eq!(store.get_item(LOGGED_IN_KEY), Some("true".to_string()));
    }

    #[test]
    fn test_dashboard_commands_are_guarded() {
        let mut store = LocalStore::in_memory();
        run(&mut store, "signup ren ren@example.com hunter2").unwrap();
        for command in ["dashboard", "months", "breakdown", "trend", "compare", "heatmap", "histogram", "seed 1", "export to out.csv"] {
            assert_eq!(run(&mut store, command).unwrap_err().to_string(), "Please log in first.");
        }

        run(&mut store, "login ren@example.com hunter2").unwrap();
        run(&mut store, "logout").unwrap();
        assert!(matches!(run(&mut store, "dashboard"), Err(Error::NotLoggedIn)));
    }

    #[test]
    fn test_reports_after_login() {
        let mut store = logged_in_store();
        run(&mut store, "expense Food 10").unwrap();
        run(&mut store, "expense Food 15.5").unwrap();
        run(&mut store, "income Salary 3000").unwrap();

        let current = YearMonth::current().to_string();
        assert!(run(&mut store, "months").unwrap().contains(&current));
        let breakdown = run(&mut store, "breakdown").unwrap();
        assert!(breakdown.contains("₹25.50"));
        assert!(breakdown.contains("₹3000.00"));
        assert!(run(&mut store, "trend").unwrap().contains("2974.50"));
        assert!(run(&mut store, &format!("dashboard {current}")).unwrap().contains("- ₹15.5 - Food"));
    }

    #[test]
    fn test_chart_tables_after_login() {
        let mut store = logged_in_store();
        run(&mut store, "income Salary 3000").unwrap();
        run(&mut store, "expense Rent 900").unwrap();
        run(&mut store, "expense Rent 100").unwrap();

        let compare = run(&mut store, "compare").unwrap();
        assert!(compare.contains("Salary"));
        assert!(compare.contains("₹1000.00"));

        let heatmap = run(&mut store, "heatmap").unwrap();
        assert!(heatmap.contains(&YearMonth::current().to_string()));
        assert!(heatmap.contains("1000"));

        let histogram = run(&mut store, "histogram").unwrap();
        assert!(histogram.contains("₹100.00"));
        assert!(histogram.contains("₹900.00"));
    }

    #[test]
    fn test_seed_command_is_repeatable() {
        let mut first = logged_in_store();
        let mut second = logged_in_store();
        let output = run(&mut first, "seed 42").unwrap();
        assert!(output.starts_with("Sample data added with seed 42:"));
        assert_eq!(run(&mut second, "seed 42").unwrap(), output);
        assert_eq!(ledger::incomes(&first).unwrap(), ledger::incomes(&second).unwrap());
        assert!(ledger::expenses(&first).unwrap().len() >= 8 * seed::SEED_MONTHS);
    }

    #[test]
    fn test_export_command() {
        let mut store = logged_in_store();
        run(&mut store, "income Salary 5000").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");

        let output = run(&mut store, &format!("EXPORT TO '{}'", path.display())).unwrap();
        assert!(output.starts_with("1 transactions exported"));
        assert!(path.exists());
    }

    #[test]
    fn test_unknown_command() {
        let mut store = LocalStore::in_memory();
        assert!(matches!(run(&mut store, "withdraw 100"), Err(Error::Parse(_))));
    }
}
