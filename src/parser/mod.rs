mod account;
mod entry;
mod export;
mod report;

use nom::branch::alt;
use nom::bytes::complete::take_till;
use nom::character::complete::{char, multispace1};
use nom::error::ErrorKind;
use nom::sequence::delimited;
use nom::{IResult, InputTakeAtPosition};
use crate::common::Error;
use crate::ledger::Category;
use crate::util::YearMonth;

#[derive(Debug, PartialEq)]
pub(crate) enum Statement {
    /// SIGNUP username email password
    Signup(String, String, String),
    /// LOGIN email password
    Login(String, String),
    Logout,
    /// INCOME name amount, EXPENSE name amount. Amount is kept as typed and validated by the ledger.
    Add(Category, String, String),
    /// DASHBOARD (month)
    Dashboard(Option<YearMonth>),
    Months,
    /// BREAKDOWN (month)
    Breakdown(Option<YearMonth>),
    Trend,
    Compare,
    Heatmap,
    /// HISTOGRAM (month)
    Histogram(Option<YearMonth>),
    /// SEED (number). Without a number a random seed is used.
    Seed(Option<u64>),
    /// EXPORT TO file_path
    Export(String),
}

/// Command keywords, for completion
pub(crate) const KEYWORDS: [&str; 14] = [
    "SIGNUP", "LOGIN", "LOGOUT", "INCOME", "EXPENSE", "DASHBOARD", "MONTHS", "BREAKDOWN", "TREND",
    "COMPARE", "HEATMAP", "HISTOGRAM", "SEED", "EXPORT",
];

pub(crate) fn parse(command: &str) -> Result<Statement, Error> {
    let command = command.trim().trim_end_matches(';').trim_end();
    let result = alt((
        account::signup,
        account::login,
        account::logout,
        entry::entry,
        report::dashboard,
        report::months,
        report::breakdown,
        report::trend,
        report::compare,
        report::heatmap,
        report::histogram,
        entry::seed,
        export::export,
    ))(command);

    match result {
        Ok((_, statement)) => Ok(statement),
        Err(e) => Err(Error::Parse(format!("Unable to parse '{command}': {e}"))),
    }
}

/// A whitespace separated argument, optionally quoted with ' or "
pub(crate) fn argument(input: &str) -> IResult<&str, String> {
    let (input, _) = multispace1(input)?;
    let (input, value) = alt((single_quoted, double_quoted, non_space))(input)?;
    Ok((input, value.to_string()))
}

fn single_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), take_till(|c| c == '\''), char('\''))(input)
}

fn double_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"'))(input)
}

pub(crate) fn non_space(input: &str) -> IResult<&str, &str> {
    input.split_at_position1_complete(char::is_whitespace, ErrorKind::Space)
}
