use std::str::FromStr;
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{digit1, multispace1};
use nom::combinator::{eof, map_res, opt, value};
use nom::sequence::preceded;
use nom::IResult;
use crate::ledger::Category;
use crate::parser::{argument, Statement};

/// Parse `INCOME name amount` and `EXPENSE name amount`
pub(crate) fn entry(input: &str) -> IResult<&str, Statement> {
    let (input, category) = alt((
        value(Category::Income, tag_no_case("INCOME")),
        value(Category::Expense, tag_no_case("EXPENSE")),
    ))(input)?;
    let (input, name) = argument(input)?;
    let (input, amount) = argument(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Add(category, name, amount)))
}

/// Parse `SEED (number)`
pub(crate) fn seed(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("SEED")(input)?;
    let (input, seed) = opt(preceded(multispace1, map_res(digit1, u64::from_str)))(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Seed(seed)))
}
