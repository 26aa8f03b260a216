use std::str::FromStr;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::multispace1;
use nom::combinator::{eof, map_res, opt};
use nom::sequence::preceded;
use nom::IResult;
use crate::parser::{non_space, Statement};
use crate::util::YearMonth;

/// Parse `DASHBOARD (YYYY-MM)`
pub(crate) fn dashboard(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("DASHBOARD")(input)?;
    let (input, month) = optional_month(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Dashboard(month)))
}

pub(crate) fn months(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("MONTHS")(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Months))
}

/// Parse `BREAKDOWN (YYYY-MM)`
pub(crate) fn breakdown(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("BREAKDOWN")(input)?;
    let (input, month) = optional_month(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Breakdown(month)))
}

pub(crate) fn trend(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("TREND")(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Trend))
}

pub(crate) fn compare(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("COMPARE")(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Compare))
}

pub(crate) fn heatmap(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("HEATMAP")(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Heatmap))
}

/// Parse `HISTOGRAM (YYYY-MM)`
pub(crate) fn histogram(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("HISTOGRAM")(input)?;
    let (input, month) = optional_month(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Histogram(month)))
}

fn optional_month(input: &str) -> IResult<&str, Option<YearMonth>> {
    opt(preceded(multispace1, map_res(non_space, YearMonth::from_str)))(input)
}
