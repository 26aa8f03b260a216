use nom::bytes::complete::tag_no_case;
use nom::combinator::eof;
use nom::IResult;
use crate::parser::{argument, Statement};

/// Parse `SIGNUP username email password` pattern.
pub(crate) fn signup(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("SIGNUP")(input)?;
    let (input, username) = argument(input)?;
    let (input, email) = argument(input)?;
    let (input, password) = argument(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Signup(username, email, password)))
}

/// Parse `LOGIN email password` pattern.
pub(crate) fn login(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("LOGIN")(input)?;
    let (input, email) = argument(input)?;
    let (input, password) = argument(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Login(email, password)))
}

pub(crate) fn logout(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("LOGOUT")(input)?;
    let (input, _) = eof(input)?;
    Ok((input, Statement::Logout))
}
