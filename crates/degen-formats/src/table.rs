//! Genetic-code tables as text, one row per codon.
//!
//! ```text
//! # supE
//! TAG Q
//! TGA *   # opal stays a stop
//! ```

use degen_core::GeneticCode;
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, not_line_ending, satisfy, space0, space1},
    combinator::{all_consuming, opt},
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::ParseError;

/// A codon reassignment as written in a table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub codon: String,
    pub output: char,
}

fn codon(input: &str) -> IResult<&str, &str> {
    take_while_m_n(3, 3, |c: char| c.is_ascii_alphabetic())(input)
}

fn output(input: &str) -> IResult<&str, char> {
    satisfy(|c: char| !c.is_whitespace() && c != '#')(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), not_line_ending)(input)
}

fn row(input: &str) -> IResult<&str, (&str, char)> {
    terminated(
        tuple((preceded(space0, codon), preceded(space1, output))),
        tuple((space0, opt(comment))),
    )(input)
}

/// Parse table rows. Blank lines and `#` comments are skipped; codon and
/// output validity is checked when the rows are applied to a code.
pub fn parse_rows(input: &str) -> Result<Vec<TableRow>, ParseError> {
    let mut rows = Vec::new();
    for (number, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (_, (codon, output)) = all_consuming(row)(line).map_err(|_| {
            ParseError::InvalidFormat(format!("line {}: {:?}", number + 1, line))
        })?;
        rows.push(TableRow {
            codon: codon.to_string(),
            output,
        });
    }
    Ok(rows)
}

/// Build a genetic code from NCBI table `table_id` with the rows in `input`
/// applied as overrides.
pub fn parse(table_id: u32, input: &str) -> Result<GeneticCode, ParseError> {
    let rows = parse_rows(input)?;
    let overrides = rows
        .iter()
        .map(|r| (r.codon.as_str(), r.output.to_string()));
    Ok(GeneticCode::new(table_id, overrides)?)
}

/// All 64 rows under a header naming the code.
pub fn serialize(code: &GeneticCode) -> String {
    format!("# {} (table {})\n{}", code.name(), code.id(), code)
}
