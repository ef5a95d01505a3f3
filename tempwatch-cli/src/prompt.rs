use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use inquire::Text;
use tempwatch_core::Coordinate;

/// Ask for latitude, then longitude. Anything that isn't a number aborts the run.
pub fn read_coordinate() -> Result<Coordinate> {
    if io::stdin().is_terminal() {
        let latitude = parse_number(&Text::new("Enter latitude:").prompt()?)?;
        let longitude = parse_number(&Text::new("Enter longitude:").prompt()?)?;
        Ok(Coordinate::new(latitude, longitude))
    } else {
        let stdin = io::stdin();
        read_coordinate_from(&mut stdin.lock(), &mut io::stdout())
    }
}

/// Line-oriented fallback for piped input.
pub fn read_coordinate_from<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Coordinate> {
    let latitude = read_number(input, out, "Enter latitude: ")?;
    let longitude = read_number(input, out, "Enter longitude: ")?;
    Ok(Coordinate::new(latitude, longitude))
}

fn read_number<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<f64> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read from stdin")? == 0 {
        bail!("Unexpected end of input while reading a coordinate");
    }

    parse_number(&line)
}

pub fn parse_number(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    trimmed
        .parse::<f64>()
        .with_context(|| format!("could not convert string to float: {trimmed:?}"))
}
