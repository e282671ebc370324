//! Line-based interactive front end for [`MortgageForm`].
//!
//! Each round prompts for the fields, submits, and prints either the result
//! summary or the field errors. After a rejected submit only the failing
//! fields are asked for again. At any prompt `reset` starts over and `quit`
//! (or end of input) leaves.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use mortgage_core::{Field, MortgageForm, MortgageType, SubmitError};
use tracing::debug;

/// What the user typed at a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    Value(String),
    /// Blank line: keep the current value.
    Keep,
    Reset,
    Quit,
}

impl Reply {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Keep,
            "r" | "reset" => Self::Reset,
            "q" | "quit" | "exit" => Self::Quit,
            other => Self::Value(other.to_string()),
        }
    }
}

/// Drives `form` from `input`, writing prompts and results to `output`.
pub fn run<R: BufRead, W: Write>(
    form: &mut MortgageForm,
    mut input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "Mortgage repayment calculator. Type 'reset' to clear, 'quit' to leave.")?;

    let mut pending_fields: Vec<Field> = Field::all().to_vec();
    let mut ask_type = true;

    'rounds: loop {
        for field in pending_fields.clone() {
            if let Some(error) = form.errors().get(field) {
                writeln!(output, "  ! {error}")?;
            }
            let prompt = format!("{} [{}]: ", field.label(), form.field(field));
            match ask(&mut input, &mut output, &prompt)? {
                Reply::Value(value) => form.set_field(field, value),
                Reply::Keep => {}
                Reply::Reset => {
                    reset(form, &mut output)?;
                    pending_fields = Field::all().to_vec();
                    ask_type = true;
                    continue 'rounds;
                }
                Reply::Quit => return Ok(()),
            }
        }

        while ask_type {
            let prompt = format!(
                "Mortgage type (repayment/interest-only) [{}]: ",
                form.mortgage_type().as_str()
            );
            match ask(&mut input, &mut output, &prompt)? {
                Reply::Value(value) => match MortgageType::parse(&value) {
                    Some(mortgage_type) => {
                        form.set_mortgage_type(mortgage_type);
                        ask_type = false;
                    }
                    None => writeln!(output, "  ! Please choose repayment or interest-only")?,
                },
                Reply::Keep => ask_type = false,
                Reply::Reset => {
                    reset(form, &mut output)?;
                    pending_fields = Field::all().to_vec();
                    continue 'rounds;
                }
                Reply::Quit => return Ok(()),
            }
        }

        match form.submit() {
            Ok(result) => {
                writeln!(output)?;
                write!(output, "{result}")?;
                writeln!(output)?;
                pending_fields = Field::all().to_vec();
                ask_type = true;
            }
            Err(SubmitError::Invalid(errors)) => {
                writeln!(output, "Please correct the highlighted fields.")?;
                pending_fields = errors.fields().collect();
            }
            Err(SubmitError::Busy) => {
                writeln!(output, "A calculation is already running.")?;
            }
        }
    }
}

fn reset<W: Write>(
    form: &mut MortgageForm,
    output: &mut W,
) -> Result<()> {
    form.reset();
    debug!("form reset from prompt");
    writeln!(output, "Cleared.")?;
    Ok(())
}

/// Prints `prompt` and reads one line. End of input counts as quit.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Reply> {
    write!(output, "{prompt}")?;
    output.flush().context("failed to flush prompt")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Ok(Reply::Quit);
    }
    Ok(Reply::parse(&line))
}
