//! Guided, question-by-question entry of the journal form.

use crate::entry::{FormState, Section};
use crate::errors::AppResult;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

/// Reads one line, without its line ending. `None` at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(&['\n', '\r'][..]).to_string();
    Ok(Some(trimmed))
}

/// Walks the questionnaire, writing each question to `output` and reading
/// one answer line from `input`.
///
/// Order: location, the context, research and intervention questions, then
/// an optional photo path. If input ends early the remaining answers are left
/// as they were in `form`.
///
/// # Errors
///
/// Returns an error if reading or writing fails, or if a photo path is given
/// and the file cannot be read.
pub fn prompt_form<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    form: &mut FormState,
) -> AppResult<()> {
    write!(output, "Location: ")?;
    output.flush()?;
    match read_answer(input)? {
        Some(location) => form.location = location,
        None => return Ok(()),
    }

    for section in Section::ALL {
        writeln!(output, "\n{}", section.title())?;
        for (index, question) in section.questions().iter().enumerate() {
            write!(output, "{}. {}\n> ", index + 1, question)?;
            output.flush()?;
            match read_answer(input)? {
                Some(answer) => form.set_answer(section, index, answer)?,
                None => {
                    debug!("Input ended during {} question {}", section, index + 1);
                    return Ok(());
                }
            }
        }
    }

    write!(output, "\nPhoto path (optional): ")?;
    output.flush()?;
    if let Some(path) = read_answer(input)? {
        let path = path.trim();
        if !path.is_empty() {
            form.attach_photo_file(Path::new(path))?;
        }
    }

    Ok(())
}
