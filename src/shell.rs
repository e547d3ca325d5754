// 🐚 Chat Shell - line-oriented prompt/response loop around the interpreter

use crate::interpreter::Interpreter;
use crate::session::QueryContext;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Ask: ";

/// Outcome of a finished chat session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub questions: usize,
    pub last_company: Option<String>,
}

fn banner(interpreter: &Interpreter) -> Vec<String> {
    vec![
        "📊 Financial Growth Chatbot".to_string(),
        format!(
            "Ask questions about company financials ({})",
            interpreter.table().companies().join(", ")
        ),
        "Type 'help' for examples or 'exit' to quit.".to_string(),
    ]
}

/// One input line without its terminator; invalid UTF-8 becomes U+FFFD
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);

    match String::from_utf8_lossy(raw) {
        Cow::Borrowed(line) => line.to_string(),
        Cow::Owned(line) => {
            tracing::warn!("input line was not valid UTF-8, invalid bytes replaced");
            line
        }
    }
}

/// Run the chat until `exit` or end of input
pub fn run_shell<R: BufRead, W: Write>(
    interpreter: &Interpreter,
    mut input: R,
    mut output: W,
) -> Result<SessionStats> {
    for line in banner(interpreter) {
        writeln!(output, "{}", line)?;
    }
    writeln!(output)?;

    let mut context = QueryContext::new();
    let mut questions = 0;
    let mut buf = Vec::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("Failed to read input line")?;
        if read == 0 {
            tracing::debug!("end of input, leaving chat");
            writeln!(output)?;
            break;
        }
        let line = decode_line(&buf);

        if !line.trim().is_empty() {
            questions += 1;
        }

        let (next, reply) = interpreter.step(context, &line);
        context = next;

        for reply_line in &reply.lines {
            writeln!(output, "{}", reply_line)?;
        }
        if !reply.lines.is_empty() {
            writeln!(output)?;
        }

        if reply.is_exit() {
            break;
        }
    }

    Ok(SessionStats {
        questions,
        last_company: context.company().map(str::to_string),
    })
}
