//! `papi resolve`

use std::io::Read;

use anyhow::{Context as _, Result};

use super::output::Output;
use super::session::Session;
use crate::placeholder::{Context, Resolver};

/// Parses a `KEY=VALUE` attribute
pub fn parse_attribute(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

pub fn run(
    output: &Output,
    session: &Session,
    text: Option<String>,
    context_id: Option<String>,
    attributes: Vec<(String, String)>,
) -> Result<()> {
    let from_stdin = text.is_none();
    let input = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let context = match context_id {
        Some(id) => Some(
            attributes
                .into_iter()
                .fold(Context::new(id), |ctx, (k, v)| ctx.with_attribute(k, v)),
        ),
        None if !attributes.is_empty() => {
            anyhow::bail!("--attr requires --context");
        }
        None => None,
    };

    let resolved = Resolver::new(&session.registry).resolve(context.as_ref(), &input);

    if output.is_json() {
        output.data(&serde_json::json!({
            "input": input,
            "output": resolved,
            "context": context,
        }));
    } else if from_stdin {
        print!("{}", resolved);
    } else {
        println!("{}", resolved);
    }

    Ok(())
}
