//! Calls to the external text-generation service.
//!
//! Nothing here returns an error to the caller: a failed or unparsable
//! analysis becomes [`CoachOutcome::Error`], a failed chat turn becomes
//! [`CHAT_FALLBACK`].

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::models::coaching::{ChatTurn, Citation, CoachTrend, CoachingSummary};

pub const CHAT_FALLBACK: &str =
    "Sorry, I can't reach the coach right now. Your logs are safe; try again later.";

pub const ANALYSIS_INSTRUCTION: &str = "You are a strength and endurance coach. \
Analyse the training log below and reply with ONLY a JSON object of this shape: \
{\"headline\": string, \"advice\": string, \"trend\": \"improving\" | \"stable\" | \"declining\", \
\"score\": number from 0 to 100 rating consistency and training load, \
\"personal_record\": string describing the most notable personal record, \
\"sources\": optional array of {\"title\": string, \"url\": string}}.";

pub const CHAT_INSTRUCTION: &str = "You are a friendly strength and endurance coach. \
Answer the athlete's last message in plain text, using the training log for context.";

/// A text-generation backend.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", content = "summary", rename_all = "snake_case")]
pub enum CoachOutcome {
    Summary(CoachingSummary),
    Error,
}

pub fn analysis_prompt(context: &str) -> String {
    format!("{}\n\n{}", ANALYSIS_INSTRUCTION, context)
}

/// Ask for a structured analysis of `context`.
pub fn analyze(generator: &dyn TextGenerator, context: &str) -> CoachOutcome {
    match generator.generate(&analysis_prompt(context)) {
        Ok(raw) => match parse_summary(&raw) {
            Some(summary) => CoachOutcome::Summary(summary),
            None => {
                warn!("coach reply was not a usable analysis");
                CoachOutcome::Error
            }
        },
        Err(e) => {
            warn!(error = %e, "coach analysis failed");
            CoachOutcome::Error
        }
    }
}

fn non_empty_str(v: &Value, key: &str) -> Option<String> {
    v.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read a summary out of a model reply, checking each field. Text around the
/// JSON object (such as a fenced code block) is ignored. Returns `None` when
/// there is no object or it carries neither a headline nor advice.
pub fn parse_summary(raw: &str) -> Option<CoachingSummary> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    let value: Value = serde_json::from_str(&raw[start..=end]).ok()?;
    if !value.is_object() {
        return None;
    }

    let headline = non_empty_str(&value, "headline");
    let advice = non_empty_str(&value, "advice");
    if headline.is_none() && advice.is_none() {
        return None;
    }

    let trend = value
        .get("trend")
        .and_then(Value::as_str)
        .map(CoachTrend::from_loose)
        .unwrap_or_default();
    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 100.0));
    let personal_record = non_empty_str(&value, "personal_record");
    let sources = value
        .get("sources")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(Citation {
                        title: non_empty_str(item, "title")?,
                        url: non_empty_str(item, "url")?,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(CoachingSummary {
        headline: headline.unwrap_or_default(),
        advice: advice.unwrap_or_default(),
        trend,
        score,
        personal_record,
        sources,
    })
}

pub fn chat_prompt(message: &str, history: &[ChatTurn], context: &str) -> String {
    let mut prompt = format!("{}\n\nTRAINING LOG:\n{}\n\nCONVERSATION:\n", CHAT_INSTRUCTION, context);
    for turn in history {
        prompt.push_str(&format!("{}: {}\n", turn.role, turn.text));
    }
    prompt.push_str(&format!("user: {}\ncoach:", message));
    prompt
}

/// One chat turn. Always returns text to show.
pub fn chat(
    generator: &dyn TextGenerator,
    message: &str,
    history: &[ChatTurn],
    context: &str,
) -> String {
    match generator.generate(&chat_prompt(message, history, context)) {
        Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
        Ok(_) => {
            warn!("coach returned an empty reply");
            CHAT_FALLBACK.to_string()
        }
        Err(e) => {
            warn!(error = %e, "coach chat failed");
            CHAT_FALLBACK.to_string()
        }
    }
}

/// Runs an external program, writing the prompt to its stdin and reading the
/// reply from its stdout.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    /// Split a configured command line on whitespace.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("coach.command is empty"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        debug!(program = %self.program, bytes = prompt.len(), "invoking coach command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        // Stdin is fed on its own thread while stdout is drained.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_owned();
            std::thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });
        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("coach command closed stdin early");
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => anyhow::bail!("coach stdin writer panicked"),
            }
        }
        if !output.status.success() {
            anyhow::bail!("coach command exited with {}", output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_splits_program_and_args() {
        let g = CommandGenerator::from_command_line("llm -m small").unwrap();
        assert_eq!(g.program, "llm");
        assert_eq!(g.args, vec!["-m", "small"]);
        assert!(CommandGenerator::from_command_line("   ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn command_may_answer_before_reading_the_whole_prompt() {
        let g = CommandGenerator {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "head -c 200000 /dev/zero | tr '\\0' a; wc -c".to_string(),
            ],
        };
        let prompt = "x".repeat(200_000);
        let reply = g.generate(&prompt).unwrap();
        assert!(reply.starts_with('a'));
        assert_eq!(reply[200_000..].trim(), "200000");
    }
}
