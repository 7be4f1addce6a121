//! Interactive prompts for secrets without a provider.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::core::domain::SecretDescriptor;
use crate::error::ResolveError;

/// Ask the operator for a secret value.
pub trait Prompter {
    /// Return the typed value verbatim. An empty answer is a valid answer.
    fn ask(&mut self, descriptor: &SecretDescriptor) -> Result<Zeroizing<String>, ResolveError>;
}

/// Prompts on the terminal, or reads one line per secret from piped stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, descriptor: &SecretDescriptor) -> Result<Zeroizing<String>, ResolveError> {
        let prompt_failed = |reason: String| ResolveError::Prompt {
            name: descriptor.name.clone(),
            reason,
        };

        let label = if descriptor.description.is_empty() {
            descriptor.name.clone()
        } else {
            format!("{} ({})", descriptor.description, descriptor.name)
        };

        if io::stdin().is_terminal() {
            let value = Password::new()
                .with_prompt(label)
                .allow_empty_password(true)
                .interact()
                .map_err(|e| prompt_failed(e.to_string()))?;
            return Ok(Zeroizing::new(value));
        }

        eprint!("{}: ", label);
        let _ = io::stderr().flush();
        read_answer(&mut io::stdin().lock()).map_err(|e| prompt_failed(e.to_string()))
    }
}

/// Read one answer line, dropping only the line terminator.
fn read_answer(reader: &mut impl BufRead) -> io::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    reader.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Answers prompts from a fixed list.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    /// Names that were asked, in order.
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, descriptor: &SecretDescriptor) -> Result<Zeroizing<String>, ResolveError> {
        self.asked.push(descriptor.name.clone());
        self.answers
            .pop_front()
            .map(Zeroizing::new)
            .ok_or_else(|| ResolveError::Prompt {
                name: descriptor.name.clone(),
                reason: "no more scripted answers".to_string(),
            })
    }
}
