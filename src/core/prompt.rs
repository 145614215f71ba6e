//! Interactive prompt collaborator
//!
//! The logger only forwards prompts to a [`Prompter`] and applies the
//! configured [`CancelPolicy`] when the user cancels.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Input mode of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PromptKind {
    Text {
        #[serde(default)]
        default: Option<String>,
        #[serde(default)]
        placeholder: Option<String>,
    },
    Confirm {
        #[serde(default)]
        initial: Option<bool>,
    },
    Select {
        options: Vec<String>,
        #[serde(default)]
        initial: Option<String>,
    },
    #[serde(rename = "multiselect")]
    MultiSelect {
        options: Vec<String>,
        #[serde(default)]
        initial: Vec<String>,
        #[serde(default)]
        required: bool,
    },
}

impl Default for PromptKind {
    fn default() -> Self {
        PromptKind::Text {
            default: None,
            placeholder: None,
        }
    }
}

/// What a cancelled prompt yields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelPolicy {
    /// Fail with [`LoggerError::PromptCancelled`]
    Reject,
    /// The initial/default value of the prompt
    #[default]
    Default,
    Undefined,
    Null,
    /// The [`PromptValue::Cancelled`] marker
    Symbol,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptOptions {
    #[serde(flatten)]
    pub kind: PromptKind,
    pub cancel: CancelPolicy,
}

impl PromptOptions {
    pub fn text() -> Self {
        Self::default()
    }

    pub fn confirm() -> Self {
        Self {
            kind: PromptKind::Confirm { initial: None },
            cancel: CancelPolicy::default(),
        }
    }

    pub fn select<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: PromptKind::Select {
                options: options.into_iter().map(Into::into).collect(),
                initial: None,
            },
            cancel: CancelPolicy::default(),
        }
    }

    pub fn multiselect<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: PromptKind::MultiSelect {
                options: options.into_iter().map(Into::into).collect(),
                initial: Vec::new(),
                required: false,
            },
            cancel: CancelPolicy::default(),
        }
    }

    #[must_use]
    pub fn cancel(mut self, policy: CancelPolicy) -> Self {
        self.cancel = policy;
        self
    }

    /// Set the initial value: text default, confirm initial, select initial
    /// or the single initially selected option
    #[must_use]
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        match &mut self.kind {
            PromptKind::Text { default, .. } => *default = Some(value),
            PromptKind::Confirm { initial } => {
                *initial = Some(matches!(value.as_str(), "true" | "yes" | "y"))
            }
            PromptKind::Select { initial, .. } => *initial = Some(value),
            PromptKind::MultiSelect { initial, .. } => *initial = vec![value],
        }
        self
    }

    /// The value a cancelled prompt resolves to under the cancel policy
    pub fn resolve_cancel(&self) -> Result<PromptValue> {
        match self.cancel {
            CancelPolicy::Reject => Err(LoggerError::PromptCancelled),
            CancelPolicy::Default => Ok(self.initial_value()),
            CancelPolicy::Undefined => Ok(PromptValue::Undefined),
            CancelPolicy::Null => Ok(PromptValue::Null),
            CancelPolicy::Symbol => Ok(PromptValue::Cancelled),
        }
    }

    fn initial_value(&self) -> PromptValue {
        match &self.kind {
            PromptKind::Text { default, .. } => default
                .clone()
                .map_or(PromptValue::Undefined, PromptValue::Text),
            PromptKind::Confirm { initial } => initial.map_or(PromptValue::Undefined, PromptValue::Bool),
            PromptKind::Select { initial, .. } => initial
                .clone()
                .map_or(PromptValue::Undefined, PromptValue::Choice),
            PromptKind::MultiSelect { initial, .. } => PromptValue::Choices(initial.clone()),
        }
    }
}

/// Result value of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptValue {
    Text(String),
    Bool(bool),
    Choice(String),
    Choices(Vec<String>),
    Undefined,
    Null,
    /// Reserved cancellation marker
    Cancelled,
}

/// What a prompter reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Answered(PromptValue),
    Cancelled,
}

pub trait Prompter: Send + Sync {
    fn prompt(&self, message: &str, options: &PromptOptions) -> Result<PromptResponse>;
}

/// Line-based prompter over a reader and writer, `stdin`/`stdout` by default.
///
/// End of input counts as a cancellation. An empty answer takes the prompt's
/// initial value.
pub struct LinePrompter {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl LinePrompter {
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }

    pub fn new<R, W>(input: R, output: W) -> Self
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
        }
    }

    fn ask(&self, question: &str) -> Result<Option<String>> {
        {
            let mut output = self.output.lock();
            write!(output, "{} ", question)?;
            output.flush()?;
        }
        let mut line = String::new();
        let read = self.input.lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Prompter for LinePrompter {
    fn prompt(&self, message: &str, options: &PromptOptions) -> Result<PromptResponse> {
        let question = match &options.kind {
            PromptKind::Text { placeholder: Some(p), .. } => format!("{} ({})", message, p),
            PromptKind::Text { .. } => message.to_string(),
            PromptKind::Confirm { .. } => format!("{} (y/n)", message),
            PromptKind::Select { options: choices, .. }
            | PromptKind::MultiSelect { options: choices, .. } => {
                format!("{} [{}]", message, choices.join(", "))
            }
        };

        let answer = match self.ask(&question)? {
            Some(answer) => answer,
            None => return Ok(PromptResponse::Cancelled),
        };
        if answer.is_empty() {
            return Ok(PromptResponse::Answered(options.initial_value()));
        }

        let value = match &options.kind {
            PromptKind::Text { .. } => PromptValue::Text(answer),
            PromptKind::Confirm { .. } => {
                PromptValue::Bool(matches!(answer.to_lowercase().as_str(), "y" | "yes" | "true"))
            }
            PromptKind::Select { options: choices, .. } => match choices.iter().find(|c| **c == answer) {
                Some(choice) => PromptValue::Choice(choice.clone()),
                None => return Ok(PromptResponse::Cancelled),
            },
            PromptKind::MultiSelect { options: choices, .. } => PromptValue::Choices(
                answer
                    .split(',')
                    .map(str::trim)
                    .filter(|a| choices.iter().any(|c| c == a))
                    .map(String::from)
                    .collect(),
            ),
        };
        Ok(PromptResponse::Answered(value))
    }
}

/// Replays canned responses in order; cancels once exhausted
#[derive(Default)]
pub struct ScriptedPrompter {
    responses: Mutex<VecDeque<PromptResponse>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(responses: impl IntoIterator<Item = PromptResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Messages prompted so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, message: &str, _options: &PromptOptions) -> Result<PromptResponse> {
        self.asked.lock().push(message.to_string());
        Ok(self
            .responses
            .lock()
            .pop_front()
            .unwrap_or(PromptResponse::Cancelled))
    }
}
