//! Action report model
//!
//! The admin endpoint answers every command with an `action-report`
//! document:
//!
//! ```xml
//! <action-report description="deploy AdminCommand" exit-code="SUCCESS">
//!   <message-part message="Application deployed with name app.">
//!     <property name="name" value="app"/>
//!   </message-part>
//! </action-report>
//! ```

use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Report parsing errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Missing <action-report> root element")]
    MissingRoot,

    #[error("Unknown exit code: {0}")]
    UnknownExitCode(String),
}

/// Exit code of an admin command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExitCode {
    Success,
    Warning,
    Failure,
}

impl ExitCode {
    /// Whether the command completed (warnings still count)
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success | ExitCode::Warning)
    }
}

impl FromStr for ExitCode {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(ExitCode::Success),
            "WARNING" => Ok(ExitCode::Warning),
            "FAILURE" => Ok(ExitCode::Failure),
            other => Err(ReportError::UnknownExitCode(other.to_string())),
        }
    }
}

/// A `name`/`value` pair attached to a message part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Parsed action report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Command description
    pub description: Option<String>,

    /// Exit code
    pub exit_code: ExitCode,

    /// Messages of every `message-part`, in document order
    pub messages: Vec<String>,

    /// Properties of every `message-part`, in document order
    pub properties: Vec<Property>,
}

impl ActionReport {
    /// Parse a report document
    pub fn parse(xml: &str) -> Result<Self, ReportError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut root: Option<(Option<String>, ExitCode)> = None;
        let mut messages = Vec::new();
        let mut properties = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ReportError::Xml(e.to_string()))?;

            match event {
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"action-report" => {
                        let description = attribute(&e, b"description")?;
                        let exit_code = attribute(&e, b"exit-code")?
                            .ok_or_else(|| ReportError::UnknownExitCode(String::new()))?
                            .parse()?;
                        root = Some((description, exit_code));
                    }
                    b"message-part" => {
                        if let Some(message) = attribute(&e, b"message")? {
                            if !message.is_empty() {
                                messages.push(message);
                            }
                        }
                    }
                    b"property" => {
                        if let Some(name) = attribute(&e, b"name")? {
                            let value = attribute(&e, b"value")?.unwrap_or_default();
                            properties.push(Property { name, value });
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        let (description, exit_code) = root.ok_or(ReportError::MissingRoot)?;
        Ok(Self {
            description,
            exit_code,
            messages,
            properties,
        })
    }

    /// Top-level message, if any
    pub fn message(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }

    /// First property with the given name
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

impl FromStr for ActionReport {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, ReportError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ReportError::Xml(e.to_string()))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| ReportError::Xml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
