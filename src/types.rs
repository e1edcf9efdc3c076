use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("valid line-break regex"));

/// Line-ending normalisation applied to every artifact right before it is
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LineEnding {
    Lf,
    Crlf,
    Cr,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Rewrite every `\r\n`, `\r` or `\n` in `text` to this line ending.
    pub fn apply(&self, text: &str) -> String {
        LINE_BREAK.replace_all(text, self.as_str()).into_owned()
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lf" => Ok(LineEnding::Lf),
            "crlf" => Ok(LineEnding::Crlf),
            "cr" => Ok(LineEnding::Cr),
            other => Err(format!(
                "invalid line ending: {other} (expected \"lf\", \"crlf\" or \"cr\")"
            )),
        }
    }
}

impl TryFrom<String> for LineEnding {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What the compiler produces for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileMode {
    /// Rendered markup.
    #[default]
    Server,
    /// Compiled function source for client-side use.
    Client,
}
