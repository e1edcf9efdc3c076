// src/config/loader.rs

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{OptionsObject, RenderConfig};
use crate::errors::{RenderError, Result};

static EXPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*=\s*(.+?);?\s*$")
        .expect("valid exports regex")
});
static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'((?:[^'\\]|\\.)*)'").expect("valid quote regex")
});
static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([{,]\s*)([A-Za-z_$][\w$]*)\s*:"#).expect("valid key regex")
});
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid comma regex"));

/// Resolve the `--obj` argument into an [`OptionsObject`].
///
/// Resolution order:
/// 1. `input` names an existing file: `.toml` files are parsed as TOML, any
///    other file as JSON and then as an object expression.
/// 2. `input` itself as JSON.
/// 3. `input` itself as an object expression (`{doctype: 'html'}`).
pub fn parse_obj(input: &str) -> Result<OptionsObject> {
    let path = Path::new(input);
    if path.is_file() {
        debug!(?path, "reading options object from file");
        let contents = fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            return Ok(toml::from_str(&contents)?);
        }
        return parse_str(&contents).map_err(|err| match err {
            RenderError::OptionsError(msg) => {
                RenderError::OptionsError(format!("{}: {msg}", path.display()))
            }
            other => other,
        });
    }
    parse_str(input)
}

/// Load the options object (if any) and merge the CLI flags over it.
pub fn load_and_validate(args: &CliArgs) -> Result<RenderConfig> {
    RenderConfig::try_from(args)
}

fn parse_str(input: &str) -> Result<OptionsObject> {
    match serde_json::from_str::<OptionsObject>(input) {
        Ok(obj) => Ok(obj),
        Err(json_err) => {
            let relaxed = relax_expression(input);
            serde_json::from_str::<OptionsObject>(&relaxed).map_err(|expr_err| {
                RenderError::OptionsError(format!(
                    "neither JSON ({json_err}) nor an object expression ({expr_err})"
                ))
            })
        }
    }
}

/// Rewrite a JavaScript-style object literal (or a list of
/// `exports.key = value;` lines) into JSON.
fn relax_expression(input: &str) -> String {
    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    let object = if !lines.is_empty() && lines.iter().all(|l| EXPORT_LINE.is_match(l)) {
        let fields: Vec<String> = lines
            .iter()
            .filter_map(|l| EXPORT_LINE.captures(l))
            .map(|caps| format!("{}: {}", &caps[1], &caps[2]))
            .collect();
        format!("{{{}}}", fields.join(", "))
    } else {
        input.trim().trim_start_matches('(').trim_end_matches(')').to_string()
    };

    let quoted = SINGLE_QUOTED.replace_all(&object, |caps: &regex::Captures<'_>| {
        format!("\"{}\"", caps[1].replace("\\'", "'").replace('"', "\\\""))
    });
    let keyed = BARE_KEY.replace_all(&quoted, "$1\"$2\":");
    TRAILING_COMMA.replace_all(&keyed, "$1").into_owned()
}
