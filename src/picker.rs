//! Interactive multi-select via an external fuzzy finder.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Capability for choosing a subset of names from a candidate list.
pub trait MultiSelect {
    fn pick(&self, items: &[String]) -> Result<Vec<String>>;
}

/// Runs `fzf --multi` with the candidates on stdin, one per line.
pub struct FzfPicker;

impl MultiSelect for FzfPicker {
    fn pick(&self, items: &[String]) -> Result<Vec<String>> {
        let mut child = Command::new("fzf")
            .arg("--multi")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .context("spawning fzf (is it installed?)")?;

        {
            let mut stdin = child.stdin.take().context("opening fzf stdin")?;
            stdin
                .write_all(items.join("\n").as_bytes())
                .context("writing candidates to fzf")?;
        }

        let output = child.wait_with_output().context("waiting for fzf")?;
        if !output.status.success() {
            // fzf exits non-zero when the user aborts or nothing matches
            debug!("fzf exited with {}, empty selection", output.status);
            return Ok(Vec::new());
        }
        Ok(parse_selection(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Non-empty lines of the picker's stdout, in selection order.
pub fn parse_selection(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
