//! Judge one catalog mutation read as JSON from a file (first argument) or stdin.
//!
//! Prints the verdict as JSON; exits non-zero when the mutation is rejected.

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;

use plmgate_rulebook::{MutationRequest, Rulebook};

fn main() -> anyhow::Result<ExitCode> {
    plmgate_observability::init();

    let rulebook = Rulebook::from_env()?;

    let input = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let request: MutationRequest =
        serde_json::from_str(&input).context("malformed mutation request")?;
    let verdict = rulebook.evaluate(&request)?;

    println!("{}", serde_json::to_string_pretty(&verdict)?);

    if verdict.accepted() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::info!(
            violations = verdict.violations().count(),
            "mutation rejected"
        );
        Ok(ExitCode::FAILURE)
    }
}
