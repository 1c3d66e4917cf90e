//! Resumption ledger.
//!
//! Rebuilt fresh at the start of every run by scanning the output file
//! for `## ` section headers. The ledger never writes anything; the
//! driver owns the file. Matching is exact string equality after a
//! trim, the same way headers are written.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

/// Recover the set of questions already answered in a prior run.
///
/// A missing file means a fresh start, not an error. Read failures
/// degrade to whatever was accumulated before the failure: worst case
/// some questions are answered twice, which is preferable to aborting.
pub fn load_answered_questions(path: &Path) -> HashSet<String> {
    let mut answered = HashSet::new();

    if !path.exists() {
        debug!(path = %path.display(), "No prior output, starting fresh");
        return answered;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not open prior output, assuming no prior answers");
            return answered;
        }
    };

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Read failed mid-scan, keeping partial ledger");
                break;
            }
        };
        let Some(rest) = line.strip_prefix("## ") else {
            continue;
        };
        let rest = rest.trim_start();
        let rest = rest.strip_prefix("Q:").unwrap_or(rest);
        let question = rest.trim();
        if !question.is_empty() {
            answered.insert(question.to_string());
        }
    }

    debug!(path = %path.display(), count = answered.len(), "Resumption ledger loaded");
    answered
}
