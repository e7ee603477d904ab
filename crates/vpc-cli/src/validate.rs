//! # Validate Subcommand
//!
//! Parses a script and checks every principal, credential id, and
//! timestamp without executing anything.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::script::Script;

/// Arguments for `vpc validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Script of contract calls (YAML or JSON).
    pub script: PathBuf,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let script = Script::load(&args.script)?;
    script.check()?;
    println!("{}: {} steps OK", args.script.display(), script.steps.len());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.yaml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn valid_script_passes() {
        let (_dir, script) = write(
            "- op: verify-credential\n  credential_id: CERT-123\n  recipient: R\n\
             - op: set-block-time\n  block_time: 1690000000\n",
        );
        assert_eq!(run_validate(&ValidateArgs { script }).unwrap(), 0);
    }

    #[test]
    fn empty_credential_id_fails() {
        let (_dir, script) = write("- op: get-credential\n  credential_id: \"\"\n  recipient: R\n");
        assert!(run_validate(&ValidateArgs { script }).is_err());
    }

    #[test]
    fn unrepresentable_expiry_fails() {
        let (_dir, script) = write(&format!(
            "- op: issue-credential\n  sender: I\n  credential_id: C\n  recipient: R\n  \
             credential_type: t\n  expiry_date: {}\n  metadata_uri: m\n",
            i64::MIN
        ));
        assert!(run_validate(&ValidateArgs { script }).is_err());
    }

    #[test]
    fn missing_file_fails() {
        let script = PathBuf::from("/nonexistent/script.yaml");
        assert!(run_validate(&ValidateArgs { script }).is_err());
    }
}
