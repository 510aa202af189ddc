//! Execute ArkScript programs against a workspace

use std::fs;
use std::path::PathBuf;

use super::CliError;
use crate::{RunResult, Workspace};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Script file to run
    pub script: Option<PathBuf>,
    /// Inline script text (`-e`)
    pub code: Option<String>,
    /// Script piped on stdin
    pub stdin: Option<String>,
    /// Leave the previous run's outputs in place
    pub keep_outputs: bool,
}

/// Pick the script text: inline code first, then the script file, then stdin.
pub fn read_script(options: &RunOptions) -> Result<String, CliError> {
    if let Some(code) = &options.code {
        return Ok(code.clone());
    }
    if let Some(path) = &options.script {
        return Ok(fs::read_to_string(path)?);
    }
    options.stdin.clone().ok_or(CliError::NoInput)
}

/// Run a script in `workspace`.
///
/// The returned result may still be `failed`; the caller decides how to
/// report it.
pub fn execute_run(workspace: &Workspace, options: &RunOptions) -> Result<RunResult, CliError> {
    let source = read_script(options)?;
    if options.keep_outputs {
        Ok(workspace.run(&source))
    } else {
        Ok(workspace.execute(&source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_code_wins() {
        let options = RunOptions {
            code: Some("invertir de a en b".to_string()),
            stdin: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(read_script(&options).unwrap(), "invertir de a en b");
    }

    #[test]
    fn test_no_script() {
        assert!(matches!(read_script(&RunOptions::default()), Err(CliError::NoInput)));
    }
}
