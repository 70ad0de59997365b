use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

/// Why a sampling attempt produced no color.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PickError {
    #[error("color picking cancelled")]
    Cancelled,
    #[error("color sampler `{0}` is not available")]
    Unsupported(String),
    #[error("color sampler failed: {0}")]
    Failed(String),
}

/// The platform's screen color picker
pub trait Sampler: Send + Sync {
    /// Short name used in logs and notices
    fn name(&self) -> &str;

    /// Whether sampling can be attempted at all
    fn is_supported(&self) -> bool;

    /// Wait for the user to click somewhere on screen and return the color
    /// under the cursor as `#RRGGBB`.
    fn sample(&self) -> impl Future<Output = Result<String, PickError>> + Send;
}

/// Runs an external picker program (`xcolor`, `hyprpicker`, ...) that prints
/// the picked color on stdout.
#[derive(Debug, Clone)]
pub struct CommandSampler {
    program: String,
    args: Vec<String>,
}

impl CommandSampler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn locate(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file().then(|| program.to_path_buf());
        }

        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|candidate| candidate.is_file())
    }
}

impl Sampler for CommandSampler {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_supported(&self) -> bool {
        !self.program.is_empty() && self.locate().is_some()
    }

    async fn sample(&self) -> Result<String, PickError> {
        log::debug!("running sampler {} {:?}", self.program, self.args);
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PickError::Unsupported(self.program.clone()));
            }
            Err(err) => return Err(PickError::Failed(err.to_string())),
        };

        interpret_output(
            output.status.success(),
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )
    }
}

/// Turn a picker's exit status and output into a pick outcome.
///
/// Pickers report a cancelled pick (Escape, right click) by printing nothing;
/// some also exit non-zero, but without diagnostics.
pub fn interpret_output(success: bool, stdout: &str, stderr: &str) -> Result<String, PickError> {
    if let Some(hex) = parse_sampler_output(stdout) {
        return Ok(hex);
    }

    let stderr = stderr.trim();
    if success {
        if stdout.trim().is_empty() {
            return Err(PickError::Cancelled);
        }
        return Err(PickError::Failed(format!(
            "unrecognized output {:?}",
            stdout.trim()
        )));
    }

    match stderr.lines().next() {
        Some(line) => Err(PickError::Failed(line.to_string())),
        None => Err(PickError::Cancelled),
    }
}

/// Find the first `#RRGGBB` token in picker output. A bare `RRGGBB` counts
/// only when it is the whole output.
pub fn parse_sampler_output(stdout: &str) -> Option<String> {
    let trimmed = stdout.trim();
    if is_hex_digits(trimmed) {
        return Some(format!("#{trimmed}"));
    }
    stdout.split_whitespace().find_map(|token| {
        let digits = token.strip_prefix('#')?;
        is_hex_digits(digits).then(|| format!("#{digits}"))
    })
}

fn is_hex_digits(digits: &str) -> bool {
    digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}
