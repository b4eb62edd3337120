//! Compiler invocation
//!
//! Runs the compiler under test once per fixture and captures its merged
//! output.

use std::future::Future;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Raw result of one compiler process
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// stdout and stderr in the order the compiler wrote them
    pub output: String,
}

impl Invocation {
    pub fn new(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Why an invocation produced no exit status
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The process never started
    #[error("{0}")]
    Spawn(#[source] io::Error),

    /// The process started but its output or status could not be collected
    #[error("{0}")]
    Capture(#[source] io::Error),
}

/// Something that can run one fixture
///
/// Any exit, including a crash, is an `Ok` invocation.
pub trait Invoke: Send + Sync {
    fn invoke(
        &self,
        fixture: &Path,
    ) -> impl Future<Output = Result<Invocation, InvokeError>> + Send;
}

/// Spawns the real compiler binary
#[derive(Clone, Debug)]
pub struct CompilerInvoker {
    binary: PathBuf,
}

impl CompilerInvoker {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Invoke for CompilerInvoker {
    async fn invoke(&self, fixture: &Path) -> Result<Invocation, InvokeError> {
        debug!("Spawning {} {}", self.binary.display(), fixture.display());

        // stdout and stderr share one pipe so writes keep their order.
        let (reader, writer) = io::pipe().map_err(InvokeError::Spawn)?;
        // The command holds the parent's write ends until it is dropped;
        // the reader only sees EOF after that and after the child exits.
        let mut child = {
            let mut command = Command::new(&self.binary);
            command
                .arg(fixture)
                .stdin(Stdio::null())
                .stdout(writer.try_clone().map_err(InvokeError::Spawn)?)
                .stderr(writer)
                .kill_on_drop(true);
            command.spawn().map_err(InvokeError::Spawn)?
        };

        let output = tokio::task::spawn_blocking(move || drain(reader))
            .await
            .map_err(io::Error::other)
            .and_then(|read| read)
            .map_err(InvokeError::Capture)?;
        let status = child.wait().await.map_err(InvokeError::Capture)?;

        Ok(Invocation {
            exit_code: status.code(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
    }
}

/// Read until every writer has closed
fn drain<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    reader.read_to_end(&mut output)?;
    Ok(output)
}
