//! The external compiler seam.
//!
//! The orchestrator only needs "build this pair into that path". The real
//! backend runs `go build` as a child process with inherited stdout and
//! stderr; tests substitute an in-process fake.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crossplat_core::PlatformPair;
use tracing::debug;

use crate::error::{BuildError, Result};

/// Linker flags that drop the symbol table and DWARF data.
pub const STRIP_FLAGS: &str = "-ldflags=-s -w";

/// One compiler invocation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    pub pair: &'a PlatformPair,
    /// Destination of the produced binary.
    pub output: &'a Path,
    /// Passthrough arguments, appended last.
    pub args: &'a [String],
    /// Build with native interop enabled.
    pub cgo: bool,
    /// Strip debug symbols.
    pub strip: bool,
}

/// A failed compiler invocation. Never fatal to the batch.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },

    #[error("{0}")]
    Other(String),
}

/// Builds one platform pair into a binary.
pub trait Compiler: Sync {
    fn compile(&self, request: &CompileRequest<'_>) -> std::result::Result<(), CompileError>;
}

/// `go build` driven through `GOOS`/`GOARCH`.
#[derive(Debug, Clone)]
pub struct GoCompiler {
    program: PathBuf,
}

impl GoCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `program` on `PATH` (or accept it as a path).
    pub fn locate(program: &str) -> Result<Self> {
        let resolved = which::which(program).map_err(|e| BuildError::ToolchainNotFound {
            program: program.to_string(),
            detail: e.to_string(),
        })?;
        debug!(program = %resolved.display(), "located toolchain");
        Ok(Self::new(resolved))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The command that would be run for `request`.
    pub fn command(&self, request: &CompileRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.env("GOOS", &request.pair.os)
            .env("GOARCH", &request.pair.arch);
        if request.cgo {
            cmd.env("CGO_ENABLED", "1");
        }
        cmd.arg("build").arg("-o").arg(request.output);
        if request.strip {
            cmd.arg(STRIP_FLAGS);
        }
        cmd.args(request.args);
        cmd
    }
}

impl Compiler for GoCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> std::result::Result<(), CompileError> {
        let program = self.program.display().to_string();
        let mut cmd = self.command(request);
        debug!(?cmd, "running compiler");
        let status = cmd
            .status()
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(CompileError::Exit { program, status })
        }
    }
}
