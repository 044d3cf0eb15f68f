//! Portable pieces of WebView2 runtime detection and installation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, warn};

/// EdgeUpdate client id of the WebView2 runtime.
pub const CLIENT_ID: &str = "{F3017226-FE2A-4295-8BDF-00C3A9A7E4C5}";

/// Registry value holding the installed runtime version.
pub const VERSION_VALUE: &str = "pv";

pub const BOOTSTRAPPER_FILE_NAME: &str = "MicrosoftEdgeWebview2Setup.exe";

/// Installs quietly and skips the install when the runtime is present.
pub const BOOTSTRAPPER_ARGS: [&str; 2] = ["/silent", "/install"];

pub const LOADER_FILE_NAME: &str = "WebView2Loader.dll";

/// Registry key under HKLM/HKCU holding the runtime's client record.
///
/// 64-bit processes read through the WOW6432Node view.
pub fn client_key_path(is_32bit_process: bool) -> String {
    if is_32bit_process {
        format!(r"SOFTWARE\Microsoft\EdgeUpdate\Clients\{CLIENT_ID}")
    } else {
        format!(r"SOFTWARE\WOW6432Node\Microsoft\EdgeUpdate\Clients\{CLIENT_ID}")
    }
}

pub fn current_client_key_path() -> String {
    client_key_path(cfg!(target_pointer_width = "32"))
}

/// A runtime counts as installed when it reports a non-blank version.
pub fn is_installed(version: Option<&str>) -> bool {
    version.is_some_and(|v| !v.trim().is_empty())
}

/// Per-process scratch directory for files edgeview writes out of the
/// binary, such as the side-loaded loader DLL or the bootstrapper.
pub fn scratch_dir(base: &Path) -> PathBuf {
    base.join(format!("edgeview-{}", std::process::id()))
}

/// A file written to disk from an in-binary image.
///
/// The file is removed when the value is dropped unless it was [`kept`].
///
/// [`kept`]: StagedFile::keep
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    keep: bool,
}

impl StagedFile {
    /// Writes `image` to `dir/name`, creating `dir` if needed.
    pub fn stage(dir: &Path, name: &str, image: &[u8]) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        fs::write(&path, image)?;
        Ok(Self { path, keep: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Marks the file executable. Only needed on Unix.
    pub fn make_executable(&self) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }

    /// Leaves the file in place and returns its path. Used for modules that
    /// stay loaded for the rest of the process.
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }

    /// Removes the file now, reporting failure.
    pub fn remove(mut self) -> io::Result<()> {
        self.keep = true;
        fs::remove_file(&self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to write the bootstrapper: {0}")]
    Stage(#[source] io::Error),

    #[error("failed to launch the bootstrapper: {0}")]
    Launch(#[source] io::Error),

    #[error("bootstrapper exited with {0}")]
    Failed(ExitStatus),

    #[error("no bootstrapper registered or configured")]
    NoBootstrapper,
}

/// Where the runtime installer comes from.
#[derive(Clone, Copy, Debug)]
pub enum Bootstrapper<'a> {
    /// An installer already on disk. It is left in place.
    Path(&'a Path),
    /// An in-binary image, staged as `dir/file_name` for the run and removed
    /// afterwards.
    Image {
        bytes: &'a [u8],
        dir: &'a Path,
        file_name: &'a str,
    },
}

impl<'a> Bootstrapper<'a> {
    /// Picks the installer: a configured path, then the embedded image, then
    /// one shipped next to the executable.
    pub fn select(
        configured: Option<&'a Path>,
        embedded: Option<&'a [u8]>,
        bundled: Option<&'a Path>,
        scratch: &'a Path,
    ) -> Result<Self, InstallError> {
        if let Some(path) = configured {
            return Ok(Bootstrapper::Path(path));
        }
        if let Some(bytes) = embedded {
            return Ok(Bootstrapper::Image {
                bytes,
                dir: scratch,
                file_name: BOOTSTRAPPER_FILE_NAME,
            });
        }
        bundled
            .map(Bootstrapper::Path)
            .ok_or(InstallError::NoBootstrapper)
    }

    /// Runs the installer with `args` and waits for it. A non-zero exit is
    /// [`InstallError::Failed`].
    pub fn run(self, args: &[&str]) -> Result<(), InstallError> {
        let status = match self {
            Bootstrapper::Path(path) => launch(path, args)?,
            Bootstrapper::Image {
                bytes,
                dir,
                file_name,
            } => {
                let staged =
                    StagedFile::stage(dir, file_name, bytes).map_err(InstallError::Stage)?;
                staged.make_executable().map_err(InstallError::Stage)?;
                let status = launch(staged.path(), args);
                if let Err(err) = staged.remove() {
                    warn!(error = %err, "failed to remove staged bootstrapper");
                }
                status?
            }
        };

        if !status.success() {
            return Err(InstallError::Failed(status));
        }
        Ok(())
    }
}

fn launch(path: &Path, args: &[&str]) -> Result<ExitStatus, InstallError> {
    debug!(path = %path.display(), "running bootstrapper");
    Command::new(path)
        .args(args)
        .status()
        .map_err(InstallError::Launch)
}

#[cfg(test)]
mod tests;
