//! Stale `ipc://` socket cleanup
//!
//! A process that dies without unbinding leaves its socket file behind, and
//! the next bind on that path fails with `AddrInUse`. Before binding, a
//! socket file nobody is listening on is removed. A live listener or a
//! non-socket file at the path is left alone and the bind reports the error.

use std::io;
use std::path::Path;

const IPC_SCHEME: &str = "ipc://";

/// Filesystem path of an `ipc://` endpoint, if it names one
pub fn ipc_path(endpoint: &str) -> Option<&Path> {
    let path = endpoint.strip_prefix(IPC_SCHEME)?;
    if path.is_empty() || path == "*" {
        return None;
    }
    Some(Path::new(path))
}

/// Remove the socket file of `endpoint` if no one is listening on it
///
/// Returns `true` when a stale file was removed.
#[cfg(unix)]
pub async fn remove_stale_socket(endpoint: &str) -> io::Result<bool> {
    use std::os::unix::fs::FileTypeExt;

    let Some(path) = ipc_path(endpoint) else {
        return Ok(false);
    };

    match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.file_type().is_socket() => {}
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    }

    match tokio::net::UnixStream::connect(path).await {
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
            tokio::fs::remove_file(path).await?;
            tracing::warn!(endpoint = %endpoint, "Removed stale bus socket");
            Ok(true)
        }
        Err(e) => Err(e),
    }
}

#[cfg(not(unix))]
pub async fn remove_stale_socket(_endpoint: &str) -> io::Result<bool> {
    Ok(false)
}
