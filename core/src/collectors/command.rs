//! Subprocess and file helpers shared by the host collectors

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::CollectionError;

/// Run a command and return its stdout
///
/// The child is killed if the returned future is dropped, so a timed-out
/// collector does not leave processes behind.
pub(crate) async fn run(program: &str, args: &[&str]) -> Result<String, CollectionError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| CollectionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(CollectionError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Read a text file, typically under `/proc` or `/sys`
pub(crate) async fn read(path: impl AsRef<Path>) -> Result<String, CollectionError> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CollectionError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Run a probe, logging and discarding its error
pub(crate) fn optional<T>(probe: &'static str, result: Result<T, CollectionError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(probe, error = %e, "Probe unavailable");
            None
        }
    }
}

/// Count numeric entries in `/proc`
pub(crate) async fn count_proc_pids() -> Result<usize, CollectionError> {
    let path = Path::new("/proc");
    let mut entries = tokio::fs::read_dir(path)
        .await
        .map_err(|source| CollectionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut count = 0;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| CollectionError::Read {
            path: path.to_path_buf(),
            source,
        })?
    {
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.bytes().all(|b| b.is_ascii_digit()))
        {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = run("skyfetch-definitely-not-a-command", &[]).await.unwrap_err();
        assert!(matches!(err, CollectionError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let err = read("/nonexistent/skyfetch/file").await.unwrap_err();
        assert!(matches!(err, CollectionError::Read { .. }));
    }

    #[test]
    fn test_optional_discards_error() {
        let value: Option<u8> = optional("test", Err(CollectionError::Unsupported("test")));
        assert_eq!(value, None);
        assert_eq!(optional("test", Ok(3)), Some(3));
    }
}
