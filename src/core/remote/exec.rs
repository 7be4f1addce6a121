//! Bounded-time execution of remote CLI calls.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tracing::trace;

/// Run `program` with `args`, feeding `stdin` if given.
///
/// Returns `Ok(None)` if the call did not finish within `timeout`; the child
/// is killed in that case.
pub(crate) fn run(
    program: &Path,
    args: &[&str],
    stdin: Option<&[u8]>,
    timeout: Duration,
) -> std::io::Result<Option<Output>> {
    trace!(program = %program.display(), ?args, timeout_secs = timeout.as_secs(), "exec");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;

        let work = async move {
            if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
                pipe.write_all(input).await?;
                pipe.shutdown().await?;
            }
            child.wait_with_output().await
        };

        match tokio::time::timeout(timeout, work).await {
            Ok(output) => output.map(Some),
            Err(_) => Ok(None),
        }
    })
}
