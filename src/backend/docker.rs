//! Docker/Podman command lines for local devboxes.

use super::{ExecMode, Invocation, Request};
use crate::devbox::Devbox;

/// Open-file limit given to every local devbox.
const NOFILE_ULIMIT: &str = "nofile=90000:90000";

pub(super) fn plan(program: &str, devbox: &Devbox, request: Request<'_>) -> Invocation {
    let base = Invocation::new(program);
    let name = devbox.name.as_str();

    match request {
        // Detached, and removed by the engine once stopped.
        Request::Start => base.args([
            "run",
            "--detach",
            "--name",
            name,
            "--rm",
            "--ulimit",
            NOFILE_ULIMIT,
            devbox.image.as_str(),
        ]),
        Request::Stop => base.args(["stop", name]),
        Request::Exec {
            command,
            mode: ExecMode::Interactive,
        } => with_user(base.args(["exec", "-it"]), devbox).args([name, command]),
        Request::Exec {
            command,
            mode: ExecMode::Batch,
        } => with_user(base.arg("exec"), devbox).args([name, "sh", "-c", command]),
        Request::CopyIn { src, dst } => base
            .arg("cp")
            .arg(src.display().to_string())
            .arg(format!("{name}:{dst}")),
    }
}

fn with_user(invocation: Invocation, devbox: &Devbox) -> Invocation {
    match devbox.user.as_deref().filter(|u| !u.is_empty()) {
        Some(user) => invocation.args(["--user", user]),
        None => invocation,
    }
}
