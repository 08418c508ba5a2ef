//! kubectl command lines for cluster devboxes.

use std::path::Path;

use super::{ExecMode, Invocation, Request};
use crate::devbox::Devbox;

pub(super) fn plan(
    kubeconfig: &Path,
    namespace: &str,
    devbox: &Devbox,
    request: Request<'_>,
) -> Invocation {
    // Every request is scoped to the devbox's cluster and namespace.
    let base = Invocation::new("kubectl")
        .arg("--kubeconfig")
        .arg(kubeconfig.display().to_string())
        .args(["--namespace", namespace]);
    let name = devbox.name.as_str();

    match request {
        Request::Start => base.args([
            "run",
            name,
            "--image",
            devbox.image.as_str(),
            "--restart=Never",
        ]),
        Request::Stop => base.args(["delete", "pod", name]),
        Request::Exec {
            command,
            mode: ExecMode::Interactive,
        } => base.args(["exec", "-it", name, "--", command]),
        Request::Exec {
            command,
            mode: ExecMode::Batch,
        } => base.args(["exec", name, "--", "sh", "-c", command]),
        Request::CopyIn { src, dst } => base
            .arg("cp")
            .arg(src.display().to_string())
            .arg(format!("{name}:{dst}")),
    }
}
