use anyhow::Result;
use console::style;

use super::args::AddArgs;
use super::load_registry;
use crate::config::{DevboxDefaults, Settings};
use crate::devbox::{DEFAULT_KUBECONFIG, Devbox, Runtime};
use crate::error::DevboxError;

pub fn run(settings: &Settings, args: &AddArgs) -> Result<()> {
    let devbox = build_devbox(args, &settings.defaults)?;
    let mut registry = load_registry(settings)?;
    registry.add(&args.id, devbox)?;

    println!("✓ Added devbox {}", style(&args.id).bold());
    println!("  active context is now {}", style(&args.id).bold());
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// Turn `devbox add` arguments into a definition, filling gaps from the
/// configured defaults.
fn build_devbox(args: &AddArgs, defaults: &DevboxDefaults) -> Result<Devbox, DevboxError> {
    let image = non_empty(&args.image)
        .or_else(|| defaults.image.clone())
        .ok_or_else(|| {
            DevboxError::validation(
                "an image is required: pass --image or set `image` in the config file",
            )
        })?;

    let runtime = match (non_empty(&args.kubeconfig), non_empty(&args.namespace)) {
        (kubeconfig, Some(namespace)) => Runtime::Cluster {
            kubeconfig: kubeconfig.unwrap_or_else(|| DEFAULT_KUBECONFIG.to_string()),
            namespace,
        },
        (Some(_), None) => {
            return Err(DevboxError::validation(
                "--kubeconfig requires --namespace",
            ));
        }
        (None, None) => Runtime::Local,
    };

    Ok(Devbox {
        name: non_empty(&args.name).unwrap_or_else(|| args.id.clone()),
        description: args.description.clone().unwrap_or_default(),
        image,
        shell: non_empty(&args.shell).unwrap_or_else(|| defaults.shell.clone()),
        user: non_empty(&args.user).or_else(|| defaults.user.clone()),
        runtime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(id: &str) -> AddArgs {
        AddArgs {
            id: id.to_string(),
            image: Some("ubuntu:24.04".to_string()),
            ..AddArgs::default()
        }
    }

    fn defaults() -> DevboxDefaults {
        DevboxDefaults {
            image: None,
            shell: "sh".to_string(),
            user: None,
        }
    }

    #[test]
    fn name_and_shell_default() {
        let devbox = build_devbox(&args("work"), &defaults()).unwrap();
        assert_eq!(devbox.name, "work");
        assert_eq!(devbox.shell, "sh");
        assert_eq!(devbox.user, None);
        assert_eq!(devbox.runtime, Runtime::Local);
    }

    #[test]
    fn image_falls_back_to_config() {
        let mut add = args("work");
        add.image = None;
        assert!(matches!(
            build_devbox(&add, &defaults()).unwrap_err(),
            DevboxError::Validation(_)
        ));

        let with_image = DevboxDefaults {
            image: Some("configured:1".to_string()),
            user: Some("me".to_string()),
            ..defaults()
        };
        let devbox = build_devbox(&add, &with_image).unwrap();
        assert_eq!(devbox.image, "configured:1");
        assert_eq!(devbox.user.as_deref(), Some("me"));
    }

    #[test]
    fn namespace_selects_cluster_mode() {
        let mut add = args("eks");
        add.namespace = Some("dev".to_string());
        let devbox = build_devbox(&add, &defaults()).unwrap();
        assert_eq!(
            devbox.runtime,
            Runtime::Cluster {
                kubeconfig: DEFAULT_KUBECONFIG.to_string(),
                namespace: "dev".to_string(),
            }
        );

        add.kubeconfig = Some("~/.kube/eks".to_string());
        let devbox = build_devbox(&add, &defaults()).unwrap();
        assert_eq!(devbox.runtime.kubeconfig(), Some("~/.kube/eks"));
    }

    #[test]
    fn kubeconfig_without_namespace_is_rejected() {
        let mut add = args("eks");
        add.kubeconfig = Some("~/.kube/eks".to_string());
        assert!(matches!(
            build_devbox(&add, &defaults()).unwrap_err(),
            DevboxError::Validation(_)
        ));
    }
}
