use log::{debug, info};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use crate::lib::error::{Result, SourceError};

/// Where a snapshot document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// JSON or YAML file produced by `kubectl get pods,pvc -o json`
    File(PathBuf),
    /// Live namespace, written as `@namespace`
    Namespace(String),
}

impl Source {
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix('@') {
            Some(namespace) => Source::Namespace(namespace.to_string()),
            None => Source::File(PathBuf::from(text)),
        }
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Source::parse(s))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Namespace(namespace) => write!(f, "@{}", namespace),
        }
    }
}

/// Reads snapshot documents from files or through `kubectl`
#[derive(Debug, Clone)]
pub struct Loader {
    kubectl: String,
}

impl Loader {
    pub fn new(kubectl: impl Into<String>) -> Self {
        Self {
            kubectl: kubectl.into(),
        }
    }

    /// Fetch and parse one snapshot document
    pub fn load(&self, source: &Source) -> Result<Value> {
        info!("Reading snapshot from {}", source);
        match source {
            Source::File(path) => self.load_file(path),
            Source::Namespace(namespace) => self.load_namespace(namespace),
        }
    }

    fn load_file(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|source| SourceError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        debug!(
            "Parsing {} bytes from {} as {}",
            content.len(),
            path.display(),
            if is_yaml { "YAML" } else { "JSON" }
        );

        if is_yaml {
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    fn load_namespace(&self, namespace: &str) -> Result<Value> {
        let args = ["get", "pods,pvc", "-n", namespace, "-o", "json"];
        let command = format!("{} {}", self.kubectl, args.join(" "));
        debug!("Running `{}`", command);

        let output = Command::new(&self.kubectl)
            .args(args)
            .output()
            .map_err(|source| SourceError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                command,
                code: output
                    .status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let content =
            String::from_utf8(output.stdout).map_err(|_| SourceError::InvalidOutput(command))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::error::KubestatError;
    use std::io::Write;

    #[test]
    fn test_source_parse() {
        assert_eq!(Source::parse("@kube-system"), Source::Namespace("kube-system".to_string()));
        assert_eq!(Source::parse("pods.json"), Source::File(PathBuf::from("pods.json")));
        assert_eq!(Source::parse("@prod").to_string(), "@prod");
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"apiVersion": "v1", "items": []}}"#).unwrap();

        let doc = Loader::new("kubectl")
            .load(&Source::File(file.path().to_path_buf()))
            .unwrap();
        assert_eq!(doc["apiVersion"], "v1");
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "apiVersion: v1\nitems:\n  - kind: Pod").unwrap();

        let doc = Loader::new("kubectl")
            .load(&Source::File(file.path().to_path_buf()))
            .unwrap();
        assert_eq!(doc["items"][0]["kind"], "Pod");
    }

    #[test]
    fn test_missing_file() {
        let err = Loader::new("kubectl")
            .load(&Source::parse("/nonexistent/kubestat/pods.json"))
            .unwrap_err();
        assert!(matches!(
            err,
            KubestatError::Source(SourceError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_missing_command() {
        let err = Loader::new("kubestat-no-such-kubectl")
            .load(&Source::parse("@default"))
            .unwrap_err();
        assert!(matches!(
            err,
            KubestatError::Source(SourceError::SpawnFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let err = Loader::new("false").load(&Source::parse("@default")).unwrap_err();
        match err {
            KubestatError::Source(SourceError::CommandFailed { command, code, .. }) => {
                assert_eq!(command, "false get pods,pvc -n default -o json");
                assert_eq!(code, "1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
