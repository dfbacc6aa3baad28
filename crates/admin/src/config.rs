use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use winops_shell::{CommandRunner, DEFAULT_ENCODING_LABEL};
use winops_tabular::ParserLimits;

/// Effective configuration of every service; each section and field falls
/// back to its default when missing from the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub shell: ShellConfig,
    pub dhcp: ToolConfig,
    pub dns: DnsConfig,
    pub svn: ToolConfig,
    pub parser: ParserLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// WHATWG label of the console output encoding.
    pub encoding: String,
    pub powershell: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING_LABEL.to_string(),
            powershell: "powershell".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub enabled: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    pub enabled: bool,
    pub zones: Vec<String>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            zones: Vec::new(),
        }
    }
}

impl AdminConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            AdminError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|err| AdminError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| AdminError::Config(err.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        winops_shell::encoding_for_label(&self.shell.encoding)
            .map_err(|err| AdminError::Config(err.to_string()))?;
        if self.shell.powershell.trim().is_empty() {
            return Err(AdminError::Config("shell.powershell is empty".to_string()));
        }
        Ok(())
    }

    /// Applies the configured output encoding to `runner`.
    pub fn runner(&self, runner: CommandRunner) -> Result<CommandRunner> {
        Ok(runner.with_encoding_label(&self.shell.encoding)?)
    }

    pub fn powershell(&self) -> Result<CommandRunner> {
        self.runner(CommandRunner::powershell().with_program(self.shell.powershell.as_str()))
    }
}
