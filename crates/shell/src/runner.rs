use crate::decode::{decode, encoding_for_label, DEFAULT_ENCODING_LABEL};
use crate::{Result, ShellError};
use async_trait::async_trait;
use encoding_rs::Encoding;
use std::process::Stdio;
use tokio::process::Command;

/// Anything that can run one administration command and hand back decoded text.
///
/// Services hold an `Arc<dyn Invoke>` so tests can swap the real process
/// runner for scripted output.
#[async_trait]
pub trait Invoke: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<String>;

    async fn run_str(&self, args: &[&str]) -> Result<String> {
        let owned: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
        self.run(&owned).await
    }
}

/// Spawns `<program> <prefix args...> <args...>` and captures stdout followed by stderr.
///
/// The two streams are captured separately, so the result is all of stdout
/// then all of stderr, not the order in which the tool wrote them. Extractors
/// skip diagnostic lines wherever they land.
///
/// No stdin, no streaming, no timeout: a hung tool hangs the call.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    prefix: Vec<String>,
    encoding: &'static Encoding,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix: Vec::new(),
            encoding: default_encoding(),
        }
    }

    /// `netsh dhcp server V4 ...`
    #[must_use]
    pub fn netsh_dhcp() -> Self {
        Self::new("netsh").with_prefix(["dhcp", "server", "V4"])
    }

    /// `dnscmd ...`
    #[must_use]
    pub fn dnscmd() -> Self {
        Self::new("dnscmd")
    }

    /// `powershell -nologo -noprofile ...`; the arguments form one pipeline.
    #[must_use]
    pub fn powershell() -> Self {
        Self::new("powershell").with_prefix(["-nologo", "-noprofile"])
    }

    #[must_use]
    pub fn with_prefix<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_encoding_label(self, label: &str) -> Result<Self> {
        let encoding = encoding_for_label(label)?;
        Ok(self.with_encoding(encoding))
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

#[async_trait]
impl Invoke for CommandRunner {
    async fn run(&self, args: &[String]) -> Result<String> {
        log::debug!("run: {} {} {}", self.program, self.prefix.join(" "), args.join(" "));

        let output = Command::new(&self.program)
            .args(&self.prefix)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ShellError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        let text = decode(&combined, self.encoding);

        if !output.status.success() {
            log::debug!("{} exited with {}", self.program, output.status);
            return Err(ShellError::exit(
                self.program.clone(),
                output.status.code(),
                &text,
            ));
        }

        Ok(text)
    }
}

fn default_encoding() -> &'static Encoding {
    encoding_for_label(DEFAULT_ENCODING_LABEL).unwrap_or(encoding_rs::UTF_8)
}
