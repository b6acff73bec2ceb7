//! Collaborators backed by the host system: `wg-quick`, `wg`, `ps` and the
//! terminal.

use std::io::{self, BufRead, Write};
use std::process::{Command, Output};

use mull_shared::Action;
use tracing::{debug, warn};

use crate::error::{CliError, Result};
use crate::lifecycle::{
    ActivationTool, Confirm, ProcessInspector, SessionProbe, SessionStatus, ToolOutput,
    TorrentCheck,
};

/// Build a command for `program`, prefixed with `sudo` when asked.
fn command(sudo: bool, program: &str) -> Command {
    if sudo {
        let mut cmd = Command::new("sudo");
        cmd.arg(program);
        cmd
    } else {
        Command::new(program)
    }
}

fn spawn(mut cmd: Command) -> Result<Output> {
    debug!(command = ?cmd, "spawning");
    cmd.output()
        .map_err(|e| CliError::ExternalTool(format!("{:?}: {e}", cmd.get_program())))
}

/// stdout followed by stderr.
fn combined(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

pub struct WgQuick {
    sudo: bool,
}

impl WgQuick {
    pub fn new(sudo: bool) -> Self {
        Self { sudo }
    }
}

impl ActivationTool for WgQuick {
    fn run(&self, action: Action, relay: &str) -> Result<ToolOutput> {
        let mut cmd = command(self.sudo, "wg-quick");
        cmd.arg(action.as_str()).arg(relay);
        let output = spawn(cmd)?;

        let code = output.status.code().ok_or_else(|| {
            CliError::ExternalTool(format!("wg-quick {action} {relay} was terminated by a signal"))
        })?;
        Ok(ToolOutput {
            code,
            output: combined(&output),
        })
    }
}

pub struct WgProbe {
    sudo: bool,
}

impl WgProbe {
    pub fn new(sudo: bool) -> Self {
        Self { sudo }
    }
}

impl SessionProbe for WgProbe {
    fn active_sessions(&self) -> Result<Vec<String>> {
        let mut cmd = command(self.sudo, "wg");
        cmd.args(["show", "interfaces"]);
        let output = spawn(cmd)?;
        if !output.status.success() {
            return Err(CliError::ExternalTool(format!(
                "wg show interfaces failed: {}",
                combined(&output).trim()
            )));
        }
        Ok(parse_interfaces(&String::from_utf8_lossy(&output.stdout)))
    }

    fn status(&self, relay: &str) -> Result<SessionStatus> {
        let mut cmd = command(self.sudo, "wg");
        cmd.args(["show", relay]);
        let output = spawn(cmd)?;
        let available = output.status.success() && !output.stdout.is_empty();
        Ok(SessionStatus {
            text: combined(&output),
            available,
        })
    }
}

fn parse_interfaces(stdout: &str) -> Vec<String> {
    stdout.split_whitespace().map(str::to_string).collect()
}

/// Looks for known torrent clients in `ps aux`.
pub struct PsInspector {
    clients: Vec<String>,
}

impl PsInspector {
    pub fn new(clients: Vec<String>) -> Self {
        Self { clients }
    }
}

impl ProcessInspector for PsInspector {
    fn torrenting(&self) -> TorrentCheck {
        let output = match Command::new("ps").arg("aux").output() {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                return TorrentCheck::Inconclusive(format!("ps exited with {}", output.status))
            }
            Err(e) => return TorrentCheck::Inconclusive(e.to_string()),
        };

        let listing = String::from_utf8_lossy(&output.stdout);
        match find_client(&listing, &self.clients) {
            Some(client) => {
                warn!(client, "torrent client running");
                TorrentCheck::Detected
            }
            None => TorrentCheck::Idle,
        }
    }
}

/// First configured client whose name appears in the process listing.
fn find_client<'a>(listing: &str, clients: &'a [String]) -> Option<&'a str> {
    let listing = listing.to_lowercase();
    clients
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .find(|c| listing.contains(&c.to_lowercase()))
}

/// Prompts on stdout and reads the answer from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(is_yes(&line))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
