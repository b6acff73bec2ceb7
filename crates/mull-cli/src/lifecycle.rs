//! Bringing relays up and down.
//!
//! The [`Controller`] owns no state of its own: it drives the external
//! collaborators in a fixed order and writes one status line per relay it
//! changes. Every collaborator sits behind a trait so the sequencing can be
//! exercised without `wg-quick` or a terminal.

use std::io::Write;

use mull_shared::{is_relay_identifier, Action, RelayError, RelayRef};
use mull_store::Resolver;
use tracing::debug;

use crate::error::{CliError, Result};
use crate::output::{green, orange};

/// Exit status and combined stdout/stderr of one tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub code: i32,
    pub output: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Brings a relay's interface up or down.
pub trait ActivationTool {
    fn run(&self, action: Action, relay: &str) -> Result<ToolOutput>;
}

/// Raw status text for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub text: String,
    pub available: bool,
}

/// Reports which sessions exist and how they are doing.
pub trait SessionProbe {
    /// Active session identifiers, in the order the system reports them.
    fn active_sessions(&self) -> Result<Vec<String>>;

    fn status(&self, relay: &str) -> Result<SessionStatus>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentCheck {
    Idle,
    Detected,
    /// The process list could not be read.
    Inconclusive(String),
}

pub trait ProcessInspector {
    fn torrenting(&self) -> TorrentCheck;
}

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Resolving,
    PreChecking,
    Invoking,
    Succeeded,
    Failed,
}

/// Result of a deactivation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Teardown {
    /// Relays deactivated, in invocation order.
    Done(Vec<String>),
    /// The user declined the torrenting prompt; nothing was touched.
    Aborted,
}

pub struct Controller<'a> {
    tool: &'a dyn ActivationTool,
    probe: &'a dyn SessionProbe,
    inspector: &'a dyn ProcessInspector,
    confirm: &'a dyn Confirm,
    verbose: bool,
}

impl<'a> Controller<'a> {
    pub fn new(
        tool: &'a dyn ActivationTool,
        probe: &'a dyn SessionProbe,
        inspector: &'a dyn ProcessInspector,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            tool,
            probe,
            inspector,
            confirm,
            verbose: false,
        }
    }

    /// Surface the tool's raw output after each run.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Activate `target`, or the first favorite when nothing was given.
    pub fn activate(
        &self,
        resolver: &Resolver<'_>,
        target: &RelayRef,
        out: &mut dyn Write,
    ) -> Result<String> {
        let active = self.probe.active_sessions()?;
        if !active.is_empty() {
            return Err(CliError::AlreadyActive(active.join(", ")));
        }

        phase(Action::Up, Phase::Resolving);
        let relay = match resolver.resolve(target)? {
            Some(relay) => relay,
            None => resolver
                .favorites()
                .first()
                .map(str::to_string)
                .ok_or(CliError::NoRelaySpecified)?,
        };
        if !is_relay_identifier(&relay) {
            return Err(RelayError::InvalidFormat(relay).into());
        }

        self.invoke(Action::Up, &relay, out)?;
        Ok(relay)
    }

    /// Deactivate `target`, or every active session when nothing was given.
    pub fn deactivate(
        &self,
        resolver: &Resolver<'_>,
        target: &RelayRef,
        out: &mut dyn Write,
    ) -> Result<Teardown> {
        phase(Action::Down, Phase::Resolving);
        let targets = match resolver.resolve(target)? {
            Some(relay) => {
                if !is_relay_identifier(&relay) {
                    return Err(RelayError::InvalidFormat(relay).into());
                }
                vec![relay]
            }
            None => {
                let mut sessions = self.probe.active_sessions()?;
                if sessions.is_empty() {
                    return Err(CliError::NoActiveRelay);
                }
                sessions.reverse();
                sessions
            }
        };

        phase(Action::Down, Phase::PreChecking);
        let prompt = match self.inspector.torrenting() {
            TorrentCheck::Idle => None,
            TorrentCheck::Detected => {
                Some("Torrenting detected, are you sure you want to deactivate the relay? y/n ")
            }
            TorrentCheck::Inconclusive(reason) => {
                debug!(%reason, "torrent check inconclusive");
                Some("Could not check for torrenting activity, deactivate anyway? y/n ")
            }
        };
        if let Some(prompt) = prompt {
            if !self.confirm.confirm(&orange(prompt))? {
                writeln!(out, "Exiting...")?;
                return Ok(Teardown::Aborted);
            }
        }

        for relay in &targets {
            self.invoke(Action::Down, relay, out)?;
        }
        Ok(Teardown::Done(targets))
    }

    fn invoke(&self, action: Action, relay: &str, out: &mut dyn Write) -> Result<()> {
        phase(action, Phase::Invoking);
        let result = match self.tool.run(action, relay) {
            Ok(result) => result,
            Err(e) => {
                phase(action, Phase::Failed);
                return Err(e);
            }
        };

        if self.verbose && !result.output.is_empty() {
            writeln!(out, "{}", result.output.trim_end())?;
        }

        if !result.success() {
            phase(action, Phase::Failed);
            return Err(CliError::ActivationFailed {
                action,
                relay: relay.to_string(),
                code: result.code,
                output: result.output,
            });
        }

        phase(action, Phase::Succeeded);
        tracing::info!(%action, relay, "relay state changed");
        writeln!(out, "{}", green(&format!("{}: {relay}", action.past_tense())))?;
        Ok(())
    }
}

fn phase(action: Action, phase: Phase) {
    debug!(%action, ?phase, "lifecycle");
}
