//! Drives a root container against a terminal.

use std::rc::Rc;

use tracing::{debug, info, trace, warn};

use crate::config::EnvConfig;
use crate::core::input::InputToken;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::{InputSource, Terminal};
use crate::error::Result;
use crate::runtime::registry::IdRegistry;
use crate::widgets::base::Widget;
use crate::widgets::Container;

/// Owns the terminal, the root container and the id registry of one application.
///
/// Input is handled on the calling thread: each token is dispatched to the root and the
/// layout is printed again when anything consumed it.
pub struct Session<T: Terminal + InputSource> {
    terminal: T,
    root: Container,
    registry: Rc<IdRegistry>,
    config: EnvConfig,
    running: bool,
}

impl<T: Terminal + InputSource> Session<T> {
    pub fn new(terminal: T, root: Container, config: EnvConfig) -> Self {
        Self {
            terminal,
            root,
            registry: IdRegistry::new(),
            config,
            running: false,
        }
    }

    /// Use an existing registry, e.g. one the root's widgets were registered with.
    pub fn with_registry(mut self, registry: Rc<IdRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Rc<IdRegistry> {
        &self.registry
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Container {
        &mut self.root
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Find a widget anywhere under the root by id.
    pub fn find(&self, id: &str) -> Option<&dyn Widget> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut dyn Widget> {
        self.root.find_mut(id)
    }

    /// Enter raw mode and switch on the screen modes the config allows.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            return Ok(());
        }
        self.running = true;
        self.terminal.start()?;

        let mut gate = OutputGate::new();
        if !self.config.no_alt_buffer {
            gate.push(TerminalCmd::AltBufferEnter);
        }
        gate.push(TerminalCmd::HideCursor);
        if !self.config.no_mouse {
            gate.push(TerminalCmd::MouseReportingEnable);
        }
        gate.flush(&mut self.terminal)?;
        info!(size = ?self.terminal.size(), "session started");
        Ok(())
    }

    /// Undo [`start`](Self::start). Safe to call more than once.
    pub fn stop(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        self.running = false;

        let mut gate = OutputGate::new();
        if !self.config.no_mouse {
            gate.push(TerminalCmd::MouseReportingDisable);
        }
        gate.push(TerminalCmd::ShowCursor);
        if !self.config.no_alt_buffer {
            gate.push(TerminalCmd::AltBufferLeave);
        }
        gate.flush(&mut self.terminal)?;
        self.terminal.stop()?;
        info!("session stopped");
        Ok(())
    }

    pub fn print(&mut self) -> Result<()> {
        self.root.print(&mut self.terminal)
    }

    /// Route one token to the root. Keys go to bindings first, then to `handle_key`.
    /// Returns whether anything consumed the token.
    pub fn dispatch(&mut self, token: &InputToken) -> Result<bool> {
        let handled = match token {
            InputToken::Key(key) => self.root.execute_binding(key) || self.root.handle_key(key),
            InputToken::Mouse(event) => self.root.handle_mouse(event, None),
            InputToken::Resize(size) => {
                self.root.handle_resize(*size)?;
                true
            }
        };
        trace!(?token, handled, "dispatched token");
        Ok(handled)
    }

    /// Start, print, then dispatch tokens until input ends or `should_stop` accepts one.
    /// The terminal is restored before returning, including on error.
    pub fn run(&mut self, mut should_stop: impl FnMut(&InputToken) -> bool) -> Result<()> {
        self.start()?;
        let outcome = self.event_loop(&mut should_stop);
        let stopped = self.stop();
        outcome.and(stopped)
    }

    fn event_loop(&mut self, should_stop: &mut impl FnMut(&InputToken) -> bool) -> Result<()> {
        self.print()?;
        while let Some(token) = self.terminal.next_token()? {
            if should_stop(&token) {
                debug!(?token, "stop requested");
                break;
            }
            let redraw = matches!(token, InputToken::Resize(_));
            if self.dispatch(&token)? || redraw {
                self.print()?;
            }
        }
        Ok(())
    }
}

impl<T: Terminal + InputSource> Drop for Session<T> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(%err, "failed to restore terminal");
        }
    }
}
