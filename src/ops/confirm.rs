use crossterm::event::KeyCode;

/// An open confirmation: the prompt text and the mutation waiting on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest<A> {
    pub message: String,
    pub pending: A,
}

/// Returned when a confirmation is requested while another is still open
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a confirmation is already open: {0}")]
pub struct GateBusy(pub String);

/// The outcome handed back to whoever opened the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<A> {
    pub pending: A,
    pub accepted: bool,
}

/// Holds at most one pending mutation until the user accepts or declines.
///
/// Resolving takes the request out of the gate, so each request yields
/// exactly one [`Resolved`] and any later accept/decline is a no-op.
#[derive(Debug)]
pub struct ConfirmGate<A> {
    open: Option<ConfirmRequest<A>>,
}

impl<A> Default for ConfirmGate<A> {
    fn default() -> Self {
        ConfirmGate { open: None }
    }
}

impl<A> ConfirmGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn request(&self) -> Option<&ConfirmRequest<A>> {
        self.open.as_ref()
    }

    pub fn open(&mut self, message: impl Into<String>, pending: A) -> Result<(), GateBusy> {
        if let Some(current) = &self.open {
            return Err(GateBusy(current.message.clone()));
        }
        self.open = Some(ConfirmRequest {
            message: message.into(),
            pending,
        });
        Ok(())
    }

    pub fn accept(&mut self) -> Option<Resolved<A>> {
        self.close(true)
    }

    pub fn decline(&mut self) -> Option<Resolved<A>> {
        self.close(false)
    }

    /// Enter/`y` accept, Escape/`n` decline; other keys leave the gate open
    pub fn resolve_key(&mut self, code: KeyCode) -> Option<Resolved<A>> {
        match code {
            KeyCode::Enter | KeyCode::Char('y') => self.accept(),
            KeyCode::Esc | KeyCode::Char('n') => self.decline(),
            _ => None,
        }
    }

    fn close(&mut self, accepted: bool) -> Option<Resolved<A>> {
        self.open.take().map(|req| Resolved {
            pending: req.pending,
            accepted,
        })
    }
}
