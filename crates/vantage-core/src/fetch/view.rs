//! Per-widget display state.

use crate::error::CoreError;
use crate::fetch::generation::{Generation, Ticket};

/// What a widget should show right now. The variants are mutually
/// exclusive; `Error` still exposes the last good data so a frontend may
/// keep it on screen beneath the message.
#[derive(Debug, PartialEq)]
pub enum Display<'a, T> {
    /// Nothing requested yet.
    Idle,
    /// A request is outstanding.
    Loading,
    /// The latest request failed.
    Error {
        message: &'a str,
        stale: Option<&'a T>,
    },
    /// The latest request succeeded.
    Ready(&'a T),
}

/// Loading flag, error message and last good data for one widget.
#[derive(Debug, Clone)]
pub struct WidgetView<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for WidgetView<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> WidgetView<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn display(&self) -> Display<'_, T> {
        if self.loading {
            return Display::Loading;
        }
        if let Some(message) = &self.error {
            return Display::Error {
                message: message.as_str(),
                stale: self.data.as_ref(),
            };
        }
        match &self.data {
            Some(data) => Display::Ready(data),
            None => Display::Idle,
        }
    }

    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn succeed(&mut self, data: T) {
        self.loading = false;
        self.error = None;
        self.data = Some(data);
    }

    /// Previous data stays in place.
    fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

/// A [`WidgetView`] guarded by a [`Generation`].
///
/// Each request calls [`begin`](Self::begin) and hands the ticket to its
/// task; the result is committed through [`finish`](Self::finish), which
/// drops anything but the latest request's response.
#[derive(Debug, Clone)]
pub struct WidgetSlot<T> {
    generation: Generation,
    view: WidgetView<T>,
}

impl<T> Default for WidgetSlot<T> {
    fn default() -> Self {
        Self {
            generation: Generation::new(),
            view: WidgetView::default(),
        }
    }
}

impl<T> WidgetSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &WidgetView<T> {
        &self.view
    }

    pub fn display(&self) -> Display<'_, T> {
        self.view.display()
    }

    /// Local edits to committed data, such as revealing another page.
    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.view.data_mut()
    }

    /// Shared handle to the generation counter, for spawned tasks.
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Enters the loading state and issues a ticket for a new request.
    pub fn begin(&mut self) -> Ticket {
        self.view.start();
        self.generation.issue()
    }

    /// Commits `result` if `ticket` is still current.
    ///
    /// Returns `false` (and changes nothing) for a superseded ticket.
    pub fn finish(&mut self, ticket: Ticket, result: Result<T, CoreError>) -> bool {
        self.finish_with(ticket, result, CoreError::user_message)
    }

    /// Like [`finish`](Self::finish) but lets the provider phrase the
    /// error message.
    pub fn finish_with(
        &mut self,
        ticket: Ticket,
        result: Result<T, CoreError>,
        describe: impl FnOnce(&CoreError) -> String,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding stale response for ticket {}", ticket.value());
            return false;
        }
        match result {
            Ok(data) => self.view.succeed(data),
            Err(e) => {
                tracing::error!("Widget request failed: {e}");
                self.view.fail(describe(&e));
            }
        }
        true
    }

    /// Records a validation failure without issuing a request.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.generation.invalidate();
        self.view.fail(message.into());
    }

    /// Clears everything, superseding outstanding requests.
    pub fn reset(&mut self) {
        self.generation.invalidate();
        self.view = WidgetView::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_error() -> CoreError {
        CoreError::Transport("connection reset".to_string())
    }

    // --- display states ---

    #[test]
    fn new_slot_is_idle() {
        let slot: WidgetSlot<u32> = WidgetSlot::new();
        assert_eq!(slot.display(), Display::Idle);
    }

    #[test]
    fn begin_enters_loading() {
        let mut slot: WidgetSlot<u32> = WidgetSlot::new();
        slot.begin();
        assert_eq!(slot.display(), Display::Loading);
    }

    #[test]
    fn success_shows_data() {
        let mut slot = WidgetSlot::new();
        let ticket = slot.begin();
        assert!(slot.finish(ticket, Ok(7)));
        assert_eq!(slot.display(), Display::Ready(&7));
    }

    #[test]
    fn first_fetch_error_has_no_stale_data() {
        let mut slot: WidgetSlot<u32> = WidgetSlot::new();
        let ticket = slot.begin();
        slot.finish(ticket, Err(transport_error()));
        assert!(matches!(
            slot.display(),
            Display::Error { stale: None, .. }
        ));
        assert!(!slot.view().is_loading());
    }

    #[test]
    fn later_error_keeps_previous_data() {
        let mut slot = WidgetSlot::new();
        let t1 = slot.begin();
        slot.finish(t1, Ok(1));
        let t2 = slot.begin();
        slot.finish(t2, Err(transport_error()));
        assert_eq!(slot.view().data(), Some(&1));
        assert!(matches!(
            slot.display(),
            Display::Error { stale: Some(&1), .. }
        ));
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut slot: WidgetSlot<u32> = WidgetSlot::new();
        let t1 = slot.begin();
        slot.finish(t1, Err(transport_error()));
        slot.begin();
        assert!(slot.view().error().is_none());
    }

    #[test]
    fn finish_with_uses_custom_message() {
        let mut slot: WidgetSlot<u32> = WidgetSlot::new();
        let ticket = slot.begin();
        slot.finish_with(ticket, Err(transport_error()), |_| "custom".to_string());
        assert_eq!(slot.view().error(), Some("custom"));
    }

    // --- stale-response discard ---

    #[test]
    fn late_first_response_does_not_overwrite_second() {
        let mut slot = WidgetSlot::new();
        let r1 = slot.begin();
        let r2 = slot.begin();
        assert!(slot.finish(r2, Ok("second")));
        assert!(!slot.finish(r1, Ok("first")));
        assert_eq!(slot.display(), Display::Ready(&"second"));
    }

    #[test]
    fn stale_response_while_loading_keeps_loading() {
        let mut slot = WidgetSlot::new();
        let r1 = slot.begin();
        let _r2 = slot.begin();
        assert!(!slot.finish(r1, Ok(1)));
        assert_eq!(slot.display(), Display::Loading);
    }

    #[test]
    fn stale_error_is_discarded() {
        let mut slot = WidgetSlot::new();
        let r1 = slot.begin();
        let r2 = slot.begin();
        slot.finish(r2, Ok(2));
        assert!(!slot.finish(r1, Err(transport_error())));
        assert_eq!(slot.display(), Display::Ready(&2));
    }

    // --- reject / reset ---

    #[test]
    fn reject_sets_error_and_supersedes_inflight() {
        let mut slot = WidgetSlot::new();
        let inflight = slot.begin();
        slot.reject("Invalid GitHub repository URL");
        assert!(!slot.finish(inflight, Ok(1)));
        assert_eq!(slot.view().error(), Some("Invalid GitHub repository URL"));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut slot = WidgetSlot::new();
        let ticket = slot.begin();
        slot.finish(ticket, Ok(1));
        slot.reset();
        assert_eq!(slot.display(), Display::Idle);
    }

    #[test]
    fn data_mut_edits_committed_data() {
        let mut slot = WidgetSlot::new();
        assert!(slot.data_mut().is_none());
        let ticket = slot.begin();
        slot.finish(ticket, Ok(1));
        if let Some(n) = slot.data_mut() {
            *n += 1;
        }
        assert_eq!(slot.display(), Display::Ready(&2));
    }
}
