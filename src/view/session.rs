use tracing::{debug, warn};

use super::RenderedView;
use crate::error::Result;
use crate::highlight::Selection;

/// Identifies one run; only the newest ticket may publish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Published,
    Superseded,
}

/// The last published view and the selection made on it.
#[derive(Debug, Default)]
pub struct ViewSession {
    issued: u64,
    view: Option<RenderedView>,
    selection: Selection,
}

impl ViewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_run(&mut self) -> RunTicket {
        self.issued = self.issued.wrapping_add(1);
        RunTicket(self.issued)
    }

    /// Publishes `result` if `ticket` is the newest run. A failed newest run
    /// keeps the previous view and selection.
    pub fn complete(&mut self, ticket: RunTicket, result: Result<RenderedView>) -> Result<Outcome> {
        if ticket.0 != self.issued {
            debug!(ticket = ticket.0, newest = self.issued, "discarding superseded run");
            return Ok(Outcome::Superseded);
        }

        match result {
            Ok(view) => {
                self.view = Some(view);
                self.selection.invalidate();
                Ok(Outcome::Published)
            }
            Err(error) => {
                warn!("run failed, keeping previous view: {error}");
                Err(error)
            }
        }
    }

    pub fn view(&self) -> Option<&RenderedView> {
        self.view.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn click_node(&mut self, node_id: &str) {
        match &self.view {
            Some(view) => self.selection.click_node(&view.graph, node_id),
            None => self.selection.click_background(),
        }
    }

    pub fn click_background(&mut self) {
        self.selection.click_background();
    }
}

#[cfg(test)]
mod tests {
    use super::super::render;
    use super::super::tests::{request, scenario_source};
    use super::*;
    use crate::error::Error;
    use crate::network::{Attribute, FilterCriteria};

    fn acme() -> FilterCriteria {
        FilterCriteria::default().with(Attribute::Company, "Acme")
    }

    #[test]
    fn newest_run_publishes_and_resets_selection() {
        let source = scenario_source();
        let mut session = ViewSession::new();

        let ticket = session.begin_run();
        let outcome = session
            .complete(ticket, render(&source, &request(FilterCriteria::default())))
            .expect("published");
        assert_eq!(outcome, Outcome::Published);

        session.click_node("A");
        assert_eq!(session.selection().selected(), Some("A"));

        let ticket = session.begin_run();
        session
            .complete(ticket, render(&source, &request(acme())))
            .expect("published");
        assert_eq!(session.selection(), &Selection::Idle);
        assert_eq!(session.view().map(|view| view.graph.node_count()), Some(0));
    }

    #[test]
    fn stale_run_is_discarded() {
        let source = scenario_source();
        let mut session = ViewSession::new();

        let stale = session.begin_run();
        let fresh = session.begin_run();
        assert!(stale < fresh);

        let outcome = session
            .complete(fresh, render(&source, &request(FilterCriteria::default())))
            .expect("fresh");
        assert_eq!(outcome, Outcome::Published);

        let outcome = session
            .complete(stale, render(&source, &request(acme())))
            .expect("stale");
        assert_eq!(outcome, Outcome::Superseded);
        assert_eq!(session.view().map(|view| view.graph.node_count()), Some(3));
    }

    #[test]
    fn failed_run_keeps_previous_view_and_selection() {
        let source = scenario_source();
        let mut session = ViewSession::new();

        let ticket = session.begin_run();
        session
            .complete(ticket, render(&source, &request(FilterCriteria::default())))
            .expect("published");
        session.click_node("B");

        let mut missing_year = request(FilterCriteria::default());
        missing_year.year = 1901;
        let ticket = session.begin_run();
        let error = session
            .complete(ticket, render(&source, &missing_year))
            .expect_err("fetch fails");

        assert!(matches!(error, Error::FetchFailure { .. }));
        assert_eq!(session.view().map(|view| view.year), Some(1842));
        assert_eq!(session.selection().selected(), Some("B"));
    }

    #[test]
    fn clicks_without_a_view_stay_idle() {
        let mut session = ViewSession::new();
        session.click_node("A");
        assert_eq!(session.selection(), &Selection::Idle);
    }
}
