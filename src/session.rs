use crate::backend::{Backend, BackendError};
use crate::draft::{DraftError, FlightDraft};
use crate::flight::{Flight, FlightId};
use crate::planner::{PlannerAction, PlannerState, reduce};
use crate::schedule::Schedule;
use crate::schedule::capacity::SpotAvailability;
use crate::schedule::projection::{ChartRow, chart_rows};
use crate::schedule::validator::{Accepted, Rejection};
use crate::time::DayWindow;
use chrono::NaiveDate;
use thiserror::Error;

/// Tags a fetch cycle. Responses carrying an older token than the latest
/// issued one are stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("no flight selected")]
    NothingSelected,
}

/// One operator's view of the planner: the current snapshot, the selected
/// day, the UI state and the form draft.
pub struct Session<B: Backend> {
    backend: B,
    issued: RequestToken,
    applied: Option<RequestToken>,
    offset_hours: i64,
    pub day: DayWindow,
    pub schedule: Schedule,
    pub state: PlannerState,
    pub draft: FlightDraft,
}

impl<B: Backend> Session<B> {
    /// Parking areas are fetched once here; flights on every refresh.
    pub fn open(backend: B, date: NaiveDate, offset_hours: i64) -> Result<Session<B>, BackendError> {
        let areas = backend.fetch_parking_areas()?;
        let mut session = Session {
            backend,
            issued: RequestToken(0),
            applied: None,
            offset_hours,
            day: DayWindow::new(date, offset_hours),
            schedule: Schedule::new(areas, vec![]),
            state: PlannerState::default(),
            draft: FlightDraft::default(),
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn dispatch(&mut self, action: PlannerAction) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    pub fn next_token(&mut self) -> RequestToken {
        self.issued = RequestToken(self.issued.0 + 1);
        self.issued
    }

    /// Installs fetched flights unless a newer fetch has already been applied.
    pub fn apply_flights(&mut self, token: RequestToken, flights: Vec<Flight>) -> bool {
        if self.applied.is_some_and(|applied| applied >= token) {
            tracing::warn!(?token, applied = ?self.applied, "dropping stale flight list");
            return false;
        }
        let areas = std::mem::take(&mut self.schedule.areas);
        self.schedule = Schedule::new(areas, flights);
        self.applied = Some(token);
        self.update_rows();
        true
    }

    pub fn refresh(&mut self) -> Result<(), BackendError> {
        let token = self.next_token();
        let flights = self.backend.fetch_flights()?;
        tracing::debug!(?token, flights = flights.len(), "fetched flights");
        self.apply_flights(token, flights);
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.day = DayWindow::new(date, self.offset_hours);
        self.update_rows();
    }

    pub fn rows(&self) -> Vec<ChartRow> {
        chart_rows(&self.schedule.project_day(self.day))
    }

    fn update_rows(&mut self) {
        let row_flights = self.rows().into_iter().map(|r| r.flight_id).collect();
        self.dispatch(PlannerAction::RowMapUpdate(Some(row_flights)));
    }

    /// Selects a chart row and loads its flight into the draft. Placeholder
    /// rows and flights that cannot be prefilled leave an empty draft.
    pub fn select_row(&mut self, row: usize) -> Option<&Flight> {
        self.dispatch(PlannerAction::RowIndexUpdate(Some(row)));
        let flight = self
            .state
            .row_flight(row)
            .and_then(|id| self.schedule.flight(id))
            .cloned();
        self.draft = flight
            .as_ref()
            .and_then(FlightDraft::from_flight)
            .unwrap_or_default();
        self.dispatch(PlannerAction::SelectedFlightUpdate(flight));
        self.state.selected_flight.as_ref()
    }

    pub fn clear(&mut self) {
        self.dispatch(PlannerAction::ClearSelectedFlight);
        self.draft = FlightDraft::default();
    }

    fn editing(&self) -> Option<FlightId> {
        self.state.selected_flight_id().cloned()
    }

    /// Free capacity per spot for the draft's window and footprint.
    pub fn availability(&self) -> Result<Vec<SpotAvailability>, DraftError> {
        let start = self.draft.start.ok_or(DraftError::MissingField("start"))?;
        let end = self.draft.end.ok_or(DraftError::MissingField("end"))?;
        let footprint = self.draft.footprint()?;
        let editing = self.editing();
        Ok(self
            .schedule
            .availability(&(start, end), footprint, editing.as_deref()))
    }

    pub fn check_draft(&self) -> Result<Accepted, SubmitError> {
        let candidate = self.draft.candidate()?;
        let editing = self.editing();
        Ok(self.schedule.validate(&candidate, editing.as_deref())?)
    }

    /// Validates the draft locally, sends it, then clears the form and
    /// refetches. The backend may still refuse a locally accepted draft.
    pub fn submit(&mut self) -> Result<Flight, SubmitError> {
        let accepted = self.check_draft()?;
        let flight = self.draft.to_flight(self.editing())?;
        tracing::info!(flight = %flight.id, remaining = accepted.remaining_sqm, "submitting flight");
        let stored = self.backend.submit_flight(flight)?;
        self.clear();
        self.refresh()?;
        Ok(stored)
    }

    pub fn delete(&mut self) -> Result<FlightId, SubmitError> {
        let id = self.editing().ok_or(SubmitError::NothingSelected)?;
        self.backend.delete_flight(&id)?;
        self.clear();
        self.refresh()?;
        Ok(id)
    }
}
