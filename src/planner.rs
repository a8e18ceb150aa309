use crate::flight::{Flight, FlightId};

/// What the operator is looking at: which flight each chart row shows, the
/// selected row and the flight loaded into the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerState {
    pub row_flights: Option<Vec<Option<FlightId>>>,
    pub selected_row: Option<usize>,
    pub selected_flight: Option<Flight>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerAction {
    RowMapUpdate(Option<Vec<Option<FlightId>>>),
    RowIndexUpdate(Option<usize>),
    SelectedFlightUpdate(Option<Flight>),
    ClearSelectedFlight,
}

impl PlannerState {
    pub fn selected_flight_id(&self) -> Option<&FlightId> {
        self.selected_flight.as_ref().map(|f| &f.id)
    }

    /// Flight shown on `row`, if the row holds one.
    pub fn row_flight(&self, row: usize) -> Option<&FlightId> {
        self.row_flights
            .as_ref()
            .and_then(|rows| rows.get(row))
            .and_then(|f| f.as_ref())
    }
}

pub fn reduce(state: PlannerState, action: PlannerAction) -> PlannerState {
    match action {
        // a new row layout invalidates the selected row
        PlannerAction::RowMapUpdate(row_flights) => PlannerState {
            row_flights,
            selected_row: None,
            ..state
        },
        PlannerAction::RowIndexUpdate(selected_row) => PlannerState {
            selected_row,
            ..state
        },
        PlannerAction::SelectedFlightUpdate(selected_flight) => PlannerState {
            selected_flight,
            ..state
        },
        PlannerAction::ClearSelectedFlight => PlannerState {
            selected_row: None,
            selected_flight: None,
            ..state
        },
    }
}
