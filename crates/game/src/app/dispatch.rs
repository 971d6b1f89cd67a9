use engine::{ArrivalHandler, ArrivalTrigger, LocationAction, TravelDestination};
use tracing::info;

/// Stands in for the expense/closet/notebook flows by logging them. Travel
/// triggers are queued so the loop can switch maps between ticks.
#[derive(Debug, Default)]
pub(crate) struct ActionDispatcher {
    pending_travel: Option<TravelDestination>,
    dispatched: usize,
}

impl ActionDispatcher {
    pub(crate) fn take_travel(&mut self) -> Option<TravelDestination> {
        self.pending_travel.take()
    }

    pub(crate) fn dispatched(&self) -> usize {
        self.dispatched
    }
}

impl ArrivalHandler for ActionDispatcher {
    fn on_arrival(&mut self, trigger: &ArrivalTrigger) {
        self.dispatched += 1;
        match &trigger.action {
            LocationAction::Expense { category } => {
                info!(location_id = %trigger.location_id, category = %category, "open_expense_flow");
            }
            LocationAction::Travel { destinations } => match destinations.first() {
                Some(destination) => {
                    info!(
                        location_id = %trigger.location_id,
                        to_map = %destination.map,
                        options = destinations.len(),
                        "travel_requested"
                    );
                    self.pending_travel = Some(destination.clone());
                }
                None => {
                    info!(location_id = %trigger.location_id, "travel_without_destinations");
                }
            },
            LocationAction::Closet => {
                info!(location_id = %trigger.location_id, "open_closet");
            }
            LocationAction::Notebook => {
                info!(location_id = %trigger.location_id, "open_notebook");
            }
        }
    }
}
