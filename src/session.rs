// src/session.rs
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::dossier::CustomerDossier;
use crate::query::{self, DuplicatePolicy, LocationSelection, RosterEntry, SegmentSelection};
use crate::table::CanonicalTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Location,
    Segment,
}

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// The source is absent or empty.
    NoData,
    Menu,
    ChooseState {
        options: Vec<String>,
    },
    ChooseUnit {
        state: String,
        options: Vec<String>,
    },
    ChooseSegment {
        state: Option<String>,
        unit: Option<String>,
        options: Vec<String>,
    },
    ChooseCustomer {
        segment: String,
        options: Vec<String>,
        /// Segment-first path only: every row of the segment.
        roster: Vec<RosterEntry>,
    },
    Customer(Box<CustomerDossier>),
}

/// Per-session context: the table the session reads plus its navigation
/// state. Nothing here is shared between sessions.
#[derive(Debug, Clone)]
pub struct Session {
    table: Arc<CanonicalTable>,
    pub view: Option<ViewMode>,
    pub location: LocationSelection,
    pub segment: SegmentSelection,
    pub duplicates: DuplicatePolicy,
}

impl Session {
    pub fn new(table: Arc<CanonicalTable>) -> Self {
        Self {
            table,
            view: None,
            location: LocationSelection::default(),
            segment: SegmentSelection::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn with_location(table: Arc<CanonicalTable>, selection: LocationSelection) -> Self {
        Self {
            view: Some(ViewMode::Location),
            location: selection.normalized(),
            ..Self::new(table)
        }
    }

    pub fn with_segment(table: Arc<CanonicalTable>, selection: SegmentSelection) -> Self {
        Self {
            view: Some(ViewMode::Segment),
            segment: selection.normalized(),
            ..Self::new(table)
        }
    }

    pub fn table(&self) -> &CanonicalTable {
        &self.table
    }

    pub fn choose_view(&mut self, view: ViewMode) {
        self.view = Some(view);
    }

    /// Back to the main menu; both paths start over.
    pub fn return_to_menu(&mut self) {
        self.view = None;
        self.location = LocationSelection::default();
        self.segment = SegmentSelection::default();
    }

    /// Resolve the current selection against the table. Levels that no
    /// longer exist in the table are dropped rather than reported as errors.
    pub fn step(&mut self) -> Step {
        if self.table.is_empty() {
            return Step::NoData;
        }
        match self.view {
            None => Step::Menu,
            Some(ViewMode::Location) => self.location_step(),
            Some(ViewMode::Segment) => self.segment_step(),
        }
    }

    fn location_step(&mut self) -> Step {
        let table = Arc::clone(&self.table);
        let sel = &mut self.location;

        let Some(state) = sel.state.clone() else {
            return Step::ChooseState {
                options: query::distinct_states(&table),
            };
        };
        let states = query::distinct_states(&table);
        if !states.contains(&state) {
            *sel = LocationSelection::default();
            return Step::ChooseState { options: states };
        }
        let units = query::distinct_units(&table, &state);

        let Some(unit) = sel.unit.clone().filter(|u| units.contains(u)) else {
            sel.unit = None;
            sel.segment = None;
            sel.customer = None;
            return Step::ChooseUnit {
                state,
                options: units,
            };
        };

        let segments = query::distinct_segments(&table, &state, &unit);
        let Some(segment) = sel.segment.clone().filter(|s| segments.contains(s)) else {
            sel.segment = None;
            sel.customer = None;
            return Step::ChooseSegment {
                state: Some(state),
                unit: Some(unit),
                options: segments,
            };
        };

        let customers = query::distinct_customers(&table, &state, &unit, &segment);
        if sel.customer.as_ref().map_or(true, |c| !customers.contains(c)) {
            sel.customer = None;
            return Step::ChooseCustomer {
                segment,
                options: customers,
                roster: Vec::new(),
            };
        }

        let filter = sel.filter();
        self.dossier_step(filter).unwrap_or(Step::ChooseCustomer {
            segment,
            options: customers,
            roster: Vec::new(),
        })
    }

    fn segment_step(&mut self) -> Step {
        let table = Arc::clone(&self.table);
        let sel = &mut self.segment;

        let segments = query::distinct_segments_global(&table);
        let Some(segment) = sel.segment.clone().filter(|s| segments.contains(s)) else {
            *sel = SegmentSelection::default();
            return Step::ChooseSegment {
                state: None,
                unit: None,
                options: segments,
            };
        };

        let customers = query::customers_in_segment(&table, &segment);
        if sel.customer.as_ref().map_or(true, |c| !customers.contains(c)) {
            sel.customer = None;
            return Step::ChooseCustomer {
                roster: query::segment_roster(&table, &segment),
                segment,
                options: customers,
            };
        }

        let filter = sel.filter();
        self.dossier_step(filter).unwrap_or_else(|| Step::ChooseCustomer {
            roster: query::segment_roster(&table, &segment),
            segment,
            options: customers,
        })
    }

    /// `None` only under `RequireUnique` with an ambiguous customer.
    fn dossier_step(&self, filter: query::RecordFilter) -> Option<Step> {
        CustomerDossier::lookup(&self.table, &filter, self.duplicates)
            .map(|d| Step::Customer(Box::new(d)))
    }
}
