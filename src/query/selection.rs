use serde::{Deserialize, Serialize};

use super::RecordFilter;

/// Transient drill-down state for the state → unit → segment → customer path.
/// A level only counts once every earlier level is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSelection {
    pub state: Option<String>,
    pub unit: Option<String>,
    pub segment: Option<String>,
    pub customer: Option<String>,
}

impl LocationSelection {
    /// Drop any level whose predecessors are not chosen.
    pub fn normalized(mut self) -> Self {
        if self.state.is_none() {
            self.unit = None;
        }
        if self.unit.is_none() {
            self.segment = None;
        }
        if self.segment.is_none() {
            self.customer = None;
        }
        self
    }

    pub fn select_state(&mut self, state: impl Into<String>) {
        *self = Self {
            state: Some(state.into()),
            ..Self::default()
        };
    }

    pub fn select_unit(&mut self, unit: impl Into<String>) {
        if self.state.is_some() {
            self.unit = Some(unit.into());
            self.segment = None;
            self.customer = None;
        }
    }

    pub fn select_segment(&mut self, segment: impl Into<String>) {
        if self.unit.is_some() {
            self.segment = Some(segment.into());
            self.customer = None;
        }
    }

    pub fn select_customer(&mut self, customer: impl Into<String>) {
        if self.segment.is_some() {
            self.customer = Some(customer.into());
        }
    }

    /// Clear the deepest chosen level.
    pub fn back(&mut self) {
        if self.customer.take().is_some() {
            return;
        }
        if self.segment.take().is_some() {
            return;
        }
        if self.unit.take().is_some() {
            return;
        }
        self.state = None;
    }

    pub fn filter(&self) -> RecordFilter {
        let s = self.clone().normalized();
        RecordFilter {
            state: s.state,
            unit: s.unit,
            segment: s.segment,
            customer: s.customer,
        }
    }
}

/// Drill-down state for the segment → customer path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSelection {
    pub segment: Option<String>,
    pub customer: Option<String>,
}

impl SegmentSelection {
    pub fn normalized(mut self) -> Self {
        if self.segment.is_none() {
            self.customer = None;
        }
        self
    }

    pub fn select_segment(&mut self, segment: impl Into<String>) {
        self.segment = Some(segment.into());
        self.customer = None;
    }

    pub fn select_customer(&mut self, customer: impl Into<String>) {
        if self.segment.is_some() {
            self.customer = Some(customer.into());
        }
    }

    pub fn back(&mut self) {
        if self.customer.take().is_none() {
            self.segment = None;
        }
    }

    pub fn filter(&self) -> RecordFilter {
        let s = self.clone().normalized();
        RecordFilter {
            segment: s.segment,
            customer: s.customer,
            ..RecordFilter::default()
        }
    }
}
