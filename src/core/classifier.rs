use crate::core::calendar::{BusinessCalendar, CalendarZone};
use crate::domain::model::{Classification, Urgency, Verdict};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative_hours, validate_strictly_less, Validate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Cut-points for one urgency, in working hours. Boundaries are inclusive on
/// the lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UrgencyThreshold {
    pub on_time_hours: Option<f64>,
    pub approaching_hours: f64,
}

impl UrgencyThreshold {
    pub const fn tiered(on_time_hours: f64, approaching_hours: f64) -> Self {
        Self {
            on_time_hours: Some(on_time_hours),
            approaching_hours,
        }
    }

    /// No on-time tier: the ticket is approaching from the moment it opens.
    pub const fn approaching_only(approaching_hours: f64) -> Self {
        Self {
            on_time_hours: None,
            approaching_hours,
        }
    }

    /// Builds a threshold from working days, using the calendar's day length.
    pub fn in_working_days(
        on_time_days: Option<f64>,
        approaching_days: f64,
        calendar: &BusinessCalendar,
    ) -> Self {
        let hours_per_day = calendar.hours_per_day();
        Self {
            on_time_hours: on_time_days.map(|days| days * hours_per_day),
            approaching_hours: approaching_days * hours_per_day,
        }
    }

    pub fn tier_for(&self, elapsed_hours: f64) -> Classification {
        if let Some(on_time) = self.on_time_hours {
            if elapsed_hours <= on_time {
                return Classification::OnTime;
            }
        }
        if elapsed_hours <= self.approaching_hours {
            Classification::Approaching
        } else {
            Classification::Overdue
        }
    }

    fn validate_as(&self, urgency: Urgency) -> Result<()> {
        let field = format!("thresholds.{}", urgency.as_str().to_lowercase());
        validate_non_negative_hours(&format!("{}.approaching_hours", field), self.approaching_hours)?;
        if let Some(on_time) = self.on_time_hours {
            validate_non_negative_hours(&format!("{}.on_time_hours", field), on_time)?;
            validate_strictly_less(&field, on_time, self.approaching_hours)?;
        }
        Ok(())
    }
}

/// Threshold table keyed by urgency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlaPolicy {
    thresholds: BTreeMap<Urgency, UrgencyThreshold>,
}

impl Default for SlaPolicy {
    // 一個工作天 = 9 小時 (08:30 - 17:30)
    fn default() -> Self {
        let thresholds = BTreeMap::from([
            (Urgency::Bassa, UrgencyThreshold::tiered(36.0, 63.0)),
            (Urgency::Media, UrgencyThreshold::tiered(18.0, 36.0)),
            (Urgency::Alta, UrgencyThreshold::tiered(9.0, 18.0)),
            (Urgency::Critica, UrgencyThreshold::approaching_only(8.0)),
        ]);
        Self { thresholds }
    }
}

impl SlaPolicy {
    pub fn empty() -> Self {
        Self {
            thresholds: BTreeMap::new(),
        }
    }

    pub fn with_threshold(mut self, urgency: Urgency, threshold: UrgencyThreshold) -> Self {
        self.thresholds.insert(urgency, threshold);
        self
    }

    pub fn set_threshold(&mut self, urgency: Urgency, threshold: UrgencyThreshold) {
        self.thresholds.insert(urgency, threshold);
    }

    pub fn threshold(&self, urgency: Urgency) -> Option<&UrgencyThreshold> {
        self.thresholds.get(&urgency)
    }
}

impl Validate for SlaPolicy {
    fn validate(&self) -> Result<()> {
        for (urgency, threshold) in &self.thresholds {
            threshold.validate_as(*urgency)?;
        }
        Ok(())
    }
}

/// Maps elapsed working time and an urgency label to an escalation state.
#[derive(Debug, Clone, Default)]
pub struct EscalationClassifier {
    calendar: BusinessCalendar,
    policy: SlaPolicy,
    zone: CalendarZone,
}

impl EscalationClassifier {
    pub fn new(calendar: BusinessCalendar, policy: SlaPolicy) -> Self {
        Self {
            calendar,
            policy,
            zone: CalendarZone::Local,
        }
    }

    pub fn with_zone(mut self, zone: CalendarZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn policy(&self) -> &SlaPolicy {
        &self.policy
    }

    pub fn zone(&self) -> CalendarZone {
        self.zone
    }

    /// `as_of` is the closure instant for closed tickets, now for open ones.
    pub fn classify(&self, created_at: DateTime<Utc>, as_of: DateTime<Utc>, urgency: &str) -> Verdict {
        let elapsed_hours = self.calendar.elapsed_in_zone(&self.zone, created_at, as_of);
        Verdict {
            classification: self.classify_hours(elapsed_hours, urgency),
            elapsed_hours,
        }
    }

    pub fn classify_hours(&self, elapsed_hours: f64, urgency: &str) -> Classification {
        let threshold = urgency
            .parse::<Urgency>()
            .ok()
            .and_then(|urgency| self.policy.threshold(urgency));

        match threshold {
            Some(threshold) => threshold.tier_for(elapsed_hours),
            None => {
                tracing::warn!(urgency, "⚠️ No SLA threshold for urgency label; classifying as unknown");
                Classification::Unknown
            }
        }
    }
}
