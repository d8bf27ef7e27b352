use crate::core::classifier::EscalationClassifier;
use crate::domain::model::{Classification, SlaSummary, Ticket, TicketEvaluation};
use crate::domain::ports::Clock;
use rayon::prelude::*;

pub struct SlaEngine<C: Clock> {
    classifier: EscalationClassifier,
    clock: C,
}

impl<C: Clock> SlaEngine<C> {
    pub fn with_clock(classifier: EscalationClassifier, clock: C) -> Self {
        Self { classifier, clock }
    }

    pub fn classifier(&self) -> &EscalationClassifier {
        &self.classifier
    }

    /// Closed tickets freeze at closure; open ones accrue against the clock.
    pub fn evaluate(&self, ticket: &Ticket) -> TicketEvaluation {
        let as_of = ticket.closed_at.unwrap_or_else(|| self.clock.now());
        let verdict = self
            .classifier
            .classify(ticket.created_at, as_of, &ticket.urgency);

        tracing::debug!(
            ticket = %ticket.id,
            elapsed_hours = verdict.elapsed_hours,
            classification = ?verdict.classification,
            "Evaluated ticket"
        );

        TicketEvaluation {
            ticket_id: ticket.id.clone(),
            urgency: ticket.urgency.clone(),
            closed: ticket.is_closed(),
            as_of,
            classification: verdict.classification,
            elapsed_hours: verdict.elapsed_hours,
        }
    }

    /// Output order follows input order.
    pub fn evaluate_all(&self, tickets: &[Ticket]) -> Vec<TicketEvaluation> {
        tickets.par_iter().map(|ticket| self.evaluate(ticket)).collect()
    }

    /// Per-ticket evaluations plus the dashboard totals.
    pub fn report(&self, tickets: &[Ticket]) -> (Vec<TicketEvaluation>, SlaSummary) {
        let evaluations = self.evaluate_all(tickets);
        let summary = summarize_evaluations(&evaluations);

        tracing::info!(
            "📊 {} tickets: {} on time, {} approaching, {} overdue, {} unknown",
            summary.total,
            summary.on_time,
            summary.approaching,
            summary.overdue,
            summary.unknown
        );
        (evaluations, summary)
    }

    pub fn summarize(&self, tickets: &[Ticket]) -> SlaSummary {
        self.report(tickets).1
    }
}

/// State buckets count open tickets only; closed ones feed the average close time.
pub fn summarize_evaluations(evaluations: &[TicketEvaluation]) -> SlaSummary {
    let mut summary = SlaSummary {
        total: evaluations.len(),
        ..Default::default()
    };
    let mut closed_hours = 0.0;

    for evaluation in evaluations {
        if evaluation.closed {
            summary.closed += 1;
            closed_hours += evaluation.elapsed_hours;
            continue;
        }

        summary.open += 1;
        match evaluation.classification {
            Classification::OnTime => summary.on_time += 1,
            Classification::Approaching => summary.approaching += 1,
            Classification::Overdue => summary.overdue += 1,
            Classification::Unknown => summary.unknown += 1,
        }
    }

    if summary.closed > 0 {
        summary.average_close_hours = Some(closed_hours / summary.closed as f64);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::{BusinessCalendar, CalendarZone};
    use crate::core::classifier::SlaPolicy;
    use crate::domain::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    fn engine_at(now: chrono::DateTime<Utc>) -> SlaEngine<FixedClock> {
        let classifier = EscalationClassifier::new(BusinessCalendar::default(), SlaPolicy::default())
            .with_zone("utc".parse::<CalendarZone>().unwrap());
        SlaEngine::with_clock(classifier, FixedClock(now))
    }

    fn ticket(id: &str, created: (u32, u32), closed: Option<(u32, u32)>, urgency: &str) -> Ticket {
        // 2024-03-04 是星期一
        let at = |(day, hour): (u32, u32)| Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap();
        Ticket {
            id: id.to_string(),
            created_at: at(created),
            closed_at: closed.map(at),
            urgency: urgency.to_string(),
        }
    }

    #[test]
    fn test_open_ticket_accrues_against_clock() {
        let engine = engine_at(Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap());
        let evaluation = engine.evaluate(&ticket("T-1", (4, 9), None, "Alta"));
        assert!(!evaluation.closed);
        assert_eq!(evaluation.elapsed_hours, 3.0);
        assert_eq!(evaluation.classification, Classification::OnTime);
    }

    #[test]
    fn test_closed_ticket_is_frozen_at_closure() {
        let engine = engine_at(Utc.with_ymd_and_hms(2024, 3, 29, 12, 0, 0).unwrap());
        let evaluation = engine.evaluate(&ticket("T-2", (4, 9), Some((4, 11)), "Alta"));
        assert!(evaluation.closed);
        assert_eq!(evaluation.elapsed_hours, 2.0);
        assert_eq!(evaluation.classification, Classification::OnTime);
    }

    #[test]
    fn test_summary_counts_and_average_close_time() {
        let engine = engine_at(Utc.with_ymd_and_hms(2024, 3, 8, 17, 0, 0).unwrap());
        let tickets = vec![
            ticket("T-1", (4, 9), Some((4, 11)), "Media"),
            ticket("T-2", (4, 9), Some((4, 13)), "Alta"),
            ticket("T-3", (4, 9), None, "Critica"),
            ticket("T-4", (8, 9), None, "Bassa"),
            ticket("T-5", (8, 9), None, "Sconosciuta"),
        ];

        let summary = engine.summarize(&tickets);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.open, 3);
        assert_eq!(summary.on_time, 1);
        assert_eq!(summary.approaching, 0);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.closed, 2);
        assert_eq!(summary.average_close_hours, Some(3.0));
    }

    #[test]
    fn test_closed_tickets_stay_out_of_state_buckets() {
        let engine = engine_at(Utc.with_ymd_and_hms(2024, 3, 29, 9, 30, 0).unwrap());
        let tickets = vec![
            ticket("T-1", (29, 9), None, "Media"),
            ticket("T-2", (4, 9), Some((4, 10)), "Media"),
        ];

        let summary = engine.summarize(&tickets);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.open, 1);
        assert_eq!(summary.on_time, 1);
        assert_eq!(summary.closed, 1);
        assert_eq!(summary.average_close_hours, Some(1.0));
        assert_eq!(summary.share(Classification::OnTime), 1.0);
    }

    #[test]
    fn test_summary_without_closed_tickets_has_no_average() {
        assert_eq!(summarize_evaluations(&[]).average_close_hours, None);
    }

    #[test]
    fn test_evaluate_all_keeps_input_order() {
        let engine = engine_at(Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap());
        let tickets: Vec<Ticket> = (0..50)
            .map(|i| ticket(&format!("T-{}", i), (4, 9), None, "Media"))
            .collect();
        let ids: Vec<String> = engine
            .evaluate_all(&tickets)
            .into_iter()
            .map(|e| e.ticket_id)
            .collect();
        let expected: Vec<String> = (0..50).map(|i| format!("T-{}", i)).collect();
        assert_eq!(ids, expected);
    }
}
