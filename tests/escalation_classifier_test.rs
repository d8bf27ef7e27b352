use chrono::{DateTime, TimeZone, Utc};
use sla_engine::{
    BusinessCalendar, CalendarZone, Classification, EscalationClassifier, SlaPolicy, Urgency,
    UrgencyThreshold,
};

fn classifier() -> EscalationClassifier {
    EscalationClassifier::new(BusinessCalendar::default(), SlaPolicy::default())
        .with_zone("utc".parse::<CalendarZone>().unwrap())
}

// 2024-03-04 是星期一
fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
}

#[test]
fn test_default_thresholds_per_urgency() {
    let classifier = classifier();
    let cases = [
        ("Bassa", 36.0, Classification::OnTime),
        ("Bassa", 36.5, Classification::Approaching),
        ("Bassa", 63.0, Classification::Approaching),
        ("Bassa", 63.5, Classification::Overdue),
        ("Media", 18.0, Classification::OnTime),
        ("Media", 30.0, Classification::Approaching),
        ("Media", 40.0, Classification::Overdue),
        ("Alta", 9.0, Classification::OnTime),
        ("Alta", 18.0, Classification::Approaching),
        ("Alta", 18.25, Classification::Overdue),
        ("Critica", 0.0, Classification::Approaching),
        ("Critica", 12.0, Classification::Overdue),
    ];

    for (label, hours, expected) in cases {
        assert_eq!(
            classifier.classify_hours(hours, label),
            expected,
            "{} at {}h",
            label,
            hours
        );
    }
}

#[test]
fn test_boundary_stays_on_lower_tier() {
    let classifier = classifier();
    assert_eq!(classifier.classify_hours(36.0, "Media"), Classification::Approaching);
    assert_eq!(classifier.classify_hours(36.0001, "Media"), Classification::Overdue);
}

#[test]
fn test_critica_has_no_on_time_tier() {
    let classifier = classifier();
    assert_eq!(classifier.classify_hours(8.0, "Critica"), Classification::Approaching);
    assert_eq!(classifier.classify_hours(8.01, "Critica"), Classification::Overdue);
}

#[test]
fn test_labels_are_case_insensitive() {
    let classifier = classifier();
    for label in ["media", "MEDIA", "Media", " media "] {
        assert_eq!(classifier.classify_hours(1.0, label), Classification::OnTime);
    }
}

#[test]
fn test_unknown_label_still_reports_elapsed_hours() {
    let verdict = classifier().classify(at(4, 9, 0), at(4, 11, 30), "NotARealLabel");
    assert_eq!(verdict.classification, Classification::Unknown);
    assert_eq!(verdict.elapsed_hours, 2.5);
}

#[test]
fn test_zero_elapsed_is_on_time() {
    let classifier = classifier();
    for urgency in [Urgency::Bassa, Urgency::Media, Urgency::Alta] {
        let verdict = classifier.classify(at(4, 10, 0), at(4, 10, 0), urgency.as_str());
        assert_eq!(verdict.elapsed_hours, 0.0);
        assert_eq!(verdict.classification, Classification::OnTime);
    }
}

#[test]
fn test_classify_walks_the_calendar() {
    let classifier = classifier();
    // Friday 16:00 -> Monday 09:00 = 2h
    let verdict = classifier.classify(at(8, 16, 0), at(11, 9, 0), "Alta");
    assert_eq!(verdict.elapsed_hours, 2.0);
    assert_eq!(verdict.classification, Classification::OnTime);

    // Monday 09:00 -> Wednesday 10:00 = 8.5 + 9 + 1.5 = 19h
    let verdict = classifier.classify(at(4, 9, 0), at(6, 10, 0), "Alta");
    assert_eq!(verdict.elapsed_hours, 19.0);
    assert_eq!(verdict.classification, Classification::Overdue);
}

#[test]
fn test_office_zone_shifts_the_window() {
    let classifier = EscalationClassifier::new(BusinessCalendar::default(), SlaPolicy::default())
        .with_zone("+02:00".parse::<CalendarZone>().unwrap());
    // 06:30Z-07:30Z is 08:30-09:30 in the office
    let verdict = classifier.classify(at(4, 6, 30), at(4, 7, 30), "Media");
    assert_eq!(verdict.elapsed_hours, 1.0);
}

#[test]
fn test_around_the_clock_fixture_with_custom_policy() {
    let policy = SlaPolicy::empty()
        .with_threshold(Urgency::Critica, UrgencyThreshold::approaching_only(8.0));
    let classifier = EscalationClassifier::new(BusinessCalendar::around_the_clock(), policy)
        .with_zone("utc".parse::<CalendarZone>().unwrap());

    // Saturday night counts on a 24/7 calendar
    let verdict = classifier.classify(at(9, 20, 0), at(10, 4, 0), "Critica");
    assert_eq!(verdict.elapsed_hours, 8.0);
    assert_eq!(verdict.classification, Classification::Approaching);

    assert_eq!(classifier.classify_hours(1.0, "Alta"), Classification::Unknown);
}
