use crate::utils::error::{Result, SlaError};
use crate::utils::validation::Validate;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc, Weekday,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: u32 = 24 * 60;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

pub const DEFAULT_WORKDAY_START: ClockTime = ClockTime::from_hm(8, 30);
pub const DEFAULT_WORKDAY_END: ClockTime = ClockTime::from_hm(17, 30);

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Offset from local midnight, minute precision. `24:00` is valid and means the
/// following midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    /// Panics at compile time when used in a const with an out-of-range value.
    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        assert!(minutes < 60 && hours * 60 + minutes <= MINUTES_PER_DAY);
        ClockTime(hours * 60 + minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }

    /// Wall-clock instant of this offset on `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + self.as_duration()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = SlaError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| SlaError::InvalidConfigValueError {
            field: "clock_time".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| invalid("Expected HH:MM"))?;
        let hours: u32 = hours.parse().map_err(|_| invalid("Hours are not a number"))?;
        let minutes: u32 = minutes
            .parse()
            .map_err(|_| invalid("Minutes are not a number"))?;

        if minutes >= 60 {
            return Err(invalid("Minutes must be below 60"));
        }
        if hours > 24 {
            return Err(invalid("Time of day cannot be later than 24:00"));
        }
        let total = hours * 60 + minutes;
        if total > MINUTES_PER_DAY {
            return Err(invalid("Time of day cannot be later than 24:00"));
        }
        Ok(ClockTime(total))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = SlaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Set of weekdays that count as working days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WorkingDays([bool; 7]);

impl WorkingDays {
    pub const MONDAY_TO_FRIDAY: WorkingDays =
        WorkingDays([true, true, true, true, true, false, false]);
    pub const EVERY_DAY: WorkingDays = WorkingDays([true; 7]);
    pub const NONE: WorkingDays = WorkingDays([false; 7]);

    pub fn from_days<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        let mut set = [false; 7];
        for day in days {
            set[day.num_days_from_monday() as usize] = true;
        }
        WorkingDays(set)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|working| *working)
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.iter().copied().filter(|day| self.contains(*day))
    }
}

impl Default for WorkingDays {
    fn default() -> Self {
        WorkingDays::MONDAY_TO_FRIDAY
    }
}

impl TryFrom<Vec<String>> for WorkingDays {
    type Error = SlaError;

    fn try_from(days: Vec<String>) -> Result<Self> {
        let parsed = days
            .iter()
            .map(|day| {
                day.trim()
                    .parse::<Weekday>()
                    .map_err(|_| SlaError::InvalidConfigValueError {
                        field: "calendar.working_days".to_string(),
                        value: day.clone(),
                        reason: "Expected a weekday name such as \"mon\" or \"Friday\"".to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(WorkingDays::from_days(parsed))
    }
}

impl From<WorkingDays> for Vec<String> {
    fn from(days: WorkingDays) -> Self {
        days.iter()
            .map(|day| day.to_string().to_lowercase())
            .collect()
    }
}

/// Time zone whose wall clock defines the office calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CalendarZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl CalendarZone {
    pub fn wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            CalendarZone::Local => instant.with_timezone(&Local).naive_local(),
            CalendarZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

impl FromStr for CalendarZone {
    type Err = SlaError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(CalendarZone::Local);
        }
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(CalendarZone::Fixed(Utc.fix()));
        }
        s.parse::<FixedOffset>()
            .map(CalendarZone::Fixed)
            .map_err(|_| SlaError::InvalidConfigValueError {
                field: "calendar.timezone".to_string(),
                value: s.to_string(),
                reason: "Expected \"local\", \"utc\" or an offset like \"+01:00\"".to_string(),
            })
    }
}

impl TryFrom<String> for CalendarZone {
    type Error = SlaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CalendarZone> for String {
    fn from(zone: CalendarZone) -> Self {
        match zone {
            CalendarZone::Local => "local".to_string(),
            CalendarZone::Fixed(offset) => offset.to_string(),
        }
    }
}

/// Working-time model: daily window plus the weekdays it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    pub workday_start: ClockTime,
    pub workday_end: ClockTime,
    pub working_days: WorkingDays,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            workday_start: DEFAULT_WORKDAY_START,
            workday_end: DEFAULT_WORKDAY_END,
            working_days: WorkingDays::MONDAY_TO_FRIDAY,
        }
    }
}

impl BusinessCalendar {
    pub fn new(
        workday_start: ClockTime,
        workday_end: ClockTime,
        working_days: WorkingDays,
    ) -> Result<Self> {
        let calendar = Self {
            workday_start,
            workday_end,
            working_days,
        };
        calendar.validate()?;
        Ok(calendar)
    }

    /// Every day, midnight to midnight.
    pub fn around_the_clock() -> Self {
        Self {
            workday_start: ClockTime::MIDNIGHT,
            workday_end: ClockTime::END_OF_DAY,
            working_days: WorkingDays::EVERY_DAY,
        }
    }

    pub fn hours_per_day(&self) -> f64 {
        f64::from(self.workday_end.minutes().saturating_sub(self.workday_start.minutes())) / 60.0
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.contains(date.weekday())
    }

    pub fn work_window(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (self.workday_start.on(date), self.workday_end.on(date))
    }

    /// Working hours between two instants, read on their own zone's wall clock.
    ///
    /// Ordering is checked on the absolute instants; an empty or reversed
    /// interval is zero.
    pub fn elapsed_working_hours<Tz: TimeZone>(
        &self,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> f64 {
        if start >= end {
            return 0.0;
        }
        self.elapsed_working_hours_naive(start.naive_local(), end.naive_local())
    }

    /// Same as [`Self::elapsed_working_hours`] for UTC instants, converted to
    /// the office wall clock of `zone` first.
    pub fn elapsed_in_zone(
        &self,
        zone: &CalendarZone,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> f64 {
        if start >= end {
            return 0.0;
        }
        self.elapsed_working_hours_naive(zone.wall_clock(start), zone.wall_clock(end))
    }

    /// Day-by-day walk over wall-clock readings.
    pub fn elapsed_working_hours_naive(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        if start >= end {
            return 0.0;
        }

        let mut total = Duration::zero();
        let mut cursor = start;

        while cursor < end {
            let day = cursor.date();

            if !self.is_working_day(day) {
                match self.next_day_start(day) {
                    Some(next) => cursor = next,
                    None => break,
                }
                continue;
            }

            let (work_start, work_end) = self.work_window(day);

            if cursor < work_start {
                cursor = work_start;
            }

            if cursor >= work_end {
                match self.next_day_start(day) {
                    Some(next) => cursor = next,
                    None => break,
                }
                continue;
            }

            let segment_end = end.min(work_end);
            if segment_end > cursor {
                total += segment_end - cursor;
                cursor = segment_end;
            }

            if cursor >= work_end {
                match self.next_day_start(day) {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }

        total.num_milliseconds() as f64 / MILLIS_PER_HOUR
    }

    // "Next" is relative to the day being walked, not the cursor: with a 24:00
    // end the cursor already sits on the following date.
    fn next_day_start(&self, day: NaiveDate) -> Option<NaiveDateTime> {
        let next = day.succ_opt()?;
        if self.is_working_day(next) {
            Some(self.workday_start.on(next))
        } else {
            Some(next.and_time(NaiveTime::MIN))
        }
    }
}

impl Validate for BusinessCalendar {
    fn validate(&self) -> Result<()> {
        if self.workday_start >= self.workday_end {
            return Err(SlaError::InvalidConfigValueError {
                field: "calendar.workday_start".to_string(),
                value: format!("{} - {}", self.workday_start, self.workday_end),
                reason: "Work day must start before it ends".to_string(),
            });
        }
        if self.working_days.is_empty() {
            tracing::warn!("⚠️ Calendar has no working days; every interval will count as 0h");
        }
        Ok(())
    }
}
