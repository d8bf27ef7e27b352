use crate::core::calendar::{BusinessCalendar, CalendarZone, ClockTime, WorkingDays};
use crate::core::calendar::{DEFAULT_WORKDAY_END, DEFAULT_WORKDAY_START};
use crate::core::classifier::{EscalationClassifier, SlaPolicy, UrgencyThreshold};
use crate::domain::model::Urgency;
use crate::utils::error::{Result, SlaError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaConfig {
    pub calendar: CalendarConfig,
    pub thresholds: BTreeMap<String, ThresholdConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub workday_start: ClockTime,
    pub workday_end: ClockTime,
    pub working_days: WorkingDays,
    pub timezone: CalendarZone,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            workday_start: DEFAULT_WORKDAY_START,
            workday_end: DEFAULT_WORKDAY_END,
            working_days: WorkingDays::MONDAY_TO_FRIDAY,
            timezone: CalendarZone::Local,
        }
    }
}

/// One `[thresholds.<urgency>]` table. Boundaries are given either in hours or
/// in working days, not both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub on_time_hours: Option<f64>,
    pub approaching_hours: Option<f64>,
    pub on_time_days: Option<f64>,
    pub approaching_days: Option<f64>,
}

impl ThresholdConfig {
    fn resolve(&self, field: &str, calendar: &BusinessCalendar) -> Result<UrgencyThreshold> {
        let uses_hours = self.on_time_hours.is_some() || self.approaching_hours.is_some();
        let uses_days = self.on_time_days.is_some() || self.approaching_days.is_some();

        if uses_hours && uses_days {
            return Err(SlaError::ConfigError {
                message: format!("{}: mix of *_hours and *_days keys", field),
            });
        }

        if uses_days {
            let approaching = self.approaching_days.ok_or_else(|| missing(field, "approaching_days"))?;
            return Ok(UrgencyThreshold::in_working_days(
                self.on_time_days,
                approaching,
                calendar,
            ));
        }

        let approaching = self
            .approaching_hours
            .ok_or_else(|| missing(field, "approaching_hours"))?;
        Ok(UrgencyThreshold {
            on_time_hours: self.on_time_hours,
            approaching_hours: approaching,
        })
    }
}

fn missing(field: &str, key: &str) -> SlaError {
    SlaError::ConfigError {
        message: format!("{}.{} is required", field, key),
    }
}

impl SlaConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${SLA_WORKDAY_END})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn business_calendar(&self) -> BusinessCalendar {
        BusinessCalendar {
            workday_start: self.calendar.workday_start,
            workday_end: self.calendar.workday_end,
            working_days: self.calendar.working_days,
        }
    }

    pub fn zone(&self) -> CalendarZone {
        self.calendar.timezone
    }

    /// Default table with every configured urgency replaced wholesale.
    pub fn policy(&self) -> Result<SlaPolicy> {
        let calendar = self.business_calendar();
        let mut policy = SlaPolicy::default();
        let mut seen = BTreeSet::new();

        for (label, threshold) in &self.thresholds {
            let urgency = label
                .parse::<Urgency>()
                .map_err(|e| SlaError::InvalidConfigValueError {
                    field: "thresholds".to_string(),
                    value: label.clone(),
                    reason: e.to_string(),
                })?;
            if !seen.insert(urgency) {
                return Err(SlaError::InvalidConfigValueError {
                    field: "thresholds".to_string(),
                    value: label.clone(),
                    reason: format!("duplicate entry for urgency {}", urgency),
                });
            }
            let field = format!("thresholds.{}", label);
            policy.set_threshold(urgency, threshold.resolve(&field, &calendar)?);
        }
        Ok(policy)
    }

    pub fn classifier(&self) -> Result<EscalationClassifier> {
        self.validate()?;
        Ok(EscalationClassifier::new(self.business_calendar(), self.policy()?).with_zone(self.zone()))
    }
}

impl Validate for SlaConfig {
    fn validate(&self) -> Result<()> {
        self.business_calendar().validate()?;
        self.policy()?.validate()
    }
}
