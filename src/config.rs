use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::model::schedule::parse_work_days;
use crate::timeclock::ShiftPolicy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_api_per_min: u32,
    pub rate_punch_per_min: u32,

    pub api_prefix: String,

    /// Fallback policy for employees with no active schedule. Validated
    /// here so a contradictory configuration fails at startup, not per
    /// attendance record.
    pub default_policy: ShiftPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),
            rate_punch_per_min: env::var("RATE_PUNCH_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            default_policy: default_policy_from_env(),
        }
    }
}

fn default_policy_from_env() -> ShiftPolicy {
    let work_start = time_var("DEFAULT_WORK_START", "09:00");
    let work_end = time_var("DEFAULT_WORK_END", "17:00");
    let work_days = env::var("DEFAULT_WORK_DAYS").unwrap_or_else(|_| "Mon,Tue,Wed,Thu,Fri".to_string());
    let lateness_grace: u32 = env::var("DEFAULT_LATENESS_GRACE_MIN")
        .unwrap_or_else(|_| "15".to_string())
        .parse()
        .unwrap();
    let absence_grace: u32 = env::var("DEFAULT_ABSENCE_GRACE_MIN")
        .unwrap_or_else(|_| "30".to_string())
        .parse()
        .unwrap();
    let full_day_cap: f64 = env::var("DEFAULT_FULL_DAY_CAP")
        .unwrap_or_else(|_| "8".to_string())
        .parse()
        .unwrap();
    let half_day_cap: f64 = env::var("DEFAULT_HALF_DAY_CAP")
        .unwrap_or_else(|_| "4".to_string())
        .parse()
        .unwrap();

    ShiftPolicy::new(
        work_start,
        work_end,
        parse_work_days(&work_days).expect("DEFAULT_WORK_DAYS must list valid weekdays"),
        lateness_grace,
        absence_grace,
        full_day_cap,
        half_day_cap,
    )
    .expect("default shift policy must be valid")
}

fn time_var(key: &str, default: &str) -> NaiveTime {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .unwrap_or_else(|_| panic!("{key} must be HH:MM, got '{raw}'"))
}
