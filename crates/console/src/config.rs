use std::path::PathBuf;
use std::time::Duration;

use campus_core::pagination::{PageSizeOptions, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};
use campus_core::roster::{ReviewerOptions, Teacher, TeacherRoster};
use campus_core::table::TableConfig;

/// Default simulated latency of an inline cell commit.
const DEFAULT_COMMIT_DELAY_MS: u64 = 1000;

/// Default simulated latency of a student create.
const DEFAULT_CREATE_DELAY_MS: u64 = 1200;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

fn invalid(var: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.to_string(),
    }
}

/// Console configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Record fixture to mount; the bundled fixture when `None`.
    pub records_path: Option<PathBuf>,
    pub page_size_options: PageSizeOptions,
    pub default_page_size: usize,
    /// Latency of the simulated cell commit.
    pub commit_delay: Duration,
    /// Latency of the simulated student create.
    pub create_delay: Duration,
    pub reviewers: ReviewerOptions,
    pub teachers: TeacherRoster,
}

impl ConsoleConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                                   |
    /// |----------------------------|-------------------------------------------|
    /// | `CAMPUS_RECORDS_PATH`      | bundled fixture                           |
    /// | `CAMPUS_PAGE_SIZE_OPTIONS` | `10,20,30,40,50`                          |
    /// | `CAMPUS_DEFAULT_PAGE_SIZE` | `10`                                      |
    /// | `CAMPUS_COMMIT_DELAY_MS`   | `1000`                                    |
    /// | `CAMPUS_CREATE_DELAY_MS`   | `1200`                                    |
    /// | `CAMPUS_REVIEWERS`         | `Eddie Lake,Jamik Tashpulatov`            |
    /// | `CAMPUS_TEACHERS`          | `t1:Mr. Smith,t2:Ms. Johnson,t3:Dr. Brown`|
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let records_path = lookup("CAMPUS_RECORDS_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let page_size_options = match lookup("CAMPUS_PAGE_SIZE_OPTIONS") {
            Some(raw) => {
                let values = split_list(&raw)
                    .map(|v| v.parse::<usize>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| invalid("CAMPUS_PAGE_SIZE_OPTIONS", e))?;
                PageSizeOptions::new(values).map_err(|e| invalid("CAMPUS_PAGE_SIZE_OPTIONS", e))?
            }
            None => PageSizeOptions::new(DEFAULT_PAGE_SIZE_OPTIONS.iter().copied())
                .map_err(|e| invalid("CAMPUS_PAGE_SIZE_OPTIONS", e))?,
        };

        let default_page_size = parse_or("CAMPUS_DEFAULT_PAGE_SIZE", &lookup, DEFAULT_PAGE_SIZE)?;
        if !page_size_options.contains(default_page_size) {
            return Err(invalid(
                "CAMPUS_DEFAULT_PAGE_SIZE",
                format!("{default_page_size} is not one of the page size options"),
            ));
        }

        let commit_delay = Duration::from_millis(parse_or(
            "CAMPUS_COMMIT_DELAY_MS",
            &lookup,
            DEFAULT_COMMIT_DELAY_MS,
        )?);
        let create_delay = Duration::from_millis(parse_or(
            "CAMPUS_CREATE_DELAY_MS",
            &lookup,
            DEFAULT_CREATE_DELAY_MS,
        )?);

        let reviewers = match lookup("CAMPUS_REVIEWERS") {
            Some(raw) => ReviewerOptions::new(split_list(&raw).map(String::from).collect())
                .map_err(|e| invalid("CAMPUS_REVIEWERS", e))?,
            None => ReviewerOptions::default(),
        };

        let teachers = match lookup("CAMPUS_TEACHERS") {
            Some(raw) => parse_teachers(&raw)?,
            None => TeacherRoster::default(),
        };

        Ok(Self {
            records_path,
            page_size_options,
            default_page_size,
            commit_delay,
            create_delay,
            reviewers,
            teachers,
        })
    }

    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            page_size_options: self.page_size_options.clone(),
            page_size: self.default_page_size,
            reviewers: self.reviewers.clone(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            records_path: None,
            page_size_options: PageSizeOptions::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            commit_delay: Duration::from_millis(DEFAULT_COMMIT_DELAY_MS),
            create_delay: Duration::from_millis(DEFAULT_CREATE_DELAY_MS),
            reviewers: ReviewerOptions::default(),
            teachers: TeacherRoster::default(),
        }
    }
}

/// Whole milliseconds of `delay`, saturating at `u64::MAX`.
pub fn delay_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_or<T>(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e| invalid(var, e)),
        None => Ok(default),
    }
}

/// `id:Name` pairs separated by commas.
fn parse_teachers(raw: &str) -> Result<TeacherRoster, ConfigError> {
    let teachers = split_list(raw)
        .map(|entry| {
            entry
                .split_once(':')
                .map(|(id, name)| Teacher::new(id.trim(), name.trim()))
                .ok_or_else(|| invalid("CAMPUS_TEACHERS", format!("'{entry}' is not an id:name pair")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    TeacherRoster::new(teachers).map_err(|e| invalid("CAMPUS_TEACHERS", e))
}
