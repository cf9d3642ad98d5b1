//! Application-level configuration loading, including the course catalog.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::game::{CUSTOM_COURSE_ID, DEFAULT_PAR, DEFAULT_YARDS, Hole, HolePar};

/// Default location on disk where the server looks for the JSON catalog.
const DEFAULT_CONFIG_PATH: &str = "config/courses.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FAIRWAY_BACK_CONFIG_PATH";

/// A named course with its fixed, ordered hole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Catalog identifier referenced by games.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ordered holes; games take the first `hole_count` of them.
    pub holes: Vec<Hole>,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    courses: Vec<Course>,
}

impl AppConfig {
    /// Load the catalog from disk, falling back to the baked-in course list.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        count = config.courses.len(),
                        "loaded course catalog from config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in catalog"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Every catalog entry, including the custom placeholder.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a catalog entry by identifier.
    pub fn find_course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == course_id)
    }

    /// Resolve the ordered hole list for one game.
    ///
    /// Catalog courses contribute their first `hole_count` holes with fixed
    /// pars. A custom course synthesizes uniform par-4 holes and then applies
    /// the game's par overrides. Unknown course ids (a catalog entry removed
    /// between runs) degrade to the synthesized default rather than failing
    /// the read. Resolution happens on every read; only the overrides are
    /// persisted.
    pub fn resolve_holes(&self, course_id: &str, hole_count: u8, overrides: &[HolePar]) -> Vec<Hole> {
        if course_id != CUSTOM_COURSE_ID {
            if let Some(course) = self.find_course(course_id) {
                return course
                    .holes
                    .iter()
                    .take(usize::from(hole_count))
                    .cloned()
                    .collect();
            }
            warn!(course_id, "unknown course id; using default holes");
        }

        (1..=hole_count)
            .map(|number| {
                let par = overrides
                    .iter()
                    .find(|entry| entry.hole_number == number)
                    .map(|entry| entry.par)
                    .unwrap_or(DEFAULT_PAR);
                Hole {
                    number,
                    par,
                    yards: DEFAULT_YARDS,
                }
            })
            .collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            courses: default_catalog(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    courses: Vec<RawCourse>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let courses = value.courses.into_iter().map(Into::into).collect::<Vec<_>>();
        Self { courses }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single course inside the configuration file.
struct RawCourse {
    id: String,
    name: String,
    holes: Vec<RawHole>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of one hole of a configured course.
struct RawHole {
    number: u8,
    par: u8,
    yards: u16,
}

impl From<RawCourse> for Course {
    fn from(value: RawCourse) -> Self {
        Self {
            id: value.id,
            name: value.name,
            holes: value
                .holes
                .into_iter()
                .map(|hole| Hole {
                    number: hole.number,
                    par: hole.par,
                    yards: hole.yards,
                })
                .collect(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Build a course from `(par, yards)` pairs, numbering holes from 1.
fn course(id: &str, name: &str, holes: &[(u8, u16)]) -> Course {
    Course {
        id: id.to_owned(),
        name: name.to_owned(),
        holes: holes
            .iter()
            .enumerate()
            .map(|(index, &(par, yards))| Hole {
                number: index as u8 + 1,
                par,
                yards,
            })
            .collect(),
    }
}

/// Built-in catalog shipped with the binary.
fn default_catalog() -> Vec<Course> {
    vec![
        course(
            "pebble",
            "Pebble Beach Golf Links",
            &[
                (4, 380),
                (4, 410),
                (3, 185),
                (5, 520),
                (4, 375),
                (3, 150),
                (4, 410),
                (4, 390),
                (5, 525),
                (4, 405),
                (4, 380),
                (3, 200),
                (5, 545),
                (4, 415),
                (3, 180),
                (4, 400),
                (4, 425),
                (5, 550),
            ],
        ),
        course(
            "augusta",
            "Augusta National Golf Club",
            &[
                (4, 445),
                (5, 575),
                (4, 350),
                (3, 240),
                (4, 455),
                (3, 180),
                (4, 450),
                (5, 570),
                (4, 460),
                (4, 495),
                (4, 505),
                (3, 155),
                (5, 510),
                (4, 440),
                (5, 530),
                (3, 170),
                (4, 440),
                (4, 465),
            ],
        ),
        course(
            "stAndrews",
            "St Andrews Links",
            &[
                (4, 380),
                (4, 410),
                (4, 390),
                (4, 475),
                (5, 570),
                (4, 410),
                (4, 365),
                (3, 175),
                (4, 350),
                (4, 380),
                (3, 170),
                (4, 320),
                (4, 430),
                (5, 550),
                (4, 400),
                (4, 415),
                (4, 490),
                (4, 360),
            ],
        ),
        course(
            "pinehurst",
            "Pinehurst Resort",
            &[
                (4, 400),
                (4, 430),
                (4, 385),
                (3, 195),
                (5, 550),
                (3, 240),
                (4, 415),
                (4, 465),
                (3, 180),
                (5, 595),
                (4, 475),
                (4, 375),
                (4, 390),
                (4, 440),
                (3, 190),
                (5, 540),
                (3, 200),
                (4, 460),
            ],
        ),
        course(
            CUSTOM_COURSE_ID,
            "Custom Course",
            &[
                (4, 400),
                (4, 420),
                (3, 180),
                (5, 540),
                (4, 400),
                (3, 170),
                (4, 410),
                (4, 430),
                (5, 550),
                (4, 410),
                (4, 390),
                (3, 190),
                (5, 530),
                (4, 420),
                (3, 180),
                (4, 410),
                (4, 440),
                (5, 560),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalog_has_full_eighteen_hole_courses() {
        let config = AppConfig::default();
        assert_eq!(config.courses().len(), 5);
        for course in config.courses() {
            assert_eq!(course.holes.len(), 18);
            assert_eq!(course.holes[0].number, 1);
            assert_eq!(course.holes[17].number, 18);
        }
    }

    #[test]
    fn catalog_course_truncates_to_nine_holes() {
        let config = AppConfig::default();
        let holes = config.resolve_holes("pebble", 9, &[]);
        assert_eq!(holes.len(), 9);
        assert_eq!(holes[2].par, 3);
        assert_eq!(holes[8].yards, 525);
    }

    #[test]
    fn custom_course_synthesizes_defaults_and_applies_overrides() {
        let config = AppConfig::default();
        let overrides = vec![HolePar {
            hole_number: 2,
            par: 5,
        }];

        let holes = config.resolve_holes(CUSTOM_COURSE_ID, 9, &overrides);
        assert_eq!(holes.len(), 9);
        assert_eq!(holes[0].par, DEFAULT_PAR);
        assert_eq!(holes[1].par, 5);
        assert_eq!(holes[0].yards, DEFAULT_YARDS);
    }

    #[test]
    fn unknown_course_falls_back_to_defaults_without_overrides_applied() {
        let config = AppConfig::default();
        let holes = config.resolve_holes("demolished", 9, &[]);
        assert_eq!(holes.len(), 9);
        assert!(holes.iter().all(|hole| hole.par == DEFAULT_PAR));
    }
}
