//! Input and chart value types shared by the analyzers.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use dhruv_time::{local_to_utc, parse_offset};
use dhruv_vedic_base::{GeoLocation, Graha};
use serde::{Deserialize, Serialize};

use crate::error::RectifyError;

/// Birth data as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Local clock time, `HH:MM` or `HH:MM:SS`.
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Fixed UTC offset such as `+05:30`, `-0400`, `UTC` or `5.5`.
    pub timezone: String,
}

/// Validated birth data with the instant resolved to UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBirth {
    pub utc: DateTime<Utc>,
    pub offset: FixedOffset,
    pub location: GeoLocation,
}

impl ResolvedBirth {
    pub fn local(&self, t: DateTime<Utc>) -> DateTime<FixedOffset> {
        t.with_timezone(&self.offset)
    }
}

impl BirthData {
    /// Parse and range-check every field.
    pub fn resolve(&self) -> Result<ResolvedBirth, RectifyError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|err| {
            RectifyError::validation(format!("date {:?} is not YYYY-MM-DD: {err}", self.date))
        })?;
        let raw_time = self.time.trim();
        let time = NaiveTime::parse_from_str(raw_time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw_time, "%H:%M:%S"))
            .map_err(|err| {
                RectifyError::validation(format!("time {:?} is not HH:MM: {err}", self.time))
            })?;
        let offset = parse_offset(&self.timezone).map_err(|err| {
            RectifyError::validation(format!("timezone {:?}: {err}", self.timezone))
        })?;
        let location = GeoLocation::new(self.latitude, self.longitude)
            .map_err(|err| RectifyError::validation(err.to_string()))?;
        let utc = local_to_utc(date, time, offset)
            .map_err(|err| RectifyError::validation(err.to_string()))?;

        Ok(ResolvedBirth {
            utc,
            offset,
            location,
        })
    }
}

/// Life-event categories. Unknown categories deserialize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Career,
    Relationship,
    Marriage,
    Children,
    Education,
    Property,
    Health,
    Spiritual,
    Relocation,
    Travel,
    Finance,
    #[serde(other)]
    Other,
}

fn default_intensity() -> f64 {
    0.5
}

/// A dated life event. Read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub timestamp: DateTime<Utc>,
    /// Significance in [0, 1].
    #[serde(default = "default_intensity")]
    pub intensity: f64,
    #[serde(default)]
    pub description: String,
}

/// Sidereal position of one graha in a candidate chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyPosition {
    pub graha: Graha,
    /// Sidereal ecliptic longitude, degrees [0, 360).
    pub longitude: f64,
    pub latitude: f64,
    /// Degrees per day; negative when retrograde.
    pub speed: f64,
    /// 1-based house.
    pub house: u8,
}

impl BodyPosition {
    pub fn rashi_index(&self) -> u8 {
        dhruv_vedic_base::rashi_index_of(self.longitude)
    }
}

/// Everything the analyzers read about one instant and place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPositions {
    pub time: DateTime<Utc>,
    pub jd_ut: f64,
    pub location: GeoLocation,
    pub ayanamsha_deg: f64,
    /// Sidereal ascendant, degrees.
    pub ascendant: f64,
    /// Sidereal midheaven, degrees.
    pub mc: f64,
    /// Sidereal house cusps, index 0 = first house.
    pub cusps: [f64; 12],
    pub bodies: BTreeMap<Graha, BodyPosition>,
}

impl ChartPositions {
    pub fn body(&self, graha: Graha) -> Option<&BodyPosition> {
        self.bodies.get(&graha)
    }

    /// Local mean solar time in hours [0, 24), from the longitude.
    pub fn local_mean_hour(&self) -> f64 {
        let utc_hours = self.time.timestamp_millis().rem_euclid(86_400_000) as f64 / 3_600_000.0;
        (utc_hours + self.location.longitude_deg / 15.0).rem_euclid(24.0)
    }

    /// Weekday at local mean time, 0 = Sunday.
    pub fn local_weekday(&self) -> u8 {
        let shift_ms = (self.location.longitude_deg / 15.0 * 3_600_000.0).round() as i64;
        let local_ms = self.time.timestamp_millis() + shift_ms;
        // 1970-01-01 was a Thursday.
        ((local_ms.div_euclid(86_400_000) + 4).rem_euclid(7)) as u8
    }
}

/// The five classical elements (tattwas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
    Ether,
}

pub const ALL_ELEMENTS: [Element; 5] = [
    Element::Fire,
    Element::Earth,
    Element::Air,
    Element::Water,
    Element::Ether,
];

impl Element {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Share of each element. Sums to 1 once normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDistribution {
    pub fire: f64,
    pub earth: f64,
    pub air: f64,
    pub water: f64,
    pub ether: f64,
}

impl ElementDistribution {
    pub fn uniform() -> Self {
        Self::from_array([0.2; 5])
    }

    pub fn from_array(v: [f64; 5]) -> Self {
        Self {
            fire: v[0],
            earth: v[1],
            air: v[2],
            water: v[3],
            ether: v[4],
        }
    }

    pub fn to_array(&self) -> [f64; 5] {
        [self.fire, self.earth, self.air, self.water, self.ether]
    }

    pub fn get(&self, element: Element) -> f64 {
        self.to_array()[element.index()]
    }

    pub fn sum(&self) -> f64 {
        self.to_array().iter().sum()
    }
}

/// One pass's probe window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchWindow {
    pub center: DateTime<Utc>,
    pub radius_minutes: f64,
    pub step_minutes: f64,
}

impl SearchWindow {
    /// Probe times from `center − radius/2` to `center + radius/2`, on whole
    /// milliseconds. The grid runs outward from `center` every `step`, so the
    /// centre is always probed; both edges are added when the step does not
    /// divide the half-width.
    pub fn probes(&self) -> Vec<DateTime<Utc>> {
        let center = self.center.timestamp_millis();
        let half = (self.radius_minutes * 30_000.0).round() as i64;
        let step = ((self.step_minutes * 60_000.0).round() as i64).max(1);
        let n = half / step;
        let ragged = n * step < half;

        let mut offsets = Vec::with_capacity(2 * n as usize + 3);
        if ragged {
            offsets.push(-half);
        }
        offsets.extend((-n..=n).map(|k| k * step));
        if ragged {
            offsets.push(half);
        }

        offsets
            .into_iter()
            .filter_map(|off| DateTime::from_timestamp_millis(center + off))
            .collect()
    }
}

/// Signed minutes from `from` to `to`.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// `t` shifted by fractional minutes, rounded to the millisecond.
pub fn shift_minutes(t: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    t + TimeDelta::milliseconds((minutes * 60_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn birth(date: &str, time: &str, lat: f64, lon: f64, tz: &str) -> BirthData {
        BirthData {
            date: date.to_string(),
            time: time.to_string(),
            latitude: lat,
            longitude: lon,
            timezone: tz.to_string(),
        }
    }

    #[test]
    fn resolves_local_time_to_utc() {
        let r = birth("1990-06-15", "12:00", 28.61, 77.21, "+05:30")
            .resolve()
            .unwrap();
        assert_eq!(r.utc, Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap());
        assert_eq!(r.offset.local_minus_utc(), 19_800);
    }

    #[test]
    fn accepts_seconds() {
        let r = birth("1990-06-15", "12:00:30", 0.0, 0.0, "UTC")
            .resolve()
            .unwrap();
        assert_eq!(r.utc, Utc.with_ymd_and_hms(1990, 6, 15, 12, 0, 30).unwrap());
    }

    #[test]
    fn rejects_malformed_fields() {
        for b in [
            birth("15/06/1990", "12:00", 0.0, 0.0, "UTC"),
            birth("1990-06-15", "noon", 0.0, 0.0, "UTC"),
            birth("1990-06-15", "12:00", 95.0, 0.0, "UTC"),
            birth("1990-06-15", "12:00", 0.0, 181.0, "UTC"),
            birth("1990-06-15", "12:00", 0.0, 0.0, "Mars/Olympus"),
        ] {
            assert!(matches!(b.resolve(), Err(RectifyError::Validation { .. })), "{b:?}");
        }
    }

    #[test]
    fn event_defaults() {
        let e: LifeEvent = serde_json::from_str(
            r#"{"id":"e1","type":"career","timestamp":"2015-03-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(e.kind, EventType::Career);
        assert_eq!(e.intensity, 0.5);
        assert!(e.description.is_empty());

        let other: LifeEvent = serde_json::from_str(
            r#"{"id":"e2","type":"lottery","timestamp":"2015-03-01T00:00:00Z","intensity":0.9}"#,
        )
        .unwrap();
        assert_eq!(other.kind, EventType::Other);
    }

    #[test]
    fn probes_include_both_edges() {
        let center = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let w = SearchWindow {
            center,
            radius_minutes: 30.0,
            step_minutes: 1.5,
        };
        let probes = w.probes();
        assert_eq!(probes.len(), 21);
        assert_eq!(probes[0], shift_minutes(center, -15.0));
        assert_eq!(probes[20], shift_minutes(center, 15.0));
        assert!(probes.contains(&center));
    }

    #[test]
    fn probes_keep_edge_when_step_does_not_divide() {
        let center = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let w = SearchWindow {
            center,
            radius_minutes: 10.0,
            step_minutes: 4.0,
        };
        let probes = w.probes();
        assert_eq!(probes.first(), Some(&shift_minutes(center, -5.0)));
        assert_eq!(probes.last(), Some(&shift_minutes(center, 5.0)));
        // −5, −4, 0, 4, 5
        assert_eq!(probes.len(), 5);
        assert!(probes.contains(&center));
        assert!(probes.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn refining_windows_always_probe_the_centre() {
        let center = Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap();
        for pass in 1..12u32 {
            let radius = 30.0 / f64::from(pass + 1);
            let w = SearchWindow {
                center,
                radius_minutes: radius,
                step_minutes: radius / 20.0,
            };
            let probes = w.probes();
            assert!(probes.contains(&center), "pass {pass}");
            assert_eq!(probes.len() % 2, 1, "pass {pass}");
            let first = minutes_between(center, probes[0]);
            let last = minutes_between(center, probes[probes.len() - 1]);
            assert!((first + last).abs() < 1e-9, "pass {pass}: {first} {last}");
        }
    }

    #[test]
    fn element_distribution_accessors() {
        let d = ElementDistribution::uniform();
        assert!((d.sum() - 1.0).abs() < 1e-12);
        assert_eq!(d.get(Element::Ether), 0.2);
    }
}
