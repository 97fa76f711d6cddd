//! Rule tables injected into the analyzers.
//!
//! Each table is a plain immutable value; `Default` yields the classical
//! assignments. Callers may construct their own to experiment with
//! alternative doctrines without touching the scoring code.

use std::collections::BTreeMap;

use dhruv_vedic_base::{Amsha, Graha, RashiElement};

use crate::types::{Element, EventType};

/// Relationship between two elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRelation {
    Friend,
    Enemy,
    Neutral,
}

/// Element assignments and relationships.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRules {
    pub body_element: BTreeMap<Graha, Element>,
    /// Pairs that reinforce each other, used for elemental harmony.
    pub reinforcing_pairs: Vec<(Element, Element)>,
    /// Tattwa order of the time-of-day cycle, starting at local sunrise.
    pub tattwa_cycle: [Element; 5],
    /// Minutes each tattwa rules within the cycle.
    pub tattwa_minutes: f64,
}

impl Default for ElementRules {
    fn default() -> Self {
        let body_element = BTreeMap::from([
            (Graha::Surya, Element::Fire),
            (Graha::Mangal, Element::Fire),
            (Graha::Ketu, Element::Fire),
            (Graha::Chandra, Element::Water),
            (Graha::Shukra, Element::Water),
            (Graha::Buddh, Element::Earth),
            (Graha::Guru, Element::Ether),
            (Graha::Shani, Element::Air),
            (Graha::Rahu, Element::Air),
        ]);
        Self {
            body_element,
            reinforcing_pairs: vec![
                (Element::Fire, Element::Air),
                (Element::Earth, Element::Water),
                (Element::Ether, Element::Air),
            ],
            tattwa_cycle: [
                Element::Ether,
                Element::Air,
                Element::Fire,
                Element::Water,
                Element::Earth,
            ],
            tattwa_minutes: 24.0,
        }
    }
}

impl ElementRules {
    pub fn element_of(&self, graha: Graha) -> Option<Element> {
        self.body_element.get(&graha).copied()
    }

    /// Same element or a reinforcing pair → friend; fire/water and
    /// earth/air → enemy; everything involving ether otherwise neutral.
    pub fn relation(&self, a: Element, b: Element) -> ElementRelation {
        use Element::*;
        if a == b
            || self
                .reinforcing_pairs
                .iter()
                .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
        {
            return ElementRelation::Friend;
        }
        match (a, b) {
            (Fire, Water) | (Water, Fire) | (Earth, Air) | (Air, Earth) => ElementRelation::Enemy,
            _ => ElementRelation::Neutral,
        }
    }
}

/// Element of a zodiac sign's triplicity.
pub const fn sign_element(element: RashiElement) -> Element {
    match element {
        RashiElement::Fire => Element::Fire,
        RashiElement::Earth => Element::Earth,
        RashiElement::Air => Element::Air,
        RashiElement::Water => Element::Water,
    }
}

/// Per-body constants for the strength evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthRules {
    /// Mean absolute daily motion, degrees/day.
    pub mean_speed: BTreeMap<Graha, f64>,
    /// Natural (naisargika) strength in [0, 1].
    pub natural: BTreeMap<Graha, f64>,
    /// House of maximum directional strength.
    pub directional_house: BTreeMap<Graha, u8>,
    /// Grahas strong by day; the rest except Mercury are strong by night.
    pub diurnal: Vec<Graha>,
    /// Grahas strong at any hour.
    pub always_strong: Vec<Graha>,
    /// Positional score in own sign and elsewhere, before exaltation shaping.
    pub own_sign_score: f64,
    pub neutral_score: f64,
    /// Shift of the neutral score in a friend's (+) or enemy's (−) sign.
    pub sign_lord_delta: f64,
    pub debilitation_score: f64,
    /// Arc over which exaltation/debilitation influence fades, degrees.
    pub dignity_orb: f64,
}

impl Default for StrengthRules {
    fn default() -> Self {
        Self {
            mean_speed: BTreeMap::from([
                (Graha::Surya, 0.9856),
                (Graha::Chandra, 13.1764),
                (Graha::Mangal, 0.524),
                (Graha::Buddh, 1.2),
                (Graha::Guru, 0.083),
                (Graha::Shukra, 1.0),
                (Graha::Shani, 0.033),
                (Graha::Rahu, 0.0529),
                (Graha::Ketu, 0.0529),
            ]),
            natural: BTreeMap::from([
                (Graha::Surya, 1.0),
                (Graha::Chandra, 0.857),
                (Graha::Shukra, 0.714),
                (Graha::Guru, 0.571),
                (Graha::Buddh, 0.429),
                (Graha::Mangal, 0.286),
                (Graha::Shani, 0.143),
                (Graha::Rahu, 0.2),
                (Graha::Ketu, 0.2),
            ]),
            directional_house: BTreeMap::from([
                (Graha::Surya, 10),
                (Graha::Mangal, 10),
                (Graha::Chandra, 4),
                (Graha::Shukra, 4),
                (Graha::Buddh, 1),
                (Graha::Guru, 1),
                (Graha::Shani, 7),
                (Graha::Rahu, 7),
                (Graha::Ketu, 10),
            ]),
            diurnal: vec![Graha::Surya, Graha::Guru, Graha::Shukra],
            always_strong: vec![Graha::Buddh],
            own_sign_score: 0.75,
            neutral_score: 0.5,
            sign_lord_delta: 0.05,
            debilitation_score: 0.3,
            dignity_orb: 30.0,
        }
    }
}

/// Weekday lords, Sunday first.
pub const WEEKDAY_LORDS: [Graha; 7] = [
    Graha::Surya,
    Graha::Chandra,
    Graha::Mangal,
    Graha::Buddh,
    Graha::Guru,
    Graha::Shukra,
    Graha::Shani,
];

/// Aspect kinds scored by harmony and aspectual strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRule {
    pub kind: AspectKind,
    pub angle: f64,
    pub orb: f64,
    /// Harmony value in [-1, 1].
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AspectTable {
    pub rules: Vec<AspectRule>,
}

impl Default for AspectTable {
    fn default() -> Self {
        let rule = |kind, angle, orb, value| AspectRule {
            kind,
            angle,
            orb,
            value,
        };
        Self {
            rules: vec![
                rule(AspectKind::Conjunction, 0.0, 5.0, 1.0),
                rule(AspectKind::Sextile, 60.0, 6.0, 0.5),
                rule(AspectKind::Square, 90.0, 7.0, -0.5),
                rule(AspectKind::Trine, 120.0, 8.0, 0.8),
                rule(AspectKind::Opposition, 180.0, 8.0, -0.8),
            ],
        }
    }
}

impl AspectTable {
    /// Aspect formed at `separation` (degrees in [0, 180]) with its
    /// tightness in [0, 1], 1 when exact.
    pub fn find(&self, separation: f64) -> Option<(AspectRule, f64)> {
        self.rules
            .iter()
            .filter_map(|r| {
                let dev = (separation - r.angle).abs();
                (dev <= r.orb).then_some((*r, 1.0 - dev / r.orb))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Count-based yoga scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct YogaRules {
    /// Score contributed by each detected yoga; the total is capped at 1.
    pub per_yoga: f64,
    /// Minimum benefics in the 6th/7th/8th from the Moon for Adhi yoga.
    pub adhi_min_benefics: usize,
}

impl Default for YogaRules {
    fn default() -> Self {
        Self {
            per_yoga: 0.25,
            adhi_min_benefics: 2,
        }
    }
}

/// Event-type affinities and the divisional chart each type is read from.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityTable {
    pub affinities: BTreeMap<EventType, BTreeMap<Graha, f64>>,
    /// Affinity for grahas not listed under an event type.
    pub baseline: f64,
    /// Divisional chart and 1-based house read for each event type.
    pub varga: BTreeMap<EventType, (Amsha, u8)>,
}

impl Default for AffinityTable {
    fn default() -> Self {
        use EventType::*;
        use Graha::*;

        let table = |entries: &[(Graha, f64)]| -> BTreeMap<Graha, f64> {
            entries.iter().copied().collect()
        };
        let affinities = BTreeMap::from([
            (
                Career,
                table(&[(Surya, 1.0), (Shani, 0.9), (Buddh, 0.7), (Guru, 0.6), (Mangal, 0.6), (Rahu, 0.5)]),
            ),
            (
                Relationship,
                table(&[(Shukra, 1.0), (Chandra, 0.8), (Guru, 0.7), (Buddh, 0.4), (Rahu, 0.4)]),
            ),
            (
                Marriage,
                table(&[(Shukra, 1.0), (Guru, 0.8), (Chandra, 0.7), (Rahu, 0.5)]),
            ),
            (
                Children,
                table(&[(Guru, 1.0), (Chandra, 0.7), (Shukra, 0.6), (Surya, 0.5)]),
            ),
            (
                Education,
                table(&[(Buddh, 1.0), (Guru, 0.9), (Chandra, 0.5), (Shukra, 0.4)]),
            ),
            (
                Property,
                table(&[(Mangal, 0.9), (Chandra, 0.8), (Shukra, 0.7), (Shani, 0.6)]),
            ),
            (
                Health,
                table(&[(Surya, 0.9), (Chandra, 0.8), (Shani, 0.7), (Mangal, 0.6), (Ketu, 0.6)]),
            ),
            (
                Spiritual,
                table(&[(Ketu, 1.0), (Guru, 0.9), (Shani, 0.6), (Chandra, 0.5)]),
            ),
            (
                Relocation,
                table(&[(Rahu, 1.0), (Chandra, 0.8), (Ketu, 0.6), (Buddh, 0.5), (Shani, 0.5)]),
            ),
            (
                Travel,
                table(&[(Rahu, 0.9), (Chandra, 0.8), (Buddh, 0.6), (Guru, 0.5)]),
            ),
            (
                Finance,
                table(&[(Guru, 1.0), (Shukra, 0.8), (Buddh, 0.7), (Chandra, 0.5)]),
            ),
        ]);

        let varga = BTreeMap::from([
            (Career, (Amsha::D10, 10)),
            (Relationship, (Amsha::D9, 7)),
            (Marriage, (Amsha::D9, 7)),
            (Children, (Amsha::D7, 5)),
            (Education, (Amsha::D24, 4)),
            (Property, (Amsha::D4, 4)),
            (Health, (Amsha::D6, 6)),
            (Spiritual, (Amsha::D20, 9)),
            (Relocation, (Amsha::D12, 12)),
            (Travel, (Amsha::D12, 12)),
            (Finance, (Amsha::D2, 2)),
            (Other, (Amsha::D1, 1)),
        ]);

        Self {
            affinities,
            baseline: 0.2,
            varga,
        }
    }
}

impl AffinityTable {
    /// Affinity of `graha` for `kind`. `Other` events are neutral (0.5).
    pub fn affinity(&self, kind: EventType, graha: Graha) -> f64 {
        match self.affinities.get(&kind) {
            Some(row) => row.get(&graha).copied().unwrap_or(self.baseline),
            None => 0.5,
        }
    }

    pub fn varga_for(&self, kind: EventType) -> (Amsha, u8) {
        self.varga.get(&kind).copied().unwrap_or((Amsha::D1, 1))
    }
}
