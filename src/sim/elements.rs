//! The five-phase (오행) element system
//!
//! Every ball, brick and paddle carries one of five elements. Damage between
//! an attacker and a defender is decided by two fixed directed 5-cycles:
//! dominance (상극, "A crushes B") and generation (상생, "A nourishes B").
//! Everything else in the game only ever consumes the [`damage`] result.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the five elemental phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Metal,
    Water,
    Wood,
}

/// All elements in their canonical order
pub const ELEMENTS: [Element; 5] = [
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
    Element::Wood,
];

impl Element {
    /// The element this one crushes (상극 cycle)
    pub const fn dominates(self) -> Element {
        match self {
            Element::Wood => Element::Earth,  // 목극토
            Element::Earth => Element::Water, // 토극수
            Element::Water => Element::Fire,  // 수극화
            Element::Fire => Element::Metal,  // 화극금
            Element::Metal => Element::Wood,  // 금극목
        }
    }

    /// The element this one nourishes (상생 cycle)
    pub const fn generates(self) -> Element {
        match self {
            Element::Wood => Element::Fire,   // 목생화
            Element::Fire => Element::Earth,  // 화생토
            Element::Earth => Element::Metal, // 토생금
            Element::Metal => Element::Water, // 금생수
            Element::Water => Element::Wood,  // 수생목
        }
    }

    /// Render color name for this element
    pub const fn color(self) -> &'static str {
        match self {
            Element::Fire => "red",
            Element::Earth => "gold",
            Element::Metal => "white",
            Element::Water => "blue",
            Element::Wood => "green",
        }
    }

    /// Display label (Korean, as shown in the HUD)
    pub const fn label(self) -> &'static str {
        match self {
            Element::Fire => "화(火)",
            Element::Earth => "토(土)",
            Element::Metal => "금(金)",
            Element::Water => "수(水)",
            Element::Wood => "목(木)",
        }
    }

    /// Next element in canonical order (paddle cycling)
    pub const fn next(self) -> Element {
        match self {
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
            Element::Wood => Element::Fire,
        }
    }

    /// Uniformly random element
    pub fn random(rng: &mut impl Rng) -> Element {
        ELEMENTS[rng.random_range(0..ELEMENTS.len())]
    }
}

/// Neutral damage: same element, or either side unknown
pub const DAMAGE_NEUTRAL: u32 = 3;
/// Attacker dominates defender: crushing hit
pub const DAMAGE_CRUSH: u32 = 6;
/// Defender dominates attacker: the hit is nullified
pub const DAMAGE_NULLIFIED: u32 = 0;
/// Attacker nourishes defender: minimal damage
pub const DAMAGE_NOURISH: u32 = 2;
/// Defender nourishes attacker: elevated damage
pub const DAMAGE_NOURISHED_BY: u32 = 4;

/// Damage dealt by `attacker` against `defender`.
///
/// Dominance is checked before generation; the two cycles are distinct by
/// construction so no pair satisfies both, but the precedence order is part
/// of the contract.
pub fn damage(attacker: Option<Element>, defender: Option<Element>) -> u32 {
    let (a, d) = match (attacker, defender) {
        (Some(a), Some(d)) => (a, d),
        _ => return DAMAGE_NEUTRAL,
    };
    if a == d {
        return DAMAGE_NEUTRAL;
    }

    if a.dominates() == d {
        return DAMAGE_CRUSH;
    }
    if d.dominates() == a {
        return DAMAGE_NULLIFIED;
    }

    if a.generates() == d {
        return DAMAGE_NOURISH;
    }
    if d.generates() == a {
        return DAMAGE_NOURISHED_BY;
    }

    DAMAGE_NEUTRAL
}

/// Cosmetic glow intensity derived from the best damage any present ball
/// element would deal to a brick. No gameplay effect.
pub const fn glow_factor(best_damage: u32) -> f32 {
    match best_damage {
        6 => 2.0,
        4 => 1.5,
        3 => 1.0,
        2 => 0.6,
        0 => 0.25,
        _ => 1.0,
    }
}
