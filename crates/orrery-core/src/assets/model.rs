use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, OptionId, QuestionId};
use crate::components::color::Rgb;
use crate::error::{ConfigResult, ConfigurationError};

/// A planet record as served by the catalog.
/// Field names follow the JSON API (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialBody {
    pub id: BodyId,
    pub name: String,
    /// 1-based rank by distance from the sun.
    pub order_from_sun: u32,
    /// Equatorial diameter in km.
    pub diameter: f64,
    pub has_rings: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_color: Option<String>,
    /// CSS hex color.
    pub color: String,

    // Display-only fields below; the engines never read them.
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub composition: String,
    #[serde(default)]
    pub exploration: String,
    #[serde(default)]
    pub day_length: String,
    #[serde(default)]
    pub year_length: String,
    #[serde(default)]
    pub moons: u32,
    /// Mean distance from the sun in km.
    #[serde(default)]
    pub distance_from_sun: u64,
    /// Mean temperature in °C.
    #[serde(default)]
    pub temperature: i32,
    #[serde(default)]
    pub features: Vec<PlanetFeature>,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetFeature {
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl CelestialBody {
    /// Base render color.
    pub fn rgb(&self) -> ConfigResult<Rgb> {
        Rgb::from_hex(&self.color)
    }

    /// Ring color, if the body has rings. Ringed bodies without an explicit
    /// color get the default ring tint.
    pub fn ring_rgb(&self) -> ConfigResult<Option<Rgb>> {
        if !self.has_rings {
            return Ok(None);
        }
        match &self.ring_color {
            Some(hex) => Rgb::from_hex(hex).map(Some),
            None => Ok(Some(Rgb::default())),
        }
    }

    /// "3rd planet from the Sun".
    pub fn ordinal_label(&self) -> String {
        format!("{}{} planet from the Sun", self.order_from_sun, ordinal_suffix(self.order_from_sun))
    }
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th ... 11th, 12th, 13th, 21st.
pub fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: OptionId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: QuestionId,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub correct_option_id: OptionId,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn has_option(&self, option: OptionId) -> bool {
        self.options.iter().any(|o| o.id == option)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.has_option(self.correct_option_id) {
            Ok(())
        } else {
            Err(ConfigurationError::CorrectOptionMissing {
                question: self.id,
                option: self.correct_option_id.0,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunFact {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub icon_bg_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreContent {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub image: String,
    pub link: String,
}

/// Shape-check a body set for the scene: non-empty, unique ids, unique
/// positive orbital orders, positive diameters, parseable colors, and ring
/// colors only on ringed bodies.
pub fn validate_bodies(bodies: &[CelestialBody]) -> ConfigResult<()> {
    if bodies.is_empty() {
        return Err(ConfigurationError::EmptyBodySet);
    }

    let mut ids = HashSet::with_capacity(bodies.len());
    let mut orders: HashMap<u32, BodyId> = HashMap::with_capacity(bodies.len());
    for body in bodies {
        if !ids.insert(body.id) {
            return Err(ConfigurationError::DuplicateBodyId(body.id));
        }
        if body.order_from_sun == 0 {
            return Err(ConfigurationError::InvalidOrbitalOrder { id: body.id });
        }
        if let Some(&first) = orders.get(&body.order_from_sun) {
            return Err(ConfigurationError::DuplicateOrbitalOrder {
                order: body.order_from_sun,
                first,
                second: body.id,
            });
        }
        orders.insert(body.order_from_sun, body.id);

        if !(body.diameter > 0.0) {
            return Err(ConfigurationError::InvalidDiameter { id: body.id, diameter: body.diameter });
        }
        if !body.has_rings && body.ring_color.is_some() {
            return Err(ConfigurationError::RingColorWithoutRings { id: body.id });
        }
        body.rgb()?;
        body.ring_rgb()?;
    }
    Ok(())
}

/// Full-set check on top of [`validate_bodies`]: orders form exactly 1..=N.
pub fn validate_body_set(bodies: &[CelestialBody]) -> ConfigResult<()> {
    validate_bodies(bodies)?;
    let mut orders: Vec<u32> = bodies.iter().map(|b| b.order_from_sun).collect();
    orders.sort_unstable();
    for (i, &found) in orders.iter().enumerate() {
        let expected = i as u32 + 1;
        if found != expected {
            return Err(ConfigurationError::NonContiguousOrbitalOrder { expected, found });
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn ordinal_suffixes() {
        let cases = [(1, "st"), (2, "nd"), (3, "rd"), (4, "th"), (11, "th"), (12, "th"), (13, "th"), (21, "st"), (22, "nd"), (113, "th")];
        for (n, want) in cases {
            assert_eq!(ordinal_suffix(n), want, "n = {n}");
        }
        assert_eq!(body(3, 3, 1.0).ordinal_label(), "3rd planet from the Sun");
    }

    #[test]
    fn parses_api_shape() {
        let json = r##"{
            "id": 6, "name": "Saturn", "orderFromSun": 6, "diameter": 116460,
            "hasRings": true, "ringColor": "#FFC76E", "color": "#E5B97F",
            "dayLength": "10.7 hours", "moons": 82,
            "features": [{ "icon": "ri-planet-line", "title": "Rings", "description": "Ice." }]
        }"##;
        let saturn: CelestialBody = serde_json::from_str(json).unwrap();
        assert_eq!(saturn.order_from_sun, 6);
        assert_eq!(saturn.day_length, "10.7 hours");
        assert!(saturn.ring_rgb().unwrap().is_some());
        assert_eq!(saturn.features.len(), 1);
    }

    #[test]
    fn question_prompt_maps_to_question_field() {
        let q = question(1, 2);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["question"], "Question 1?");
        assert_eq!(json["correctOptionId"], 2);
    }

    #[test]
    fn question_without_its_correct_option_is_rejected() {
        let q = question(7, 9);
        assert_eq!(
            q.validate(),
            Err(ConfigurationError::CorrectOptionMissing { question: QuestionId(7), option: 9 })
        );
    }

    #[test]
    fn duplicate_order_is_rejected() {
        let mut set = bodies(3);
        set[2].order_from_sun = 2;
        assert_eq!(
            validate_bodies(&set),
            Err(ConfigurationError::DuplicateOrbitalOrder { order: 2, first: BodyId(2), second: BodyId(3) })
        );
    }

    #[test]
    fn ring_color_requires_rings() {
        let mut set = bodies(2);
        set[1].ring_color = Some("#FFFFFF".into());
        assert_eq!(validate_bodies(&set), Err(ConfigurationError::RingColorWithoutRings { id: BodyId(2) }));
    }

    #[test]
    fn gaps_pass_the_scene_check_but_not_the_set_check() {
        let set = vec![body(1, 1, 10.0), body(2, 3, 10.0)];
        assert!(validate_bodies(&set).is_ok());
        assert_eq!(
            validate_body_set(&set),
            Err(ConfigurationError::NonContiguousOrbitalOrder { expected: 2, found: 3 })
        );
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(validate_bodies(&[]), Err(ConfigurationError::EmptyBodySet));
    }
}
