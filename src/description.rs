use crate::color::Color;
use crate::element::{Direction, TrackElement};
use crate::error::FigureError;
use crate::figure::Figure;
use crate::track::{DEFAULT_TRACK_HEIGHT, Track};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// A declarative figure: tracks in stacking order, each with its
/// elements. Colors are tokens (palette name or `#`-prefixed hex) and
/// resolve when the figure is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FigureDescription {
    #[serde(default)]
    pub track_height: Option<f32>,
    pub tracks: Vec<TrackDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackDescription {
    #[serde(default)]
    pub height: Option<f32>,
    /// Gap left below this track; the figure's sticky default applies
    /// when absent.
    #[serde(default)]
    pub gap: Option<f32>,
    pub elements: Vec<ElementDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementDescription {
    Segment {
        start: f32,
        end: f32,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        direction: Option<Direction>,
        #[serde(default)]
        label: Option<String>,
    },
    Tick {
        at: f32,
        #[serde(default)]
        color: Option<String>,
    },
    Label {
        at: f32,
        text: String,
        #[serde(default)]
        font_size: Option<f32>,
    },
    Coverage {
        start: f32,
        samples: Vec<f32>,
        height: f32,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        opacity: Option<f32>,
    },
}

impl FigureDescription {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Could not parse figure description")
    }

    pub fn from_json_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read figure description '{path}'"))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Could not parse figure description '{path}'"))
    }

    /// Builds the described figure. Malformed intervals, colors and
    /// coverage data are rejected with the usual construction errors.
    pub fn build(&self) -> Result<Figure, FigureError> {
        let default_height = self.track_height.unwrap_or(DEFAULT_TRACK_HEIGHT);
        let mut figure = Figure::with_track_height(default_height);
        for track_description in &self.tracks {
            let mut track = Track::with_height(track_description.height.unwrap_or(default_height));
            for element in &track_description.elements {
                track = track.add(element.build()?);
            }
            match track_description.gap {
                Some(gap) => figure.add_spaced(track, gap, None),
                None => figure.add(track),
            };
        }
        Ok(figure)
    }
}

impl ElementDescription {
    fn build(&self) -> Result<TrackElement, FigureError> {
        match self {
            Self::Segment {
                start,
                end,
                color,
                direction,
                label,
            } => {
                let mut element = TrackElement::segment(*start, *end)?;
                if let Some(color) = color {
                    element = element.with_color(Color::from_token(color)?);
                }
                if let Some(direction) = direction {
                    element = element.with_direction(*direction);
                }
                if let Some(label) = label {
                    element = element.add(TrackElement::label(0.0, label));
                }
                Ok(element)
            }
            Self::Tick { at, color } => {
                let mut element = TrackElement::tick(*at);
                if let Some(color) = color {
                    element = element.with_color(Color::from_token(color)?);
                }
                Ok(element)
            }
            Self::Label {
                at,
                text,
                font_size,
            } => {
                let mut element = TrackElement::label(*at, text);
                if let Some(font_size) = font_size {
                    element = element.with_font_size(*font_size);
                }
                Ok(element)
            }
            Self::Coverage {
                start,
                samples,
                height,
                color,
                opacity,
            } => {
                let mut element = TrackElement::coverage(*start, samples.clone(), *height)?;
                if let Some(color) = color {
                    element = element.with_color(Color::from_token(color)?);
                }
                if let Some(opacity) = opacity {
                    element = element.with_opacity(*opacity);
                }
                Ok(element)
            }
        }
    }
}
