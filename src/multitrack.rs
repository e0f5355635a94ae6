use crate::color::SvgColor;
use crate::error::FigureError;
use crate::track::Track;
use svg::node::element::{Group, Line};

/// Packs several tracks onto one shared vertical line.
///
/// Each track keeps its own horizontal position (its elements carry
/// their coordinates); nothing is stacked. With `join`, a light
/// baseline ties the tracks together across `[min(starts),
/// max(ends)]` to mark them as one logical locus.
#[derive(Debug)]
pub struct Multitrack {
    tracks: Vec<Track>,
    join: bool,
}

impl Multitrack {
    pub fn new(tracks: Vec<Track>, join: bool) -> Result<Self, FigureError> {
        if tracks.is_empty() {
            return Err(FigureError::EmptyMultitrack);
        }
        Ok(Self { tracks, join })
    }

    pub fn height(&self) -> f32 {
        self.tracks.iter().map(Track::height).fold(0.0, f32::max)
    }

    pub fn width(&self) -> f32 {
        self.tracks.iter().map(Track::width).fold(0.0, f32::max)
    }

    fn span(&self) -> (f32, f32) {
        let start = self
            .tracks
            .iter()
            .map(Track::start)
            .fold(f32::INFINITY, f32::min);
        let end = self.tracks.iter().map(Track::end).fold(0.0, f32::max);
        (start, end)
    }

    pub fn render(&self, x: f32, y: f32, xscale: f32) -> Result<Group, FigureError> {
        let mut group = Group::new().set("transform", format!("translate({} {})", x * xscale, y));
        if self.join {
            let (start, end) = self.span();
            let mid = self.height() / 2.0;
            group = group.add(
                Line::new()
                    .set("x1", start * xscale)
                    .set("y1", mid)
                    .set("x2", end * xscale)
                    .set("y2", mid)
                    .set("stroke", SvgColor::Lightgrey.to_string())
                    .set("stroke-width", 1),
            );
        }
        for track in &self.tracks {
            group = group.add(track.render(0.0, 0.0, xscale)?);
        }
        Ok(group)
    }
}
