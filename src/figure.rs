use crate::alignment::Alignment;
use crate::element::TrackElement;
use crate::error::FigureError;
use crate::multitrack::Multitrack;
use crate::track::{DEFAULT_TRACK_HEIGHT, Track};
use log::debug;
use svg::Document;
use svg::node::element::Group;

pub const DEFAULT_GAP: f32 = 10.0;

/// Anything a figure can stack vertically.
#[derive(Debug)]
pub enum FigureItem {
    Track(Track),
    Multitrack(Multitrack),
    Alignment(Alignment),
}

impl FigureItem {
    fn height(&self) -> f32 {
        match self {
            Self::Track(track) => track.height(),
            Self::Multitrack(multitrack) => multitrack.height(),
            Self::Alignment(alignment) => alignment.height(),
        }
    }

    fn width(&self) -> f32 {
        match self {
            Self::Track(track) => track.width(),
            Self::Multitrack(multitrack) => multitrack.width(),
            Self::Alignment(alignment) => alignment.width(),
        }
    }

    fn render(&self, x: f32, y: f32, xscale: f32) -> Result<Group, FigureError> {
        match self {
            Self::Track(track) => track.render(x, y, xscale),
            Self::Multitrack(multitrack) => multitrack.render(x, y, xscale),
            Self::Alignment(alignment) => alignment.render(x, y, xscale),
        }
    }
}

/// Conversion into a stackable figure item. A bare element is wrapped
/// in a fresh track of the figure's default height.
pub trait IntoFigureItem {
    fn into_figure_item(self, track_height: f32) -> FigureItem;
}

impl IntoFigureItem for FigureItem {
    fn into_figure_item(self, _track_height: f32) -> FigureItem {
        self
    }
}

impl IntoFigureItem for Track {
    fn into_figure_item(self, _track_height: f32) -> FigureItem {
        FigureItem::Track(self)
    }
}

impl IntoFigureItem for Multitrack {
    fn into_figure_item(self, _track_height: f32) -> FigureItem {
        FigureItem::Multitrack(self)
    }
}

impl IntoFigureItem for Alignment {
    fn into_figure_item(self, _track_height: f32) -> FigureItem {
        FigureItem::Alignment(self)
    }
}

impl IntoFigureItem for TrackElement {
    fn into_figure_item(self, track_height: f32) -> FigureItem {
        FigureItem::Track(Track::with_height(track_height).add(self))
    }
}

/// The layout accumulator.
///
/// Items stack top-down in insertion order: the first item added is
/// the topmost, y grows downward as in the emitted SVG. Each `add`
/// records the item's top offset, advances the running height by the
/// item's height plus the gap below it, and widens the figure to the
/// item's extent. Offsets are non-decreasing in insertion order.
///
/// Spacing defaults are sticky: the gap used by one call becomes the
/// default for the next, and the `padding` override of `add_spaced`
/// re-adjusts the spacing the previous call left. This carry-over is
/// part of the contract, held in explicit fields.
#[derive(Debug)]
pub struct Figure {
    track_height: f32,
    padding: f32,
    next_gap: f32,
    items: Vec<(f32, FigureItem)>,
    width: f32,
    height: f32,
}

impl Figure {
    pub fn new() -> Self {
        Self::with_track_height(DEFAULT_TRACK_HEIGHT)
    }

    /// A figure whose auto-created tracks use `track_height`, with an
    /// initial top padding of half of it.
    pub fn with_track_height(track_height: f32) -> Self {
        let padding = track_height / 2.0;
        Self {
            track_height,
            padding,
            next_gap: DEFAULT_GAP,
            items: vec![],
            width: 0.0,
            height: padding,
        }
    }

    pub fn add(&mut self, item: impl IntoFigureItem) -> &mut Self {
        self.add_spaced(item, self.next_gap, None)
    }

    /// Adds an item with an explicit gap below it; `padding`, when
    /// given, replaces the spacing left above it by the previous call.
    pub fn add_spaced(
        &mut self,
        item: impl IntoFigureItem,
        gap: f32,
        padding: Option<f32>,
    ) -> &mut Self {
        if let Some(padding) = padding {
            self.height += padding - self.padding;
        }
        let item = item.into_figure_item(self.track_height);
        let top = self.height;
        self.height = top + item.height() + gap;
        self.width = self.width.max(item.width());
        self.items.push((top, item));
        self.padding = gap;
        self.next_gap = gap;
        self
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Renders the figure into an SVG document. With a target width,
    /// one horizontal scale factor `target / width` is applied to
    /// every stored item; vertical geometry is never scaled.
    pub fn show(
        &self,
        target_width: Option<f32>,
        target_height: Option<f32>,
    ) -> Result<Document, FigureError> {
        let xscale = match target_width {
            Some(target) => {
                if self.width <= 0.0 {
                    return Err(FigureError::ZeroWidthScale);
                }
                target / self.width
            }
            None => 1.0,
        };
        let height = target_height.unwrap_or(self.height);
        debug!(
            "rendering figure: {} items, {}x{}, xscale {}",
            self.items.len(),
            self.width * xscale,
            height,
            xscale
        );
        let mut document = Document::new()
            .set("viewBox", format!("0 0 {} {}", self.width * xscale, height))
            .set("width", self.width * xscale)
            .set("height", height)
            .set("preserveAspectRatio", "none");
        for (offset, item) in &self.items {
            document = document.add(item.render(0.0, *offset, xscale)?);
        }
        Ok(document)
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f32, end: f32) -> TrackElement {
        TrackElement::segment(start, end).unwrap()
    }

    #[test]
    fn test_height_accumulation() {
        let mut figure = Figure::new();
        figure.add(segment(50.0, 300.0)).add(segment(110.0, 410.0));
        assert_eq!(figure.width(), 410.0);
        // padding + (height + gap) per track
        assert_eq!(figure.height(), 5.0 + (10.0 + 10.0) + (10.0 + 10.0));
    }

    #[test]
    fn test_offsets_are_top_down_and_monotone() {
        let mut figure = Figure::new();
        figure.add(segment(0.0, 100.0)).add(segment(0.0, 100.0));
        assert_eq!(figure.items[0].0, 5.0);
        assert_eq!(figure.items[1].0, 25.0);
        let markup = figure.show(None, None).unwrap().to_string();
        assert!(markup.contains("translate(0 5)"));
        assert!(markup.contains("translate(0 25)"));
    }

    #[test]
    fn test_sticky_gap_carries_over() {
        let mut figure = Figure::new();
        figure.add_spaced(segment(0.0, 100.0), 0.0, None);
        figure.add(segment(0.0, 100.0));
        figure.add(segment(0.0, 100.0));
        // 5 + 10+0 + 10+0 + 10+0
        assert_eq!(figure.height(), 35.0);
    }

    #[test]
    fn test_padding_replaces_previous_gap() {
        let mut figure = Figure::new();
        figure.add_spaced(segment(0.0, 100.0), 10.0, None);
        figure.add_spaced(segment(0.0, 100.0), 10.0, Some(2.0));
        // 5 + 10 + 2 + 10 + 10: the second item's padding overrides
        // the first item's trailing gap.
        assert_eq!(figure.height(), 37.0);
        assert_eq!(figure.items[1].0, 17.0);
    }

    #[test]
    fn test_scale_on_zero_width_is_rejected() {
        let mut figure = Figure::new();
        figure.add(Track::new());
        assert_eq!(
            figure.show(Some(900.0), None).unwrap_err(),
            FigureError::ZeroWidthScale
        );
    }

    #[test]
    fn test_custom_track_height_wraps_elements() {
        let mut figure = Figure::with_track_height(20.0);
        figure.add(segment(0.0, 100.0));
        assert_eq!(figure.height(), 10.0 + 20.0 + 10.0);
    }

    #[test]
    fn test_document_size() {
        let mut figure = Figure::new();
        figure.add(segment(0.0, 450.0));
        let markup = figure.show(Some(900.0), None).unwrap().to_string();
        assert!(markup.contains(r#"width="900""#));
        assert!(markup.contains(r#"height="25""#));
    }
}
