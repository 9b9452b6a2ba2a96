use crate::config::MapConfig;
use crate::dataset::DatasetIndex;
use crate::error::LoadError;
use crate::legend::Legend;
use crate::path::{ProjectedLines, ProjectedShape};
use crate::scale::ColorScale;
use crate::state::{OutlineState, RenderState};
use crate::style::{NeutralStyle, Paint, StyleConfig};
use crate::topology::Topology;

/// Tooltip position relative to the pointer.
pub const TOOLTIP_OFFSET: (f64, f64) = (25.0, -20.0);

/// User input the map reacts to, independent of how it is drawn.
pub trait MapEvents {
    /// Pointer entered or moved over a county; `pointer` is in viewport
    /// (client) pixels, matching a `position: fixed` tooltip.
    fn on_hover(&mut self, feature_id: Option<&str>, pointer: (f64, f64));
    fn on_unhover(&mut self);
    fn on_cycle_palette(&mut self);
    fn on_toggle_outlines(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountyStyle {
    pub fill: Paint,
    pub stroke: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountyShape {
    pub id: Option<String>,
    pub classified: bool,
    pub shape: ProjectedShape,
    pub style: CountyStyle,
}

impl CountyShape {
    /// Unpainted shapes do not receive pointer events.
    pub fn is_hoverable(&self) -> bool {
        !(self.style.fill.is_none() && self.style.stroke.is_none())
    }
}

/// Everything a renderer draws, in drawing order: legend, counties, then
/// the state-border mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub width: f64,
    pub height: f64,
    pub legend: Legend,
    pub counties: Vec<CountyShape>,
    pub state_mesh: ProjectedLines,
    pub style: StyleConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub lines: Vec<String>,
}

impl Tooltip {
    pub fn opacity(&self) -> f64 {
        if self.visible { 1.0 } else { 0.0 }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Tooltip text for a county: state, county name, density. Absent fields
/// read `unknown`.
pub fn tooltip_lines(dataset: &DatasetIndex, id: Option<&str>) -> Vec<String> {
    const UNKNOWN: &str = "unknown";
    let state = id.and_then(|id| dataset.state_name(id)).unwrap_or(UNKNOWN);
    let county = id.and_then(|id| dataset.county_name(id)).unwrap_or(UNKNOWN);
    let density = id
        .and_then(|id| dataset.density(id))
        .map_or_else(|| UNKNOWN.to_string(), |d| d.to_string());
    vec![
        state.to_string(),
        format!("County Name: {county}"),
        format!("Population Density: {density}"),
    ]
}

/// Owns the render state and applies every interaction to the scene.
#[derive(Debug, Clone)]
pub struct MapController {
    dataset: DatasetIndex,
    scale: ColorScale,
    state: RenderState,
    style: StyleConfig,
    scene: MapScene,
    tooltip: Tooltip,
}

impl MapController {
    /// Project and style every county of the topology against the table.
    pub fn new(
        config: &MapConfig,
        topology: &Topology,
        dataset: DatasetIndex,
    ) -> Result<Self, LoadError> {
        let projection = config.projection();
        let classifier = config.classifier();
        let state = RenderState::default();
        let scale = ColorScale::new(state.palette);

        let counties = topology
            .features(&config.counties_object)?
            .into_iter()
            .map(|feature| CountyShape {
                classified: classifier.classify(feature.id()),
                shape: ProjectedShape::project(&feature.geometry, &projection),
                id: feature.id.map(|id| id.as_str().to_string()),
                style: CountyStyle {
                    fill: Paint::None,
                    stroke: Paint::None,
                },
            })
            .collect();
        let mesh = topology.mesh(&config.states_object, |a, b| a != b)?;

        let mut controller = Self {
            scene: MapScene {
                width: config.width,
                height: config.height,
                legend: Legend::build(&scale, &config.legend),
                counties,
                state_mesh: ProjectedLines::project(&mesh, &projection),
                style: config.style.clone(),
            },
            dataset,
            scale,
            state,
            style: config.style.clone(),
            tooltip: Tooltip::default(),
        };
        controller.repaint(true, true);
        Ok(controller)
    }

    /// Bring the controller to `target` through the regular interactions.
    pub fn with_state(mut self, target: RenderState) -> Self {
        if self.state.palette != target.palette {
            self.on_cycle_palette();
        }
        if self.state.outlines != target.outlines {
            self.on_toggle_outlines();
        }
        self
    }

    pub fn scene(&self) -> &MapScene {
        &self.scene
    }

    pub fn render_state(&self) -> RenderState {
        self.state
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn county(&self, id: &str) -> Option<&CountyShape> {
        self.scene
            .counties
            .iter()
            .find(|county| county.id.as_deref() == Some(id))
    }

    pub fn classified_count(&self) -> usize {
        self.scene.counties.iter().filter(|c| c.classified).count()
    }

    fn repaint(&mut self, fills: bool, strokes: bool) {
        let Self {
            dataset,
            scale,
            state,
            style,
            scene,
            ..
        } = self;
        for county in &mut scene.counties {
            let paint = data_paint(county, dataset, scale, style.neutral);
            if fills {
                county.style.fill = paint;
            }
            if strokes {
                county.style.stroke = match state.outlines {
                    OutlineState::Hidden if county.classified => style.hidden_outline,
                    _ => paint,
                };
            }
        }
    }
}

fn data_paint(
    county: &CountyShape,
    dataset: &DatasetIndex,
    scale: &ColorScale,
    neutral: NeutralStyle,
) -> Paint {
    if !county.classified {
        return neutral.paint();
    }
    let density = county.id.as_deref().and_then(|id| dataset.density(id));
    Paint::Color(scale.color_of(density))
}

impl MapEvents for MapController {
    fn on_hover(&mut self, feature_id: Option<&str>, pointer: (f64, f64)) {
        self.tooltip = Tooltip {
            visible: true,
            left: pointer.0 + TOOLTIP_OFFSET.0,
            top: pointer.1 + TOOLTIP_OFFSET.1,
            lines: tooltip_lines(&self.dataset, feature_id),
        };
    }

    fn on_unhover(&mut self) {
        self.tooltip.visible = false;
    }

    fn on_cycle_palette(&mut self) {
        self.state.palette = self.state.palette.next();
        self.scale.set_palette(self.state.palette);
        self.repaint(true, self.state.outlines.is_visible());
        self.scene.legend.recolor(&self.scale);
    }

    fn on_toggle_outlines(&mut self) {
        self.state.outlines = self.state.outlines.toggled();
        self.repaint(false, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{TABLE, TOPOLOGY};
    use crate::scale::PaletteKind;
    use crate::style::Rgb;

    fn controller_with(config: &MapConfig) -> MapController {
        let topology = Topology::from_json(TOPOLOGY).unwrap();
        let dataset = DatasetIndex::from_csv(TABLE).unwrap();
        MapController::new(config, &topology, dataset).unwrap()
    }

    fn controller() -> MapController {
        controller_with(&MapConfig::default())
    }

    fn styles(controller: &MapController) -> Vec<CountyStyle> {
        controller.scene().counties.iter().map(|c| c.style).collect()
    }

    #[test]
    fn nevada_county_is_colored_by_its_bucket() {
        let map = controller();
        let clark = map.county("32003").unwrap();
        assert!(clark.classified);
        assert_eq!(map.scale().bucket(42.0), Some(2));
        let expected = Paint::Color(PaletteKind::OrRd.colors()[2]);
        assert_eq!(clark.style, CountyStyle { fill: expected, stroke: expected });
    }

    #[test]
    fn out_of_state_county_is_neutral() {
        let map = controller();
        let la = map.county("06037").unwrap();
        assert!(!la.classified);
        assert_eq!(la.style.fill, Paint::None);
        assert_eq!(la.style.stroke, Paint::None);
        assert!(!la.is_hoverable());
    }

    #[test]
    fn light_gray_neutral_is_selectable() {
        let mut config = MapConfig::default();
        config.style.neutral = NeutralStyle::LightGray;
        let map = controller_with(&config);
        let la = map.county("06037").unwrap();
        assert_eq!(la.style.fill, Paint::Color(Rgb::LIGHT_GRAY));
        assert!(la.is_hoverable());
    }

    #[test]
    fn unparsable_density_falls_back_to_lowest_bucket() {
        let map = controller();
        let churchill = map.county("32001").unwrap();
        assert!(churchill.classified);
        assert_eq!(churchill.style.fill, Paint::Color(map.scale().unknown()));
    }

    #[test]
    fn feature_without_id_is_neutral() {
        let map = controller();
        let unnamed = map.scene().counties.iter().find(|c| c.id.is_none()).unwrap();
        assert!(!unnamed.classified);
        assert_eq!(unnamed.style.fill, Paint::None);
        assert_eq!(map.classified_count(), 2);
    }

    #[test]
    fn classified_county_missing_from_table_uses_fallback() {
        let topology = Topology::from_json(TOPOLOGY).unwrap();
        let map = MapController::new(&MapConfig::default(), &topology, DatasetIndex::default())
            .unwrap();
        let clark = map.county("32003").unwrap();
        assert_eq!(clark.style.fill, Paint::Color(map.scale().unknown()));
    }

    #[test]
    fn cycle_palette_twice_round_trips() {
        let mut map = controller();
        let before = styles(&map);
        let legend_before = map.scene().legend.clone();

        map.on_cycle_palette();
        assert_eq!(map.render_state().palette, PaletteKind::Blues);
        let clark = map.county("32003").unwrap();
        assert_eq!(clark.style.fill, Paint::Color(PaletteKind::Blues.colors()[2]));
        assert_eq!(clark.style.stroke, clark.style.fill);
        assert_eq!(
            map.scene().legend.swatches[0].fill,
            PaletteKind::Blues.colors()[0]
        );

        map.on_cycle_palette();
        assert_eq!(styles(&map), before);
        assert_eq!(map.scene().legend, legend_before);
    }

    #[test]
    fn toggle_outlines_twice_round_trips() {
        let mut map = controller();
        let before = styles(&map);

        map.on_toggle_outlines();
        assert_eq!(map.render_state().outlines, OutlineState::Hidden);
        let clark = map.county("32003").unwrap();
        assert_eq!(clark.style.stroke, Paint::None);
        assert_ne!(clark.style.fill, Paint::None);
        assert!(clark.is_hoverable());
        assert_eq!(map.county("06037").unwrap().style.stroke, Paint::None);

        map.on_toggle_outlines();
        assert_eq!(styles(&map), before);
    }

    #[test]
    fn hidden_outlines_stay_hidden_across_palette_cycles() {
        let mut map = controller();
        map.on_toggle_outlines();
        map.on_cycle_palette();
        let clark = map.county("32003").unwrap();
        assert_eq!(clark.style.stroke, Paint::None);
        assert_eq!(clark.style.fill, Paint::Color(PaletteKind::Blues.colors()[2]));

        map.on_toggle_outlines();
        let clark = map.county("32003").unwrap();
        assert_eq!(clark.style.stroke, clark.style.fill);
    }

    #[test]
    fn hidden_outline_paint_is_configurable() {
        let mut config = MapConfig::default();
        config.style.hidden_outline = Paint::Color(Rgb::BLACK);
        let mut map = controller_with(&config);
        map.on_toggle_outlines();
        assert_eq!(
            map.county("32003").unwrap().style.stroke,
            Paint::Color(Rgb::BLACK)
        );
        assert_eq!(map.county("06037").unwrap().style.stroke, Paint::None);
    }

    #[test]
    fn hover_shows_county_details_near_pointer() {
        let mut map = controller();
        map.on_hover(Some("32003"), (100.0, 200.0));
        let tooltip = map.tooltip();
        assert_eq!(tooltip.opacity(), 1.0);
        assert_eq!((tooltip.left, tooltip.top), (125.0, 180.0));
        let text = tooltip.text();
        assert!(text.contains("Nevada"));
        assert!(text.contains("Clark"));
        assert!(text.contains("42"));

        map.on_unhover();
        assert_eq!(map.tooltip().opacity(), 0.0);
        assert!(!map.tooltip().visible);
    }

    #[test]
    fn tooltip_lines_for_missing_and_nan_values() {
        let dataset = DatasetIndex::from_csv(TABLE).unwrap();
        assert_eq!(
            tooltip_lines(&dataset, Some("32001"))[2],
            "Population Density: NaN"
        );
        assert_eq!(
            tooltip_lines(&dataset, None),
            ["unknown", "County Name: unknown", "Population Density: unknown"]
        );
    }

    #[test]
    fn with_state_reaches_the_target() {
        let target = RenderState {
            palette: PaletteKind::Blues,
            outlines: OutlineState::Hidden,
        };
        let map = controller().with_state(target);
        assert_eq!(map.render_state(), target);
        assert_eq!(map.county("32003").unwrap().style.stroke, Paint::None);
    }

    #[test]
    fn shapes_and_mesh_are_projected_onto_the_canvas() {
        let map = controller();
        let scene = map.scene();
        assert_eq!(scene.counties.len(), 4);
        for county in &scene.counties {
            let bounds = county.shape.bounds().unwrap();
            assert!(bounds.min().x >= 0.0 && bounds.max().x <= scene.width);
            assert!(bounds.min().y >= 0.0 && bounds.max().y <= scene.height);
        }
        assert_eq!(scene.state_mesh.lines().count(), 1);

        let projection = MapConfig::default().projection();
        let (x, y) = crate::projection::Projection::project(&projection, -117.0, 35.0).unwrap();
        assert!(map.county("32003").unwrap().shape.contains(x, y));
        assert!(!map.county("32001").unwrap().shape.contains(x, y));
    }
}
