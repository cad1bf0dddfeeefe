//! Retained globe scene: built once, re-projected when the camera is dirty,
//! restyled in place on theme or interaction changes.

use formats::{BaseMap, Beacon, CountryDataset, MarkerKind, Palette, RegionSet};
use foundation::Time;
use foundation::math::{geo_circle, km_to_degrees};
use scene::World;
use scene::components::{Color, Geometry, Layer, NodeKind, Paint, PathData, Shape, Visibility};
use scene::entity::EntityId;
use scene::prefabs::{DecorOptions, GlobeDecor, hex_centers, hex_corners, spawn_globe_decor};
use scene::selection::{InteractionState, Selection};
use scene::visibility::HorizonTest;
use tracing::{debug, warn};

use crate::camera::CameraState;
use crate::orbit::OrbitSimulator;
use crate::projection::{Projection, Viewport};

const BEACON_RADIUS_PX: f64 = 3.5;
const ORBIT_MARKER_RADIUS_PX: f64 = 5.0;
const INSTALLATION_RADIUS_PX: f64 = 4.0;
const CONFLICT_RADIUS_PX: f64 = 5.5;
/// Dash pattern of orbit traces; the offset scrolls along it.
const ORBIT_DASH: [f64; 2] = [3.0, 5.0];
const ORBIT_DASH_SPEED_PX_PER_MS: f64 = 0.012;
/// Screen offset of an orbital object's name tag from its marker center.
const ORBIT_LABEL_OFFSET_PX: [f64; 2] = [8.0, -8.0];

#[derive(Debug, Clone, PartialEq)]
pub struct CountryNode {
    pub id: u32,
    pub name: String,
    pub has_data: bool,
    pub entity: EntityId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeaconNode {
    pub entity: EntityId,
    pub beacon: Beacon,
    pub country_id: Option<u32>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitNodes {
    pub trace: EntityId,
    pub marker: EntityId,
    pub label: EntityId,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FocusNode {
    pub region: usize,
    pub marker: usize,
    pub dot: EntityId,
    pub ring: Option<EntityId>,
    pub base_radius_px: f64,
}

/// Camera of the last redraw. Any change in rotation, scale or translate
/// makes the projected paths stale.
#[derive(Debug, Clone, Default)]
pub struct ProjectionCache {
    last: Option<CameraState>,
}

impl ProjectionCache {
    pub fn is_dirty(&self, camera: &CameraState) -> bool {
        self.last.as_ref() != Some(camera)
    }

    pub fn store(&mut self, camera: CameraState) {
        self.last = Some(camera);
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

/// Sampling and culling settings fixed at build time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderSettings {
    pub horizon_threshold: f64,
    pub orbit_samples: usize,
    pub geo_circle_steps: usize,
    pub pulse_amplitude: f64,
    pub decor: DecorOptions,
}

/// One visible node, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem<'a> {
    pub entity: EntityId,
    pub layer: Layer,
    pub kind: NodeKind,
    pub paint: &'a Paint,
    pub shape: &'a Shape,
}

pub struct SceneRenderer {
    world: World,
    decor: GlobeDecor,
    countries: Vec<CountryNode>,
    borders: EntityId,
    beacons: Vec<BeaconNode>,
    orbits: Vec<OrbitNodes>,
    focus: Vec<FocusNode>,
    palette: Palette,
    settings: RenderSettings,
    viewport: Viewport,
    base_radius: f64,
    cache: ProjectionCache,
    projection: Option<Projection>,
    active_region: Option<usize>,
    overlay_opacity: f64,
    overlay_attached: bool,
}

impl SceneRenderer {
    pub fn build(
        basemap: &BaseMap,
        dataset: &CountryDataset,
        regions: &RegionSet,
        orbits: &OrbitSimulator,
        palette: Palette,
        settings: RenderSettings,
        viewport: Viewport,
        base_radius: f64,
    ) -> Self {
        let mut world = World::new();
        let decor = spawn_globe_decor(&mut world, &settings.decor);

        let mut countries = Vec::with_capacity(basemap.countries.len());
        for (i, shape) in basemap.countries.iter().enumerate() {
            let name = match dataset.name_of(shape.id) {
                Some(n) => n.to_string(),
                None => {
                    warn!(id = shape.id, "country id missing from dataset");
                    format!("Country {}", shape.id)
                }
            };
            let rings = shape.rings().cloned().collect();
            let entity = world.spawn_with(
                NodeKind::Country(i),
                Layer::Countries,
                Geometry::GeoPolygon { rings },
                Paint::default(),
            );
            countries.push(CountryNode {
                id: shape.id,
                has_data: dataset.has_data(shape.id),
                name,
                entity,
            });
        }

        let borders = world.spawn_with(
            NodeKind::Decor,
            Layer::Borders,
            Geometry::GeoLines {
                lines: basemap.borders.clone(),
            },
            Paint::default(),
        );

        let beacons = dataset
            .beacons
            .iter()
            .enumerate()
            .map(|(i, b)| BeaconNode {
                entity: world.spawn_with(
                    NodeKind::Beacon(i),
                    Layer::Beacons,
                    Geometry::GeoPoint {
                        at: b.at(),
                        radius_px: BEACON_RADIUS_PX,
                    },
                    Paint::default(),
                ),
                beacon: b.clone(),
                country_id: countries.iter().find(|c| c.name == b.country).map(|c| c.id),
            })
            .collect();

        let orbit_nodes = orbits
            .objects()
            .iter()
            .enumerate()
            .map(|(i, o)| OrbitNodes {
                trace: world.spawn_with(
                    NodeKind::OrbitTrace(i),
                    Layer::OrbitTraces,
                    Geometry::GeoLines {
                        lines: vec![o.trace(settings.orbit_samples)],
                    },
                    Paint::default(),
                ),
                marker: world.spawn_with(
                    NodeKind::OrbitMarker(i),
                    Layer::OrbitMarkers,
                    Geometry::GeoPoint {
                        at: o.position(),
                        radius_px: ORBIT_MARKER_RADIUS_PX,
                    },
                    Paint::default(),
                ),
                label: world.spawn(NodeKind::OrbitLabel(i), Layer::OrbitMarkers),
            })
            .collect();

        let mut focus = Vec::new();
        for (ri, region) in regions.regions.iter().enumerate() {
            for (mi, m) in region.markers.iter().enumerate() {
                let flat = focus.len();
                let ring = (m.radius_km > 0.0).then(|| {
                    world.spawn_with(
                        NodeKind::FocusRing(flat),
                        Layer::FocusRings,
                        Geometry::GeoPolygon {
                            rings: vec![geo_circle(
                                m.at(),
                                km_to_degrees(m.radius_km),
                                settings.geo_circle_steps,
                            )],
                        },
                        Paint::default(),
                    )
                });
                let base_radius_px = match m.kind {
                    MarkerKind::Installation => INSTALLATION_RADIUS_PX,
                    MarkerKind::ConflictZone => CONFLICT_RADIUS_PX,
                };
                let dot = world.spawn_with(
                    NodeKind::FocusMarker(flat),
                    Layer::FocusMarkers,
                    Geometry::GeoPoint {
                        at: m.at(),
                        radius_px: base_radius_px,
                    },
                    Paint::default(),
                );
                focus.push(FocusNode {
                    region: ri,
                    marker: mi,
                    dot,
                    ring,
                    base_radius_px,
                });
            }
        }

        debug!(
            nodes = world.len(),
            countries = countries.len(),
            focus_markers = focus.len(),
            "globe scene built"
        );

        let mut renderer = Self {
            world,
            decor,
            countries,
            borders,
            beacons,
            orbits: orbit_nodes,
            focus,
            palette,
            settings,
            viewport,
            base_radius,
            cache: ProjectionCache::default(),
            projection: None,
            active_region: None,
            overlay_opacity: 0.0,
            overlay_attached: false,
        };
        renderer.restyle_static(regions);
        renderer.apply_overlay_visibility();
        renderer
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn countries(&self) -> &[CountryNode] {
        &self.countries
    }

    pub fn country(&self, idx: usize) -> Option<&CountryNode> {
        self.countries.get(idx)
    }

    pub fn country_by_id(&self, id: u32) -> Option<&CountryNode> {
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn beacon(&self, idx: usize) -> Option<&BeaconNode> {
        self.beacons.get(idx)
    }

    pub fn focus_node(&self, idx: usize) -> Option<&FocusNode> {
        self.focus.get(idx)
    }

    pub fn orbit_nodes(&self, idx: usize) -> Option<&OrbitNodes> {
        self.orbits.get(idx)
    }

    /// Projection of the last redraw; shapes, picking and markers all use it.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn is_dirty(&self, camera: &CameraState) -> bool {
        self.cache.is_dirty(camera)
    }

    pub fn resize(&mut self, viewport: Viewport, base_radius: f64) {
        self.viewport = viewport;
        self.base_radius = base_radius;
        self.cache.invalidate();
    }

    /// Re-project every geographic and disc-relative node for `camera`.
    pub fn reproject(&mut self, camera: &CameraState) {
        let projection = Projection::new(camera, self.base_radius);
        let horizon = projection.horizon(self.settings.horizon_threshold);
        let entities: Vec<EntityId> = self.world.entities().collect();
        for e in entities {
            let Some(geometry) = self.world.geometry(e) else {
                continue;
            };
            let shape = project_geometry(geometry, &projection, &horizon, self.viewport);
            self.world.set_shape(e, shape);
        }
        self.projection = Some(projection);
        self.cache.store(*camera);
    }

    /// Move orbit markers and their labels to the objects' current positions.
    /// Objects behind the horizon are hidden and keep their last screen position.
    pub fn update_orbit_markers(&mut self, orbits: &mut OrbitSimulator) {
        let Some(projection) = self.projection else {
            return;
        };
        let horizon = projection.horizon(self.settings.horizon_threshold);
        for (i, nodes) in self.orbits.iter().enumerate() {
            let Some(object) = orbits.get_mut(i) else {
                continue;
            };
            let at = object.position();
            self.world.set_geometry(
                nodes.marker,
                Geometry::GeoPoint {
                    at,
                    radius_px: ORBIT_MARKER_RADIUS_PX,
                },
            );
            let screen = projection.project(at).filter(|_| horizon.is_front_facing(at));
            match screen {
                Some(center) => {
                    object.last_screen = Some(center);
                    object.visible = true;
                    self.world.set_shape(
                        nodes.marker,
                        Shape::Circle {
                            center,
                            radius: ORBIT_MARKER_RADIUS_PX,
                        },
                    );
                    self.world.set_shape(
                        nodes.label,
                        Shape::Text {
                            anchor: [
                                center[0] + ORBIT_LABEL_OFFSET_PX[0],
                                center[1] + ORBIT_LABEL_OFFSET_PX[1],
                            ],
                            text: object.label.clone(),
                        },
                    );
                }
                None => object.visible = false,
            }
            let v = if object.visible {
                Visibility::visible()
            } else {
                Visibility::hidden()
            };
            for e in [nodes.marker, nodes.label] {
                self.world.set_visibility(e, v);
            }
        }
    }

    /// Cheap per-frame effects that never touch projected paths.
    pub fn animate(&mut self, now: Time, pulse: f64) {
        let offset = -(now.ms() * ORBIT_DASH_SPEED_PX_PER_MS) % (ORBIT_DASH[0] + ORBIT_DASH[1]);
        for nodes in &self.orbits {
            if let Some(p) = self.world.paint_mut(nodes.trace) {
                p.dash_offset = offset;
            }
        }

        let grow = 1.0 + self.settings.pulse_amplitude * pulse;
        for node in self.focus.iter().filter(|n| Some(n.region) == self.active_region) {
            let radius = node.base_radius_px * grow;
            if let Some(Shape::Circle { center, .. }) = self.world.shape(node.dot).cloned() {
                self.world.set_shape(node.dot, Shape::Circle { center, radius });
            }
        }
    }

    pub fn set_palette(&mut self, palette: Palette, regions: &RegionSet) {
        self.palette = palette;
        self.restyle_static(regions);
    }

    /// Paint every node from the palette, leaving interaction state neutral.
    fn restyle_static(&mut self, regions: &RegionSet) {
        let p = &self.palette;
        let d = &self.decor;
        let mut paints: Vec<(EntityId, Paint)> = vec![
            (d.stars, Paint::fill(p.star).with_opacity(0.8)),
            (d.atmosphere, Paint::fill(p.atmosphere).with_glow(true)),
            (d.ocean, Paint::fill(p.ocean_inner)),
            (d.hex, Paint::stroke(p.hex_stroke, 0.5).with_opacity(0.35)),
            (d.graticule_minor, Paint::stroke(p.graticule_minor, 0.4).with_opacity(0.6)),
            (d.graticule_major, Paint::stroke(p.graticule_major, 0.7)),
            (d.equator, Paint::stroke(p.parallels, 1.0)),
            (d.tropics, Paint::stroke(p.parallels, 0.8).with_dash([4.0, 4.0])),
            (d.polar_circles, Paint::stroke(p.parallels, 0.8).with_dash([2.0, 4.0])),
            (d.ticks, Paint::stroke(p.tick, 0.8)),
            (self.borders, Paint::stroke(p.border, 0.6)),
        ];
        for (i, ring) in d.rings.iter().enumerate() {
            let paint = Paint::stroke(p.ring, 0.8).with_opacity(1.0 - 0.25 * i as f64);
            let paint = if i + 1 == d.rings.len() {
                paint.with_dash([1.0, 6.0])
            } else {
                paint
            };
            paints.push((*ring, paint));
        }
        for b in &self.beacons {
            paints.push((b.entity, Paint::fill(p.beacon).with_glow(true)));
        }
        for (e, paint) in paints {
            self.world.set_paint(e, paint);
        }

        for c in &self.countries {
            let paint = country_paint(p, c.has_data, InteractionState::Normal);
            self.world.set_paint(c.entity, paint);
        }

        for node in &self.focus {
            let Some(marker) = regions
                .regions
                .get(node.region)
                .and_then(|r| r.markers.get(node.marker))
            else {
                continue;
            };
            let status = p.status_color(marker.status.color_key());
            let dot = Paint::fill(p.category_color(&marker.category))
                .with_stroke(status, 1.0)
                .with_glow(true);
            self.world.set_paint(node.dot, dot);
            if let Some(ring) = node.ring {
                let mut paint = Paint::fill(status.with_alpha(0.1)).with_stroke(status, 1.0);
                paint.dash = marker.status.dash();
                self.world.set_paint(ring, paint);
            }
        }
        self.apply_overlay_opacity();
    }

    /// Country and orbit paints that depend on selection, hover and tracking.
    pub fn restyle_interactive(&mut self, selection: &Selection, orbits: &OrbitSimulator) {
        for c in &self.countries {
            let state = selection.state_of(c.entity);
            let paint = country_paint(&self.palette, c.has_data, state);
            self.world.set_paint(c.entity, paint);
        }
        for (i, nodes) in self.orbits.iter().enumerate() {
            let Some(object) = orbits.get(i) else {
                continue;
            };
            let color = self.palette.orbit_color(&object.color);
            let offset = self.world.paint(nodes.trace).map(|p| p.dash_offset).unwrap_or(0.0);
            let mut trace = if object.tracked {
                Paint::stroke(color, 2.0).with_glow(true)
            } else {
                Paint::stroke(color, 1.0).with_opacity(0.6)
            }
            .with_dash(ORBIT_DASH);
            trace.dash_offset = offset;
            self.world.set_paint(nodes.trace, trace);
            self.world.set_paint(
                nodes.marker,
                Paint::fill(color)
                    .with_stroke(self.palette.background, 1.0)
                    .with_glow(true),
            );
            let label = Paint::fill(color).with_opacity(if object.tracked { 1.0 } else { 0.8 });
            self.world.set_paint(nodes.label, label);
        }
    }

    /// Show the overlay nodes of `region` (or none).
    pub fn set_active_region(&mut self, region: Option<usize>) {
        if self.active_region != region {
            self.active_region = region;
            self.apply_overlay_visibility();
        }
    }

    pub fn set_overlay(&mut self, opacity: f64, attached: bool) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity != self.overlay_opacity {
            self.overlay_opacity = opacity;
            self.apply_overlay_opacity();
        }
        if attached != self.overlay_attached {
            self.overlay_attached = attached;
            self.apply_overlay_visibility();
        }
    }

    fn apply_overlay_opacity(&mut self) {
        let opacity = self.overlay_opacity;
        for node in &self.focus {
            for e in std::iter::once(node.dot).chain(node.ring) {
                if let Some(p) = self.world.paint_mut(e) {
                    p.opacity = opacity;
                }
            }
        }
    }

    fn apply_overlay_visibility(&mut self) {
        for node in &self.focus {
            let shown = self.overlay_attached && Some(node.region) == self.active_region;
            let v = if shown {
                Visibility::visible()
            } else {
                Visibility::hidden()
            };
            for e in std::iter::once(node.dot).chain(node.ring) {
                self.world.set_visibility(e, v);
            }
        }
    }

    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        self.world
            .drawables()
            .into_iter()
            .filter_map(|(entity, layer, paint, shape)| {
                Some(DrawItem {
                    entity,
                    layer,
                    kind: self.world.kind(entity)?,
                    paint,
                    shape,
                })
            })
            .collect()
    }

    /// Projected shapes of every node, for comparing two renders.
    pub fn shapes(&self) -> Vec<(EntityId, Shape)> {
        self.world
            .entities()
            .filter_map(|e| Some((e, self.world.shape(e)?.clone())))
            .collect()
    }
}

/// Fill and stroke of a country: selected beats hovered beats the data fill.
pub fn country_paint(p: &Palette, has_data: bool, state: InteractionState) -> Paint {
    match state {
        InteractionState::Selected => Paint::fill(p.accent)
            .with_stroke(p.accent, 1.2)
            .with_glow(true),
        InteractionState::Hovered => Paint::fill(p.land_hover)
            .with_stroke(p.land_hover_stroke, 1.0)
            .with_glow(true),
        InteractionState::Normal => {
            let fill: Color = if has_data { p.land_known } else { p.land_unknown };
            Paint::fill(fill).with_stroke(p.land_stroke, 0.5)
        }
    }
}

fn project_geometry(
    geometry: &Geometry,
    projection: &Projection,
    horizon: &HorizonTest,
    viewport: Viewport,
) -> Shape {
    let center = projection.center();
    let radius = projection.radius();
    match geometry {
        Geometry::GeoPolygon { rings } => {
            let mut path = PathData::new();
            for ring in rings {
                if let Some(points) = projection.project_ring(ring) {
                    path.push(points, true);
                }
            }
            Shape::Path(path)
        }
        Geometry::GeoLines { lines } => {
            let mut path = PathData::new();
            for line in lines {
                for piece in projection.project_line(line) {
                    path.push(piece, false);
                }
            }
            Shape::Path(path)
        }
        Geometry::GeoPoint { at, radius_px } => match projection.project(*at) {
            Some(c) if horizon.is_front_facing(*at) => Shape::Circle {
                center: c,
                radius: *radius_px,
            },
            _ => Shape::Empty,
        },
        Geometry::DiscCircle { radius_factor } => Shape::Circle {
            center,
            radius: radius * radius_factor,
        },
        Geometry::DiscTicks {
            inner,
            outer,
            outer_major,
            step_deg,
            major_every,
        } => {
            let mut path = PathData::new();
            let step = step_deg.max(0.5);
            let n = (360.0 / step).round() as u32;
            for i in 0..n {
                let a = (i as f64 * step).to_radians();
                let (s, c) = a.sin_cos();
                let r2 = if *major_every > 0 && i % major_every == 0 {
                    *outer_major
                } else {
                    *outer
                };
                path.push(
                    vec![
                        [center[0] + c * radius * inner, center[1] + s * radius * inner],
                        [center[0] + c * radius * r2, center[1] + s * radius * r2],
                    ],
                    false,
                );
            }
            Shape::Path(path)
        }
        Geometry::HexPattern { cell_px } => {
            let mut path = PathData::new();
            for c in hex_centers(center, radius, *cell_px) {
                path.push(hex_corners(c, *cell_px), true);
            }
            Shape::Path(path)
        }
        Geometry::Stars { points } => Shape::Points(
            points
                .iter()
                .map(|s| [s[0] * viewport.width, s[1] * viewport.height, s[2]])
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectionCache, country_paint};
    use crate::camera::CameraState;
    use formats::ThemeTokens;
    use scene::selection::InteractionState;

    #[test]
    fn cache_is_dirty_until_stored() {
        let mut cache = ProjectionCache::default();
        let cam = CameraState {
            rotation: [1.0, 2.0, 0.0],
            scale: 1.0,
            translate: [10.0, 10.0],
        };
        assert!(cache.is_dirty(&cam));
        cache.store(cam);
        assert!(!cache.is_dirty(&cam));
        let mut moved = cam;
        moved.scale = 1.0001;
        assert!(cache.is_dirty(&moved));
        cache.invalidate();
        assert!(cache.is_dirty(&cam));
    }

    #[test]
    fn country_paint_precedence() {
        let p = ThemeTokens::default().resolve().expect("palette");
        let normal = country_paint(&p, true, InteractionState::Normal);
        let unknown = country_paint(&p, false, InteractionState::Normal);
        let selected = country_paint(&p, true, InteractionState::Selected);
        let hovered = country_paint(&p, true, InteractionState::Hovered);
        assert_ne!(normal.fill, unknown.fill);
        assert_eq!(selected.fill, Some(p.accent));
        assert!(selected.glow && hovered.glow && !normal.glow);
        assert_eq!(hovered.fill, Some(p.land_hover));
    }
}
