//! The per-frame engine and its mount/teardown wrapper.
//!
//! Host input (pointer, focus, deselect) is queued and applied at the start of
//! the next frame, so every state change happens inside `step` in a fixed
//! order: input, orbits, camera, focus overlay, redraw, cheap animations,
//! tracking tooltip.

use std::fmt;

use formats::{AssetBundle, CountryDataset, CountryInfo, FocusRegion, RegionSet, ThemeTokens};
use foundation::Time;
use runtime::metrics::Metrics;
use runtime::{
    AnimationLoop, CommandQueue, DeviceProfile, Event, EventBus, Frame, FrameClock, FrameSkip,
    PerfPolicy, Throttle,
};
use scene::components::NodeKind;
use scene::picking::{PickHit, PickOptions, pick_screen};
use scene::prefabs::DecorOptions;
use scene::selection::Selection;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::camera::{CameraController, CameraState};
use crate::config::GlobeConfig;
use crate::error::GlobeError;
use crate::focus::{FocusOverlay, Legend, ModeState, ModeTransition, Pulse};
use crate::interaction::{Gesture, PointerCommand, PointerTracker};
use crate::orbit::OrbitSimulator;
use crate::projection::{Projection, Viewport};
use crate::render::{DrawItem, RenderSettings, SceneRenderer};
use crate::svg::render_svg;
use crate::tooltip::{Placement, Tooltip, TooltipContent, TooltipSlot, TooltipSource};
use crate::tween::{TweenJob, TweenKind};

pub const METRIC_FRAMES: &str = "frames";
pub const METRIC_REDRAWS: &str = "redraws";
pub const METRIC_SKIPPED_REDRAWS: &str = "skipped_redraws";
pub const METRIC_PICKS: &str = "picks";
/// Gauge: orbital objects currently in front of the horizon.
pub const GAUGE_VISIBLE_ORBITS: &str = "visible_orbits";

/// Host request to enter (`active`) or leave regional focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSignal {
    pub region_id: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Pointer(PointerCommand),
    Focus(FocusSignal),
    /// New value of the host's deselect counter.
    Deselect(u64),
}

/// Outgoing notifications, drained by the host after each frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    SelectionChanged { country: Option<CountryInfo> },
    /// Selection dropped by the deselect signal; the callback is not fired.
    SelectionCleared,
    TrackingChanged { tracked: Option<String> },
    ModeChanged { mode: ModeState },
    TweenFinished { kind: TweenKind },
    LegendShown { region_id: String },
}

pub type SelectCallback = Box<dyn FnMut(Option<&CountryInfo>)>;

pub struct GlobeEngine {
    config: GlobeConfig,
    policy: PerfPolicy,
    dataset: CountryDataset,
    regions: RegionSet,
    viewport: Viewport,
    camera: CameraController,
    orbits: OrbitSimulator,
    renderer: SceneRenderer,
    selection: Selection,
    pointer: PointerTracker,
    /// A press is queued and not yet released in the queue.
    press_queued: bool,
    commands: CommandQueue<EngineCommand>,
    focus: FocusOverlay,
    pulse: Pulse,
    tooltip: TooltipSlot,
    tooltip_throttle: Throttle,
    events: EventBus<EngineEvent>,
    metrics: Metrics,
    clock: FrameClock,
    frame_skip: FrameSkip,
    on_select: Option<SelectCallback>,
    deselect_counter: u64,
    /// Rotation to return to when leaving focus.
    pre_focus_rotation: Option<[f64; 3]>,
    styles_dirty: bool,
}

impl fmt::Debug for GlobeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobeEngine")
            .field("viewport", &self.viewport)
            .field("camera", &self.camera.state())
            .field("mode", self.focus.mode())
            .field("selected", &self.selection.selected())
            .field("tracked", &self.orbits.tracked())
            .finish_non_exhaustive()
    }
}

impl GlobeEngine {
    /// Build the engine for a standard device. Fails before building any
    /// geometry if the config, theme or viewport is unusable.
    pub fn new(
        config: GlobeConfig,
        assets: AssetBundle,
        viewport: Viewport,
    ) -> Result<Self, GlobeError> {
        Self::for_device(config, assets, viewport, DeviceProfile::desktop())
    }

    pub fn for_device(
        config: GlobeConfig,
        assets: AssetBundle,
        viewport: Viewport,
        device: DeviceProfile,
    ) -> Result<Self, GlobeError> {
        config.validate()?;
        assets.regions.validate()?;
        let palette = assets.theme.resolve()?;
        let policy = config.perf.for_device(device);

        let cam = &config.camera;
        let initial = CameraState {
            rotation: cam.initial_rotation,
            scale: cam.default_zoom,
            translate: default_translate(&config, viewport),
        };
        let camera = CameraController::new(
            initial,
            cam.drag_sensitivity,
            cam.lat_clamp_deg,
            1.0,
            cam.focus_zoom,
        );
        let mut orbits = OrbitSimulator::new(&config.orbits);

        let settings = RenderSettings {
            horizon_threshold: config.picking.horizon_threshold,
            orbit_samples: policy.orbit_samples,
            geo_circle_steps: policy.geo_circle_steps,
            pulse_amplitude: config.focus.pulse_amplitude,
            decor: DecorOptions {
                star_count: policy.star_count,
                star_seed: config.star_seed,
                ..DecorOptions::default()
            },
        };
        let base_radius = base_radius(&config, viewport);
        let mut renderer = SceneRenderer::build(
            &assets.basemap,
            &assets.dataset,
            &assets.regions,
            &orbits,
            palette,
            settings,
            viewport,
            base_radius,
        );
        let selection = Selection::new();
        renderer.restyle_interactive(&selection, &orbits);
        renderer.reproject(&camera.state());
        renderer.update_orbit_markers(&mut orbits);

        info!(
            width = viewport.width,
            height = viewport.height,
            low_power = device.low_power,
            countries = assets.basemap.countries.len(),
            orbits = orbits.objects().len(),
            "globe engine ready"
        );

        Ok(Self {
            policy,
            dataset: assets.dataset,
            regions: assets.regions,
            viewport,
            camera,
            orbits,
            renderer,
            selection,
            pointer: PointerTracker::new(config.picking.drag_threshold_px),
            press_queued: false,
            commands: CommandQueue::with_max_len(config.command_queue_len),
            focus: FocusOverlay::new(config.focus.clone()),
            pulse: Pulse::new(config.focus.pulse_period_ms, policy.pulse_every_n),
            tooltip: TooltipSlot::default(),
            tooltip_throttle: Throttle::new(policy.tooltip_throttle_ms),
            events: EventBus::new(),
            metrics: Metrics::new(),
            clock: FrameClock::new(),
            frame_skip: FrameSkip::from_policy(&policy),
            on_select: None,
            deselect_counter: 0,
            pre_focus_rotation: None,
            styles_dirty: false,
            config,
        })
    }

    /// Replace the frame-skip gate, e.g. to force a redraw on every dirty frame.
    pub fn set_frame_skip(&mut self, frame_skip: FrameSkip) {
        self.frame_skip = frame_skip;
    }

    pub fn set_on_select(&mut self, callback: impl FnMut(Option<&CountryInfo>) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    // ---- host input ----

    /// Queue a pointer event. Consecutive moves collapse into the newest one,
    /// except while a press has not yet been classified as click or drag:
    /// every move then counts toward the drag threshold.
    pub fn pointer(&mut self, cmd: PointerCommand) -> Result<(), GlobeError> {
        let undecided_press =
            self.press_queued || (self.pointer.is_pressed() && !self.pointer.is_dragging());
        match cmd {
            PointerCommand::Down { .. } => self.press_queued = true,
            PointerCommand::Up { .. } | PointerCommand::Leave => self.press_queued = false,
            PointerCommand::Move { .. } => {}
        }
        let cmd = EngineCommand::Pointer(cmd);
        self.commands
            .push_coalescing(cmd, |prev, next| {
                !undecided_press
                    && matches!(
                        (prev, next),
                        (EngineCommand::Pointer(a), EngineCommand::Pointer(b)) if a.is_move() && b.is_move()
                    )
            })
            .map_err(|full| GlobeError::QueueFull {
                max_len: full.max_len,
            })
    }

    pub fn focus_signal(&mut self, signal: FocusSignal) -> Result<(), GlobeError> {
        if signal.active && self.regions.get(&signal.region_id).is_none() {
            warn!(region = %signal.region_id, "focus requested for unknown region");
            return Err(GlobeError::UnknownRegion(signal.region_id));
        }
        self.push(EngineCommand::Focus(signal))
    }

    pub fn deselect_signal(&mut self, counter: u64) -> Result<(), GlobeError> {
        self.push(EngineCommand::Deselect(counter))
    }

    fn push(&mut self, cmd: EngineCommand) -> Result<(), GlobeError> {
        self.commands
            .try_push(cmd)
            .map_err(|full| GlobeError::QueueFull {
                max_len: full.max_len,
            })
    }

    /// Swap the theme; geometry is kept and every paint is re-resolved.
    pub fn set_theme(&mut self, theme: &ThemeTokens) -> Result<(), GlobeError> {
        let palette = theme.resolve()?;
        self.renderer.set_palette(palette, &self.regions);
        self.renderer.restyle_interactive(&self.selection, &self.orbits);
        debug!("theme swapped");
        Ok(())
    }

    /// New canvas size in CSS px. Rotation, selection and mode are kept;
    /// translates (including the active tween's) scale with the canvas.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) -> Result<(), GlobeError> {
        let next = Viewport::new(width, height, dpr)?;
        let [w0, h0] = self.viewport.size();
        self.camera.rescale(width / w0, height / h0);
        self.viewport = next;
        self.renderer.resize(next, base_radius(&self.config, next));
        info!(width, height, dpr, "globe resized");
        Ok(())
    }

    // ---- frame loop ----

    /// Advance one frame at host time `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        let frame = self.clock.tick(now_ms);
        self.step(frame);
    }

    pub fn step(&mut self, frame: Frame) {
        let now = frame.now;
        self.metrics.inc(METRIC_FRAMES);

        let commands: Vec<EngineCommand> = self.commands.drain().collect();
        self.press_queued = false;
        for cmd in commands {
            self.apply_command(cmd, frame);
        }

        self.orbits.advance(frame.dt_ms);

        let step = self.camera.advance(now);
        if let Some(kind) = step.finished {
            self.events.emit(frame, EngineEvent::TweenFinished { kind });
            if self.focus.on_tween_finished(kind, now) {
                if matches!(self.focus.mode(), ModeState::Default) {
                    self.pre_focus_rotation = None;
                }
                self.emit_mode(frame);
            }
        } else if !self.camera.is_tweening()
            && self.focus.mode().allows_drag()
            && let Some(lon) = self.orbits.follow(
                self.camera.state().rotation[0],
                self.config.follow_rate,
                frame.dt_ms,
            )
        {
            self.camera.set_lon(lon);
        }

        let region_id = self.focus.mode().region().map(str::to_string);
        let region = region_id.as_deref().and_then(|id| self.regions.get(id));
        let progress = self.camera.tween_progress(now);
        if self.focus.update(now, progress, region)
            && let Some(legend) = self.focus.legend()
        {
            let region_id = legend.region_id.clone();
            self.events.emit(frame, EngineEvent::LegendShown { region_id });
        }
        self.renderer
            .set_overlay(self.focus.opacity(), self.focus.is_attached());

        let camera = self.camera.state();
        let dirty = self.renderer.is_dirty(&camera);
        if self
            .frame_skip
            .should_recompute(frame.index, self.camera.is_tweening(), dirty)
        {
            self.renderer.reproject(&camera);
            self.metrics.inc(METRIC_REDRAWS);
        } else if dirty {
            self.metrics.inc(METRIC_SKIPPED_REDRAWS);
        }

        self.renderer.update_orbit_markers(&mut self.orbits);
        let visible_orbits = self.orbits.objects().iter().filter(|o| o.visible).count();
        self.metrics
            .set_gauge(GAUGE_VISIBLE_ORBITS, visible_orbits as i64);
        if self.styles_dirty {
            self.renderer
                .restyle_interactive(&self.selection, &self.orbits);
            self.styles_dirty = false;
        }
        self.pulse.update(frame.index, now);
        self.renderer.animate(now, self.pulse.value());

        self.update_tracking_tooltip(now);
    }

    fn apply_command(&mut self, cmd: EngineCommand, frame: Frame) {
        match cmd {
            EngineCommand::Pointer(p) => {
                for gesture in self.pointer.handle(p) {
                    self.apply_gesture(gesture, frame);
                }
            }
            EngineCommand::Focus(signal) => self.apply_focus(signal, frame),
            EngineCommand::Deselect(counter) => self.apply_deselect(counter, frame),
        }
    }

    fn apply_gesture(&mut self, gesture: Gesture, frame: Frame) {
        let drag_allowed = self.focus.mode().allows_drag();
        match gesture {
            Gesture::DragStart if drag_allowed => {
                self.camera.cancel_tween();
                self.release_tracking(frame);
            }
            Gesture::Drag { dx, dy } if drag_allowed => {
                self.camera.rotate_by(dx, dy);
            }
            Gesture::DragStart | Gesture::Drag { .. } | Gesture::DragEnd => {}
            Gesture::Click { x, y } => self.click(x, y, frame),
            Gesture::Hover { x, y } => self.hover(x, y),
            Gesture::Leave => {
                if self.selection.set_hovered(None).is_some() {
                    self.styles_dirty = true;
                }
                self.tooltip.close_from(TooltipSource::Hover);
            }
        }
    }

    fn pick(&mut self, x: f64, y: f64) -> Option<PickHit> {
        self.metrics.inc(METRIC_PICKS);
        let opts = PickOptions {
            marker_padding_px: self.config.picking.marker_padding_px,
            stroke_half_width_px: self.config.picking.orbit_hit_width_px / 2.0,
        };
        pick_screen(self.renderer.world(), x, y, opts)
    }

    fn click(&mut self, x: f64, y: f64, frame: Frame) {
        let hit = self.pick(x, y);
        debug!(x, y, hit = ?hit.map(|h| h.kind), "click");
        match hit.map(|h| h.kind) {
            Some(NodeKind::Country(i)) => self.click_country(i, frame),
            Some(NodeKind::Beacon(i)) => {
                if let Some(content) = self.beacon_content(i) {
                    self.open_tooltip(content, TooltipSource::Click, [x, y]);
                }
            }
            Some(NodeKind::OrbitTrace(i) | NodeKind::OrbitMarker(i)) => {
                self.toggle_tracking(i, frame);
            }
            Some(NodeKind::FocusMarker(i)) => {
                if let Some(content) = self.marker_content(i) {
                    self.open_tooltip(content, TooltipSource::Click, [x, y]);
                }
            }
            _ => {
                self.release_tracking(frame);
                self.tooltip.close_from(TooltipSource::Click);
            }
        }
    }

    fn hover(&mut self, x: f64, y: f64) {
        let hit = self.pick(x, y);
        let country = hit.filter(|h| matches!(h.kind, NodeKind::Country(_)));
        if self
            .selection
            .set_hovered(country.map(|h| h.entity))
            .is_some()
        {
            self.styles_dirty = true;
        }

        let content = match hit.map(|h| h.kind) {
            Some(NodeKind::Beacon(i)) => self.beacon_content(i).map(|c| (c, [x, y])),
            Some(NodeKind::FocusMarker(i)) => self.marker_content(i).map(|c| (c, [x, y])),
            Some(NodeKind::OrbitMarker(i)) => self.orbital_content(i),
            _ => None,
        };
        match content {
            // A pinned tooltip stays until the next click.
            Some(_) if self.tooltip_source() == Some(TooltipSource::Click) => {}
            Some((content, anchor)) => self.open_tooltip(content, TooltipSource::Hover, anchor),
            None => {
                self.tooltip.close_from(TooltipSource::Hover);
            }
        }
    }

    fn click_country(&mut self, idx: usize, frame: Frame) {
        let Some(node) = self.renderer.country(idx) else {
            return;
        };
        let (entity, id) = (node.entity, node.id);
        let change = self.selection.toggle(entity);
        self.styles_dirty = true;
        let info = change.selected.map(|_| self.dataset.info_for(id));
        debug!(country = id, selected = info.is_some(), "country selection toggled");
        if let Some(callback) = self.on_select.as_mut() {
            callback(info.as_ref());
        }
        self.events
            .emit(frame, EngineEvent::SelectionChanged { country: info });
    }

    fn toggle_tracking(&mut self, idx: usize, frame: Frame) {
        // The camera is owned by the focus tweens outside the global view.
        if !self.focus.mode().allows_drag() {
            return;
        }
        let change = self.orbits.toggle_tracking(idx);
        self.styles_dirty = true;
        self.tooltip_throttle.reset();
        match change.tracked {
            // The newly tracked object's tooltip replaces whatever was open;
            // behind the horizon it appears once the object comes around.
            Some(i) => {
                self.tooltip.close();
                if let Some((content, anchor)) = self.orbital_content(i) {
                    self.open_tooltip(content, TooltipSource::Tracking, anchor);
                }
            }
            None => {
                self.tooltip.close_from(TooltipSource::Tracking);
            }
        }
        let tracked = change
            .tracked
            .and_then(|i| self.orbits.get(i))
            .map(|o| o.id.clone());
        self.events
            .emit(frame, EngineEvent::TrackingChanged { tracked });
    }

    fn release_tracking(&mut self, frame: Frame) {
        if self.orbits.clear_tracking().is_some() {
            self.styles_dirty = true;
            self.tooltip.close_from(TooltipSource::Tracking);
            self.events
                .emit(frame, EngineEvent::TrackingChanged { tracked: None });
        }
    }

    fn apply_focus(&mut self, signal: FocusSignal, frame: Frame) {
        if !signal.active {
            if self.focus.request_defocus(frame.now) == ModeTransition::StartZoomOut {
                self.release_tracking(frame);
                let from = self.camera.state();
                let to = CameraState {
                    rotation: self.pre_focus_rotation.unwrap_or(from.rotation),
                    scale: self.config.camera.default_zoom,
                    translate: default_translate(&self.config, self.viewport),
                };
                let tw = &self.config.tween;
                self.camera.set_tween(TweenJob::zoom_out(
                    from,
                    to,
                    frame.now,
                    tw.zoom_out_ms,
                    tw.zoom_out_zoom_phase,
                    tw.zoom_out_pan_phase,
                ));
                self.emit_mode(frame);
            }
            return;
        }

        let Some((idx, region)) = self
            .regions
            .regions
            .iter()
            .enumerate()
            .find(|(_, r)| r.id == signal.region_id)
        else {
            warn!(region = %signal.region_id, "focus signal for unknown region dropped");
            return;
        };
        if self.focus.request_focus(&region.id) == ModeTransition::None {
            return;
        }
        let to = self.focus_camera(region);
        if self.pre_focus_rotation.is_none() {
            self.pre_focus_rotation = Some(self.camera.state().rotation);
        }
        self.release_tracking(frame);
        self.camera.set_tween(TweenJob::zoom_in(
            self.camera.state(),
            to,
            frame.now,
            self.config.tween.zoom_in_ms,
        ));
        self.renderer.set_active_region(Some(idx));
        self.emit_mode(frame);
    }

    fn apply_deselect(&mut self, counter: u64, frame: Frame) {
        if counter == self.deselect_counter {
            return;
        }
        self.deselect_counter = counter;
        let change = self.selection.clear();
        if change.deselected.is_some() {
            self.styles_dirty = true;
            debug!(counter, "selection cleared by host");
            self.events.emit(frame, EngineEvent::SelectionCleared);
        }
    }

    fn focus_camera(&self, region: &FocusRegion) -> CameraState {
        let cam = &self.config.camera;
        let [w, h] = self.viewport.size();
        CameraState {
            rotation: CameraState::rotation_for(region.center()),
            scale: region
                .zoom
                .unwrap_or(cam.focus_zoom)
                .clamp(1.0, cam.focus_zoom),
            translate: [w / 2.0, h / 2.0],
        }
    }

    fn emit_mode(&mut self, frame: Frame) {
        let mode = self.focus.mode().clone();
        self.events.emit(frame, EngineEvent::ModeChanged { mode });
    }

    // ---- tooltips ----

    fn placement(&self) -> Placement {
        let t = &self.config.tooltip;
        Placement {
            width: t.width_px,
            height: t.height_px,
            offset: t.offset_px,
            margin: t.margin_px,
        }
    }

    fn tooltip_source(&self) -> Option<TooltipSource> {
        self.tooltip.current().map(|t| t.source)
    }

    fn open_tooltip(&mut self, content: TooltipContent, source: TooltipSource, anchor: [f64; 2]) {
        let position = self.placement().place(anchor, self.viewport.size());
        self.tooltip.open(Tooltip {
            content,
            source,
            anchor,
            position,
        });
    }

    fn beacon_content(&self, idx: usize) -> Option<TooltipContent> {
        let node = self.renderer.beacon(idx)?;
        let Some(id) = node.country_id else {
            warn!(country = %node.beacon.country, "beacon without a base map country");
            return None;
        };
        Some(TooltipContent::Beacon {
            capital: node.beacon.capital.clone(),
            country: self.dataset.info_for(id),
        })
    }

    fn marker_content(&self, idx: usize) -> Option<TooltipContent> {
        let node = self.renderer.focus_node(idx)?;
        let m = self.regions.regions.get(node.region)?.markers.get(node.marker)?;
        Some(TooltipContent::Marker {
            label: m.label.clone(),
            kind: m.kind,
            category: m.category.clone(),
            status: m.status,
            radius_km: m.radius_km,
        })
    }

    /// Tooltip content of an orbital object and its marker position, while
    /// the object is in front of the horizon.
    fn orbital_content(&self, idx: usize) -> Option<(TooltipContent, [f64; 2])> {
        let object = self.orbits.get(idx)?;
        let anchor = object.last_screen.filter(|_| object.visible)?;
        let at = object.position();
        let content = TooltipContent::Orbital {
            id: object.id.clone(),
            label: object.label.clone(),
            kind: object.kind,
            lon: at.lon,
            lat: at.lat,
        };
        Some((content, anchor))
    }

    /// Keep the tracked object's tooltip on its marker. Hover and click
    /// tooltips opened later take the slot while they are open.
    fn update_tracking_tooltip(&mut self, now: Time) {
        let Some(tracked) = self.orbits.tracked() else {
            return;
        };
        let Some((content, anchor)) = self.orbital_content(tracked) else {
            self.tooltip.close_from(TooltipSource::Tracking);
            return;
        };
        if matches!(
            self.tooltip_source(),
            Some(TooltipSource::Hover | TooltipSource::Click)
        ) {
            return;
        }
        if !self.tooltip_throttle.ready(now.ms()) {
            return;
        }
        self.open_tooltip(content, TooltipSource::Tracking, anchor);
    }

    // ---- host output ----

    pub fn camera(&self) -> CameraState {
        self.camera.state()
    }

    pub fn is_tweening(&self) -> bool {
        self.camera.is_tweening()
    }

    pub fn mode(&self) -> &ModeState {
        self.focus.mode()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.current()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.focus.legend()
    }

    pub fn overlay_opacity(&self) -> f64 {
        self.focus.opacity()
    }

    pub fn overlay_attached(&self) -> bool {
        self.focus.is_attached()
    }

    pub fn selected_country(&self) -> Option<u32> {
        let selected = self.selection.selected()?;
        self.renderer
            .countries()
            .iter()
            .find(|c| c.entity == selected)
            .map(|c| c.id)
    }

    pub fn orbits(&self) -> &OrbitSimulator {
        &self.orbits
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Projection of the last redraw.
    pub fn projection(&self) -> Option<&Projection> {
        self.renderer.projection()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn policy(&self) -> &PerfPolicy {
        &self.policy
    }

    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        self.renderer.draw_list()
    }

    pub fn to_svg(&self) -> String {
        render_svg(&self.draw_list(), self.viewport, self.renderer.palette())
    }

    pub fn drain_events(&mut self) -> Vec<Event<EngineEvent>> {
        self.events.drain()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

fn default_translate(config: &GlobeConfig, viewport: Viewport) -> [f64; 2] {
    let [w, h] = viewport.size();
    [w * (0.5 + config.camera.default_offset_x), h / 2.0]
}

fn base_radius(config: &GlobeConfig, viewport: Viewport) -> f64 {
    viewport.min_side() * config.camera.base_radius_fraction
}

#[derive(Debug)]
pub enum MountState {
    Loading,
    Ready(Box<GlobeEngine>),
    Failed(String),
}

/// Lifecycle of one mounted globe: a single blocking load, then frames until
/// teardown.
#[derive(Debug)]
pub struct GlobeMount {
    state: MountState,
    anim: AnimationLoop,
}

impl Default for GlobeMount {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeMount {
    pub fn new() -> Self {
        Self {
            state: MountState::Loading,
            anim: AnimationLoop::new(),
        }
    }

    pub fn state(&self) -> &MountState {
        &self.state
    }

    pub fn engine(&self) -> Option<&GlobeEngine> {
        match &self.state {
            MountState::Ready(engine) => Some(&**engine),
            _ => None,
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut GlobeEngine> {
        match &mut self.state {
            MountState::Ready(engine) => Some(&mut **engine),
            _ => None,
        }
    }

    /// Run `loader` once. On success the animation loop starts; on failure
    /// the error message is kept for the host and no frame ever runs.
    pub fn mount<F>(&mut self, loader: F) -> &MountState
    where
        F: FnOnce() -> Result<GlobeEngine, GlobeError>,
    {
        if !matches!(self.state, MountState::Loading) {
            return &self.state;
        }
        self.state = match loader() {
            Ok(engine) => {
                self.anim.start();
                info!("globe mounted");
                MountState::Ready(Box::new(engine))
            }
            Err(err) => {
                error!(error = %err, "globe mount failed");
                MountState::Failed(err.to_string())
            }
        };
        &self.state
    }

    /// Host frame callback; returns whether another frame should be scheduled.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let MountState::Ready(engine) = &mut self.state else {
            return false;
        };
        self.anim.tick(now_ms, |frame| engine.step(frame))
    }

    pub fn teardown(mut self) {
        self.anim.cancel();
        info!("globe torn down");
    }
}
