//! Canvas engine: owns the view, the dataset slots and the interaction
//! session, and turns normalized input into host callbacks.
//!
//! All state changes happen synchronously inside [`CanvasEngine::handle`];
//! callers redraw from [`CanvasEngine::frame`] whenever a response asks.

use crate::bridge::HostBridge;
use crate::capture::PointerCapture;
use crate::input::{InputEvent, Modifiers, PointerId};
use crate::interaction::{Interaction, Motion, Release};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::sync::{DatasetSync, Incoming};
use bp_core::geometry::{bounding_box, node_rect};
use bp_core::{CanvasConfig, Dataset, NodeId, Point, Rect, ViewTransform, Viewport, ZoomAnchor};
use bp_render::{Frame, HitRegistry, SceneInput, ViewAction, compose, controls};

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    /// The frame changed and should be redrawn.
    pub redraw: bool,
    /// The event belonged to the canvas; the host should suppress its
    /// default action (page scroll, text selection).
    pub consumed: bool,
}

impl Response {
    pub const IGNORED: Self = Self {
        redraw: false,
        consumed: false,
    };

    fn consumed(redraw: bool) -> Self {
        Self {
            redraw,
            consumed: true,
        }
    }
}

pub struct CanvasEngine<H: HostBridge> {
    config: CanvasConfig,
    viewport: Viewport,
    transform: ViewTransform,
    sync: DatasetSync,
    interaction: Interaction,
    registry: HitRegistry,
    capture: PointerCapture,
    selection: Option<NodeId>,
    /// Set by the first automatic fit; cleared when the dataset empties.
    has_fitted: bool,
    host: H,
}

impl<H: HostBridge> CanvasEngine<H> {
    pub fn new(mut config: CanvasConfig, host: H) -> Self {
        config.normalize();
        Self {
            config,
            viewport: Viewport::default(),
            transform: ViewTransform::default(),
            sync: DatasetSync::default(),
            interaction: Interaction::Idle,
            registry: HitRegistry::new(),
            capture: PointerCapture::default(),
            selection: None,
            has_fitted: false,
            host,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// The working copy: what is on screen right now.
    pub fn dataset(&self) -> &Dataset {
        self.sync.working()
    }

    pub fn pending_dataset(&self) -> Option<&Dataset> {
        self.sync.pending()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn has_fitted(&self) -> bool {
        self.has_fitted
    }

    pub fn registry(&self) -> &HitRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Compose the current draw list.
    pub fn frame(&self) -> Frame {
        compose(
            &SceneInput {
                dataset: self.sync.working(),
                transform: self.transform,
                viewport: self.viewport,
                selection: self.selection,
                dragging: self.interaction.dragged_node(),
            },
            &self.config,
        )
    }

    // ─── Host-driven state ───────────────────────────────────────────────

    /// Replace the dataset, or park it until the active session ends.
    pub fn set_dataset(&mut self, dataset: Dataset) -> Incoming {
        let incoming = self.sync.offer(dataset, !self.interaction.is_idle());
        match incoming {
            Incoming::Applied => self.dataset_applied(),
            Incoming::Deferred { .. } => {
                log::debug!("dataset deferred until the active session ends");
            }
        }
        incoming
    }

    pub fn set_config(&mut self, mut config: CanvasConfig) {
        config.normalize();
        self.config = config;
        self.transform.scale = self.config.scale_limits().clamp(self.transform.scale);
        self.registry.rebuild(self.sync.working(), self.config.node_size);
    }

    /// Record the canvas element's new pixel size. Returns `true` if the
    /// frame should be redrawn.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        if !self.has_fitted && !self.sync.working().is_empty() {
            self.auto_fit();
        }
        true
    }

    // ─── View actions ────────────────────────────────────────────────────

    /// Run a zoom or fit action. Ignored while a session is active.
    /// Returns `true` if the transform changed.
    pub fn invoke(&mut self, action: ViewAction) -> bool {
        if !self.interaction.is_idle() {
            log::trace!("{} ignored during an active session", action.name());
            return false;
        }
        let limits = self.config.scale_limits();
        match action {
            ViewAction::ZoomIn => self.transform.zoom(self.config.zoom_step, self.viewport.center(), &limits),
            ViewAction::ZoomOut => self.transform.zoom(-self.config.zoom_step, self.viewport.center(), &limits),
            ViewAction::FitToView => match self.fit_transform() {
                Some(fitted) => {
                    let changed = fitted != self.transform;
                    self.transform = fitted;
                    changed
                }
                None => false,
            },
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: &InputEvent) -> Response {
        match event {
            InputEvent::PointerDown { pointer_id, x, y, .. } => {
                self.pointer_down(*pointer_id, Point::new(*x, *y))
            }
            InputEvent::PointerMove { pointer_id, x, y, .. } => {
                self.pointer_move(*pointer_id, Point::new(*x, *y))
            }
            InputEvent::PointerUp { pointer_id, x, y, .. } => {
                self.pointer_up(*pointer_id, Point::new(*x, *y))
            }
            InputEvent::PointerCancel { pointer_id } => self.pointer_lost(*pointer_id, false),
            InputEvent::LostCapture { pointer_id } => self.pointer_lost(*pointer_id, true),
            InputEvent::Wheel {
                x,
                y,
                delta_y,
                modifiers,
            } => self.wheel(Point::new(*x, *y), *delta_y, *modifiers),
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers),
        }
    }

    fn pointer_down(&mut self, pointer_id: PointerId, p: Point) -> Response {
        if let Some(action) = controls::control_at(self.viewport, p) {
            return Response::consumed(self.invoke(action));
        }
        if !self.interaction.is_idle() {
            // A second pointer never starts a competing session.
            return Response::consumed(false);
        }

        let world = self.transform.to_world(p);
        let hit = self
            .registry
            .hit_test(world)
            .and_then(|id| self.sync.working().position_of(id).map(|pos| (id, pos)));
        match hit {
            Some((id, position)) => {
                self.interaction.begin_node_drag(id, pointer_id, p, position);
                self.registry.raise(Some(id));
                log::debug!("drag start: {id:?} at ({}, {})", position.x, position.y);
            }
            None => {
                self.interaction.begin_pan(pointer_id, p, self.transform.offset);
                log::debug!("pan start");
            }
        }
        self.capture.acquire(pointer_id, &mut self.host);
        Response::consumed(true)
    }

    fn pointer_move(&mut self, pointer_id: PointerId, p: Point) -> Response {
        if self.interaction.pointer_id() != Some(pointer_id) {
            return Response::IGNORED;
        }
        if self.dragged_node_orphaned() {
            self.abandon();
            return Response::consumed(true);
        }

        match self
            .interaction
            .pointer_move(pointer_id, p, self.transform.scale, self.config.grid_unit)
        {
            Motion::Node { id, position } => {
                log::trace!("drag move: {id:?} -> ({}, {})", position.x, position.y);
                self.sync.move_node(id, position);
                self.registry
                    .update(id, Rect::from_origin_size(position, self.config.node_size));
                Response::consumed(true)
            }
            Motion::Pan { offset } => {
                self.transform.offset = offset;
                Response::consumed(true)
            }
            Motion::Ignored => Response::IGNORED,
        }
    }

    fn pointer_up(&mut self, pointer_id: PointerId, p: Point) -> Response {
        if self.interaction.pointer_id() != Some(pointer_id) {
            return Response::IGNORED;
        }
        if self.dragged_node_orphaned() {
            self.abandon();
            return Response::consumed(true);
        }
        // Hosts that coalesce moves may report the final position only here.
        if self.interaction.has_moved() {
            self.pointer_move(pointer_id, p);
        }

        let release = self.interaction.release(pointer_id);
        self.capture.release(&mut self.host);
        self.registry.raise(None);

        match release {
            Release::NodeDragged { id, position } => {
                self.sync.move_node(id, position);
                log::debug!("drag end: {id:?} committed at ({}, {})", position.x, position.y);
                self.host.positions_committed(&self.sync.working().nodes);
                self.sync.mark_committed();
            }
            Release::NodeClicked(id) => {
                self.selection = Some(id);
                if let Some(node) = self.sync.working().get(id) {
                    self.host.node_selected(node);
                }
            }
            Release::CanvasClicked => {
                self.selection = None;
                self.host.canvas_selected();
            }
            Release::Panned => log::debug!("pan end"),
            Release::Ignored => {}
        }

        self.settle();
        Response::consumed(true)
    }

    /// Pointer cancel or lost capture: end the session without committing.
    fn pointer_lost(&mut self, pointer_id: PointerId, capture_gone: bool) -> Response {
        if self.interaction.pointer_id() != Some(pointer_id) {
            return Response::IGNORED;
        }
        if capture_gone {
            self.capture.forget();
        }
        self.cancel_session();
        Response::consumed(true)
    }

    fn wheel(&mut self, p: Point, delta_y: f64, modifiers: Modifiers) -> Response {
        if !modifiers.command() {
            return Response::IGNORED;
        }
        if !self.interaction.is_idle() {
            return Response::consumed(false);
        }
        let anchor = match self.config.zoom_anchor {
            ZoomAnchor::Center => self.viewport.center(),
            ZoomAnchor::Pointer => p,
        };
        let delta = -delta_y * self.config.wheel_zoom_sensitivity;
        let limits = self.config.scale_limits();
        Response::consumed(self.transform.zoom(delta, anchor, &limits))
    }

    fn key(&mut self, key: &str, modifiers: Modifiers) -> Response {
        match ShortcutMap::resolve(key, modifiers) {
            Some(ShortcutAction::View(action)) => Response::consumed(self.invoke(action)),
            Some(ShortcutAction::CancelInteraction) if !self.interaction.is_idle() => {
                self.cancel_session();
                Response::consumed(true)
            }
            _ => Response::IGNORED,
        }
    }

    // ─── Session teardown ────────────────────────────────────────────────

    /// Revert an in-flight drag to its start position and end the session.
    fn cancel_session(&mut self) {
        if let Interaction::DraggingNode(drag) = self.interaction.cancel() {
            self.sync.move_node(drag.node_id, drag.node_start);
            self.registry.update(
                drag.node_id,
                Rect::from_origin_size(drag.node_start, self.config.node_size),
            );
            log::debug!("drag cancelled: {:?} reverted", drag.node_id);
        }
        self.capture.release(&mut self.host);
        self.registry.raise(None);
        self.settle();
    }

    /// Drop a drag whose node disappeared from the host dataset. Nothing
    /// is committed.
    fn abandon(&mut self) {
        if let Some(id) = self.interaction.cancel().dragged_node() {
            log::warn!("node {id:?} vanished mid-drag; abandoning session");
        }
        self.capture.release(&mut self.host);
        self.registry.raise(None);
        self.settle();
    }

    fn dragged_node_orphaned(&self) -> bool {
        self.interaction
            .dragged_node()
            .is_some_and(|id| self.sync.is_orphaned(id))
    }

    // ─── Dataset application ─────────────────────────────────────────────

    fn settle(&mut self) {
        if self.sync.settle() {
            self.dataset_applied();
        }
    }

    fn dataset_applied(&mut self) {
        let working = self.sync.working();
        self.registry.rebuild(working, self.config.node_size);
        if let Some(selected) = self.selection
            && !working.contains(selected)
        {
            self.selection = None;
        }
        if working.is_empty() {
            self.has_fitted = false;
        } else if !self.has_fitted {
            self.auto_fit();
        }
    }

    /// First fit for a dataset. Stays pending until the viewport is measured.
    fn auto_fit(&mut self) {
        if let Some(fitted) = self.fit_transform() {
            log::debug!("auto-fit to scale {:.3}", fitted.scale);
            self.transform = fitted;
            self.has_fitted = true;
        }
    }

    fn fit_transform(&self) -> Option<ViewTransform> {
        let bounds = bounding_box(&self.sync.working().nodes, self.config.node_size)?;
        ViewTransform::fit_to_bounds(
            bounds,
            self.viewport,
            self.config.fit_padding,
            &self.config.scale_limits(),
        )
    }

    /// World rectangle of a node in the working copy.
    pub fn node_rect(&self, id: NodeId) -> Option<Rect> {
        self.sync
            .working()
            .get(id)
            .map(|n| node_rect(n, self.config.node_size))
    }
}

impl<H: HostBridge> Drop for CanvasEngine<H> {
    fn drop(&mut self) {
        self.capture.release(&mut self.host);
    }
}
