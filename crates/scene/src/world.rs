use crate::components::{
    ComponentGeometry, Geometry, GeometryId, Layer, NodeKind, Paint, Shape, Visibility,
};
use crate::entity::EntityId;

/// Retained scene graph: component columns indexed by `EntityId::index()`.
///
/// Nodes are spawned once when the globe is built and live as long as the
/// world; only their geometry, paint, projected shape and visibility change.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    kinds: Vec<Option<NodeKind>>,
    layers: Vec<Option<Layer>>,
    visibility: Vec<Option<Visibility>>,
    paints: Vec<Option<Paint>>,
    shapes: Vec<Option<Shape>>,
    geometry: Vec<Option<ComponentGeometry>>,
    geometries: Vec<Geometry>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, kind: NodeKind, layer: Layer) -> EntityId {
        let id = EntityId::from_index(self.next_index);
        self.next_index += 1;
        let idx = id.slot();
        self.ensure_capacity(idx);
        self.kinds[idx] = Some(kind);
        self.layers[idx] = Some(layer);
        id
    }

    /// Spawn a node with its geometry and paint in one go.
    pub fn spawn_with(
        &mut self,
        kind: NodeKind,
        layer: Layer,
        geometry: Geometry,
        paint: Paint,
    ) -> EntityId {
        let e = self.spawn(kind, layer);
        self.set_geometry(e, geometry);
        self.set_paint(e, paint);
        e
    }

    pub fn len(&self) -> usize {
        self.next_index as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn kind(&self, entity: EntityId) -> Option<NodeKind> {
        self.kinds.get(entity.slot()).and_then(|k| *k)
    }

    pub fn layer(&self, entity: EntityId) -> Option<Layer> {
        self.layers.get(entity.slot()).and_then(|l| *l)
    }

    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) {
        self.ensure_capacity(entity.slot());
        self.visibility[entity.slot()] = Some(visibility);
    }

    /// Nodes without an explicit visibility component are visible.
    pub fn is_visible(&self, entity: EntityId) -> bool {
        self.visibility
            .get(entity.slot())
            .and_then(|v| *v)
            .map(|v| v.visible)
            .unwrap_or(true)
    }

    pub fn set_paint(&mut self, entity: EntityId, paint: Paint) {
        self.ensure_capacity(entity.slot());
        self.paints[entity.slot()] = Some(paint);
    }

    pub fn paint(&self, entity: EntityId) -> Option<&Paint> {
        self.paints.get(entity.slot()).and_then(|p| p.as_ref())
    }

    pub fn paint_mut(&mut self, entity: EntityId) -> Option<&mut Paint> {
        self.paints
            .get_mut(entity.slot())
            .and_then(|p| p.as_mut())
    }

    pub fn set_shape(&mut self, entity: EntityId, shape: Shape) {
        self.ensure_capacity(entity.slot());
        self.shapes[entity.slot()] = Some(shape);
    }

    pub fn shape(&self, entity: EntityId) -> Option<&Shape> {
        self.shapes.get(entity.slot()).and_then(|s| s.as_ref())
    }

    /// Attach new geometry to `entity`, replacing its previous geometry in place.
    pub fn set_geometry(&mut self, entity: EntityId, geometry: Geometry) -> GeometryId {
        self.ensure_capacity(entity.slot());
        let slot = &mut self.geometry[entity.slot()];
        if let Some(existing) = slot
            && let Some(g) = self.geometries.get_mut(existing.id.0 as usize)
        {
            *g = geometry;
            return existing.id;
        }
        let id = GeometryId(self.geometries.len() as u32);
        self.geometries.push(geometry);
        *slot = Some(ComponentGeometry { id });
        id
    }

    pub fn geometry(&self, entity: EntityId) -> Option<&Geometry> {
        let comp = self.geometry.get(entity.slot()).and_then(|g| *g)?;
        self.geometries.get(comp.id.0 as usize)
    }

    /// All entities in spawn order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.next_index).map(EntityId::from_index)
    }

    pub fn entities_in_layer(&self, layer: Layer) -> Vec<EntityId> {
        self.entities()
            .filter(|e| self.layer(*e) == Some(layer))
            .collect()
    }

    /// Visible, non-empty nodes back to front: `(layer, index)` order.
    pub fn drawables(&self) -> Vec<(EntityId, Layer, &Paint, &Shape)> {
        let mut out = Vec::new();
        for e in self.entities() {
            if !self.is_visible(e) {
                continue;
            }
            let (Some(layer), Some(paint), Some(shape)) =
                (self.layer(e), self.paint(e), self.shape(e))
            else {
                continue;
            };
            if shape.is_empty() {
                continue;
            }
            out.push((e, layer, paint, shape));
        }
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.index().cmp(&b.0.index())));
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.kinds.len() <= idx {
            let new_len = idx + 1;
            self.kinds.resize(new_len, None);
            self.layers.resize(new_len, None);
            self.visibility.resize(new_len, None);
            self.paints.resize(new_len, None);
            self.shapes.resize(new_len, None);
            self.geometry.resize(new_len, None);
        }
    }
}
