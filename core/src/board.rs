use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::Array2;

use crate::*;

/// The dual-state grid. Visibility, content, bound entity and the
/// transitioned-to-empty flag are kept as parallel grids of the same shape.
///
/// Coordinates are trusted here: callers validate them against [`Self::size`]
/// first and an out-of-bounds access panics.
#[derive(Clone, Debug)]
pub struct BoardState {
    catalog: Arc<EntityCatalog>,
    /// Per-board replacements of catalog definitions, e.g. spectral monoliths.
    overrides: BTreeMap<EntityId, EntityDefinition>,
    visibility: Array2<Visibility>,
    content: Array2<Content>,
    entity: Array2<EntityId>,
    transitioned_to_empty: Array2<bool>,
    locked: Array2<bool>,
}

impl BoardState {
    pub fn new(catalog: Arc<EntityCatalog>, initial: &Array2<EntityId>) -> Self {
        let dim = initial.dim();
        let entity = initial.mapv(|id| catalog.resolve_id(id));
        let content = entity.mapv(|id| {
            if catalog.get(id).is_natural_empty() {
                Content::Empty
            } else {
                Content::Alive
            }
        });
        log::debug!("Initialized dual state board: {}x{} grid", dim.0, dim.1);
        Self {
            catalog,
            overrides: BTreeMap::new(),
            visibility: Array2::default(dim),
            content,
            entity,
            transitioned_to_empty: Array2::default(dim),
            locked: Array2::default(dim),
        }
    }

    pub fn catalog(&self) -> &Arc<EntityCatalog> {
        &self.catalog
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.entity)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check(&self, coords: Coord2) -> [usize; 2] {
        let size = self.size();
        assert!(
            coords.0 < size.0 && coords.1 < size.1,
            "cell {coords:?} is outside the {size:?} board"
        );
        coords.to_nd_index()
    }

    /// Every position in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.size())
    }

    pub fn visibility(&self, coords: Coord2) -> Visibility {
        self.visibility[self.check(coords)]
    }

    /// Visibility never goes back to hidden outside of [`Self::hide_all`].
    pub fn set_visibility(&mut self, coords: Coord2, state: Visibility) {
        let index = self.check(coords);
        assert!(
            !(state.is_hidden() && !self.visibility[index].is_hidden()),
            "cell {coords:?} cannot be hidden again"
        );
        self.visibility[index] = state;
    }

    /// Reveals a cell, returning whether it was hidden before.
    pub fn reveal(&mut self, coords: Coord2) -> bool {
        let index = self.check(coords);
        let was_hidden = self.visibility[index].is_hidden();
        self.visibility[index] = Visibility::Revealed;
        was_hidden
    }

    pub fn content(&self, coords: Coord2) -> Content {
        self.content[self.check(coords)]
    }

    pub fn set_content(&mut self, coords: Coord2, state: Content) {
        let index = self.check(coords);
        debug_assert!(
            self.content[index].can_advance_to(state),
            "content of {coords:?} cannot move from {:?} to {state:?}",
            self.content[index]
        );
        self.content[index] = state;
    }

    pub fn entity_id(&self, coords: Coord2) -> EntityId {
        self.entity[self.check(coords)]
    }

    /// The entity bound to a cell, with any board-level override applied.
    pub fn current_entity(&self, coords: Coord2) -> &EntityDefinition {
        self.entity_definition(self.entity_id(coords))
    }

    pub fn entity_definition(&self, id: EntityId) -> &EntityDefinition {
        self.overrides
            .get(&id)
            .unwrap_or_else(|| self.catalog.get(id))
    }

    /// Rebinds the cell to another entity. Content is left to the caller.
    pub fn transform_entity(&mut self, coords: Coord2, new_id: EntityId) -> EntityId {
        let index = self.check(coords);
        let new_id = self.catalog.resolve_id(new_id);
        log::debug!("Transformed tile {coords:?} to entity {}", EntityKey(new_id));
        std::mem::replace(&mut self.entity[index], new_id)
    }

    /// Transforms a cell and starts the new entity's lifecycle: freshly alive,
    /// or cleared into emptiness when the new entity is the empty one.
    pub fn rebind(&mut self, coords: Coord2, new_id: EntityId) -> Content {
        self.transform_entity(coords, new_id);
        let index = coords.to_nd_index();
        let content = if self.entity[index] == EMPTY_ENTITY_ID {
            self.transitioned_to_empty[index] = true;
            Content::Empty
        } else {
            Content::Alive
        };
        self.content[index] = content;
        content
    }

    pub fn transitioned_to_empty(&self, coords: Coord2) -> bool {
        self.transitioned_to_empty[self.check(coords)]
    }

    /// Whether a further click on this cell is a no-op.
    pub fn is_processed(&self, coords: Coord2) -> bool {
        let index = self.check(coords);
        match self.content[index] {
            Content::Dead | Content::Claimed | Content::Triggered => true,
            Content::Empty => self.transitioned_to_empty[index],
            Content::Alive | Content::Dying => false,
        }
    }

    pub fn is_locked(&self, coords: Coord2) -> bool {
        self.locked[self.check(coords)]
    }

    pub fn lock(&mut self, coords: Coord2) {
        let index = self.check(coords);
        self.locked[index] = true;
    }

    pub fn unlock(&mut self, coords: Coord2) {
        let index = self.check(coords);
        self.locked[index] = false;
    }

    pub fn any_locked(&self) -> bool {
        self.locked.iter().any(|&locked| locked)
    }

    pub fn override_entity(&mut self, definition: EntityDefinition) {
        self.overrides.insert(definition.id, definition);
    }

    pub fn reveal_all(&mut self) {
        self.visibility.fill(Visibility::Revealed);
    }

    /// Admin reset: the only way a revealed cell becomes hidden again.
    pub fn hide_all(&mut self) {
        self.visibility.fill(Visibility::Hidden);
    }

    pub fn visibility_grid(&self) -> &Array2<Visibility> {
        &self.visibility
    }

    pub fn content_grid(&self) -> &Array2<Content> {
        &self.content
    }

    pub fn entity_grid(&self) -> &Array2<EntityId> {
        &self.entity
    }

    pub fn transitioned_to_empty_grid(&self) -> &Array2<bool> {
        &self.transitioned_to_empty
    }
}
