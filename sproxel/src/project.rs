//! [`Project`], the root of a document.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::group::LayerGroup;
use crate::palette::Palette;

/// Everything in one open document: the palettes layers may be indexed against, and the
/// layer groups.
///
/// A new project has exactly one palette, [`Palette::default_main()`], and no groups.
/// The first palette is always the main palette; palettes cannot be removed, so layers which
/// refer to them by [`Arc`] always find them still listed here.
#[derive(Clone, Debug)]
pub struct Project {
    /// Invariant: never empty.
    palettes: Vec<Arc<Palette>>,
    groups: Vec<LayerGroup>,
}

impl Project {
    /// Constructs a project containing only the default main palette.
    pub fn new() -> Self {
        Self {
            palettes: vec![Arc::new(Palette::default_main())],
            groups: Vec::new(),
        }
    }

    /// Returns the main palette, which newly imported indexed layers use by default.
    pub fn main_palette(&self) -> &Arc<Palette> {
        &self.palettes[0]
    }

    /// Returns all palettes, main palette first.
    pub fn palettes(&self) -> &[Arc<Palette>] {
        &self.palettes
    }

    /// Adds a palette and returns the shared handle to it.
    pub fn add_palette(&mut self, palette: Palette) -> Arc<Palette> {
        let palette = Arc::new(palette);
        self.palettes.push(Arc::clone(&palette));
        palette
    }

    /// Returns all layer groups.
    pub fn groups(&self) -> &[LayerGroup] {
        &self.groups
    }

    /// Adds a layer group and returns its position in [`Project::groups()`].
    pub fn add_group(&mut self, group: LayerGroup) -> usize {
        self.groups.push(group);
        self.groups.len() - 1
    }

    /// Returns the layer group at `index`, if there is one.
    pub fn group(&self, index: usize) -> Option<&LayerGroup> {
        self.groups.get(index)
    }

    /// Returns the layer group at `index` for modification, if there is one.
    pub fn group_mut(&mut self, index: usize) -> Option<&mut LayerGroup> {
        self.groups.get_mut(index)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
