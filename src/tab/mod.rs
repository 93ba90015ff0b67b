//! A tab: a binary tree of split panes.
//!
//! Nodes live in an arena addressed by `NodeId`; parent and child links are
//! indices, so close/promote surgery and upward walks need no shared
//! ownership. Leaves own panes, containers carry a split direction and
//! ratio.

mod manager;

pub use manager::{TabId, TabManager};

use std::error::Error;
use std::path::Path;

use crate::pane::{Pane, PaneId};
use crate::pty::PtyConfig;

/// Panes per tab, past which splits are silently ignored.
pub const MAX_PANES: usize = 16;

const MIN_RATIO: f32 = 0.1;
const MAX_RATIO: f32 = 0.9;

/// Split orientation: `Vertical` places children side by side (the divider
/// runs vertically), `Horizontal` stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDir {
    Vertical,
    Horizontal,
}

/// Index of a node in the tab's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
enum Node {
    Leaf {
        pane: Pane,
    },
    Split {
        dir: SplitDir,
        ratio: f32,
        first: NodeId,
        second: NodeId,
    },
}

#[derive(Debug)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
}

/// A pane's rectangle in normalized `[0,1]²` space, for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneLayout {
    pub node: NodeId,
    pub pane: PaneId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug)]
pub struct Tab {
    pub id: TabId,
    nodes: Vec<Option<Slot>>,
    root: NodeId,
    active: NodeId,
    cols: usize,
    rows: usize,
    config: PtyConfig,
}

impl Tab {
    pub fn new(
        id: TabId,
        cols: usize,
        rows: usize,
        cwd: Option<&Path>,
        config: PtyConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let pane = Pane::new(cols, rows, cwd, &config)?;
        let root = NodeId(0);
        Ok(Self {
            id,
            nodes: vec![Some(Slot {
                node: Node::Leaf { pane },
                parent: None,
            })],
            root,
            active: root,
            cols,
            rows,
            config,
        })
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn alloc(&mut self, slot: Slot) -> NodeId {
        if let Some(idx) = self.nodes.iter().position(Option::is_none) {
            self.nodes[idx] = Some(slot);
            NodeId(idx)
        } else {
            self.nodes.push(Some(slot));
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Leaf nodes in in-order traversal (the on-screen order).
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.slot(id).map(|slot| &slot.node) {
            Some(Node::Leaf { .. }) => out.push(id),
            Some(Node::Split { first, second, .. }) => {
                let (first, second) = (*first, *second);
                self.collect_leaves(first, out);
                self.collect_leaves(second, out);
            }
            None => {}
        }
    }

    pub fn pane_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn pane(&self, id: NodeId) -> Option<&Pane> {
        match self.slot(id)? {
            Slot {
                node: Node::Leaf { pane },
                ..
            } => Some(pane),
            _ => None,
        }
    }

    pub fn active_node(&self) -> NodeId {
        self.active
    }

    pub fn active_pane(&self) -> Option<&Pane> {
        self.pane(self.active)
    }

    pub fn set_active_pane(&mut self, node: NodeId) {
        if matches!(self.slot(node).map(|slot| &slot.node), Some(Node::Leaf { .. })) {
            self.active = node;
        }
    }

    pub fn split_vertical(&mut self) -> Result<(), Box<dyn Error>> {
        self.split(SplitDir::Vertical)
    }

    pub fn split_horizontal(&mut self) -> Result<(), Box<dyn Error>> {
        self.split(SplitDir::Horizontal)
    }

    /// Turn the active leaf into a container holding the original pane and
    /// a fresh one (inheriting the active pane's working directory). The
    /// new pane becomes active.
    fn split(&mut self, dir: SplitDir) -> Result<(), Box<dyn Error>> {
        if self.pane_count() >= MAX_PANES {
            return Ok(());
        }
        let active = self.active;
        let old_parent = match self.slot(active) {
            Some(slot) => slot.parent,
            None => return Ok(()),
        };

        let cwd = self.active_pane().and_then(Pane::current_dir);
        let pane = Pane::new(self.cols, self.rows, cwd.as_deref(), &self.config)?;

        let second = self.alloc(Slot {
            node: Node::Leaf { pane },
            parent: None,
        });
        let container = self.alloc(Slot {
            node: Node::Split {
                dir,
                ratio: 0.5,
                first: active,
                second,
            },
            parent: old_parent,
        });

        if let Some(slot) = self.slot_mut(active) {
            slot.parent = Some(container);
        }
        if let Some(slot) = self.slot_mut(second) {
            slot.parent = Some(container);
        }
        self.repoint_child(old_parent, active, container);

        self.active = second;
        self.resize(self.cols, self.rows);
        Ok(())
    }

    /// Close the active pane and promote its sibling into the parent's
    /// place. The last pane of a tab cannot be closed.
    pub fn close_pane(&mut self) {
        if self.pane_count() <= 1 {
            return;
        }
        let active = self.active;
        let Some(parent_id) = self.slot(active).and_then(|slot| slot.parent) else {
            return;
        };
        let (sibling, grandparent) = match self.slot(parent_id) {
            Some(Slot {
                node: Node::Split { first, second, .. },
                parent,
            }) => {
                let sibling = if *first == active { *second } else { *first };
                (sibling, *parent)
            }
            _ => return,
        };

        if let Some(mut slot) = self.nodes[active.0].take() {
            if let Node::Leaf { pane } = &mut slot.node {
                pane.close();
            }
        }
        self.nodes[parent_id.0] = None;

        if let Some(slot) = self.slot_mut(sibling) {
            slot.parent = grandparent;
        }
        self.repoint_child(grandparent, parent_id, sibling);

        self.active = self.first_leaf(sibling);
        self.resize(self.cols, self.rows);
    }

    /// Replace `from` with `to` in `parent`'s child links; with no parent,
    /// `to` becomes the root.
    fn repoint_child(&mut self, parent: Option<NodeId>, from: NodeId, to: NodeId) {
        match parent {
            Some(parent) => {
                if let Some(Slot {
                    node: Node::Split { first, second, .. },
                    ..
                }) = self.slot_mut(parent)
                {
                    if *first == from {
                        *first = to;
                    } else if *second == from {
                        *second = to;
                    }
                }
            }
            None => self.root = to,
        }
    }

    fn first_leaf(&self, mut id: NodeId) -> NodeId {
        loop {
            match self.slot(id).map(|slot| &slot.node) {
                Some(Node::Split { first, .. }) => id = *first,
                _ => return id,
            }
        }
    }

    /// Cycle the active pane. Traversal runs backwards through the leaf
    /// list here (and forwards in `prev_pane`); the default keybindings
    /// rely on this order.
    pub fn next_pane(&mut self) {
        let leaves = self.leaves();
        if leaves.len() < 2 {
            return;
        }
        if let Some(idx) = leaves.iter().position(|&node| node == self.active) {
            self.active = leaves[(idx + leaves.len() - 1) % leaves.len()];
        }
    }

    pub fn prev_pane(&mut self) {
        let leaves = self.leaves();
        if leaves.len() < 2 {
            return;
        }
        if let Some(idx) = leaves.iter().position(|&node| node == self.active) {
            self.active = leaves[(idx + 1) % leaves.len()];
        }
    }

    /// Grow or shrink the active pane along `direction`: the nearest
    /// ancestor container with a matching axis has its ratio nudged by
    /// `delta`, clamped to `[0.1, 0.9]`.
    pub fn resize_active_pane(&mut self, direction: SplitDir, delta: f32) {
        let mut node = self.active;
        while let Some(parent) = self.slot(node).and_then(|slot| slot.parent) {
            let mut adjusted = false;
            if let Some(Slot {
                node: Node::Split { dir, ratio, .. },
                ..
            }) = self.slot_mut(parent)
            {
                if *dir == direction {
                    *ratio = (*ratio + delta).clamp(MIN_RATIO, MAX_RATIO);
                    adjusted = true;
                }
            }
            if adjusted {
                self.resize(self.cols, self.rows);
                return;
            }
            node = parent;
        }
    }

    /// Flat leaf rectangles in normalized `[0,1]²` space; containers divide
    /// their rectangle by ratio.
    pub fn get_pane_layouts(&self) -> Vec<PaneLayout> {
        let mut out = Vec::new();
        self.layout_node(self.root, 0.0, 0.0, 1.0, 1.0, &mut out);
        out
    }

    fn layout_node(&self, id: NodeId, x: f32, y: f32, w: f32, h: f32, out: &mut Vec<PaneLayout>) {
        match self.slot(id).map(|slot| &slot.node) {
            Some(Node::Leaf { pane }) => out.push(PaneLayout {
                node: id,
                pane: pane.id,
                x,
                y,
                w,
                h,
            }),
            Some(Node::Split {
                dir,
                ratio,
                first,
                second,
            }) => {
                let (dir, ratio, first, second) = (*dir, *ratio, *first, *second);
                match dir {
                    SplitDir::Vertical => {
                        let w1 = w * ratio;
                        self.layout_node(first, x, y, w1, h, out);
                        self.layout_node(second, x + w1, y, w - w1, h, out);
                    }
                    SplitDir::Horizontal => {
                        let h1 = h * ratio;
                        self.layout_node(first, x, y, w, h1, out);
                        self.layout_node(second, x, y + h1, w, h - h1, out);
                    }
                }
            }
            None => {}
        }
    }

    /// Resize the whole tree: each leaf gets cells proportional to its
    /// normalized rectangle, with a floor of one cell per axis.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        for layout in self.get_pane_layouts() {
            let pane_cols = ((layout.w * cols as f32).round() as usize).max(1);
            let pane_rows = ((layout.h * rows as f32).round() as usize).max(1);
            if let Some(pane) = self.pane(layout.node) {
                pane.resize(pane_cols, pane_rows);
            }
        }
    }

    /// True once every pane's child has exited.
    pub fn all_exited(&self) -> bool {
        self.leaves()
            .iter()
            .all(|&node| self.pane(node).is_none_or(Pane::has_exited))
    }

    /// Kill every pane's child, e.g. when the tab itself is closed.
    pub fn close_all(&mut self) {
        for id in self.leaves() {
            if let Some(slot) = self.nodes.get_mut(id.0).and_then(Option::as_mut) {
                if let Node::Leaf { pane } = &mut slot.node {
                    pane.close();
                }
            }
        }
    }
}
