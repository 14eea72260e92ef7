use std::collections::HashMap;

use crate::model::{Item, ItemId};
use crate::ops::search;
use crate::util::line_buffer::LineBuffer;

/// In-place text editor attached to a node while its item is being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditField {
    /// Text the item had when editing started
    pub original: String,
    pub input: LineBuffer,
    settled: bool,
}

impl EditField {
    pub fn new(text: &str) -> Self {
        EditField {
            original: text.to_string(),
            input: LineBuffer::with_text(text),
            settled: false,
        }
    }

    /// Mark the edit as finished. Only the first call returns true, so racing
    /// completion signals (blur, Enter, Escape) commit at most once.
    pub fn settle(&mut self) -> bool {
        !std::mem::replace(&mut self.settled, true)
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

/// Presentation state for one item. Text always comes from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    pub id: ItemId,
    /// Filtered out by the current search
    pub hidden: bool,
    pub editor: Option<EditField>,
}

impl ViewNode {
    fn new(id: ItemId) -> Self {
        ViewNode {
            id,
            hidden: false,
            editor: None,
        }
    }
}

/// Where the list rows sit, in pointer units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Pointer y of the first list row
    pub top: i32,
    pub row_height: i32,
    /// Visible rows scrolled past
    pub scroll: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            top: 0,
            row_height: 1,
            scroll: 0,
        }
    }
}

/// Vertical extent of a rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub top: i32,
    pub height: i32,
}

impl RowSpan {
    /// Whether the row's vertical midpoint lies below `y`
    fn center_below(&self, y: i32) -> bool {
        2 * y < 2 * self.top + self.height
    }

    fn contains(&self, y: i32) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    id: ItemId,
    start_x: i32,
}

/// Keeps the visual node list in step with the store.
///
/// Between drags the node order equals the store order. During a drag the
/// dragged node moves live and the store only catches up when the caller
/// feeds [`Reconciler::read_order`] back into it.
#[derive(Debug, Default)]
pub struct Reconciler {
    nodes: Vec<ViewNode>,
    /// Normalized search query
    query: String,
    drag: Option<DragState>,
    viewport: Viewport,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[ViewNode] {
        &self.nodes
    }

    pub fn node(&self, id: ItemId) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: ItemId) -> Option<&mut ViewNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Match nodes to `items`: existing nodes keep their edit state, removed
    /// items lose their node, new items get one. Re-applies the filter.
    pub fn project(&mut self, items: &[Item]) {
        let mut existing: HashMap<ItemId, ViewNode> =
            self.nodes.drain(..).map(|n| (n.id, n)).collect();
        self.nodes = items
            .iter()
            .map(|item| existing.remove(&item.id).unwrap_or_else(|| ViewNode::new(item.id)))
            .collect();

        if let Some(drag) = self.drag
            && self.node(drag.id).is_none()
        {
            self.drag = None;
        }
        self.refilter(items);
    }

    /// Ids in current visual order
    pub fn read_order(&self) -> Vec<ItemId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Ids of nodes not hidden by the filter, in visual order
    pub fn visible_ids(&self) -> Vec<ItemId> {
        self.nodes
            .iter()
            .filter(|n| !n.hidden)
            .map(|n| n.id)
            .collect()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hide nodes whose item text does not contain `query`
    pub fn apply_filter(&mut self, items: &[Item], query: &str) {
        self.query = search::normalize_query(query);
        self.refilter(items);
    }

    fn refilter(&mut self, items: &[Item]) {
        let texts: HashMap<ItemId, &str> = items.iter().map(|i| (i.id, i.text.as_str())).collect();
        for node in &mut self.nodes {
            node.hidden = texts
                .get(&node.id)
                .is_some_and(|text| !search::matches(text, &self.query));
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Row extents of the visible nodes in the current order
    pub fn row_spans(&self) -> Vec<(ItemId, RowSpan)> {
        let vp = self.viewport;
        self.nodes
            .iter()
            .filter(|n| !n.hidden)
            .enumerate()
            .map(|(row, n)| {
                let top = vp.top + (row as i32 - vp.scroll as i32) * vp.row_height;
                (
                    n.id,
                    RowSpan {
                        top,
                        height: vp.row_height,
                    },
                )
            })
            .collect()
    }

    /// Visible node under pointer `y`
    pub fn node_at(&self, y: i32) -> Option<ItemId> {
        self.row_spans()
            .into_iter()
            .find(|(_, span)| span.contains(y))
            .map(|(id, _)| id)
    }

    /// Mark `id` as being dragged. Returns false for an unknown id.
    pub fn begin_drag(&mut self, id: ItemId, pointer_x: i32) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        self.drag = Some(DragState {
            id,
            start_x: pointer_x,
        });
        true
    }

    pub fn dragging(&self) -> Option<ItemId> {
        self.drag.map(|d| d.id)
    }

    /// Move the dragged node before the first other visible node whose
    /// midpoint lies below `pointer_y`, or after the last visible node if
    /// none does.
    pub fn drag_to(&mut self, pointer_y: i32) {
        let Some(drag) = self.drag else {
            return;
        };
        let anchor = self
            .row_spans()
            .into_iter()
            .find(|(id, span)| *id != drag.id && span.center_below(pointer_y))
            .map(|(id, _)| id);

        let Some(from) = self.nodes.iter().position(|n| n.id == drag.id) else {
            return;
        };
        let node = self.nodes.remove(from);
        let to = match anchor {
            Some(anchor) => self
                .nodes
                .iter()
                .position(|n| n.id == anchor)
                .unwrap_or(from),
            None => self
                .nodes
                .iter()
                .rposition(|n| !n.hidden)
                .map_or(from.min(self.nodes.len()), |last| last + 1),
        };
        self.nodes.insert(to, node);
    }

    /// Finish the drag, returning the dragged id and the pointer x it started at
    pub fn end_drag(&mut self) -> Option<(ItemId, i32)> {
        self.drag.take().map(|d| (d.id, d.start_x))
    }
}
