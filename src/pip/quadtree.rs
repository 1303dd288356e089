//! Quad-tree over index entry bounding boxes.
//!
//! Entries live at the deepest node whose quadrant fully contains their box.
//! Boxes straddling a midline stay on the parent.

use geo::{coord, Intersects, Rect};

use crate::config::QuadTreeConfig;

#[derive(Debug, Clone, Copy)]
struct Slot {
    id: usize,
    bbox: Rect<f64>,
}

#[derive(Debug)]
struct QuadNode {
    bounds: Rect<f64>,
    level: usize,
    objects: Vec<Slot>,
    /// NE, NW, SW, SE once split
    children: Option<Box<[QuadNode; 4]>>,
}

/// Four-way recursive partition of the dataset extent
#[derive(Debug)]
pub struct QuadTree {
    root: QuadNode,
    max_objects: usize,
    max_depth: usize,
    len: usize,
}

impl QuadTree {
    pub fn new(bounds: Rect<f64>, config: QuadTreeConfig) -> Self {
        Self {
            root: QuadNode::new(bounds, 0),
            max_objects: config.max_objects,
            max_depth: config.max_depth,
            len: 0,
        }
    }

    /// Build over `(id, bbox)` pairs, rooted at their union box
    pub fn build<I>(items: I, config: QuadTreeConfig) -> Option<Self>
    where
        I: IntoIterator<Item = (usize, Rect<f64>)>,
    {
        let items: Vec<(usize, Rect<f64>)> = items.into_iter().collect();
        let bounds = union_bounds(items.iter().map(|(_, b)| *b))?;

        let mut tree = Self::new(bounds, config);
        for (id, bbox) in items {
            tree.insert(id, bbox);
        }
        Some(tree)
    }

    pub fn insert(&mut self, id: usize, bbox: Rect<f64>) {
        self.root
            .insert(Slot { id, bbox }, self.max_objects, self.max_depth);
        self.len += 1;
    }

    /// Ids of every entry whose box intersects `query`, in no particular order
    pub fn query(&self, query: &Rect<f64>) -> Vec<usize> {
        let mut found = Vec::new();
        self.root.query(query, &mut found);
        found
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.root.bounds
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Deepest level reached by any node
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl QuadNode {
    fn new(bounds: Rect<f64>, level: usize) -> Self {
        Self {
            bounds,
            level,
            objects: Vec::new(),
            children: None,
        }
    }

    fn split(&mut self) {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        let mid = self.bounds.center();
        let level = self.level + 1;

        self.children = Some(Box::new([
            QuadNode::new(Rect::new(mid, max), level),
            QuadNode::new(
                Rect::new(coord! { x: min.x, y: mid.y }, coord! { x: mid.x, y: max.y }),
                level,
            ),
            QuadNode::new(Rect::new(min, mid), level),
            QuadNode::new(
                Rect::new(coord! { x: mid.x, y: min.y }, coord! { x: max.x, y: mid.y }),
                level,
            ),
        ]));
    }

    /// Quadrant that wholly contains `bbox`, strictly off the midlines
    fn quadrant(&self, bbox: &Rect<f64>) -> Option<usize> {
        let mid = self.bounds.center();

        let top = bbox.min().y > mid.y;
        let bottom = bbox.max().y < mid.y;
        let left = bbox.max().x < mid.x;
        let right = bbox.min().x > mid.x;

        match (top, bottom, left, right) {
            (true, _, _, true) => Some(0),
            (true, _, true, _) => Some(1),
            (_, true, true, _) => Some(2),
            (_, true, _, true) => Some(3),
            _ => None,
        }
    }

    fn insert(&mut self, slot: Slot, max_objects: usize, max_depth: usize) {
        if let Some(idx) = self.quadrant(&slot.bbox) {
            if let Some(children) = self.children.as_mut() {
                children[idx].insert(slot, max_objects, max_depth);
                return;
            }
        }

        self.objects.push(slot);

        if self.objects.len() > max_objects && self.level < max_depth {
            if self.children.is_none() {
                self.split();
            }
            self.redistribute(max_objects, max_depth);
        }
    }

    fn redistribute(&mut self, max_objects: usize, max_depth: usize) {
        let retained = std::mem::take(&mut self.objects);
        for slot in retained {
            match (self.quadrant(&slot.bbox), self.children.as_mut()) {
                (Some(idx), Some(children)) => children[idx].insert(slot, max_objects, max_depth),
                _ => self.objects.push(slot),
            }
        }
    }

    fn query(&self, query: &Rect<f64>, found: &mut Vec<usize>) {
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.bounds.intersects(query) {
                    child.query(query, found);
                }
            }
        }

        found.extend(
            self.objects
                .iter()
                .filter(|slot| slot.bbox.intersects(query))
                .map(|slot| slot.id),
        );
    }

    fn depth(&self) -> usize {
        match &self.children {
            Some(children) => children.iter().map(QuadNode::depth).max().unwrap_or(self.level),
            None => self.level,
        }
    }
}

/// Smallest box enclosing every input box
pub fn union_bounds<I>(boxes: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = Rect<f64>>,
{
    boxes.into_iter().reduce(|acc, b| {
        Rect::new(
            coord! { x: acc.min().x.min(b.min().x), y: acc.min().y.min(b.min().y) },
            coord! { x: acc.max().x.max(b.max().x), y: acc.max().y.max(b.max().y) },
        )
    })
}
