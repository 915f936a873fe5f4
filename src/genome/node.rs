#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Input,
    Output,
    Hidden,
}

/// A node gene. `slot` indexes the external input or output vector, and is only present for
/// input and output nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeGene {
    pub id: usize,
    pub kind: NodeKind,
    pub slot: Option<usize>,
}

impl NodeGene {
    pub fn input(id: usize, slot: usize) -> Self {
        Self {
            id,
            kind: NodeKind::Input,
            slot: Some(slot),
        }
    }

    pub fn output(id: usize, slot: usize) -> Self {
        Self {
            id,
            kind: NodeKind::Output,
            slot: Some(slot),
        }
    }

    pub fn hidden(id: usize) -> Self {
        Self {
            id,
            kind: NodeKind::Hidden,
            slot: None,
        }
    }

    /// whether a connection may leave this node
    #[inline]
    pub fn sources(&self) -> bool {
        !matches!(self.kind, NodeKind::Output)
    }

    /// whether a connection may enter this node
    #[inline]
    pub fn targets(&self) -> bool {
        !matches!(self.kind, NodeKind::Input)
    }
}
