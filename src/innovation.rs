use fxhash::FxHashMap;

/// Innovation registry, owned by a population and handed to every mutation as `&mut`.
///
/// `head` and `node_head` only ever grow. [InnoGen::reset] forgets which paths were seen this
/// generation, so the same mutation in a later generation is issued a fresh, larger id.
#[derive(Debug, Clone, Default)]
pub struct InnoGen {
    pub head: usize,
    pub node_head: usize,
    paths: FxHashMap<(usize, usize), usize>,
    splits: FxHashMap<(usize, usize), usize>,
}

impl InnoGen {
    /// A registry whose hidden node ids begin after `node_head` reserved input/output ids
    pub fn new(node_head: usize) -> Self {
        Self {
            head: 0,
            node_head,
            ..Default::default()
        }
    }

    /// Innovation id of a connection along `(from, to)`
    pub fn path(&mut self, v: (usize, usize)) -> usize {
        match self.paths.get(&v) {
            Some(n) => *n,
            None => {
                let n = self.head;
                self.head += 1;
                self.paths.insert(v, n);
                n
            }
        }
    }

    /// Id of the hidden node created by splitting the connection along `(from, to)`
    pub fn split(&mut self, v: (usize, usize)) -> usize {
        *self.splits.entry(v).or_insert_with(|| {
            let n = self.node_head;
            self.node_head += 1;
            n
        })
    }

    pub fn reset(&mut self) {
        self.paths.clear();
        self.splits.clear();
    }
}
