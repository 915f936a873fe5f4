use rand::{Rng, RngCore, SeedableRng};

/// Map a percentage onto the range of [RngCore::next_u64], so that an event of probability
/// `percent(x)` happens when a roll lands below it.
pub const fn percent(x: u64) -> u64 {
    x * (u64::MAX / 100)
}

/// A cumulative probability table, picking one of `N` outcomes with a single roll.
#[derive(Debug, Clone, Copy)]
pub struct Breakdown<K: Copy, const N: usize> {
    choices: [(K, u64); N],
}

impl<K: Copy, const N: usize> Breakdown<K, N> {
    pub fn new(probabilities: [(K, u64); N]) -> Self {
        let mut choices = probabilities;
        let mut t = 0u64;
        for (choice, (_, p)) in choices.iter_mut().zip(probabilities) {
            t = t.saturating_add(p);
            choice.1 = t;
        }
        Self { choices }
    }

    /// Roll once. Rolls landing past the last bound, which percent rounding leaves a sliver of
    /// room for, fall to the last outcome.
    pub fn pick(&self, rng: &mut impl RngCore) -> Option<K> {
        let roll = rng.next_u64();
        self.choices
            .iter()
            .find_map(|(k, p)| (roll < *p).then_some(*k))
            .or_else(|| self.choices.last().map(|(k, _)| *k))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionEvent {
    /// perturb every connection weight of a genome
    MutateWeights,
    /// given [EvolutionEvent::MutateWeights], redraw every weight instead of perturbing
    NewWeights,
    /// split a connection with a new hidden node
    BisectConnection,
    /// given no bisection, open a new connection
    NewConnection,
    /// reproduce a quota slot by crossover rather than clone-and-mutate
    Crossover,
    /// take the left parent's copy of a matching gene
    PickLeft,
    /// keep a non-matching gene when both parents are equally fit
    KeepTied,
    /// keep a matching gene disabled when either parent has it disabled
    KeepDisabled,
}

pub trait Probabilities {
    type Update;
    fn probability(&self, evt: EvolutionEvent) -> u64;
    fn update(&mut self, stats: Self::Update);
}

pub trait Happens: RngCore + Probabilities {
    fn happens(&mut self, evt: EvolutionEvent) -> bool;
}

impl<T: RngCore + Probabilities> Happens for T {
    fn happens(&mut self, evt: EvolutionEvent) -> bool {
        self.probability(evt) > self.next_u64()
    }
}

#[derive(Debug, Clone)]
pub struct ProbStatic {
    mutate_weights: u64,
    new_weights: u64,
    bisect_connection: u64,
    new_connection: u64,
    crossover: u64,
    pick_left: u64,
    keep_tied: u64,
    keep_disabled: u64,
}

impl ProbStatic {
    pub fn with_overrides(mut self, updates: &[(EvolutionEvent, u64)]) -> Self {
        for update in updates {
            self.update(*update);
        }
        self
    }
}

impl Default for ProbStatic {
    fn default() -> Self {
        Self {
            mutate_weights: percent(80),
            new_weights: percent(10),
            bisect_connection: percent(3),
            new_connection: percent(5),
            crossover: percent(75),
            pick_left: percent(50),
            keep_tied: percent(50),
            keep_disabled: u64::MAX,
        }
    }
}

impl Probabilities for ProbStatic {
    type Update = (EvolutionEvent, u64);
    fn probability(&self, evt: EvolutionEvent) -> u64 {
        match evt {
            EvolutionEvent::MutateWeights => self.mutate_weights,
            EvolutionEvent::NewWeights => self.new_weights,
            EvolutionEvent::BisectConnection => self.bisect_connection,
            EvolutionEvent::NewConnection => self.new_connection,
            EvolutionEvent::Crossover => self.crossover,
            EvolutionEvent::PickLeft => self.pick_left,
            EvolutionEvent::KeepTied => self.keep_tied,
            EvolutionEvent::KeepDisabled => self.keep_disabled,
        }
    }

    fn update(&mut self, (evt, v): Self::Update) {
        match evt {
            EvolutionEvent::MutateWeights => self.mutate_weights = v,
            EvolutionEvent::NewWeights => self.new_weights = v,
            EvolutionEvent::BisectConnection => self.bisect_connection = v,
            EvolutionEvent::NewConnection => self.new_connection = v,
            EvolutionEvent::Crossover => self.crossover = v,
            EvolutionEvent::PickLeft => self.pick_left = v,
            EvolutionEvent::KeepTied => self.keep_tied = v,
            EvolutionEvent::KeepDisabled => self.keep_disabled = v,
        }
    }
}

/// wyrand, a small and fast non-cryptographic generator
#[derive(Debug, Clone)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_ne_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for WyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::seeded(state)
    }
}

/// Binds a [Probabilities] table to a source of randomness, producing something that [Happens].
#[derive(Debug, Clone)]
pub struct ProbBinding<P: Probabilities, R: RngCore> {
    p: P,
    r: R,
}

impl<P: Probabilities, R: RngCore> ProbBinding<P, R> {
    pub fn new(p: P, r: R) -> Self {
        Self { p, r }
    }
}

impl Default for ProbBinding<ProbStatic, WyRng> {
    fn default() -> Self {
        Self::new(ProbStatic::default(), default_rng())
    }
}

impl<P: Probabilities, R: RngCore> Probabilities for ProbBinding<P, R> {
    type Update = P::Update;
    fn probability(&self, evt: EvolutionEvent) -> u64 {
        self.p.probability(evt)
    }

    fn update(&mut self, stats: Self::Update) {
        self.p.update(stats);
    }
}

impl<P: Probabilities, R: RngCore> RngCore for ProbBinding<P, R> {
    fn next_u32(&mut self) -> u32 {
        self.r.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.r.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.r.fill_bytes(dest)
    }
}

/// The generator used when a caller doesn't inject one
pub type DefaultRng = ProbBinding<ProbStatic, WyRng>;

pub fn default_rng() -> WyRng {
    WyRng::seeded(rand::random())
}

/// Two distinct members of pool, or None if there aren't two to pick from
#[inline]
pub fn uniq_2<'a, T>(pool: &'a [T], rng: &mut impl RngCore) -> Option<(&'a T, &'a T)> {
    let len = pool.len();
    if len < 2 {
        None
    } else {
        let l = rng.random_range(0..len);
        let r = rng.random_range(0..len - 1);
        // shift r past l so that every other index is equally likely
        let r = if r >= l { r + 1 } else { r };
        Some((&pool[l], &pool[r]))
    }
}
