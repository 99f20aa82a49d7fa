//! # Type Ancestry
//!
//! Computes and memoizes, for any [`TypeKey`], the ordered, duplicate-free
//! closure of its ancestors.
//!
//! # Order
//!
//! 1. The type itself (when requested).
//! 2. Its linear supertype chain, nearest to farthest.
//! 3. For each type in `[self, supertypes...]`, in that order, each declared
//!    contract in declaration order, each immediately followed depth-first by
//!    its own super-contracts.
//!
//! Contracts are always appended after the supertype chain, never
//! interleaved with it. A key already present earlier in the chain is
//! skipped, so diamond-shaped contract graphs and accidental cycles
//! terminate with every ancestor listed exactly once.
//!
//! # Eviction
//!
//! Cache entries are ordinary map entries, not weak keys. Hosts that unload
//! types call [`TypeAncestry::evict`] (or undeclare through a [`Hierarchy`]
//! whose generation changes, which discards the whole cache).

use crate::{graph::Hierarchy, key::TypeKey};
use parking_lot::RwLock;
use std::{
    collections::{HashMap, HashSet},
    fmt,
    ops::Deref,
    sync::Arc,
};

/// Ordered ancestors of one type.
///
/// Cheap to clone; all chains for the same type share one allocation.
#[derive(Clone)]
pub struct AncestryChain {
    keys: Arc<[TypeKey]>,
    start: usize,
}

impl AncestryChain {
    fn new(keys: Arc<[TypeKey]>, include_self: bool) -> Self {
        let start = usize::from(!include_self && !keys.is_empty());
        Self { keys, start }
    }

    /// The chain as a slice.
    pub fn as_slice(&self) -> &[TypeKey] {
        &self.keys[self.start..]
    }
}

impl Deref for AncestryChain {
    type Target = [TypeKey];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl fmt::Debug for AncestryChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl PartialEq<[TypeKey]> for AncestryChain {
    fn eq(&self, other: &[TypeKey]) -> bool {
        self.as_slice() == other
    }
}

struct Cache {
    generation: u64,
    chains: HashMap<TypeKey, Arc<[TypeKey]>>,
}

/// Memoizing ancestry calculator over a [`Hierarchy`].
///
/// One instance is typically shared (via `Arc`) by every registry built on
/// the same hierarchy.
pub struct TypeAncestry {
    hierarchy: Arc<dyn Hierarchy>,
    cache: RwLock<Cache>,
}

impl TypeAncestry {
    /// Create a calculator over `hierarchy`.
    pub fn new(hierarchy: Arc<dyn Hierarchy>) -> Self {
        let generation = hierarchy.generation();
        Self {
            hierarchy,
            cache: RwLock::new(Cache {
                generation,
                chains: HashMap::new(),
            }),
        }
    }

    /// The hierarchy this calculator walks.
    pub fn hierarchy(&self) -> &dyn Hierarchy {
        &*self.hierarchy
    }

    /// Ancestors of `ty`, computed once and memoized.
    pub fn ancestry_of(&self, ty: TypeKey, include_self: bool) -> AncestryChain {
        let generation = self.hierarchy.generation();
        {
            let cache = self.cache.read();
            if cache.generation == generation {
                if let Some(keys) = cache.chains.get(&ty) {
                    return AncestryChain::new(keys.clone(), include_self);
                }
            }
        }

        let computed: Arc<[TypeKey]> = self.compute(ty).into();

        let mut cache = self.cache.write();
        if generation < cache.generation {
            // Computed against a relation that has since changed.
            return AncestryChain::new(computed, include_self);
        }
        if cache.generation != generation {
            log_debug!(
                from = cache.generation,
                to = generation,
                "hierarchy changed; discarding ancestry cache"
            );
            cache.chains.clear();
            cache.generation = generation;
        }
        // Racing computations converge on whichever chain landed first.
        let keys = cache.chains.entry(ty).or_insert(computed).clone();
        AncestryChain::new(keys, include_self)
    }

    /// Drop the memoized chain for `ty`. Returns whether one was cached.
    pub fn evict(&self, ty: TypeKey) -> bool {
        let evicted = self.cache.write().chains.remove(&ty).is_some();
        if evicted {
            log_debug!(ty = %ty, "evicted ancestry chain");
        }
        evicted
    }

    /// Drop every memoized chain.
    pub fn clear(&self) {
        self.cache.write().chains.clear();
    }

    /// Number of memoized chains.
    pub fn cached(&self) -> usize {
        self.cache.read().chains.len()
    }

    fn compute(&self, ty: TypeKey) -> Vec<TypeKey> {
        let mut chain = vec![ty];
        let mut seen = HashSet::from([ty]);

        let mut current = ty;
        while let Some(supertype) = self.hierarchy.supertype(current) {
            if !seen.insert(supertype) {
                break;
            }
            chain.push(supertype);
            current = supertype;
        }

        let classes = chain.clone();
        for class in classes {
            for contract in self.hierarchy.contracts(class) {
                self.push_contract(contract, &mut chain, &mut seen);
            }
        }

        log_trace!(ty = %ty, len = chain.len(), "computed ancestry");
        chain
    }

    fn push_contract(&self, contract: TypeKey, chain: &mut Vec<TypeKey>, seen: &mut HashSet<TypeKey>) {
        if !seen.insert(contract) {
            return;
        }
        chain.push(contract);
        for parent in self.hierarchy.contracts(contract) {
            self.push_contract(parent, chain, seen);
        }
    }
}

impl fmt::Debug for TypeAncestry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeAncestry")
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}
