//! Table of extension kinds.
//!
//! The registry maps wire ids to handlers, and Rust types (or capabilities, such as "implements
//! [crate::MarshalBinary]") to wire ids. Ids below [FIRST_USER_ID] are reserved for the kinds
//! registered by [Registry::with_builtins]; the public registration functions panic on them.
//!
//! A type is resolved by exact match first. Otherwise the capability entries are scanned in
//! registration order and the first one the type satisfies wins (not the most specific one). The
//! result of a scan, including a miss, is cached until the next registration.

use crate::{
    decoder::Decoder,
    encoder::Encoder,
    extension::{Extension, TypeKey},
    handler::Handler,
    kind::{Id, FIRST_USER_ID},
    Error,
};
use std::{
    any::TypeId,
    collections::{HashMap, HashSet},
    fmt,
    sync::{OnceLock, RwLock},
};
use tracing::{debug, trace};

/// Kind for values that implement [crate::MarshalBinary].
pub const BINARY: Id = 65;
/// Kind for values that implement [crate::MarshalText].
pub const TEXT: Id = 66;
/// Kind for arbitrary precision signed integers.
pub const BIG_INT: Id = 67;
/// Kind for arbitrary precision unsigned integers.
pub const BIG_UINT: Id = 68;
/// Kind for arbitrary precision rationals.
pub const BIG_RATIONAL: Id = 69;

/// A property of a type, tested on a default-constructed probe value.
#[derive(Clone, Copy)]
pub struct Capability {
    name: &'static str,
    probe: fn(&dyn Extension) -> bool,
}

fn has_binary(value: &dyn Extension) -> bool {
    value.as_binary().is_some()
}

fn has_text(value: &dyn Extension) -> bool {
    value.as_text().is_some()
}

impl Capability {
    /// Satisfied by types exposing [crate::MarshalBinary].
    pub const BINARY: Self = Self::new("binary", has_binary);

    /// Satisfied by types exposing [crate::MarshalText].
    pub const TEXT: Self = Self::new("text", has_text);

    pub const fn new(name: &'static str, probe: fn(&dyn Extension) -> bool) -> Self {
        Self { name, probe }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn satisfied_by(&self, value: &dyn Extension) -> bool {
        (self.probe)(value)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// What an entry is registered for.
#[derive(Clone, Copy, Debug)]
pub enum Descriptor {
    /// A concrete type.
    Type(TypeKey),
    /// Any type with a capability.
    Capability(Capability),
}

/// A registered kind.
#[derive(Clone, Debug)]
pub struct Entry {
    pub id: Id,
    pub descriptors: Vec<Descriptor>,
    pub handler: Handler,
}

/// How [Registry::run] selects an entry.
#[derive(Clone, Copy, Debug)]
pub enum Key<'a> {
    Id(Id),
    Type(&'a TypeKey),
}

/// What [Registry::run] does with the selected handler.
pub enum Direction<'a, 'b> {
    Encode(&'a mut Encoder<'b>, &'a dyn Extension),
    Decode(&'a mut Decoder<'b>, &'a mut dyn Extension),
}

#[derive(Default)]
struct Inner {
    entries: HashMap<Id, Entry>,
    /// First concrete type registered for each id, used to materialize dynamic values.
    makers: HashMap<Id, TypeKey>,
    /// Exact matches and cached capability matches.
    types: HashMap<TypeId, Id>,
    /// Capability entries in registration order.
    capabilities: Vec<(Capability, Id)>,
    misses: HashSet<TypeId>,
    /// Bumped on every registration. A scan result is only cached if no registration happened
    /// while it ran.
    generation: u64,
}

/// Thread-safe table of extension kinds.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in kinds enabled by crate features.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        #[cfg(feature = "marshal")]
        {
            registry.store(BINARY, Descriptor::Capability(Capability::BINARY), Handler::binary());
            registry.store(TEXT, Descriptor::Capability(Capability::TEXT), Handler::text());
        }
        #[cfg(feature = "big")]
        {
            use crate::types::big::{BigInt, BigRational, BigUint};
            registry.store(BIG_INT, Descriptor::Type(TypeKey::of::<BigInt>()), Handler::binary());
            registry.store(BIG_UINT, Descriptor::Type(TypeKey::of::<BigUint>()), Handler::binary());
            registry.store(
                BIG_RATIONAL,
                Descriptor::Type(TypeKey::of::<BigRational>()),
                Handler::binary(),
            );
        }
        registry
    }

    /// Returns the process-wide registry, populated with the built-in kinds on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_builtins)
    }

    /// Registers a concrete type under `id`.
    ///
    /// The first type registered for an id is the one materialized when the id is decoded into a
    /// dynamically typed slot.
    ///
    /// # Panics
    ///
    /// Panics if `id` is reserved or already registered.
    pub fn register<T: Extension + Default>(&self, id: Id, handler: Handler) {
        assert!(id >= FIRST_USER_ID, "kind {id} is reserved");
        self.store(id, Descriptor::Type(TypeKey::of::<T>()), handler);
    }

    /// Registers every type with `capability` under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is reserved or already registered.
    pub fn register_capability(&self, id: Id, capability: Capability, handler: Handler) {
        assert!(id >= FIRST_USER_ID, "kind {id} is reserved");
        self.store(id, Descriptor::Capability(capability), handler);
    }

    /// Associates another type with an existing id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is reserved or not registered.
    pub fn alias<T: Extension + Default>(&self, id: Id) {
        assert!(id >= FIRST_USER_ID, "kind {id} is reserved");
        self.attach(id, Descriptor::Type(TypeKey::of::<T>()));
    }

    /// Associates another capability with an existing id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is reserved or not registered.
    pub fn alias_capability(&self, id: Id, capability: Capability) {
        assert!(id >= FIRST_USER_ID, "kind {id} is reserved");
        self.attach(id, Descriptor::Capability(capability));
    }

    fn store(&self, id: Id, descriptor: Descriptor, handler: Handler) {
        let mut inner = self.inner.write().unwrap();
        assert!(
            !inner.entries.contains_key(&id),
            "kind {id} is already registered"
        );
        inner.entries.insert(
            id,
            Entry {
                id,
                descriptors: Vec::new(),
                handler,
            },
        );
        Self::index(&mut inner, id, descriptor);
        debug!(id, ?descriptor, "registered kind");
    }

    fn attach(&self, id: Id, descriptor: Descriptor) {
        let mut inner = self.inner.write().unwrap();
        assert!(inner.entries.contains_key(&id), "kind {id} is not registered");
        Self::index(&mut inner, id, descriptor);
        debug!(id, ?descriptor, "aliased kind");
    }

    fn index(inner: &mut Inner, id: Id, descriptor: Descriptor) {
        match descriptor {
            Descriptor::Type(key) => {
                inner.types.insert(key.id(), id);
                inner.makers.entry(id).or_insert(key);
            }
            Descriptor::Capability(capability) => inner.capabilities.push((capability, id)),
        }
        if let Some(entry) = inner.entries.get_mut(&id) {
            entry.descriptors.push(descriptor);
        }

        // A new descriptor may satisfy previously unresolved types.
        inner.misses.clear();
        inner.generation += 1;
    }

    /// Resolves the id for a type.
    pub fn lookup(&self, key: &TypeKey) -> Option<Id> {
        loop {
            {
                let inner = self.inner.read().unwrap();
                if let Some(id) = inner.types.get(&key.id()) {
                    return Some(*id);
                }
                if inner.misses.contains(&key.id()) || inner.capabilities.is_empty() {
                    return None;
                }
            }

            // Scan the capabilities with a probe value (constructed outside of the lock).
            let probe = key.make();
            let (generation, found) = {
                let inner = self.inner.read().unwrap();
                let found = inner
                    .capabilities
                    .iter()
                    .find(|(capability, _)| capability.satisfied_by(probe.as_ref()))
                    .map(|(capability, id)| (*capability, *id));
                (inner.generation, found)
            };

            let mut inner = self.inner.write().unwrap();
            if inner.generation != generation {
                // A registration raced the scan.
                continue;
            }
            return match found {
                Some((capability, id)) => {
                    trace!(ty = key.name(), ?capability, id, "resolved kind by capability");
                    inner.types.insert(key.id(), id);
                    Some(id)
                }
                None => {
                    trace!(ty = key.name(), "no kind for type");
                    inner.misses.insert(key.id());
                    None
                }
            };
        }
    }

    /// Returns the entry registered under `id`.
    pub fn entry(&self, id: Id) -> Option<Entry> {
        self.inner.read().unwrap().entries.get(&id).cloned()
    }

    /// Returns the handler registered under `id`.
    pub fn handler(&self, id: Id) -> Option<Handler> {
        self.inner
            .read()
            .unwrap()
            .entries
            .get(&id)
            .map(|entry| entry.handler.clone())
    }

    /// Returns the type materialized when `id` is decoded dynamically.
    pub fn maker(&self, id: Id) -> Option<TypeKey> {
        self.inner.read().unwrap().makers.get(&id).copied()
    }

    /// Resolves an entry and runs its handler in the given direction.
    ///
    /// Returns `Ok(false)` when nothing is registered for the key.
    pub fn run(&self, key: Key<'_>, direction: Direction<'_, '_>) -> Result<bool, Error> {
        let id = match key {
            Key::Id(id) => id,
            Key::Type(key) => match self.lookup(key) {
                Some(id) => id,
                None => return Ok(false),
            },
        };
        let Some(handler) = self.handler(id) else {
            return Ok(false);
        };
        match direction {
            Direction::Encode(encoder, value) => handler.encode(encoder, value)?,
            Direction::Decode(decoder, target) => handler.decode(decoder, target)?,
        }
        Ok(true)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap();
        let mut ids: Vec<_> = inner.entries.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("Registry").field("ids", &ids).finish()
    }
}
