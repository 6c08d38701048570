//! Polymorphic type resolution.
//!
//! A hierarchy declares discriminator entries with
//! `#[mapping(resolve(target = T, key = "..", value = ".."))]`. On the way out,
//! the entries matching a value's runtime type are written into its data;
//! on the way in, the data is matched against the entries to narrow a
//! requested base type down to the concrete type, one level per pass.

use alloc::vec::Vec;

use crate::error::TypeResolutionError;
use crate::info::{Resolution, TypeInfo};
use crate::registry::TypeRegistry;
use crate::value::{Lookup, Value};

/// A discriminator to write for a value.
#[derive(Clone, Copy, Debug)]
pub struct Discriminator<'a> {
    pub key: &'a str,
    pub index: usize,
    pub value: &'static str,
    pub target: &'static TypeInfo,
}

/// Discriminator insertion and type resolution over a registry.
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
    key: &'a str,
    index: usize,
}

impl<'a> TypeResolver<'a> {
    /// `key` and `index` apply to entries that do not override them.
    #[inline]
    pub const fn new(registry: &'a TypeRegistry, key: &'a str, index: usize) -> Self {
        Self { registry, key, index }
    }

    #[inline]
    fn key_of(&self, entry: &'static Resolution) -> &'a str {
        entry.key().unwrap_or(self.key)
    }

    #[inline]
    fn index_of(&self, entry: &'static Resolution) -> usize {
        entry.index().unwrap_or(self.index)
    }

    /// The discriminators describing `source`, at most one per key.
    ///
    /// For each key, the entry with the least derived target wins: a
    /// `Puppy` deriving from `Dog` is described by `Dog`'s `kind` entry,
    /// and only keys no ancestor uses carry the more specific entries.
    pub fn discriminators(&self, source: &'static TypeInfo) -> Vec<Discriminator<'a>> {
        let table = self.registry.resolution_table(source);
        let mut out: Vec<Discriminator<'a>> = Vec::new();
        for &entry in table.iter() {
            let target = entry.target();
            if !target.is_assignable_from(source) {
                continue;
            }
            let found = Discriminator {
                key: self.key_of(entry),
                index: self.index_of(entry),
                value: entry.value(),
                target,
            };
            match out.iter_mut().find(|d| d.key == found.key) {
                Some(prev) if prev.target.is_assignable_from(target) => {}
                Some(prev) => *prev = found,
                None => out.push(found),
            }
        }
        out
    }

    /// Writes the discriminators of `source` into lookup data.
    ///
    /// Keys already present hold author-supplied data and are left alone.
    pub fn insert_lookup(&self, source: &'static TypeInfo, data: &mut Lookup) {
        for found in self.discriminators(source) {
            if data.contains_key(found.key) {
                log::debug!(
                    "discriminator `{}` of `{}` collides with a member, keeping the member",
                    found.key,
                    source.type_path()
                );
                continue;
            }
            data.insert(found.key.into(), Value::String(found.value.into()));
        }
    }

    /// Writes the discriminators of `source` into sequence data, growing it
    /// with nulls as needed.
    ///
    /// Non-null slots hold author-supplied data and are left alone.
    pub fn insert_sequence(&self, source: &'static TypeInfo, data: &mut Vec<Value>) {
        for found in self.discriminators(source) {
            if data.len() <= found.index {
                data.resize(found.index + 1, Value::Null);
            }
            let slot = &mut data[found.index];
            if !slot.is_null() {
                log::debug!(
                    "discriminator index {} of `{}` collides with a member, keeping the member",
                    found.index,
                    source.type_path()
                );
                continue;
            }
            *slot = Value::String(found.value.into());
        }
    }

    fn matches(&self, entry: &'static Resolution, data: &Value) -> bool {
        let found = match data {
            Value::Lookup(map) => map.get(self.key_of(entry)),
            Value::Sequence(items) => items.get(self.index_of(entry)),
            _ => None,
        };
        found
            .and_then(Value::scalar_text)
            .is_some_and(|text| text == entry.value())
    }

    /// Narrows `requested` to the most derived type the data denotes.
    ///
    /// Each pass accepts only strict descendants of the current type whose
    /// discriminator matches, so the loop ends after at most one pass per
    /// hierarchy level. Matches on unrelated branches in the same pass are
    /// ambiguous.
    pub fn resolve(&self, requested: &'static TypeInfo, data: &Value) -> Result<&'static TypeInfo, TypeResolutionError> {
        let table = self.registry.resolution_table(requested);
        let mut current = requested;
        loop {
            let mut next: Option<&'static TypeInfo> = None;
            for &entry in table.iter() {
                let target = entry.target();
                if target.type_id() == current.type_id() || !current.is_assignable_from(target) {
                    continue;
                }
                if !self.matches(entry, data) {
                    continue;
                }
                next = Some(match next {
                    None => target,
                    Some(prev) if prev.is_assignable_from(target) => prev,
                    Some(prev) if target.is_assignable_from(prev) => target,
                    Some(prev) => {
                        return Err(TypeResolutionError::Ambiguous {
                            requested: requested.type_path(),
                            first: prev.type_path(),
                            second: target.type_path(),
                        });
                    }
                });
            }
            match next {
                Some(narrower) => {
                    log::trace!("resolved `{}` to `{}`", current.type_path(), narrower.type_path());
                    current = narrower;
                }
                None => break,
            }
        }

        if current.is_instantiable() {
            Ok(current)
        } else {
            Err(TypeResolutionError::NotInstantiable {
                type_path: current.type_path(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::TypeResolver;
    use crate::derive::Mapped;
    use crate::error::TypeResolutionError;
    use crate::impls::Poly;
    use crate::processor::{Definition, Mapper};
    use crate::registry::TypeRegistry;
    use crate::value::{Lookup, Value};
    use crate::{MapError, Typed};

    #[derive(Mapped, Debug, PartialEq)]
    #[mapping(
        resolve(target = Dog, key = "kind", value = "dog"),
        resolve(target = Bird, key = "wings", value = "2")
    )]
    struct Animal {
        name: String,
    }

    #[derive(Mapped, Debug, PartialEq)]
    #[mapping(resolve(target = Puppy, key = "stage", value = "puppy"))]
    struct Dog {
        #[mapping(base)]
        animal: Animal,
        good: bool,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Puppy {
        #[mapping(base)]
        dog: Dog,
        age: u8,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Bird {
        #[mapping(base)]
        animal: Animal,
    }

    #[derive(Mapped, Debug)]
    struct Zoo {
        animals: Vec<Poly<Animal>>,
    }

    fn registry() -> Arc<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry.register::<Zoo>();
        Arc::new(registry)
    }

    fn lookup(entries: &[(&str, Value)]) -> Value {
        Value::Lookup(entries.iter().map(|(k, v)| (String::from(*k), v.clone())).collect::<Lookup>())
    }

    fn puppy() -> Puppy {
        Puppy {
            dog: Dog {
                animal: Animal { name: "rex".into() },
                good: true,
            },
            age: 1,
        }
    }

    #[test]
    fn resolves_one_level_per_discriminator() {
        let registry = registry();
        let resolver = TypeResolver::new(&registry, "$type", 0);
        let animal = Animal::type_info();

        let plain = lookup(&[("name", Value::from("a"))]);
        assert_eq!(resolver.resolve(animal, &plain).unwrap().type_id(), animal.type_id());

        let dog = lookup(&[("kind", Value::from("dog"))]);
        assert_eq!(resolver.resolve(animal, &dog).unwrap().type_id(), Dog::type_info().type_id());

        let puppy = lookup(&[("kind", Value::from("dog")), ("stage", Value::from("puppy"))]);
        assert_eq!(resolver.resolve(animal, &puppy).unwrap().type_id(), Puppy::type_info().type_id());

        // Numbers match by their text.
        let bird = lookup(&[("wings", Value::from(2))]);
        assert_eq!(resolver.resolve(animal, &bird).unwrap().type_id(), Bird::type_info().type_id());

        // Narrowing never goes back up.
        assert_eq!(
            resolver.resolve(Puppy::type_info(), &dog).unwrap().type_id(),
            Puppy::type_info().type_id()
        );
    }

    #[test]
    fn unrelated_matches_are_ambiguous() {
        let registry = registry();
        let resolver = TypeResolver::new(&registry, "$type", 0);
        let both = lookup(&[("kind", Value::from("dog")), ("wings", Value::from("2"))]);
        let err = resolver.resolve(Animal::type_info(), &both).unwrap_err();
        assert!(matches!(err, TypeResolutionError::Ambiguous { requested, .. } if requested == Animal::type_info().type_path()));
    }

    #[test]
    fn discriminators_keep_the_least_derived_per_key() {
        let registry = registry();
        let resolver = TypeResolver::new(&registry, "$type", 0);
        let found = resolver.discriminators(Puppy::type_info());
        let pairs: Vec<_> = found.iter().map(|d| (d.key, d.value)).collect();
        assert_eq!(pairs, [("kind", "dog"), ("stage", "puppy")]);

        let mut data = Lookup::new();
        data.insert("kind".into(), Value::from("wolf"));
        resolver.insert_lookup(Puppy::type_info(), &mut data);
        assert_eq!(data.get("kind"), Some(&Value::from("wolf")));
        assert_eq!(data.get("stage"), Some(&Value::from("puppy")));
    }

    #[test]
    fn polymorphic_round_trip() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);

        let zoo = Zoo {
            animals: vec![
                Poly::new(puppy()).unwrap(),
                Poly::new(Animal { name: "generic".into() }).unwrap(),
            ],
        };
        let data = mapper.to_value(&zoo).unwrap();
        let first = data.get("animals").and_then(|a| a.get_index(0)).unwrap();
        assert_eq!(first.get("kind"), Some(&Value::from("dog")));
        assert_eq!(first.get("stage"), Some(&Value::from("puppy")));
        assert_eq!(first.get("age"), Some(&Value::from(1)));

        let back: Zoo = mapper.from_value(&data).unwrap();
        assert_eq!(back.animals.len(), 2);
        assert_eq!(back.animals[0].downcast_ref::<Puppy>(), Some(&puppy()));
        assert_eq!(back.animals[1].base().map(|a| a.name.as_str()), Some("generic"));
        assert!(back.animals[1].is::<Animal>());
    }

    #[test]
    fn sequence_data_reserves_the_discriminator_slot() {
        let definition = Definition::sequence(registry());
        let mapper = Mapper::new(&definition);

        let data = mapper.to_value(&Poly::<Animal>::new(Bird { animal: Animal { name: "tweety".into() } }).unwrap()).unwrap();
        let items = data.as_sequence().unwrap();
        assert_eq!(items[0], Value::from("2"));
        assert_eq!(items[1], Value::from("tweety"));

        let back = mapper.deserialize_resolved(Animal::type_info(), &data).unwrap();
        assert!(back.is::<Bird>());
    }

    #[test]
    fn unusable_slots_are_dropped() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);
        let data = lookup(&[("animals", Value::from(vec![Value::Null, Value::from(1)]))]);
        let zoo: Zoo = mapper.from_value(&data).unwrap();
        assert!(zoo.animals.is_empty());
    }

    #[test]
    fn ambiguity_fails_the_slot() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);
        let both = lookup(&[("kind", Value::from("dog")), ("wings", Value::from("2"))]);
        let data = lookup(&[("animals", Value::from(vec![both]))]);
        let err = mapper.from_value::<Zoo>(&data).unwrap_err();
        assert!(matches!(err, MapError::TypeResolution(TypeResolutionError::Ambiguous { .. })));
    }
}
