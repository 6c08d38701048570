use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::hash::Hash;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::info::{GenericTypeInfoCell, MapInfo, Type, TypeInfo, TypeKind};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Blank, Map, Reflect, ReflectMut, ReflectRef, Typed};

macro_rules! impl_lookup {
    ($ty:ident, [$($key_bound:tt)*]) => {
        impl<K: Typed + $($key_bound)*, V: Typed> Typed for $ty<K, V> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::new(
                        Type::of::<Self>(),
                        TypeKind::Lookup(MapInfo::new(K::type_info, V::type_info)),
                    )
                    .with_blank(|| Box::new(<$ty<K, V>>::new()))
                })
            }
        }

        impl<K: Typed + $($key_bound)*, V: Typed> Reflect for $ty<K, V> {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            impl_reflect_cast_fn!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Lookup(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Lookup(self)
            }
        }

        impl<K: Typed + $($key_bound)*, V: Typed> Map for $ty<K, V> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<K, V>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(<$ty<K, V>>::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
            }

            fn insert(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
                let key = match key.take::<K>() {
                    Ok(key) => key,
                    Err(key) => return Err((key, value)),
                };
                let value = match value.take::<V>() {
                    Ok(value) => value,
                    Err(value) => return Err((Box::new(key), value)),
                };
                <$ty<K, V>>::insert(self, key, value);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                <$ty<K, V>>::clear(self);
            }
        }

        impl<K: $($key_bound)*, V> Blank for $ty<K, V> {
            #[inline]
            fn blank() -> Self {
                <$ty<K, V>>::new()
            }
        }
    };
}

impl_lookup!(HashMap, [Eq + Hash]);
impl_lookup!(IndexMap, [Eq + Hash]);
impl_lookup!(BTreeMap, [Ord]);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    use indexmap::IndexMap;

    use crate::{Map, Typed};

    #[test]
    fn insert_and_iterate() {
        let mut map = IndexMap::<String, i32>::new();
        assert!(Map::insert(&mut map, Box::new(String::from("a")), Box::new(1_i32)).is_ok());
        assert!(Map::insert(&mut map, Box::new(2_i32), Box::new(1_i32)).is_err());
        assert!(Map::insert(&mut map, Box::new(String::from("b")), Box::new(1.0_f64)).is_err());
        assert_eq!(Map::len(&map), 1);

        let (k, v) = Map::iter(&map).next().unwrap();
        assert_eq!(k.downcast_ref::<String>().map(String::as_str), Some("a"));
        assert_eq!(v.downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn info() {
        let info = <BTreeMap<u32, bool> as Typed>::type_info().as_map().unwrap();
        assert_eq!(info.key().type_name(), "u32");
        assert_eq!(info.value().type_name(), "bool");
    }
}
