//! Constrained insertion into reflected collections.
//!
//! Values are first converted to the collection's element type: scalars
//! convert between each other, anything scalar becomes a plain [`Value`] in
//! an unconstrained collection. Growable sequences pad with blank elements
//! when inserting past the end; fixed-size sequences reject out-of-range
//! indices and read-only ones every index with a [`CollectionError`].

use alloc::boxed::Box;

use crate::error::CollectionError;
use crate::info::{Backing, TypeInfo, TypeKind};
use crate::{List, Map, MapError, Reflect, ReflectRef};

/// Converts `value` into an instance of `to`.
///
/// ```
/// use plaid_mapper::collections::convert;
/// use plaid_mapper::{Typed, Value};
///
/// let converted = convert(Box::new(7_u8), i64::type_info()).unwrap();
/// assert_eq!(converted.downcast_ref::<i64>(), Some(&7));
///
/// let plain = convert(Box::new(true), Value::type_info()).unwrap();
/// assert_eq!(plain.downcast_ref::<Value>(), Some(&Value::Bool(true)));
///
/// assert!(convert(Box::new(1.5_f64), i64::type_info()).is_err());
/// ```
pub fn convert(value: Box<dyn Reflect>, to: &'static TypeInfo) -> Result<Box<dyn Reflect>, MapError> {
    if value.reflect_type_info().type_id() == to.type_id() {
        return Ok(value);
    }
    let converted = match (value.reflect_ref(), to.kind()) {
        (ReflectRef::Scalar(scalar), TypeKind::Plain) => Some(Box::new(scalar.to_value()) as Box<dyn Reflect>),
        (ReflectRef::Scalar(scalar), TypeKind::Scalar(info)) => info.from_scalar(scalar),
        (ReflectRef::Plain(plain), TypeKind::Scalar(info)) => {
            crate::ScalarRef::from_value(plain).and_then(|scalar| info.from_scalar(scalar))
        }
        _ => None,
    };
    converted.ok_or_else(|| MapError::conversion(alloc::format!("`{}`", value.type_path()), to.type_path()))
}

/// Inserts `value` at `index`, converting it to the element type first.
///
/// Growable sequences are padded with blank elements up to `index`;
/// an index equal to the length appends.
pub fn insert_at(list: &mut dyn List, index: usize, value: Box<dyn Reflect>) -> Result<(), MapError> {
    let info = list.reflect_type_info();
    let Some(list_info) = info.as_list() else {
        return Err(MapError::unsupported(alloc::format!("`{}` as a sequence", info.type_path())));
    };
    let item = list_info.item();
    let value = convert(value, item)?;
    let rejected = |_| {
        MapError::from(CollectionError::Rejected {
            collection: info.type_path(),
            index,
        })
    };

    match list_info.backing() {
        Backing::ReadOnly => Err(CollectionError::ReadOnly {
            collection: info.type_path(),
            index,
        }
        .into()),
        Backing::Fixed(capacity) => {
            if index >= capacity {
                return Err(CollectionError::OutOfBounds {
                    collection: info.type_path(),
                    index,
                    capacity,
                }
                .into());
            }
            list.set(index, value).map_err(rejected)
        }
        Backing::Growable => {
            while list.len() < index {
                let blank = item.blank().ok_or(CollectionError::Rejected {
                    collection: info.type_path(),
                    index,
                })?;
                list.push(blank).map_err(rejected)?;
            }
            if index == list.len() {
                list.push(value).map_err(rejected)
            } else {
                list.set(index, value).map_err(rejected)
            }
        }
    }
}

/// Inserts an entry, converting key and value to the mapping's types first.
pub fn insert_entry(map: &mut dyn Map, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> Result<(), MapError> {
    let info = map.reflect_type_info();
    let Some(map_info) = info.as_map() else {
        return Err(MapError::unsupported(alloc::format!("`{}` as a lookup", info.type_path())));
    };
    let key = convert(key, map_info.key())?;
    let value = convert(value, map_info.value())?;
    map.insert(key, value).map_err(|_| {
        MapError::from(CollectionError::Rejected {
            collection: info.type_path(),
            index: map.len(),
        })
    })
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{insert_at, insert_entry};
    use crate::error::CollectionError;
    use crate::{MapError, Value};

    #[test]
    fn growable_pads_with_blanks() {
        let mut list: Vec<i32> = vec![1];
        insert_at(&mut list, 3, Box::new(4_i64)).unwrap();
        assert_eq!(list, [1, 0, 0, 4]);
        insert_at(&mut list, 1, Box::new(String::from("2"))).unwrap();
        assert_eq!(list, [1, 2, 0, 4]);
        insert_at(&mut list, 4, Box::new(5_u8)).unwrap();
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn fixed_rejects_out_of_range() {
        let mut array = [0_u8; 4];
        insert_at(&mut array, 3, Box::new(9_i32)).unwrap();
        assert_eq!(array, [0, 0, 0, 9]);

        let err = insert_at(&mut array, 5, Box::new(1_i32)).unwrap_err();
        assert_eq!(
            err,
            MapError::Collection(CollectionError::OutOfBounds {
                collection: "[u8; 4]",
                index: 5,
                capacity: 4,
            })
        );
    }

    #[test]
    fn read_only_rejects_everything() {
        let mut shared: Arc<[u8]> = Arc::from([1_u8, 2]);
        let err = insert_at(&mut shared, 0, Box::new(3_u8)).unwrap_err();
        assert!(matches!(err, MapError::Collection(CollectionError::ReadOnly { index: 0, .. })));
        assert!(!err.is_element_failure());
        assert_eq!(&*shared, [1, 2]);
    }

    #[test]
    fn conversion_failures() {
        let mut list: Vec<u8> = Vec::new();
        let err = insert_at(&mut list, 0, Box::new(String::from("x"))).unwrap_err();
        assert!(err.is_element_failure());
        assert!(list.is_empty());
    }

    #[test]
    fn unconstrained_accepts_scalars() {
        let mut list: Vec<Value> = Vec::new();
        insert_at(&mut list, 0, Box::new(1.5_f64)).unwrap();
        insert_at(&mut list, 1, Box::new(Value::Null)).unwrap();
        assert_eq!(list, [Value::from(1.5), Value::Null]);

        let mut map = indexmap::IndexMap::<u32, Value>::new();
        insert_entry(&mut map, Box::new(String::from("7")), Box::new(true)).unwrap();
        assert_eq!(map.get(&7), Some(&Value::Bool(true)));
    }
}
