use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::info::{Backing, GenericTypeInfoCell, ListInfo, Type, TypeInfo, TypeKind};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Blank, List, ListIter, Reflect, ReflectMut, ReflectRef, Typed};

macro_rules! impl_sequence_reflect {
    () => {
        #[inline]
        fn reflect_type_info(&self) -> &'static TypeInfo {
            <Self as Typed>::type_info()
        }

        impl_reflect_cast_fn!();

        #[inline]
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Sequence(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Sequence(self)
        }
    };
}

macro_rules! impl_growable {
    ($ty:ident, $get:expr, $get_mut:expr, $push:expr) => {
        impl<T: Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::new(
                        Type::of::<Self>(),
                        TypeKind::Sequence(ListInfo::new(T::type_info, Backing::Growable)),
                    )
                    .with_blank(|| Box::new(<$ty<T>>::new()))
                })
            }
        }

        impl<T: Typed> Reflect for $ty<T> {
            impl_sequence_reflect!();
        }

        impl<T: Typed> List for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<T>>::len(self)
            }

            fn get(&self, index: usize) -> Option<&dyn Reflect> {
                $get(self, index).map(|v| v as &dyn Reflect)
            }

            fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
                $get_mut(self, index).map(|v| v as &mut dyn Reflect)
            }

            fn set(&mut self, index: usize, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                if index >= <$ty<T>>::len(self) {
                    return Err(value);
                }
                self[index] = value.take::<T>()?;
                Ok(())
            }

            fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                $push(self, value.take::<T>()?);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                <$ty<T>>::clear(self);
            }

            #[inline]
            fn iter(&self) -> ListIter<'_> {
                ListIter::new(self)
            }
        }

        impl<T> Blank for $ty<T> {
            #[inline]
            fn blank() -> Self {
                <$ty<T>>::new()
            }
        }
    };
}

impl_growable!(Vec, <[T]>::get, <[T]>::get_mut, Vec::push);
impl_growable!(VecDeque, VecDeque::get, VecDeque::get_mut, VecDeque::push_back);

// -----------------------------------------------------------------------------
// Arrays

impl<T: Typed + Blank, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new(
                Type::of::<Self>(),
                TypeKind::Sequence(ListInfo::new(T::type_info, Backing::Fixed(N))),
            )
            .with_blank(|| Box::new(<[T; N] as Blank>::blank()))
        })
    }
}

impl<T: Typed + Blank, const N: usize> Reflect for [T; N] {
    impl_sequence_reflect!();
}

impl<T: Typed + Blank, const N: usize> List for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|v| v as &mut dyn Reflect)
    }

    fn set(&mut self, index: usize, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        if index >= N {
            return Err(value);
        }
        self[index] = value.take::<T>()?;
        Ok(())
    }

    #[inline]
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Err(value)
    }

    fn clear(&mut self) {
        self.iter_mut().for_each(|slot| *slot = T::blank());
    }

    #[inline]
    fn iter(&self) -> ListIter<'_> {
        ListIter::new(self)
    }
}

impl<T: Blank, const N: usize> Blank for [T; N] {
    #[inline]
    fn blank() -> Self {
        core::array::from_fn(|_| T::blank())
    }
}

// -----------------------------------------------------------------------------
// Shared slices

impl<T: Typed> Typed for Arc<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new(
                Type::of::<Self>(),
                TypeKind::Sequence(ListInfo::new(T::type_info, Backing::ReadOnly)),
            )
            .with_blank(|| Box::new(<Arc<[T]> as Blank>::blank()))
        })
    }
}

impl<T: Typed> Reflect for Arc<[T]> {
    impl_sequence_reflect!();
}

impl<T: Typed> List for Arc<[T]> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, _index: usize) -> Option<&mut dyn Reflect> {
        None
    }

    #[inline]
    fn set(&mut self, _index: usize, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Err(value)
    }

    #[inline]
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Err(value)
    }

    #[inline]
    fn clear(&mut self) {}

    #[inline]
    fn iter(&self) -> ListIter<'_> {
        ListIter::new(self)
    }
}

impl<T> Blank for Arc<[T]> {
    #[inline]
    fn blank() -> Self {
        Arc::from(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::info::Backing;
    use crate::{List, Typed};

    #[test]
    fn growable_access() {
        let mut list = vec![1_i32, 2];
        assert_eq!(List::len(&list), 2);
        assert!(List::push(&mut list, Box::new(3_i32)).is_ok());
        assert!(List::push(&mut list, Box::new(String::from("x"))).is_err());
        assert!(List::set(&mut list, 0, Box::new(9_i32)).is_ok());
        assert!(List::set(&mut list, 5, Box::new(9_i32)).is_err());
        assert_eq!(list, [9, 2, 3]);

        let total: i32 = List::iter(&list).filter_map(|v| v.downcast_ref::<i32>()).sum();
        assert_eq!(total, 14);

        let mut deque = VecDeque::<u8>::new();
        assert!(List::push(&mut deque, Box::new(1_u8)).is_ok());
        assert_eq!(List::get(&deque, 0).and_then(|v| v.downcast_ref::<u8>()), Some(&1));
    }

    #[test]
    fn fixed_access() {
        let info = <[u8; 4] as Typed>::type_info().as_list().unwrap();
        assert_eq!(info.backing(), Backing::Fixed(4));
        assert_eq!(<Vec<u8> as Typed>::type_info().as_list().unwrap().backing(), Backing::Growable);

        let mut array = [1_u8; 4];
        assert!(List::push(&mut array, Box::new(1_u8)).is_err());
        assert!(List::set(&mut array, 3, Box::new(7_u8)).is_ok());
        List::clear(&mut array);
        assert_eq!(array, [0; 4]);
    }

    #[test]
    fn shared_slices_are_read_only() {
        let info = <Arc<[u8]> as Typed>::type_info().as_list().unwrap();
        assert_eq!(info.backing(), Backing::ReadOnly);

        let mut shared: Arc<[u8]> = Arc::from([1_u8, 2]);
        assert_eq!(List::get(&shared, 1).and_then(|v| v.downcast_ref::<u8>()), Some(&2));
        assert!(List::get_mut(&mut shared, 0).is_none());
        assert!(List::push(&mut shared, Box::new(3_u8)).is_err());
        List::clear(&mut shared);
        assert_eq!(List::len(&shared), 2);
    }
}
