use alloc::boxed::Box;

use crate::info::{GenericTypeInfoCell, OptionalInfo, Type, TypeInfo, TypeKind};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Blank, Reflect, ReflectMut, ReflectRef, Typed};

fn wrap<T: Typed>(inner: Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    match inner {
        None => Ok(Box::new(None::<T>)),
        Some(value) => Ok(Box::new(Some(value.take::<T>()?))),
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new(
                Type::of::<Self>(),
                TypeKind::Optional(OptionalInfo::new(T::type_info, wrap::<T>)),
            )
            .with_blank(|| Box::new(None::<T>))
        })
    }
}

impl<T: Typed> Reflect for Option<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast_fn!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self.as_ref().map(|v| v as &dyn Reflect))
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl<T> Blank for Option<T> {
    #[inline]
    fn blank() -> Self {
        None
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::{ReflectRef, Typed};

    #[test]
    fn wrap_and_view() {
        let info = <Option<i32> as Typed>::type_info().as_optional().unwrap();
        assert_eq!(info.some().type_name(), "i32");

        let some = info.wrap(Some(Box::new(3_i32))).unwrap();
        assert_eq!(some.downcast_ref::<Option<i32>>(), Some(&Some(3)));
        assert!(info.wrap(Some(Box::new(3_u8))).is_err());

        let none = info.wrap(None).unwrap();
        assert!(matches!(none.reflect_ref(), ReflectRef::Optional(None)));
    }
}
