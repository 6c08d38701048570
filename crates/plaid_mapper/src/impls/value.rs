use alloc::boxed::Box;

use crate::info::{NonGenericTypeInfoCell, Type, TypeInfo, TypeKind};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Blank, Reflect, ReflectMut, ReflectRef, Typed, Value};

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new(Type::of::<Self>(), TypeKind::Plain).with_blank(|| Box::new(Value::Null))
        })
    }
}

impl Reflect for Value {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast_fn!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Plain(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Plain(self)
    }
}

impl Blank for Value {
    #[inline]
    fn blank() -> Self {
        Value::Null
    }
}
