use alloc::boxed::Box;
use alloc::string::{String, ToString};

use crate::info::{FromScalar, NonGenericTypeInfoCell, ScalarInfo, ScalarKind, Type, TypeInfo, TypeKind};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Blank, Reflect, ReflectMut, ReflectRef, ScalarRef, Typed};

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident, |$this:ident| $view:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::new(
                        Type::of::<$ty>(),
                        TypeKind::Scalar(ScalarInfo::new::<$ty>(ScalarKind::$kind)),
                    )
                    .with_blank(|| Box::new(<$ty as Blank>::blank()))
                })
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            impl_reflect_cast_fn!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                let $this = self;
                ReflectRef::Scalar($view)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Opaque(self)
            }
        }

        impl Blank for $ty {
            #[inline]
            fn blank() -> Self {
                <$ty>::default()
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Integers

#[inline]
fn integral(v: f64) -> Option<f64> {
    (v.is_finite() && v.fract() == 0.0).then_some(v)
}

macro_rules! impl_integer {
    ($($ty:ty => $kind:ident as $wide:ident),* $(,)?) => {$(
        impl FromScalar for $ty {
            fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
                match scalar {
                    ScalarRef::Int(v) => <$ty>::try_from(v).ok(),
                    ScalarRef::UInt(v) => <$ty>::try_from(v).ok(),
                    ScalarRef::F32(v) => Self::from_scalar(ScalarRef::F64(f64::from(v))),
                    ScalarRef::F64(v) => {
                        let v = integral(v)?;
                        (v >= <$ty>::MIN as f64 && v <= <$ty>::MAX as f64).then(|| v as $ty)
                    }
                    ScalarRef::Bool(b) => Some(<$ty>::from(b)),
                    ScalarRef::Str(s) => s.trim().parse().ok(),
                    ScalarRef::Char(_) => None,
                }
            }
        }

        impl_scalar!($ty, $kind, |this| ScalarRef::$wide(*this as _));
    )*};
}

impl_integer! {
    i8 => Int as Int,
    i16 => Int as Int,
    i32 => Int as Int,
    i64 => Int as Int,
    isize => Int as Int,
    u8 => UInt as UInt,
    u16 => UInt as UInt,
    u32 => UInt as UInt,
    u64 => UInt as UInt,
    usize => UInt as UInt,
}

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_float {
    ($($ty:ident => $variant:ident),*) => {$(
        impl FromScalar for $ty {
            fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
                match scalar {
                    ScalarRef::Int(v) => Some(v as $ty),
                    ScalarRef::UInt(v) => Some(v as $ty),
                    ScalarRef::F32(v) => Some(v as $ty),
                    ScalarRef::F64(v) => Some(v as $ty),
                    ScalarRef::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
                    ScalarRef::Str(s) => s.trim().parse().ok(),
                    ScalarRef::Char(_) => None,
                }
            }
        }

        impl_scalar!($ty, Float, |this| ScalarRef::$variant(*this));
    )*};
}

impl_float!(f32 => F32, f64 => F64);

// -----------------------------------------------------------------------------
// Others

impl FromScalar for bool {
    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
        match scalar {
            ScalarRef::Bool(b) => Some(b),
            ScalarRef::Int(v) => matches!(v, 0 | 1).then_some(v == 1),
            ScalarRef::UInt(v) => matches!(v, 0 | 1).then_some(v == 1),
            ScalarRef::Str(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") || s == "1" {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") || s == "0" {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl_scalar!(bool, Bool, |this| ScalarRef::Bool(*this));

impl FromScalar for char {
    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
        match scalar {
            ScalarRef::Char(c) => Some(c),
            ScalarRef::Str(s) => {
                let mut chars = s.chars();
                let c = chars.next()?;
                chars.next().is_none().then_some(c)
            }
            ScalarRef::UInt(v) => u32::try_from(v).ok().and_then(char::from_u32),
            ScalarRef::Int(v) => u32::try_from(v).ok().and_then(char::from_u32),
            _ => None,
        }
    }
}

impl_scalar!(char, Char, |this| ScalarRef::Char(*this));

impl FromScalar for String {
    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
        Some(match scalar {
            ScalarRef::Str(s) => s.into(),
            ScalarRef::Char(c) => c.to_string(),
            other => other.to_text(),
        })
    }
}

impl_scalar!(String, String, |this| ScalarRef::Str(this));

#[cfg(test)]
mod tests {
    use crate::info::FromScalar;
    use crate::{Reflect, ReflectRef, ScalarRef, Typed};

    #[test]
    fn integer_conversions() {
        assert_eq!(i32::from_scalar(ScalarRef::Int(7)), Some(7));
        assert_eq!(i32::from_scalar(ScalarRef::F64(7.0)), Some(7));
        assert_eq!(i32::from_scalar(ScalarRef::F64(7.5)), None);
        assert_eq!(i32::from_scalar(ScalarRef::Str(" 12 ")), Some(12));
        assert_eq!(u8::from_scalar(ScalarRef::Int(-1)), None);
        assert_eq!(u8::from_scalar(ScalarRef::UInt(300)), None);
        assert_eq!(u64::from_scalar(ScalarRef::UInt(u64::MAX)), Some(u64::MAX));
        assert_eq!(i8::from_scalar(ScalarRef::Bool(true)), Some(1));
    }

    #[test]
    fn other_conversions() {
        assert_eq!(f32::from_scalar(ScalarRef::Int(3)), Some(3.0));
        assert_eq!(f64::from_scalar(ScalarRef::Str("2.5")), Some(2.5));
        assert_eq!(bool::from_scalar(ScalarRef::Str("TRUE")), Some(true));
        assert_eq!(bool::from_scalar(ScalarRef::Int(2)), None);
        assert_eq!(char::from_scalar(ScalarRef::Str("x")), Some('x'));
        assert_eq!(char::from_scalar(ScalarRef::Str("xy")), None);
        assert_eq!(String::from_scalar(ScalarRef::F64(1.0)).as_deref(), Some("1.0"));
    }

    #[test]
    fn reflected_views() {
        let v = 5_u16;
        assert!(matches!(v.reflect_ref(), ReflectRef::Scalar(ScalarRef::UInt(5))));
        let s = String::from("hi");
        assert!(matches!(s.reflect_ref(), ReflectRef::Scalar(ScalarRef::Str("hi"))));
        assert_eq!(<i32 as Typed>::type_info().type_name(), "i32");

        let boxed = i32::type_info().as_scalar().unwrap().from_scalar(ScalarRef::Str("9")).unwrap();
        assert_eq!(boxed.downcast_ref::<i32>(), Some(&9));
    }
}
