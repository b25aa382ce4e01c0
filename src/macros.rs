//! `impl_enum_from!`: boilerplate `From<Variant> for Wrapper` impls for the
//! closed component enums (`NormalizerWrapper`, `PreTokenizerWrapper`, ...).

macro_rules! impl_enum_from {
    ($from_ty:ty, $enum_name:ident, $variant:ident) => {
        impl From<$from_ty> for $enum_name {
            fn from(from: $from_ty) -> Self {
                $enum_name::$variant(from)
            }
        }
    };
}
