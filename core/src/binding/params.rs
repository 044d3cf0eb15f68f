use super::CallError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A tuple of positional parameters decoded from the `params` array.
///
/// Implemented for tuples of up to eight elements. A binding without
/// parameters takes `()`, a single parameter is written `(T,)`.
pub trait Params: Sized {
    const ARITY: usize;

    /// Decodes exactly `ARITY` values. Callers check the length first.
    fn decode(params: &[Value]) -> Result<Self, CallError>;
}

fn decode_at<T: DeserializeOwned>(params: &[Value], index: usize) -> Result<T, CallError> {
    T::deserialize(&params[index]).map_err(|source| CallError::Decode { index, source })
}

macro_rules! impl_params {
    ($arity:expr; $($ty:ident => $index:tt),*) => {
        impl<$($ty: DeserializeOwned),*> Params for ($($ty,)*) {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn decode(params: &[Value]) -> Result<Self, CallError> {
                Ok(($(decode_at::<$ty>(params, $index)?,)*))
            }
        }
    };
}

impl_params!(0;);
impl_params!(1; A => 0);
impl_params!(2; A => 0, B => 1);
impl_params!(3; A => 0, B => 1, C => 2);
impl_params!(4; A => 0, B => 1, C => 2, D => 3);
impl_params!(5; A => 0, B => 1, C => 2, D => 3, E => 4);
impl_params!(6; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
impl_params!(7; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
impl_params!(8; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);
