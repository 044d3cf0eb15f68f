use super::CallError;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// Converts what a bound callable returns into the resolved value, or into
/// the error its promise is rejected with.
///
/// * `()` resolves with `null`.
/// * A plain value resolves with that value.
/// * `Result<(), E>` resolves with `null` or rejects with `E`'s text.
/// * `Result<T, E>` resolves with `T` or rejects with `E`'s text.
///
/// Values of other serializable types can be returned through [`Json`].
pub trait IntoReply {
    fn into_reply(self) -> Result<Value, CallError>;
}

/// Returns any serializable value from a binding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Json<T>(pub T);

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, CallError> {
    serde_json::to_value(value).map_err(CallError::Encode)
}

impl IntoReply for () {
    fn into_reply(self) -> Result<Value, CallError> {
        Ok(Value::Null)
    }
}

impl IntoReply for Value {
    fn into_reply(self) -> Result<Value, CallError> {
        Ok(self)
    }
}

impl<T: Serialize> IntoReply for Json<T> {
    fn into_reply(self) -> Result<Value, CallError> {
        encode(&self.0)
    }
}

impl<T: Serialize> IntoReply for Option<T> {
    fn into_reply(self) -> Result<Value, CallError> {
        encode(&self)
    }
}

impl<T: Serialize> IntoReply for Vec<T> {
    fn into_reply(self) -> Result<Value, CallError> {
        encode(&self)
    }
}

impl<T: Serialize, E: Display> IntoReply for Result<T, E> {
    fn into_reply(self) -> Result<Value, CallError> {
        match self {
            Ok(value) => encode(&value),
            Err(err) => Err(CallError::Failed(err.to_string())),
        }
    }
}

macro_rules! impl_plain_reply {
    ($($ty:ty),*) => {
        $(
            impl IntoReply for $ty {
                fn into_reply(self) -> Result<Value, CallError> {
                    encode(&self)
                }
            }
        )*
    };
}

impl_plain_reply!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    char,
    String,
    &'static str
);
