//! Struct-to-query-parameter encoder
//!
//! GET endpoints take flat requests: every field must be a scalar. The
//! encoder walks the request through serde and emits one `(wire name, value)`
//! pair per field, in declaration order. Wire names come from the serde field
//! names, so `#[serde(rename = "...")]` applies as usual.
//!
//! Supported field kinds:
//!
//! - integers of any width
//! - strings and chars
//! - unit enum variants (their serde name)
//! - newtype wrappers around any of the above
//! - `Option` of any of the above; `None` omits the field
//!
//! Anything else (nested structs, sequences, maps, bools, floats, bytes)
//! fails with [`EncodingError::UnsupportedFieldType`].
//!
//! ```rust
//! use serde::Serialize;
//! use wechat_mp_client::encoding::ToQueryParams;
//!
//! #[derive(Serialize)]
//! struct Page {
//!     access_token: String,
//!     offset: u32,
//! }
//!
//! impl ToQueryParams for Page {}
//!
//! let page = Page { access_token: "token".into(), offset: 20 };
//! let params = page.to_query_params().unwrap();
//! assert_eq!(params[1], ("offset".to_string(), "20".to_string()));
//! ```

use serde::ser::{self, Impossible, Serialize, SerializeStruct, Serializer};

use crate::error::{EncodingError, WechatError};

/// Ordered `(wire name, value)` pairs.
pub type QueryParams = Vec<(String, String)>;

const ROOT: &str = "<request>";

/// Request types that may be sent as GET query parameters.
///
/// Implement it with an empty `impl` block; the provided method does the
/// encoding.
pub trait ToQueryParams: Serialize {
    fn to_query_params(&self) -> Result<QueryParams, WechatError> {
        to_query_params(self)
    }
}

/// Flatten `value` into query pairs.
pub fn to_query_params<T: Serialize + ?Sized>(value: &T) -> Result<QueryParams, WechatError> {
    value.serialize(RequestSerializer).map_err(WechatError::from)
}

impl ser::Error for EncodingError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        EncodingError::Serialize(msg.to_string())
    }
}

fn unsupported(field: &str, kind: &'static str) -> EncodingError {
    EncodingError::UnsupportedFieldType {
        field: field.to_string(),
        kind,
    }
}

/// Accepts only a struct at the top level.
struct RequestSerializer;

macro_rules! reject_root {
    ($($method:ident($($arg:ty),*) => $kind:literal;)*) => {
        $(
            fn $method(self, $(_: $arg),*) -> Result<Self::Ok, Self::Error> {
                Err(unsupported(ROOT, $kind))
            }
        )*
    };
}

impl Serializer for RequestSerializer {
    type Ok = QueryParams;
    type Error = EncodingError;

    type SerializeSeq = Impossible<QueryParams, EncodingError>;
    type SerializeTuple = Impossible<QueryParams, EncodingError>;
    type SerializeTupleStruct = Impossible<QueryParams, EncodingError>;
    type SerializeTupleVariant = Impossible<QueryParams, EncodingError>;
    type SerializeMap = Impossible<QueryParams, EncodingError>;
    type SerializeStruct = StructEncoder;
    type SerializeStructVariant = Impossible<QueryParams, EncodingError>;

    reject_root! {
        serialize_bool(bool) => "bool";
        serialize_i8(i8) => "integer";
        serialize_i16(i16) => "integer";
        serialize_i32(i32) => "integer";
        serialize_i64(i64) => "integer";
        serialize_u8(u8) => "integer";
        serialize_u16(u16) => "integer";
        serialize_u32(u32) => "integer";
        serialize_u64(u64) => "integer";
        serialize_f32(f32) => "float";
        serialize_f64(f64) => "float";
        serialize_char(char) => "char";
        serialize_str(&str) => "string";
        serialize_bytes(&[u8]) => "bytes";
        serialize_none() => "option";
        serialize_unit() => "unit";
        serialize_unit_struct(&'static str) => "unit struct";
        serialize_unit_variant(&'static str, u32, &'static str) => "enum";
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _: &T) -> Result<QueryParams, EncodingError> {
        Err(unsupported(ROOT, "option"))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<QueryParams, EncodingError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<QueryParams, EncodingError> {
        Err(unsupported(ROOT, "enum"))
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, EncodingError> {
        Err(unsupported(ROOT, "sequence"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, EncodingError> {
        Err(unsupported(ROOT, "tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodingError> {
        Err(unsupported(ROOT, "tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodingError> {
        Err(unsupported(ROOT, "enum"))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, EncodingError> {
        Err(unsupported(ROOT, "map"))
    }

    fn serialize_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, EncodingError> {
        Ok(StructEncoder {
            params: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, EncodingError> {
        Err(unsupported(ROOT, "enum"))
    }
}

struct StructEncoder {
    params: QueryParams,
}

impl SerializeStruct for StructEncoder {
    type Ok = QueryParams;
    type Error = EncodingError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodingError> {
        if let Some(encoded) = value.serialize(ScalarSerializer { field: key })? {
            self.params.push((key.to_string(), encoded));
        }
        Ok(())
    }

    fn end(self) -> Result<QueryParams, EncodingError> {
        Ok(self.params)
    }
}

/// Encodes one field value; `None` means the field is omitted.
struct ScalarSerializer {
    field: &'static str,
}

impl ScalarSerializer {
    fn reject<T>(&self, kind: &'static str) -> Result<T, EncodingError> {
        Err(unsupported(self.field, kind))
    }
}

macro_rules! encode_display {
    ($($method:ident($ty:ty);)*) => {
        $(
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                Ok(Some(v.to_string()))
            }
        )*
    };
}

impl Serializer for ScalarSerializer {
    type Ok = Option<String>;
    type Error = EncodingError;

    type SerializeSeq = Impossible<Option<String>, EncodingError>;
    type SerializeTuple = Impossible<Option<String>, EncodingError>;
    type SerializeTupleStruct = Impossible<Option<String>, EncodingError>;
    type SerializeTupleVariant = Impossible<Option<String>, EncodingError>;
    type SerializeMap = Impossible<Option<String>, EncodingError>;
    type SerializeStruct = Impossible<Option<String>, EncodingError>;
    type SerializeStructVariant = Impossible<Option<String>, EncodingError>;

    encode_display! {
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_i128(i128);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
        serialize_u128(u128);
        serialize_char(char);
        serialize_str(&str);
    }

    fn serialize_bool(self, _: bool) -> Result<Self::Ok, EncodingError> {
        self.reject("bool")
    }

    fn serialize_f32(self, _: f32) -> Result<Self::Ok, EncodingError> {
        self.reject("float")
    }

    fn serialize_f64(self, _: f64) -> Result<Self::Ok, EncodingError> {
        self.reject("float")
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<Self::Ok, EncodingError> {
        self.reject("bytes")
    }

    fn serialize_none(self) -> Result<Self::Ok, EncodingError> {
        Ok(None)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Self::Ok, EncodingError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, EncodingError> {
        self.reject("unit")
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok, EncodingError> {
        self.reject("unit struct")
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, EncodingError> {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<Self::Ok, EncodingError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<Self::Ok, EncodingError> {
        self.reject("enum variant with data")
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, EncodingError> {
        self.reject("sequence")
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, EncodingError> {
        self.reject("tuple")
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodingError> {
        self.reject("tuple struct")
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodingError> {
        self.reject("enum variant with data")
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, EncodingError> {
        self.reject("map")
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStruct, EncodingError> {
        self.reject("struct")
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, EncodingError> {
        self.reject("enum variant with data")
    }
}
