//! Extractor wrappers that turn malformed input into `AppError::Validation`,
//! so rejections leave the service as JSON like every other failure.

use axum::extract::{FromRequest, FromRequestParts};
use serde::{
    de::{value::StringDeserializer, IntoDeserializer},
    Deserialize, Deserializer,
};

use crate::error::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query-string field helper: `?status=` reads as absent instead of failing to parse.
pub fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(de)? {
        Some(s) if !s.trim().is_empty() => {
            let inner: StringDeserializer<D::Error> = s.into_deserializer();
            T::deserialize(inner).map(Some)
        }
        _ => Ok(None),
    }
}
