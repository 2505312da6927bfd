//! Conversion and validation seams for resource orchestration.

use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Inbound data that did not form a well-shaped resource.
#[derive(Debug, Error)]
#[error("malformed resource data: {0}")]
pub struct MalformedData(pub String);

/// Inbound representation convertible into a resource value of type `T`.
///
/// Conversion is pure; side effects like hashing credentials are allowed,
/// store access is not.
pub trait ResourceData<T>: Send + Sync {
    fn to_resource(&self) -> Result<T, MalformedData>;
}

/// Domain validation hook applied before a resource is written.
pub trait ResourceValidator<T>: Send + Sync {
    fn validate(&self, resource: &T) -> Result<(), ValidationErrors>;
}

impl<T, F> ResourceValidator<T> for F
where
    F: Fn(&T) -> Result<(), ValidationErrors> + Send + Sync,
{
    fn validate(&self, resource: &T) -> Result<(), ValidationErrors> {
        self(resource)
    }
}

/// Validator delegating to the resource's own `Validate` derive.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeriveValidator;

impl<T: Validate> ResourceValidator<T> for DeriveValidator {
    fn validate(&self, resource: &T) -> Result<(), ValidationErrors> {
        resource.validate()
    }
}
